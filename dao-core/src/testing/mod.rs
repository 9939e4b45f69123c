pub mod arbitrary;
pub mod builders;

pub use arbitrary::pt;
pub use builders::ProposalBuilder;
