//! Proposal flags as stored by the DAO registry.
//!
//! The registry keeps a `uint256` bitmask per proposal where each bit
//! position is one [`ProposalFlag`]. Only the low bits are meaningful.

use ethereum_types::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bit positions of the registry's proposal bitmask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum_macros::EnumIter)]
#[repr(u8)]
pub enum ProposalFlag {
    Exists = 0,
    Sponsored = 1,
    Processed = 2,
}

/// `true` when `flag` is set in the raw `flags` bitmask.
pub fn has_flag(flag: ProposalFlag, flags: u64) -> bool {
    (flags >> (flag as u8)) & 1 == 1
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProposalFlags(u64);

impl ProposalFlags {
    pub const fn empty() -> Self {
        ProposalFlags(0)
    }

    pub const fn from_bits(bits: u64) -> Self {
        ProposalFlags(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    #[must_use = "flags are copied, the result holds the new bitmask"]
    pub fn with(self, flag: ProposalFlag) -> Self {
        ProposalFlags(self.0 | (1 << (flag as u8)))
    }

    pub fn contains(self, flag: ProposalFlag) -> bool {
        has_flag(flag, self.0)
    }

    pub fn exists(self) -> bool {
        self.contains(ProposalFlag::Exists)
    }

    pub fn sponsored(self) -> bool {
        self.contains(ProposalFlag::Sponsored)
    }

    pub fn processed(self) -> bool {
        self.contains(ProposalFlag::Processed)
    }
}

impl From<U256> for ProposalFlags {
    fn from(raw: U256) -> Self {
        ProposalFlags(raw.low_u64())
    }
}

impl fmt::Display for ProposalFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#b}", self.0)
    }
}
