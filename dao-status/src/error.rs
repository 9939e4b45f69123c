use dao_core::Address;
use dao_multicall::{DecodeError, MulticallError};
use std::path::PathBuf;
use thiserror::Error;

/// Why a status refresh failed.
#[derive(Debug, Error)]
pub enum StatusError {
    #[error("cannot read proposal state: {0}")]
    Multicall(#[from] MulticallError),

    #[error("unexpected contract output: {0}")]
    Decode(#[from] DecodeError),

    #[error("voting adapter {address:?} is `{name}`, not an off-chain voting adapter")]
    UnsupportedVotingAdapter { address: Address, name: String },
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("cannot read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("poll interval must be at least one millisecond")]
    ZeroPollInterval,
}
