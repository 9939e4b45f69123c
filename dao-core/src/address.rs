//! Address helpers for the DAO contracts.
//!
//! The registry uses a handful of sentinel addresses as internal accounting
//! keys; they are never real members or reporters.

use ethereum_types::H160;
use thiserror::Error;

pub type Address = H160;

/// The null address. An unset `reporter` in a vote tally reads as this value.
pub const BURN_ADDRESS: Address = H160([0u8; 20]);

pub const GUILD: Address = sentinel(0xdead);
pub const TOTAL: Address = sentinel(0xbabe);
pub const ESCROW: Address = sentinel(0x4bec);
pub const UNITS: Address = sentinel(0x000f_f1ce);
pub const LOOT: Address = sentinel(0xb105_f00d);
pub const MEMBER_COUNT: Address = sentinel(0xdeca_fbad);

const RESERVED: [Address; 7] = [BURN_ADDRESS, GUILD, TOTAL, ESCROW, UNITS, LOOT, MEMBER_COUNT];

const fn sentinel(value: u32) -> Address {
    let be = value.to_be_bytes();
    let mut bytes = [0u8; 20];
    bytes[16] = be[0];
    bytes[17] = be[1];
    bytes[18] = be[2];
    bytes[19] = be[3];
    H160(bytes)
}

pub fn is_not_zero_address(address: &Address) -> bool {
    *address != BURN_ADDRESS
}

/// `false` for the zero address and every registry sentinel.
pub fn is_not_reserved_address(address: &Address) -> bool {
    !RESERVED.contains(address)
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AddressParseError {
    #[error("invalid hex in address: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("address must be 20 bytes, got {0}")]
    InvalidLength(usize),
}

/// Parse a `0x`-prefixed (or bare) hex address. Case is ignored, so
/// checksummed and lowercase forms compare equal.
pub fn parse_address(s: &str) -> Result<Address, AddressParseError> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let bytes = hex::decode(s)?;
    if bytes.len() != Address::len_bytes() {
        return Err(AddressParseError::InvalidLength(bytes.len()));
    }
    Ok(Address::from_slice(&bytes))
}
