// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Address well-formedness check.
//!
//! Accepted: `0x` followed by exactly 40 hex digits. All-lowercase and
//! all-uppercase digits are taken as-is; mixed case must be a valid EIP-55
//! checksum.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;

/// Why an address string was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address must start with 0x")]
    MissingPrefix,

    #[error("address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("address contains non-hex characters")]
    InvalidHex,

    #[error("address checksum mismatch")]
    BadChecksum,
}

/// A validated 20-byte account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EthAddress(Address);

impl EthAddress {
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let digits = raw
            .strip_prefix("0x")
            .ok_or(AddressError::MissingPrefix)?;

        if digits.len() != 40 {
            return Err(AddressError::InvalidLength(digits.len()));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::InvalidHex);
        }

        let has_lower = digits.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = digits.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper {
            let address =
                Address::parse_checksummed(raw, None).map_err(|_| AddressError::BadChecksum)?;
            return Ok(Self(address));
        }

        let bytes = alloy::hex::decode(digits).map_err(|_| AddressError::InvalidHex)?;
        Ok(Self(Address::from_slice(&bytes)))
    }

    pub fn as_address(&self) -> Address {
        self.0
    }

    /// EIP-55 checksummed form.
    pub fn checksummed(&self) -> String {
        self.0.to_checksum(None)
    }
}

impl FromStr for EthAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for EthAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.checksummed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    #[test]
    fn accepts_lowercase_uppercase_and_checksummed() {
        let lower = EthAddress::parse(&CHECKSUMMED.to_lowercase()).unwrap();
        let upper = EthAddress::parse(&format!("0x{}", CHECKSUMMED[2..].to_uppercase())).unwrap();
        let mixed = EthAddress::parse(CHECKSUMMED).unwrap();

        assert_eq!(lower, mixed);
        assert_eq!(upper, mixed);
        assert_eq!(mixed.checksummed(), CHECKSUMMED);
    }

    #[test]
    fn burn_address_round_trips_to_checksum() {
        let addr = EthAddress::parse("0x000000000000000000000000000000000000dead").unwrap();
        assert_eq!(addr.to_string(), "0x000000000000000000000000000000000000dEaD");
    }

    #[test]
    fn rejects_missing_prefix() {
        assert_eq!(
            EthAddress::parse(&CHECKSUMMED[2..]),
            Err(AddressError::MissingPrefix)
        );
    }

    #[test]
    fn rejects_wrong_length() {
        // 38 digits
        assert_eq!(
            EthAddress::parse("0x0000000000000000000000000000000000dEaD"),
            Err(AddressError::InvalidLength(38))
        );
        assert_eq!(EthAddress::parse("0x"), Err(AddressError::InvalidLength(0)));
        assert_eq!(
            EthAddress::parse(&format!("{CHECKSUMMED}00")),
            Err(AddressError::InvalidLength(42))
        );
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(
            EthAddress::parse("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeZ"),
            Err(AddressError::InvalidHex)
        );
        assert_eq!(
            EthAddress::parse("0x 5aeb6053f3e94c9b9a09f33669435e7ef1beaed"),
            Err(AddressError::InvalidHex)
        );
    }

    #[test]
    fn rejects_bad_checksum() {
        // first 'A' flipped to lowercase
        assert_eq!(
            EthAddress::parse("0x5aaeb6053F3E94C9b9A09f33669435E7Ef1BeAed"),
            Err(AddressError::BadChecksum)
        );
    }
}
