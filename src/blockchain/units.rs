// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Fixed-point formatting of wei amounts.
//!
//! Integer division on `U256` only; the fractional part keeps every
//! significant digit and always shows at least one (`"1.0"`, `"0.5"`).

use alloy::primitives::U256;

pub const ETHER_DECIMALS: u8 = 18;
pub const GWEI_DECIMALS: u8 = 9;

/// Shift `value` right by `decimals` places and render it as a decimal string.
pub fn format_units(value: U256, decimals: u8) -> String {
    let divisor = U256::from(10u64).pow(U256::from(decimals));
    let whole = value / divisor;
    let remainder = value % divisor;

    let fraction = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    let trimmed = fraction.trim_end_matches('0');
    if trimmed.is_empty() {
        format!("{whole}.0")
    } else {
        format!("{whole}.{trimmed}")
    }
}

pub fn format_ether(wei: U256) -> String {
    format_units(wei, ETHER_DECIMALS)
}

pub fn format_gwei(wei: U256) -> String {
    format_units(wei, GWEI_DECIMALS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ether() {
        let one_eth = U256::from(1_000_000_000_000_000_000u64);
        assert_eq!(format_ether(one_eth), "1.0");

        let half_eth = U256::from(500_000_000_000_000_000u64);
        assert_eq!(format_ether(half_eth), "0.5");

        // no truncation of significant digits
        let complex = U256::from(1_234_567_890_123_456_789u64);
        assert_eq!(format_ether(complex), "1.234567890123456789");

        assert_eq!(format_ether(U256::from(1u64)), "0.000000000000000001");
        assert_eq!(format_ether(U256::ZERO), "0.0");
    }

    #[test]
    fn test_format_gwei() {
        assert_eq!(format_gwei(U256::from(20_000_000_000u64)), "20.0");
        assert_eq!(format_gwei(U256::from(1_500_000_000u64)), "1.5");
        assert_eq!(format_gwei(U256::from(7u64)), "0.000000007");
    }

    #[test]
    fn beyond_u128_keeps_precision() {
        let wei = U256::from(u128::MAX) * U256::from(10u64).pow(U256::from(18u64))
            + U256::from(42u64);
        assert_eq!(
            format_ether(wei),
            "340282366920938463463374607431768211455.000000000000000042"
        );
    }

    #[test]
    fn zero_decimals() {
        assert_eq!(format_units(U256::from(12345u64), 0), "12345.0");
    }
}
