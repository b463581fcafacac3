use alloy::primitives::U256;

/// Renders `raw / 10^decimals` as an exact decimal string.
///
/// Trailing fractional zeros are dropped; a whole amount has no decimal point.
pub fn format_units(raw: U256, decimals: u8) -> String {
    let digits = raw.to_string();
    let decimals = decimals as usize;

    if decimals == 0 {
        return digits;
    }

    let padded = if digits.len() <= decimals {
        format!("{:0>width$}", digits, width = decimals + 1)
    } else {
        digits
    };

    let split_at = padded.len() - decimals;
    let (whole, frac) = padded.split_at(split_at);
    let frac_trimmed = frac.trim_end_matches('0');

    if frac_trimmed.is_empty() {
        whole.to_string()
    } else {
        format!("{}.{}", whole, frac_trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_supply() {
        let raw = U256::from(1_000_000u64) * U256::from(10u64).pow(U256::from(18));
        assert_eq!(format_units(raw, 18), "1000000");
    }

    #[test]
    fn test_fractional_is_exact() {
        // 123456789 / 10^6, no float rounding
        assert_eq!(format_units(U256::from(123_456_789u64), 6), "123.456789");
        assert_eq!(format_units(U256::from(1u64), 18), "0.000000000000000001");
    }

    #[test]
    fn test_zero_and_no_decimals() {
        assert_eq!(format_units(U256::ZERO, 18), "0");
        assert_eq!(format_units(U256::from(42u64), 0), "42");
    }

    #[test]
    fn test_max_supply_does_not_lose_digits() {
        let formatted = format_units(U256::MAX, 18);
        let (whole, frac) = formatted.split_once('.').unwrap();
        assert_eq!(format!("{whole}{frac}"), U256::MAX.to_string());
    }

    #[test]
    fn test_decimals_beyond_digit_count() {
        assert_eq!(format_units(U256::from(5u64), 77), format!("0.{}5", "0".repeat(76)));
    }
}
