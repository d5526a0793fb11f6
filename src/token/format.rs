//! Exact decimal formatting of raw token amounts

use alloy_primitives::U256;

/// Scale `raw` down by `10^decimals` using integer arithmetic only.
///
/// The fraction keeps every significant digit and drops trailing zeros;
/// a zero fraction prints no dot. Returns `None` if `10^decimals` does not
/// fit in 256 bits.
pub fn format_token_amount(raw: U256, decimals: u8) -> Option<String> {
    let divisor = U256::from(10u8).checked_pow(U256::from(decimals))?;
    let whole = raw / divisor;
    let frac = raw % divisor;
    if frac.is_zero() {
        return Some(whole.to_string());
    }
    let digits = format!("{:0>width$}", frac.to_string(), width = decimals as usize);
    Some(format!("{}.{}", whole, digits.trim_end_matches('0')))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(raw: u128, decimals: u8) -> Option<String> {
        format_token_amount(U256::from(raw), decimals)
    }

    #[test]
    fn keeps_significant_fraction() {
        assert_eq!(fmt(1_234_500, 6).as_deref(), Some("1.2345"));
        assert_eq!(fmt(1, 6).as_deref(), Some("0.000001"));
        assert_eq!(fmt(100_050, 2).as_deref(), Some("1000.5"));
    }

    #[test]
    fn whole_amounts_have_no_dot() {
        assert_eq!(fmt(0, 6).as_deref(), Some("0"));
        assert_eq!(fmt(5_000_000, 6).as_deref(), Some("5"));
        assert_eq!(fmt(42, 0).as_deref(), Some("42"));
    }

    #[test]
    fn large_balances_stay_exact() {
        // 2^128 - 1 wei with 18 decimals would lose digits through f64
        let raw = U256::from(u128::MAX);
        assert_eq!(
            format_token_amount(raw, 18).as_deref(),
            Some("340282366920938463463.374607431768211455")
        );
        assert_eq!(format_token_amount(U256::MAX, 77).map(|s| s.starts_with("1.157920892")), Some(true));
    }

    #[test]
    fn rejects_unrepresentable_precision() {
        assert_eq!(fmt(1, 78), None);
        assert_eq!(fmt(1, 255), None);
    }
}
