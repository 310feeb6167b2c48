//! Number formatting shared by ticks, tooltips and slice labels.

/// Fraction digits kept by locale-style amount formatting
const MAX_FRACTION_DIGITS: usize = 3;

/// Group the integer part in thousands and keep at most three decimals.
///
/// `1234567.0` -> `"1,234,567"`, `1234.5` -> `"1,234.5"`
pub fn group_amount(value: f64) -> String {
    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, value.abs());
    let (digits, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 5);
    if value < 0.0 && (digits != "0" || !fraction.is_empty()) {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Currency-style amount, e.g. `₹12,500`
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{}{}", symbol, group_amount(value))
}

/// Share of `value` in `total` as a percentage rounded to one decimal.
///
/// Returns 0 when `total` is 0.
pub fn percentage(value: f64, total: f64) -> f64 {
    if total > 0.0 {
        (value / total * 1000.0).round() / 10.0
    } else {
        0.0
    }
}

/// Percentage with exactly one decimal, e.g. `25.0%`
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_amount() {
        assert_eq!(group_amount(0.0), "0");
        assert_eq!(group_amount(999.0), "999");
        assert_eq!(group_amount(1000.0), "1,000");
        assert_eq!(group_amount(50000.0), "50,000");
        assert_eq!(group_amount(1234567.0), "1,234,567");
        assert_eq!(group_amount(1234.5), "1,234.5");
        assert_eq!(group_amount(12.05), "12.05");
        assert_eq!(group_amount(0.125), "0.125");
        assert_eq!(group_amount(999.9996), "1,000");
        assert_eq!(group_amount(-1500.0), "-1,500");
    }

    #[test]
    fn test_group_amount_huge_values_keep_all_digits() {
        assert_eq!(group_amount(1e20), "100,000,000,000,000,000,000");
        assert_eq!(
            format_currency("₹", 2.5e18),
            "₹2,500,000,000,000,000,000"
        );
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency("₹", 10000.0), "₹10,000");
        assert_eq!(format_currency("$", 42.5), "$42.5");
    }

    #[test]
    fn test_percentage_rounds_to_one_decimal() {
        assert_eq!(percentage(100.0, 400.0), 25.0);
        assert_eq!(percentage(1.0, 3.0), 33.3);
        assert_eq!(percentage(2.0, 3.0), 66.7);
        assert_eq!(format_percent(percentage(200.0, 400.0)), "50.0%");
    }

    #[test]
    fn test_percentage_of_zero_total() {
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(5.0, 0.0), 0.0);
    }
}
