//! Text formatting helpers for the panels and tooltip.

/// Price formatting: thousands separators and 2 decimals for normal prices,
/// high precision with trailing zeros trimmed for sub-dollar assets.
pub fn format_price(price: f64) -> String {
    if price.abs() >= 1.0 {
        let formatted = format!("{:.2}", price);
        let (int_part, frac_part) = formatted.split_once('.').unwrap_or((&formatted, "00"));

        let negative = int_part.starts_with('-');
        let digits = int_part.trim_start_matches('-');

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, c) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(c);
        }

        let sign = if negative { "-" } else { "" };
        format!("{}{}.{}", sign, grouped, frac_part)
    } else {
        let s = format!("{:.8}", price);
        let trimmed = s.trim_end_matches('0').trim_end_matches('.');
        trimmed.to_string()
    }
}

/// Compact magnitude formatting for volume / market cap: 28.5B, 1.02T.
pub fn format_compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1e12 {
        format!("{:.2}T", value / 1e12)
    } else if abs >= 1e9 {
        format!("{:.1}B", value / 1e9)
    } else if abs >= 1e6 {
        format!("{:.1}M", value / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1}K", value / 1e3)
    } else {
        format!("{:.2}", value)
    }
}

/// Signed percent with 2 decimals: "+1.24%", "-0.03%".
pub fn format_pct(pct: f64) -> String {
    let sign = if pct > 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, pct)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prices_get_thousands_separators() {
        assert_eq!(format_price(50_000.0), "50,000.00");
        assert_eq!(format_price(1_234_567.891), "1,234,567.89");
        assert_eq!(format_price(999.5), "999.50");
        assert_eq!(format_price(-12_345.6), "-12,345.60");
    }

    #[test]
    fn small_prices_trim_trailing_zeros() {
        assert_eq!(format_price(0.00012340), "0.0001234");
        assert_eq!(format_price(0.5), "0.5");
    }

    #[test]
    fn compact_scales_through_magnitudes() {
        assert_eq!(format_compact(28.5e9), "28.5B");
        assert_eq!(format_compact(1.02e12), "1.02T");
        assert_eq!(format_compact(950_000.0), "950.0K");
        assert_eq!(format_compact(12.0), "12.00");
    }

    #[test]
    fn percent_carries_its_sign() {
        assert_eq!(format_pct(1.239), "+1.24%");
        assert_eq!(format_pct(-0.031), "-0.03%");
        assert_eq!(format_pct(0.0), "0.00%");
    }
}
