/// Formats an amount as US dollars, e.g. `$1,234.50`.
pub fn format_currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();

    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_usd_amounts() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(840.0), "$840.00");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(format_currency(-45.125), "-$45.13");
    }
}
