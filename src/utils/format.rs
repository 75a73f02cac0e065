use rust_decimal::Decimal;

fn currency_symbol(currency: &str) -> Option<&'static str> {
    match currency.to_ascii_uppercase().as_str() {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "INR" => Some("₹"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

fn group_thousands(amount: Decimal) -> String {
    let whole = amount.round().abs().to_string();
    let mut out = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

fn money(amount: Decimal, currency: &str) -> String {
    match currency_symbol(currency) {
        Some(symbol) => format!("{}{}", symbol, group_thousands(amount)),
        None => format!("{} {}", group_thousands(amount), currency.to_ascii_uppercase()),
    }
}

/// Display text for a compensation range, e.g. "$50,000 - $80,000".
pub fn format_salary_range(
    min: Option<Decimal>,
    max: Option<Decimal>,
    currency: &str,
) -> Option<String> {
    match (min, max) {
        (Some(min), Some(max)) if min == max => Some(money(min, currency)),
        (Some(min), Some(max)) => Some(format!("{} - {}", money(min, currency), money(max, currency))),
        (Some(min), None) => Some(format!("From {}", money(min, currency))),
        (None, Some(max)) => Some(format!("Up to {}", money(max, currency))),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_ranges() {
        let min = Some(Decimal::new(50_000, 0));
        let max = Some(Decimal::new(80_000, 0));
        assert_eq!(
            format_salary_range(min, max, "USD").as_deref(),
            Some("$50,000 - $80,000")
        );
        assert_eq!(format_salary_range(min, None, "eur").as_deref(), Some("From €50,000"));
        assert_eq!(
            format_salary_range(None, Some(Decimal::new(1_200_000, 0)), "CHF").as_deref(),
            Some("Up to 1,200,000 CHF")
        );
        assert_eq!(format_salary_range(None, None, "USD"), None);
    }

    #[test]
    fn small_amounts_have_no_separator() {
        assert_eq!(format_salary_range(Some(Decimal::new(950, 0)), Some(Decimal::new(950, 0)), "USD").as_deref(), Some("$950"));
    }
}
