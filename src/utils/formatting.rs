//! Display formatting for names and cracker counts.

/// Upper-case the first letter: "charizard" → "Charizard".
pub fn format_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Thousands separators with at most three fraction digits, trailing zeros dropped.
///
/// 45250.0 → "45,250", 1234567.891 → "1,234,567.891", 2.5 → "2.5"
pub fn format_grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let rounded = (value * 1000.0).round() / 1000.0;
    let text = format!("{:.3}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut out = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded < 0.0 {
        out.push('-');
    }
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capitalizes_first_letter() {
        assert_eq!(format_name("charizard"), "Charizard");
        assert_eq!(format_name("mr-mime"), "Mr-mime");
        assert_eq!(format_name(""), "");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(999.0), "999");
        assert_eq!(format_grouped(45_250.0), "45,250");
        assert_eq!(format_grouped(1_000_000.0), "1,000,000");
    }

    #[test]
    fn keeps_up_to_three_fraction_digits() {
        assert_eq!(format_grouped(2.5), "2.5");
        assert_eq!(format_grouped(1234.56789), "1,234.568");
        assert_eq!(format_grouped(-1500.25), "-1,500.25");
    }
}
