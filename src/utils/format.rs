use procura_config::NumberStyle;

/// Renders `value` with `precision` decimals and the separators of `style`.
pub fn format_number(value: f64, precision: u8, style: NumberStyle) -> String {
    let rendered = format!("{:.*}", precision as usize, value.abs());
    let (int_part, frac_part) = match rendered.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rendered.as_str(), None),
    };

    let mut out = String::with_capacity(rendered.len() + rendered.len() / 3 + 1);
    // No sign on amounts that render as zero.
    if value < 0.0 && rendered.bytes().any(|b| matches!(b, b'1'..=b'9')) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part, style.grouping_separator));
    if let Some(frac_part) = frac_part {
        out.push(style.decimal_separator);
        out.push_str(frac_part);
    }
    out
}

fn group_digits(digits: &str, separator: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (len - idx) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_locale_separators() {
        let en = NumberStyle::default();
        assert_eq!(format_number(1_234_567.891, 2, en), "1,234,567.89");
        assert_eq!(format_number(999.0, 2, en), "999.00");
        assert_eq!(format_number(-1_000.0, 0, en), "-1,000");

        let de = NumberStyle::new(',', '.');
        assert_eq!(format_number(1_234_567.891, 2, de), "1.234.567,89");
    }

    #[test]
    fn zero_after_rounding_has_no_sign() {
        assert_eq!(format_number(-0.001, 2, NumberStyle::default()), "0.00");
    }
}
