use chrono::{Duration, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{CaixaError, Result};
use crate::models::{in_range, max_amount};

/// Format a decimal as Brazilian currency: R$ 1.234,56
///
/// Output only. Nothing in the crate parses these strings back.
pub fn money(val: Decimal) -> String {
    let rounded = val.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    let cents = format!("{:.2}", rounded.abs());
    let (int_part, dec_part) = cents.split_once('.').unwrap_or((cents.as_str(), "00"));

    let mut grouped = String::new();
    for (i, c) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let grouped: String = grouped.chars().rev().collect();

    if negative {
        format!("-R$ {grouped},{dec_part}")
    } else {
        format!("R$ {grouped},{dec_part}")
    }
}

/// Parse an amount typed by the user. Accepts `1234.56`, `1234,56` and
/// `1.234,56` (an optional `R$` prefix is ignored). Magnitudes above what the
/// backend stores are rejected.
pub fn parse_amount(input: &str) -> Result<Decimal> {
    let trimmed = input.trim().trim_start_matches("R$").trim();
    if trimmed.is_empty() {
        return Err(CaixaError::InvalidAmount(input.to_string()));
    }

    let normalized = if trimmed.contains(',') {
        // pt-BR: '.' groups thousands, ',' is the decimal separator
        let (int_part, frac) = trimmed
            .rsplit_once(',')
            .ok_or_else(|| CaixaError::InvalidAmount(input.to_string()))?;
        if frac.contains('.') || !valid_grouping(int_part) {
            return Err(CaixaError::InvalidAmount(input.to_string()));
        }
        format!("{}.{frac}", int_part.replace('.', ""))
    } else {
        trimmed.to_string()
    };

    if !normalized
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
    {
        return Err(CaixaError::InvalidAmount(input.to_string()));
    }

    let value: Decimal = normalized
        .parse()
        .map_err(|_| CaixaError::InvalidAmount(input.to_string()))?;
    if value.scale() > 2 {
        return Err(CaixaError::InvalidAmount(format!(
            "{input} (at most two decimal places)"
        )));
    }
    if !in_range(&value) {
        return Err(CaixaError::InvalidAmount(format!(
            "{input} (limit is {})",
            money(max_amount())
        )));
    }
    Ok(value)
}

/// Thousands groups after the first must be exactly three digits.
fn valid_grouping(int_part: &str) -> bool {
    let digits = int_part.trim_start_matches('-');
    if !digits.contains('.') {
        return true;
    }
    let mut groups = digits.split('.');
    let first = groups.next().unwrap_or_default();
    (1..=3).contains(&first.len()) && groups.all(|g| g.len() == 3)
}

/// dd/mm/yyyy
pub fn date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Resolve a `--date` argument: `YYYY-MM-DD`, `today`, or a signed day
/// offset from `today` such as `-1` or `+2`.
pub fn parse_date_arg(input: &str, today: NaiveDate) -> Result<NaiveDate> {
    let s = input.trim();
    if s.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    if let Some(offset) = parse_offset(s) {
        return Duration::try_days(offset)
            .and_then(|d| today.checked_add_signed(d))
            .ok_or_else(|| CaixaError::InvalidDate(input.to_string()));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| CaixaError::InvalidDate(input.to_string()))
}

fn parse_offset(s: &str) -> Option<i64> {
    let (sign, digits) = match s.as_bytes().first()? {
        b'+' => (1, &s[1..]),
        b'-' => (-1, &s[1..]),
        _ => return None,
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok().map(|n| sign * n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn test_money_formatting() {
        assert_eq!(money(dec("1234.56")), "R$ 1.234,56");
        assert_eq!(money(dec("-500")), "-R$ 500,00");
        assert_eq!(money(Decimal::ZERO), "R$ 0,00");
        assert_eq!(money(dec("1000000.99")), "R$ 1.000.000,99");
        assert_eq!(money(dec("42.1")), "R$ 42,10");
        assert_eq!(money(dec("0.005")), "R$ 0,01");
    }

    #[test]
    fn test_parse_amount_locale_forms() {
        assert_eq!(parse_amount("1.234,56").unwrap(), dec("1234.56"));
        assert_eq!(parse_amount("1234,56").unwrap(), dec("1234.56"));
        assert_eq!(parse_amount("1234.56").unwrap(), dec("1234.56"));
        assert_eq!(parse_amount("R$ 1.000.000,00").unwrap(), dec("1000000"));
        assert_eq!(parse_amount(" 50 ").unwrap(), dec("50"));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
        assert!(parse_amount("12.345.6").is_err());
        assert!(parse_amount("1.23,4.5").is_err());
        assert!(parse_amount("12,3456").is_err());
        assert!(parse_amount("12.34,56").is_err());
    }

    #[test]
    fn test_parse_amount_range() {
        assert_eq!(parse_amount("99.999.999,99").unwrap(), dec("99999999.99"));
        assert_eq!(parse_amount("-99999999.99").unwrap(), dec("-99999999.99"));
        assert!(matches!(
            parse_amount("100000000"),
            Err(CaixaError::InvalidAmount(_))
        ));
        assert!(parse_amount("79228162514264337593543950335").is_err());
    }

    #[test]
    fn test_date_br() {
        let d = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(date_br(d), "07/03/2025");
    }

    #[test]
    fn test_parse_date_arg() {
        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        assert_eq!(parse_date_arg("today", today).unwrap(), today);
        assert_eq!(
            parse_date_arg("-1", today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()
        );
        assert_eq!(
            parse_date_arg("+2", today).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 3).unwrap()
        );
        assert_eq!(
            parse_date_arg("2024-12-31", today).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
        assert!(parse_date_arg("31/12/2024", today).is_err());
        assert!(parse_date_arg("-", today).is_err());
    }
}
