use chrono::{Datelike, Duration, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

static DAYS_AGO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*hari(?:\s*yang)?\s*lalu").unwrap());

static DAY_MONTH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,2})\s*([A-Za-z]+)").unwrap());

/// Strip everything but digits and parse. None if nothing is left.
pub fn extract_digits(text: &str) -> Option<i32> {
    let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.parse().ok()
}

/// Parse a displayed price like "Rp 1.500.000" or "Rp 1,2 Jt" into rupiah.
///
/// The "Jt" suffix denotes millions; its number part may use either "."
/// or "," as the decimal separator. Anything unparsable yields None.
pub fn parse_amount(text: &str) -> Option<i64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | 'j' | 't' | 'J' | 'T'))
        .collect();

    if cleaned.to_lowercase().contains("jt") {
        let num: String = cleaned
            .chars()
            .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        let value: f64 = num.parse().ok()?;
        Some((value * 1_000_000.0).round() as i64)
    } else {
        let digits: String = cleaned.chars().filter(|c| c.is_ascii_digit()).collect();
        digits.parse().ok()
    }
}

/// Normalize an OLX relative posting date ("Hari ini", "Kemarin",
/// "3 hari lalu", "12 Mei") to DD/MM/YYYY.
///
/// Unrecognized shapes and invalid calendar dates fall back to the raw
/// input so the original display text is preserved in the store.
pub fn parse_relative_date(date_text: &str, today: NaiveDate) -> String {
    let text = date_text.trim();
    if text.is_empty() {
        return String::new();
    }

    let lower = text.to_lowercase();

    let date = if lower == "hari ini" {
        Some(today)
    } else if lower == "kemarin" {
        Some(today - Duration::days(1))
    } else if let Some(caps) = DAYS_AGO_RE.captures(&lower) {
        caps[1]
            .parse::<i64>()
            .ok()
            .map(|days| today - Duration::days(days))
    } else if let Some(caps) = DAY_MONTH_RE.captures(text) {
        let day: u32 = match caps[1].parse() {
            Ok(d) => d,
            Err(_) => return text.to_string(),
        };
        match month_number(&caps[2]) {
            Some(month) => NaiveDate::from_ymd_opt(today.year(), month, day),
            None => return text.to_string(),
        }
    } else {
        None
    };

    match date {
        Some(d) => d.format("%d/%m/%Y").to_string(),
        None => text.to_string(),
    }
}

/// Indonesian month abbreviations, matched on the first three letters.
fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let month = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "mei" => 5,
        "jun" => 6,
        "jul" => 7,
        "agu" => 8,
        "sep" => 9,
        "okt" => 10,
        "nov" => 11,
        "des" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn amount_plain_rupiah() {
        assert_eq!(parse_amount("Rp 1.500.000"), Some(1_500_000));
        assert_eq!(parse_amount("Rp 750.000.000"), Some(750_000_000));
    }

    #[test]
    fn amount_millions_suffix() {
        assert_eq!(parse_amount("Rp 1,2 Jt"), Some(1_200_000));
        assert_eq!(parse_amount("Rp 3.5 jt"), Some(3_500_000));
        assert_eq!(parse_amount("Rp 2 Jt"), Some(2_000_000));
    }

    #[test]
    fn amount_unparsable_is_none() {
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("Nego"), None);
        assert_eq!(parse_amount("Rp"), None);
    }

    #[test]
    fn relative_date_today_and_yesterday() {
        let today = day(2026, 8, 25);
        assert_eq!(parse_relative_date("Hari ini", today), "25/08/2026");
        assert_eq!(parse_relative_date("Kemarin", today), "24/08/2026");
    }

    #[test]
    fn relative_date_days_ago() {
        let today = day(2026, 8, 25);
        assert_eq!(parse_relative_date("3 hari lalu", today), "22/08/2026");
        assert_eq!(parse_relative_date("7 hari yang lalu", today), "18/08/2026");
    }

    #[test]
    fn relative_date_day_month() {
        let today = day(2026, 8, 25);
        assert_eq!(parse_relative_date("12 Mei", today), "12/05/2026");
        assert_eq!(parse_relative_date("1 Agustus", today), "01/08/2026");
    }

    #[test]
    fn relative_date_invalid_calendar_falls_back() {
        let today = day(2026, 8, 25);
        assert_eq!(parse_relative_date("31 Feb", today), "31 Feb");
    }

    #[test]
    fn relative_date_unrecognized_falls_back() {
        let today = day(2026, 8, 25);
        assert_eq!(parse_relative_date("Dipromosikan", today), "Dipromosikan");
        assert_eq!(parse_relative_date("", today), "");
    }

    #[test]
    fn digits_extraction() {
        assert_eq!(extract_digits("90 m2"), Some(90));
        assert_eq!(extract_digits("KT 3"), Some(3));
        assert_eq!(extract_digits("m2"), None);
    }
}
