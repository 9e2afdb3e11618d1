use anyhow::{anyhow, Result};
use chrono::{DateTime, NaiveDate};

/// Round to a fixed number of decimal places, halves to even
pub fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}

/// Parse a feed date written day first ("11/08/2023" or "11/08/23")
pub fn parse_feed_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    let year_digits = raw.rsplit('/').next().map_or(0, str::len);
    let format = if year_digits == 2 { "%d/%m/%y" } else { "%d/%m/%Y" };
    NaiveDate::parse_from_str(raw, format).map_err(|_| anyhow!("unrecognised date '{}'", raw))
}

/// Parse a stored ISO-8601 date, with or without a time part
pub fn parse_iso_date(raw: &str) -> Result<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Ok(timestamp.date_naive());
    }
    // "2024-02-03 15:00:00" style timestamps
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        .ok_or_else(|| anyhow!("unrecognised ISO date '{}'", raw))
}

/// Validate team name format
pub fn validate_team_name(name: &str) -> bool {
    !name.trim().is_empty() && name.len() <= 100
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_dp() {
        assert_eq!(round_dp(1.23456, 2), 1.23);
        assert_eq!(round_dp(45.678, 1), 45.7);
        assert_eq!(round_dp(-0.126, 2), -0.13);
    }

    #[test]
    fn test_round_dp_halves_go_to_even() {
        assert_eq!(round_dp(0.125, 2), 0.12);
        assert_eq!(round_dp(0.375, 2), 0.38);
        assert_eq!(round_dp(2.5, 0), 2.0);
        assert_eq!(round_dp(3.5, 0), 4.0);
    }

    #[test]
    fn test_parse_feed_date() {
        let expected = NaiveDate::from_ymd_opt(2023, 8, 11).unwrap();
        assert_eq!(parse_feed_date("11/08/2023").unwrap(), expected);
        assert_eq!(parse_feed_date("11/08/23").unwrap(), expected);
        assert!(parse_feed_date("2023-08-11").is_err());
        assert!(parse_feed_date("").is_err());
    }

    #[test]
    fn test_parse_iso_date() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 3).unwrap();
        assert_eq!(parse_iso_date("2024-02-03").unwrap(), expected);
        assert_eq!(parse_iso_date("2024-02-03T15:00:00+00:00").unwrap(), expected);
        assert_eq!(parse_iso_date("2024-02-03 15:00:00").unwrap(), expected);
        assert!(parse_iso_date("03/02/2024").is_err());
    }

    #[test]
    fn test_validate_team_name() {
        assert!(validate_team_name("Arsenal"));
        assert!(!validate_team_name("   "));
        assert!(!validate_team_name(&"x".repeat(101)));
    }
}
