use chrono::NaiveDate;

use crate::models::MatchRecord;

pub fn date(iso: &str) -> NaiveDate {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d").unwrap()
}

/// A match with shots, corners and xG filled from the score.
pub fn record(iso: &str, home: &str, away: &str, home_score: u32, away_score: u32) -> MatchRecord {
    record_with_xg(
        iso,
        home,
        away,
        home_score,
        away_score,
        home_score as f64,
        away_score as f64,
    )
}

pub fn record_with_xg(
    iso: &str,
    home: &str,
    away: &str,
    home_score: u32,
    away_score: u32,
    home_xg: f64,
    away_xg: f64,
) -> MatchRecord {
    MatchRecord {
        date: date(iso),
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_score,
        away_score,
        home_shots: 10,
        away_shots: 10,
        home_shots_target: 4,
        away_shots_target: 4,
        home_corners: 5,
        away_corners: 5,
        home_xg,
        away_xg,
        odds_home: 0.0,
        odds_draw: 0.0,
        odds_away: 0.0,
    }
}

/// A small league where Arsenal are clearly the strongest side.
pub fn sample_league() -> Vec<MatchRecord> {
    vec![
        record_with_xg("2024-01-06", "Arsenal", "Chelsea", 3, 1, 2.4, 0.9),
        record_with_xg("2024-01-06", "Everton", "Fulham", 1, 1, 1.0, 1.1),
        record_with_xg("2024-01-13", "Chelsea", "Everton", 2, 0, 1.7, 0.6),
        record_with_xg("2024-01-13", "Fulham", "Arsenal", 0, 2, 0.8, 2.1),
        record_with_xg("2024-01-20", "Arsenal", "Everton", 4, 0, 3.0, 0.5),
        record_with_xg("2024-01-20", "Fulham", "Chelsea", 1, 2, 1.2, 1.5),
        record_with_xg("2024-01-27", "Chelsea", "Arsenal", 1, 1, 1.3, 1.4),
        record_with_xg("2024-01-27", "Everton", "Fulham", 2, 1, 1.4, 1.0),
        record_with_xg("2024-02-03", "Arsenal", "Fulham", 2, 0, 2.2, 0.7),
        record_with_xg("2024-02-03", "Everton", "Chelsea", 0, 1, 0.9, 1.2),
    ]
}
