use std::env;
use std::str::FromStr;

pub const DEFAULT_DATABASE_URL: &str = "sqlite:../data/football_quant.db";
pub const DEFAULT_FEED_URL: &str = "https://www.football-data.co.uk/mmz4281/2324/E0.csv";

/// Matches looked at by the recent-form window.
pub const DEFAULT_FORM_WINDOW: usize = 5;

/// Highest goal count per side in the probability matrix (0..=MAX_GOALS).
pub const DEFAULT_MAX_GOALS: usize = 5;

/// Largest accepted goal cap; the score matrix grows with its square.
pub const MAX_GOALS_LIMIT: usize = 20;

/// Baselines of a typical scoring environment, used to scale radar axes to 0-100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    /// Goals per match that maps to a full attack score
    pub attack_baseline: f64,
    /// Goals conceded per match that maps to a zero defense score
    pub defense_baseline: f64,
    /// Recent xG per match that maps to a full form score
    pub form_baseline: f64,
    /// Corners per match that maps to a full intensity score
    pub intensity_baseline: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            attack_baseline: 3.0,
            defense_baseline: 2.5,
            form_baseline: 2.5,
            intensity_baseline: 8.0,
        }
    }
}

impl Calibration {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            attack_baseline: positive_var("RADAR_ATTACK_BASELINE", defaults.attack_baseline),
            defense_baseline: positive_var("RADAR_DEFENSE_BASELINE", defaults.defense_baseline),
            form_baseline: positive_var("RADAR_FORM_BASELINE", defaults.form_baseline),
            intensity_baseline: positive_var(
                "RADAR_INTENSITY_BASELINE",
                defaults.intensity_baseline,
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub form_window: usize,
    pub max_goals: usize,
    pub calibration: Calibration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            form_window: DEFAULT_FORM_WINDOW,
            max_goals: DEFAULT_MAX_GOALS,
            calibration: Calibration::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self {
            form_window: positive_var("FORM_WINDOW", DEFAULT_FORM_WINDOW),
            max_goals: bounded_var("MAX_GOALS", DEFAULT_MAX_GOALS, Some(MAX_GOALS_LIMIT)),
            calibration: Calibration::from_env(),
        }
    }
}

pub fn database_url() -> String {
    env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

pub fn feed_url() -> String {
    env::var("MATCH_FEED_URL").unwrap_or_else(|_| DEFAULT_FEED_URL.to_string())
}

fn positive_var<T>(key: &str, default: T) -> T
where
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    bounded_var(key, default, None)
}

fn bounded_var<T>(key: &str, default: T, max: Option<T>) -> T
where
    T: FromStr + PartialOrd + Default + Copy + std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => parse_bounded(&raw, max).unwrap_or_else(|| {
            tracing::warn!("Ignoring {}={:?}, using default {}", key, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// Parse a value that must be above zero and, when given, at most `max`.
fn parse_bounded<T>(raw: &str, max: Option<T>) -> Option<T>
where
    T: FromStr + PartialOrd + Default,
{
    raw.trim()
        .parse::<T>()
        .ok()
        .filter(|value| *value > T::default())
        .filter(|value| max.as_ref().map_or(true, |max| value <= max))
}
