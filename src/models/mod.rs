use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One historical match, validated at the load boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub home_shots: u32,
    pub away_shots: u32,
    pub home_shots_target: u32,
    pub away_shots_target: u32,
    pub home_corners: u32,
    pub away_corners: u32,
    pub home_xg: f64,
    pub away_xg: f64,
    // Bookmaker odds are passed through untouched, 0 when the feed had none
    #[serde(default)]
    pub odds_home: f64,
    #[serde(default)]
    pub odds_draw: f64,
    #[serde(default)]
    pub odds_away: f64,
}

impl MatchRecord {
    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }

    /// The team's own side of the match, if it played in it.
    pub fn side_of(&self, team: &str) -> Option<TeamSide> {
        if self.home_team == team {
            Some(TeamSide {
                scored: self.home_score,
                conceded: self.away_score,
                shots_for: self.home_shots,
                shots_against: self.away_shots,
                corners: self.home_corners,
                xg: self.home_xg,
            })
        } else if self.away_team == team {
            Some(TeamSide {
                scored: self.away_score,
                conceded: self.home_score,
                shots_for: self.away_shots,
                shots_against: self.home_shots,
                corners: self.away_corners,
                xg: self.away_xg,
            })
        } else {
            None
        }
    }
}

/// A match seen from one team's perspective.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamSide {
    pub scored: u32,
    pub conceded: u32,
    pub shots_for: u32,
    pub shots_against: u32,
    pub corners: u32,
    pub xg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamHomeProfile {
    pub matches: usize,
    pub scored: f64,
    pub conceded: f64,
    pub xg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamAwayProfile {
    pub matches: usize,
    pub scored: f64,
    pub conceded: f64,
    pub xg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpectedGoals {
    pub home: f64,
    pub away: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutcomeProbabilities {
    pub home_win: f64,
    pub draw: f64,
    pub away_win: f64,
}

impl OutcomeProbabilities {
    pub fn total(&self) -> f64 {
        self.home_win + self.draw + self.away_win
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatsComparison {
    pub home_recent_xg: f64,
    pub away_recent_xg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insight {
    pub text: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transparency {
    pub favorite: String,
    pub strengths: Vec<String>,
    pub risks: Vec<String>,
}

/// Five 0-100 capability scores used by the radar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RadarProfile {
    pub attack: u8,
    pub defense: u8,
    pub dominance: u8,
    pub form: u8,
    pub intensity: u8,
}

impl RadarProfile {
    pub const NEUTRAL: RadarProfile = RadarProfile {
        attack: 50,
        defense: 50,
        dominance: 50,
        form: 50,
        intensity: 50,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadarPair {
    pub home: RadarProfile,
    pub away: RadarProfile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "match")]
    pub match_label: String,
    pub expected_goals: ExpectedGoals,
    pub probabilities: OutcomeProbabilities,
    pub stats_comparison: StatsComparison,
    pub insight: Insight,
    pub transparency: Transparency,
    pub radar_data: RadarPair,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MatchRequest {
    pub home_team: String,
    pub away_team: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TeamList {
    pub teams: Vec<String>,
}

// API Response types
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now(),
        }
    }
}
