use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{MatchRecord, TeamAwayProfile, TeamHomeProfile};
use crate::services::EngineError;

/// League-wide scoring baseline. Both averages are finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LeagueAverages {
    avg_home_goals: f64,
    avg_away_goals: f64,
}

impl LeagueAverages {
    pub fn new(avg_home_goals: f64, avg_away_goals: f64) -> Result<Self, EngineError> {
        for (label, value) in [("home", avg_home_goals), ("away", avg_away_goals)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(EngineError::MetricUndefined(format!(
                    "league average {} goals is {}",
                    label, value
                )));
            }
        }
        Ok(Self {
            avg_home_goals,
            avg_away_goals,
        })
    }

    pub fn avg_home_goals(&self) -> f64 {
        self.avg_home_goals
    }

    pub fn avg_away_goals(&self) -> f64 {
        self.avg_away_goals
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub league: LeagueAverages,
    pub home: BTreeMap<String, TeamHomeProfile>,
    pub away: BTreeMap<String, TeamAwayProfile>,
}

#[derive(Default)]
struct Totals {
    matches: usize,
    scored: f64,
    conceded: f64,
    xg: f64,
}

impl Totals {
    fn add(&mut self, scored: u32, conceded: u32, xg: f64) {
        self.matches += 1;
        self.scored += scored as f64;
        self.conceded += conceded as f64;
        self.xg += xg;
    }

    fn means(&self) -> (f64, f64, f64) {
        let n = self.matches as f64;
        (self.scored / n, self.conceded / n, self.xg / n)
    }
}

pub struct MetricsAggregator;

impl MetricsAggregator {
    /// Group the match table by team and role and average the scoring columns.
    pub fn aggregate(records: &[MatchRecord]) -> Result<Aggregates, EngineError> {
        if records.is_empty() {
            return Err(EngineError::DataUnavailable(
                "no matches to aggregate".to_string(),
            ));
        }

        let n = records.len() as f64;
        let total_home: f64 = records.iter().map(|m| m.home_score as f64).sum();
        let total_away: f64 = records.iter().map(|m| m.away_score as f64).sum();
        let league = LeagueAverages::new(total_home / n, total_away / n)?;

        let mut home_totals: BTreeMap<&str, Totals> = BTreeMap::new();
        let mut away_totals: BTreeMap<&str, Totals> = BTreeMap::new();
        for m in records {
            home_totals
                .entry(m.home_team.as_str())
                .or_default()
                .add(m.home_score, m.away_score, m.home_xg);
            away_totals
                .entry(m.away_team.as_str())
                .or_default()
                .add(m.away_score, m.home_score, m.away_xg);
        }

        let home = home_totals
            .into_iter()
            .map(|(team, t)| {
                let (scored, conceded, xg) = t.means();
                (
                    team.to_string(),
                    TeamHomeProfile {
                        matches: t.matches,
                        scored,
                        conceded,
                        xg,
                    },
                )
            })
            .collect();

        let away = away_totals
            .into_iter()
            .map(|(team, t)| {
                let (scored, conceded, xg) = t.means();
                (
                    team.to_string(),
                    TeamAwayProfile {
                        matches: t.matches,
                        scored,
                        conceded,
                        xg,
                    },
                )
            })
            .collect();

        Ok(Aggregates { league, home, away })
    }
}
