use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use strsim::jaro_winkler;

use crate::models::{MatchRecord, TeamAwayProfile, TeamHomeProfile};
use crate::services::{EngineError, LeagueAverages, MetricsAggregator};

/// Minimum similarity before a known team is offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Everything a prediction reads, computed once per load and never mutated.
#[derive(Debug, Clone)]
pub struct Snapshot {
    records: Vec<MatchRecord>,
    league: LeagueAverages,
    home: BTreeMap<String, TeamHomeProfile>,
    away: BTreeMap<String, TeamAwayProfile>,
    built_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn build(records: Vec<MatchRecord>) -> Result<Self, EngineError> {
        let aggregates = MetricsAggregator::aggregate(&records)?;
        Ok(Self {
            records,
            league: aggregates.league,
            home: aggregates.home,
            away: aggregates.away,
            built_at: Utc::now(),
        })
    }

    pub fn records(&self) -> &[MatchRecord] {
        &self.records
    }

    pub fn league(&self) -> &LeagueAverages {
        &self.league
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Distinct home-team names, sorted.
    pub fn team_list(&self) -> Vec<String> {
        self.home.keys().cloned().collect()
    }

    pub fn home_profile(&self, team: &str) -> Result<&TeamHomeProfile, EngineError> {
        self.home.get(team).ok_or_else(|| self.not_found(team))
    }

    pub fn away_profile(&self, team: &str) -> Result<&TeamAwayProfile, EngineError> {
        self.away.get(team).ok_or_else(|| self.not_found(team))
    }

    /// The team's matches in either role, in repository order.
    pub fn matches_for<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a MatchRecord> + 'a {
        self.records.iter().filter(move |m| m.involves(team))
    }

    fn not_found(&self, team: &str) -> EngineError {
        let needle = team.to_lowercase();
        let suggestion = self
            .home
            .keys()
            .chain(self.away.keys())
            .map(|known| (jaro_winkler(&needle, &known.to_lowercase()), known))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .max_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(_, known)| known.clone());

        EngineError::TeamNotFound {
            name: team.to_string(),
            suggestion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{record, sample_league};

    #[test]
    fn test_team_list_is_sorted_distinct_home_teams() {
        let snapshot = Snapshot::build(vec![
            record("2024-01-01", "Wolves", "Arsenal", 1, 0),
            record("2024-01-02", "Brighton", "Wolves", 2, 2),
            record("2024-01-03", "Wolves", "Brighton", 0, 1),
        ])
        .unwrap();
        assert_eq!(snapshot.team_list(), vec!["Brighton", "Wolves"]);
    }

    #[test]
    fn test_unknown_team_suggests_closest_name() {
        let snapshot = Snapshot::build(sample_league()).unwrap();
        match snapshot.home_profile("arsenall") {
            Err(EngineError::TeamNotFound { name, suggestion }) => {
                assert_eq!(name, "arsenall");
                assert_eq!(suggestion.as_deref(), Some("Arsenal"));
            }
            other => panic!("expected TeamNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_unrelated_name_has_no_suggestion() {
        let snapshot = Snapshot::build(sample_league()).unwrap();
        match snapshot.away_profile("Real Madrid") {
            Err(EngineError::TeamNotFound { suggestion, .. }) => assert!(suggestion.is_none()),
            other => panic!("expected TeamNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_matches_for_keeps_repository_order() {
        let snapshot = Snapshot::build(sample_league()).unwrap();
        let dates: Vec<_> = snapshot
            .matches_for("Fulham")
            .map(|m| m.date.to_string())
            .collect();
        assert_eq!(
            dates,
            vec!["2024-01-06", "2024-01-13", "2024-01-20", "2024-01-27", "2024-02-03"]
        );
    }
}
