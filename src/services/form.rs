use serde::Serialize;

use crate::config::DEFAULT_FORM_WINDOW;
use crate::services::Snapshot;
use crate::utils::round_dp;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FormSummary {
    pub avg_goals: f64,
    pub avg_xg: f64,
}

impl FormSummary {
    pub const EMPTY: FormSummary = FormSummary {
        avg_goals: 0.0,
        avg_xg: 0.0,
    };
}

/// Rolling goals and xG over a team's most recent matches.
#[derive(Debug, Clone, Copy)]
pub struct FormCalculator {
    window: usize,
}

impl Default for FormCalculator {
    fn default() -> Self {
        Self::new(DEFAULT_FORM_WINDOW)
    }
}

impl FormCalculator {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    /// Averages over the last `window` matches, home or away.
    ///
    /// Matches are ordered newest first; same-day matches keep repository order.
    /// The sums are divided by the window size even when the team has played
    /// fewer matches, so short histories read as weaker form.
    pub fn recent_form(&self, snapshot: &Snapshot, team: &str) -> FormSummary {
        if self.window == 0 {
            return FormSummary::EMPTY;
        }

        let mut matches: Vec<_> = snapshot.matches_for(team).collect();
        // stable: ties stay in repository order
        matches.sort_by(|a, b| b.date.cmp(&a.date));

        let (goals, xg) = matches
            .iter()
            .take(self.window)
            .filter_map(|m| m.side_of(team))
            .fold((0.0, 0.0), |(goals, xg), side| {
                (goals + side.scored as f64, xg + side.xg)
            });

        let n = self.window as f64;
        FormSummary {
            avg_goals: round_dp(goals / n, 2),
            avg_xg: round_dp(xg / n, 2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{record_with_xg, sample_league};

    #[test]
    fn test_five_matches_average_over_five() {
        let snapshot = Snapshot::build(sample_league()).unwrap();
        // Arsenal scored 3, 2, 4, 1, 2 across their five matches
        let form = FormCalculator::default().recent_form(&snapshot, "Arsenal");
        assert_eq!(form.avg_goals, 12.0 / 5.0);
        assert!((form.avg_xg - round_dp((2.4 + 2.1 + 3.0 + 1.4 + 2.2) / 5.0, 2)).abs() < 1e-9);
    }

    #[test]
    fn test_short_history_still_divides_by_window() {
        let snapshot = Snapshot::build(vec![
            record_with_xg("2024-01-01", "Arsenal", "Chelsea", 2, 0, 1.5, 0.5),
            record_with_xg("2024-01-08", "Chelsea", "Arsenal", 1, 2, 0.8, 1.0),
        ])
        .unwrap();
        let form = FormCalculator::new(5).recent_form(&snapshot, "Arsenal");
        assert_eq!(form.avg_goals, 0.8);
        assert_eq!(form.avg_xg, 0.5);
    }

    #[test]
    fn test_half_averages_round_to_even() {
        let snapshot = Snapshot::build(vec![record_with_xg(
            "2024-01-01", "Arsenal", "Chelsea", 1, 0, 0.625, 0.5,
        )])
        .unwrap();
        // 0.625 / 5 = 0.125
        let form = FormCalculator::new(5).recent_form(&snapshot, "Arsenal");
        assert_eq!(form.avg_xg, 0.12);
    }

    #[test]
    fn test_window_takes_most_recent_matches() {
        let snapshot = Snapshot::build(vec![
            record_with_xg("2024-03-01", "Arsenal", "Chelsea", 5, 0, 4.0, 0.1),
            record_with_xg("2024-01-01", "Arsenal", "Everton", 0, 0, 0.2, 0.3),
            record_with_xg("2024-02-01", "Fulham", "Arsenal", 0, 1, 0.4, 1.0),
        ])
        .unwrap();
        let form = FormCalculator::new(2).recent_form(&snapshot, "Arsenal");
        assert_eq!(form.avg_goals, 3.0);
        assert_eq!(form.avg_xg, 2.5);
    }

    #[test]
    fn test_same_day_ties_keep_record_order() {
        let snapshot = Snapshot::build(vec![
            record_with_xg("2024-01-01", "Arsenal", "Chelsea", 4, 0, 3.0, 0.1),
            record_with_xg("2024-01-01", "Arsenal", "Everton", 0, 0, 1.0, 0.3),
        ])
        .unwrap();
        let form = FormCalculator::new(1).recent_form(&snapshot, "Arsenal");
        assert_eq!(form.avg_goals, 4.0);
    }

    #[test]
    fn test_unknown_team_and_zero_window() {
        let snapshot = Snapshot::build(sample_league()).unwrap();
        assert_eq!(
            FormCalculator::default().recent_form(&snapshot, "Leeds"),
            FormSummary::EMPTY
        );
        assert_eq!(
            FormCalculator::new(0).recent_form(&snapshot, "Arsenal"),
            FormSummary::EMPTY
        );
    }
}
