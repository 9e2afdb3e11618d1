use nalgebra::{DMatrix, DVector};
use statrs::distribution::{Discrete, Poisson};

use crate::config::{EngineConfig, MAX_GOALS_LIMIT};
use crate::models::{
    ExpectedGoals, OutcomeProbabilities, PredictionResult, RadarPair, StatsComparison,
    TeamAwayProfile, TeamHomeProfile,
};
use crate::services::insight::{render_insight, InsightContext};
use crate::services::{EngineError, FormCalculator, LeagueAverages, RadarProfiler, Snapshot};
use crate::utils::round_dp;

/// Attack and defense ratios of both sides against the league baseline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrengthCoefficients {
    pub home_attack: f64,
    pub home_defense: f64,
    pub away_attack: f64,
    pub away_defense: f64,
}

impl StrengthCoefficients {
    pub fn new(
        league: &LeagueAverages,
        home: &TeamHomeProfile,
        away: &TeamAwayProfile,
    ) -> Self {
        Self {
            home_attack: home.scored / league.avg_home_goals(),
            home_defense: home.conceded / league.avg_away_goals(),
            away_attack: away.scored / league.avg_away_goals(),
            away_defense: away.conceded / league.avg_home_goals(),
        }
    }

    /// Attack times opponent defense times the league baseline, per side.
    pub fn expected_goals(&self, league: &LeagueAverages) -> ExpectedGoals {
        ExpectedGoals {
            home: self.home_attack * self.away_defense * league.avg_home_goals(),
            away: self.away_attack * self.home_defense * league.avg_away_goals(),
        }
    }
}

/// P(goals = k) for k in 0..=max_goals. A zero rate puts everything on 0 goals.
pub fn goal_distribution(rate: f64, max_goals: usize) -> Result<DVector<f64>, EngineError> {
    if !rate.is_finite() || rate < 0.0 {
        return Err(EngineError::MetricUndefined(format!(
            "expected goals rate is {}",
            rate
        )));
    }
    if rate == 0.0 {
        return Ok(DVector::from_fn(max_goals + 1, |k, _| if k == 0 { 1.0 } else { 0.0 }));
    }

    let poisson = Poisson::new(rate)
        .map_err(|e| EngineError::MetricUndefined(format!("poisson({}): {}", rate, e)))?;
    Ok(DVector::from_fn(max_goals + 1, |k, _| poisson.pmf(k as u64)))
}

/// Joint score matrix; rows are home goals, columns away goals.
pub fn score_matrix(
    expected: &ExpectedGoals,
    max_goals: usize,
) -> Result<DMatrix<f64>, EngineError> {
    let home = goal_distribution(expected.home, max_goals)?;
    let away = goal_distribution(expected.away, max_goals)?;
    Ok(&home * away.transpose())
}

/// Outcome percentages from the score matrix. Mass beyond the goal cap is dropped.
pub fn outcome_probabilities(matrix: &DMatrix<f64>) -> OutcomeProbabilities {
    let mut home_win = 0.0;
    let mut draw = 0.0;
    let mut away_win = 0.0;

    for i in 0..matrix.nrows() {
        for j in 0..matrix.ncols() {
            let p = matrix[(i, j)];
            match i.cmp(&j) {
                std::cmp::Ordering::Greater => home_win += p,
                std::cmp::Ordering::Equal => draw += p,
                std::cmp::Ordering::Less => away_win += p,
            }
        }
    }

    OutcomeProbabilities {
        home_win: home_win * 100.0,
        draw: draw * 100.0,
        away_win: away_win * 100.0,
    }
}

/// Poisson fixture model over a loaded snapshot. Holds no state between calls.
pub struct PredictionEngine {
    max_goals: usize,
    form: FormCalculator,
    radar: RadarProfiler,
}

impl PredictionEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_goals: config.max_goals.min(MAX_GOALS_LIMIT),
            form: FormCalculator::new(config.form_window),
            radar: RadarProfiler::new(config.calibration),
        }
    }

    pub fn predict(
        &self,
        snapshot: &Snapshot,
        home_team: &str,
        away_team: &str,
    ) -> Result<PredictionResult, EngineError> {
        let league = snapshot.league();
        let home_profile = snapshot.home_profile(home_team)?;
        let away_profile = snapshot.away_profile(away_team)?;

        let coefficients = StrengthCoefficients::new(league, home_profile, away_profile);
        let expected = coefficients.expected_goals(league);

        let matrix = score_matrix(&expected, self.max_goals)?;
        let probabilities = outcome_probabilities(&matrix);

        tracing::debug!(
            "{} vs {}: coefficients {:?}, xG {:.3}-{:.3}, truncated mass {:.4}%",
            home_team,
            away_team,
            coefficients,
            expected.home,
            expected.away,
            100.0 - probabilities.total()
        );

        let home_form = self.form.recent_form(snapshot, home_team);
        let away_form = self.form.recent_form(snapshot, away_team);

        let (insight, transparency) = render_insight(&InsightContext {
            home_team,
            away_team,
            exp_home: expected.home,
            exp_away: expected.away,
            home_recent_xg: home_form.avg_xg,
            away_recent_xg: away_form.avg_xg,
        });

        Ok(PredictionResult {
            match_label: format!("{} vs {}", home_team, away_team),
            expected_goals: ExpectedGoals {
                home: round_dp(expected.home, 2),
                away: round_dp(expected.away, 2),
            },
            probabilities: OutcomeProbabilities {
                home_win: round_dp(probabilities.home_win, 1),
                draw: round_dp(probabilities.draw, 1),
                away_win: round_dp(probabilities.away_win, 1),
            },
            stats_comparison: StatsComparison {
                home_recent_xg: home_form.avg_xg,
                away_recent_xg: away_form.avg_xg,
            },
            insight,
            transparency,
            radar_data: RadarPair {
                home: self.radar.profile(snapshot, home_team),
                away: self.radar.profile(snapshot, away_team),
            },
        })
    }
}
