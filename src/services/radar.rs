use crate::config::Calibration;
use crate::models::RadarProfile;
use crate::services::{FormCalculator, Snapshot};

const ATTACK_CAP: f64 = 99.0;
const DEFENSE_FLOOR: f64 = 10.0;
const FORM_CAP: f64 = 99.0;
const INTENSITY_CAP: f64 = 95.0;

/// Radar form always looks at the last five matches, whatever the engine window.
const RADAR_FORM_WINDOW: usize = 5;

pub struct RadarProfiler {
    calibration: Calibration,
    form: FormCalculator,
}

impl RadarProfiler {
    pub fn new(calibration: Calibration) -> Self {
        Self {
            calibration,
            form: FormCalculator::new(RADAR_FORM_WINDOW),
        }
    }

    /// Score a team on five 0-100 axes; teams without matches sit at 50 everywhere.
    pub fn profile(&self, snapshot: &Snapshot, team: &str) -> RadarProfile {
        let mut played = 0usize;
        let mut scored = 0.0;
        let mut conceded = 0.0;
        let mut shots_for = 0.0;
        let mut shots_against = 0.0;
        let mut corners = 0.0;

        for side in snapshot.matches_for(team).filter_map(|m| m.side_of(team)) {
            played += 1;
            scored += side.scored as f64;
            conceded += side.conceded as f64;
            shots_for += side.shots_for as f64;
            shots_against += side.shots_against as f64;
            corners += side.corners as f64;
        }

        if played == 0 {
            return RadarProfile::NEUTRAL;
        }

        let n = played as f64;
        let c = &self.calibration;

        let attack = (scored / n / c.attack_baseline * 100.0).min(ATTACK_CAP);
        let defense = ((1.0 - conceded / n / c.defense_baseline) * 100.0).max(DEFENSE_FLOOR);

        let total_shots = shots_for + shots_against;
        let dominance = if total_shots > 0.0 {
            shots_for / total_shots * 100.0
        } else {
            50.0
        };

        let recent_xg = self.form.recent_form(snapshot, team).avg_xg;
        let form = (recent_xg / c.form_baseline * 100.0).min(FORM_CAP);

        let intensity = (corners / n / c.intensity_baseline * 100.0).min(INTENSITY_CAP);

        RadarProfile {
            attack: to_score(attack),
            defense: to_score(defense),
            dominance: to_score(dominance),
            form: to_score(form),
            intensity: to_score(intensity),
        }
    }
}

fn to_score(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 100.0) as u8
}
