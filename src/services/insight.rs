//! Qualitative read of a fixture, chosen from the expected-goals gap.
//!
//! Selection and wording are separate: [`select_rule`] maps the gap onto a row of
//! [`INSIGHT_RULES`], and [`InsightTemplate::render`] turns the row into text.

use crate::models::{Confidence, Insight, Transparency};

pub const STRONG_EDGE: f64 = 0.8;
pub const MILD_EDGE: f64 = 0.3;

/// Favorite label when neither side has an edge.
pub const BOTH_TEAMS: &str = "Both Teams";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    Unbounded,
    Open(f64),
    Closed(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advantage {
    Home,
    Away,
    Equal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightTemplate {
    StrongHome,
    StrongAway,
    MildHome,
    MildAway,
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsightRule {
    pub lower: Bound,
    pub upper: Bound,
    pub advantage: Advantage,
    pub confidence: Confidence,
    pub template: InsightTemplate,
}

impl InsightRule {
    pub fn contains(&self, diff: f64) -> bool {
        let above = match self.lower {
            Bound::Unbounded => true,
            Bound::Open(v) => diff > v,
            Bound::Closed(v) => diff >= v,
        };
        let below = match self.upper {
            Bound::Unbounded => true,
            Bound::Open(v) => diff < v,
            Bound::Closed(v) => diff <= v,
        };
        above && below
    }
}

/// Checked in order; the last row catches everything.
pub const INSIGHT_RULES: [InsightRule; 5] = [
    InsightRule {
        lower: Bound::Open(STRONG_EDGE),
        upper: Bound::Unbounded,
        advantage: Advantage::Home,
        confidence: Confidence::High,
        template: InsightTemplate::StrongHome,
    },
    InsightRule {
        lower: Bound::Unbounded,
        upper: Bound::Open(-STRONG_EDGE),
        advantage: Advantage::Away,
        confidence: Confidence::High,
        template: InsightTemplate::StrongAway,
    },
    InsightRule {
        lower: Bound::Open(MILD_EDGE),
        upper: Bound::Closed(STRONG_EDGE),
        advantage: Advantage::Home,
        confidence: Confidence::Medium,
        template: InsightTemplate::MildHome,
    },
    InsightRule {
        lower: Bound::Closed(-STRONG_EDGE),
        upper: Bound::Open(-MILD_EDGE),
        advantage: Advantage::Away,
        confidence: Confidence::Medium,
        template: InsightTemplate::MildAway,
    },
    InsightRule {
        lower: Bound::Unbounded,
        upper: Bound::Unbounded,
        advantage: Advantage::Equal,
        confidence: Confidence::Medium,
        template: InsightTemplate::Balanced,
    },
];

pub fn select_rule(diff: f64) -> &'static InsightRule {
    INSIGHT_RULES
        .iter()
        .find(|rule| rule.contains(diff))
        .unwrap_or(&INSIGHT_RULES[INSIGHT_RULES.len() - 1])
}

/// Values a template may quote.
#[derive(Debug, Clone, Copy)]
pub struct InsightContext<'a> {
    pub home_team: &'a str,
    pub away_team: &'a str,
    pub exp_home: f64,
    pub exp_away: f64,
    pub home_recent_xg: f64,
    pub away_recent_xg: f64,
}

impl InsightTemplate {
    pub fn text(&self, ctx: &InsightContext) -> String {
        let (home, away) = (ctx.home_team, ctx.away_team);
        match self {
            InsightTemplate::StrongHome => format!(
                "The model rates {} as clear favourites, with an aggressive home attack expected to create {:.2} goals' worth of chances.",
                home, ctx.exp_home
            ),
            InsightTemplate::StrongAway => format!(
                "Despite playing away, {} are clearly the stronger side. Expect them to control the game and outshoot {} by a wide margin ({:.2} xG to {:.2}).",
                away, home, ctx.exp_away, ctx.exp_home
            ),
            InsightTemplate::MildHome => format!(
                "{} hold a slight edge from playing at home, but this should be tight and decided by finishing in the final third.",
                home
            ),
            InsightTemplate::MildAway => format!(
                "{} look slightly better on quality, but a trip to {} is never easy and a draw is a real possibility.",
                away, home
            ),
            InsightTemplate::Balanced => "Too close to call. Both sides post very similar numbers, so a draw or a one-goal margin is the most likely outcome.".to_string(),
        }
    }

    pub fn transparency(&self, advantage: Advantage, ctx: &InsightContext) -> Transparency {
        let (home, away) = (ctx.home_team, ctx.away_team);
        let (favorite, strengths, risks) = match advantage {
            Advantage::Home => (
                home.to_string(),
                vec![
                    format!("{}'s home attack strength is above the league baseline", home),
                    format!(
                        "Solid chance creation over the last 5 matches (avg xG {:.2})",
                        ctx.home_recent_xg
                    ),
                ],
                vec![
                    format!("Watch for counter-attacks from {}", away),
                    "Pressure of being the home side".to_string(),
                ],
            ),
            Advantage::Away => (
                away.to_string(),
                vec![
                    format!("{}'s squad quality and xG outweigh the hosts'", away),
                    format!("The hosts ({}) concede goals easily", home),
                ],
                vec![
                    format!("The home crowd may unsettle {}", away),
                    "Travel fatigue".to_string(),
                ],
            ),
            Advantage::Equal => (
                BOTH_TEAMS.to_string(),
                vec!["Both teams operate at a very similar level".to_string()],
                vec![
                    "High chance of a draw".to_string(),
                    "The game could be cagey".to_string(),
                ],
            ),
        };

        Transparency {
            favorite,
            strengths,
            risks,
        }
    }
}

/// Pick the rule for the expected-goals gap and render it.
pub fn render_insight(ctx: &InsightContext) -> (Insight, Transparency) {
    let rule = select_rule(ctx.exp_home - ctx.exp_away);
    let insight = Insight {
        text: rule.template.text(ctx),
        confidence: rule.confidence,
    };
    (insight, rule.template.transparency(rule.advantage, ctx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(exp_home: f64, exp_away: f64) -> InsightContext<'static> {
        InsightContext {
            home_team: "Arsenal",
            away_team: "Chelsea",
            exp_home,
            exp_away,
            home_recent_xg: 1.84,
            away_recent_xg: 1.12,
        }
    }

    #[test]
    fn test_rule_boundaries() {
        assert_eq!(select_rule(0.81).template, InsightTemplate::StrongHome);
        assert_eq!(select_rule(0.8).template, InsightTemplate::MildHome);
        assert_eq!(select_rule(0.31).template, InsightTemplate::MildHome);
        assert_eq!(select_rule(0.3).template, InsightTemplate::Balanced);
        assert_eq!(select_rule(0.0).template, InsightTemplate::Balanced);
        assert_eq!(select_rule(-0.3).template, InsightTemplate::Balanced);
        assert_eq!(select_rule(-0.31).template, InsightTemplate::MildAway);
        assert_eq!(select_rule(-0.8).template, InsightTemplate::MildAway);
        assert_eq!(select_rule(-0.81).template, InsightTemplate::StrongAway);
    }

    #[test]
    fn test_confidence_per_rule() {
        assert_eq!(select_rule(1.5).confidence, Confidence::High);
        assert_eq!(select_rule(-1.5).confidence, Confidence::High);
        assert_eq!(select_rule(0.5).confidence, Confidence::Medium);
        assert_eq!(select_rule(-0.5).confidence, Confidence::Medium);
        assert_eq!(select_rule(0.1).confidence, Confidence::Medium);
    }

    #[test]
    fn test_nan_gap_falls_back_to_balanced() {
        assert_eq!(select_rule(f64::NAN).template, InsightTemplate::Balanced);
    }

    #[test]
    fn test_home_favourite_transparency() {
        let (insight, transparency) = render_insight(&ctx(2.1, 0.9));
        assert_eq!(insight.confidence, Confidence::High);
        assert!(insight.text.contains("Arsenal"));
        assert!(insight.text.contains("2.10"));
        assert_eq!(transparency.favorite, "Arsenal");
        assert_eq!(transparency.strengths.len(), 2);
        assert!(transparency.strengths[1].contains("1.84"));
        assert!(transparency.risks[0].contains("Chelsea"));
    }

    #[test]
    fn test_away_favourite_transparency() {
        let (insight, transparency) = render_insight(&ctx(1.0, 1.5));
        assert_eq!(insight.confidence, Confidence::Medium);
        assert_eq!(transparency.favorite, "Chelsea");
        assert_eq!(transparency.risks[1], "Travel fatigue");
    }

    #[test]
    fn test_balanced_names_both_teams() {
        let (_, transparency) = render_insight(&ctx(1.3, 1.2));
        assert_eq!(transparency.favorite, BOTH_TEAMS);
        assert_eq!(transparency.strengths.len(), 1);
        assert_eq!(transparency.risks.len(), 2);
    }
}
