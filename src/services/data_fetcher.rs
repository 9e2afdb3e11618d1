use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::config;
use crate::db::{insert_matches, latest_match_date};
use crate::models::MatchRecord;
use crate::utils::{parse_feed_date, round_dp};

/// Scoring chance of a shot on target in the linear xG approximation.
const ON_TARGET_XG: f64 = 0.30;
/// Scoring chance of a shot off target.
const OFF_TARGET_XG: f64 = 0.07;

// ── football-data.co.uk structures ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct FeedRow {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "HomeTeam")]
    pub home_team: String,
    #[serde(rename = "AwayTeam")]
    pub away_team: String,
    #[serde(rename = "FTHG")]
    pub home_goals: Option<u32>,
    #[serde(rename = "FTAG")]
    pub away_goals: Option<u32>,
    #[serde(rename = "HS")]
    pub home_shots: Option<u32>,
    #[serde(rename = "AS")]
    pub away_shots: Option<u32>,
    #[serde(rename = "HST")]
    pub home_shots_target: Option<u32>,
    #[serde(rename = "AST")]
    pub away_shots_target: Option<u32>,
    #[serde(rename = "HC")]
    pub home_corners: Option<u32>,
    #[serde(rename = "AC")]
    pub away_corners: Option<u32>,
    #[serde(rename = "B365H", default)]
    pub odds_home: Option<f64>,
    #[serde(rename = "B365D", default)]
    pub odds_draw: Option<f64>,
    #[serde(rename = "B365A", default)]
    pub odds_away: Option<f64>,
}

impl FeedRow {
    pub fn into_record(self) -> Result<MatchRecord> {
        let date = parse_feed_date(&self.date)?;
        if self.home_team.trim().is_empty() || self.away_team.trim().is_empty() {
            return Err(anyhow!("missing team name"));
        }

        let required = |value: Option<u32>, column: &str| {
            value.ok_or_else(|| anyhow!("missing {}", column))
        };
        let home_shots = required(self.home_shots, "HS")?;
        let away_shots = required(self.away_shots, "AS")?;
        let home_shots_target = required(self.home_shots_target, "HST")?;
        let away_shots_target = required(self.away_shots_target, "AST")?;

        Ok(MatchRecord {
            date,
            home_team: self.home_team.trim().to_string(),
            away_team: self.away_team.trim().to_string(),
            home_score: required(self.home_goals, "FTHG")?,
            away_score: required(self.away_goals, "FTAG")?,
            home_shots,
            away_shots,
            home_shots_target,
            away_shots_target,
            home_corners: required(self.home_corners, "HC")?,
            away_corners: required(self.away_corners, "AC")?,
            home_xg: approximate_xg(home_shots, home_shots_target),
            away_xg: approximate_xg(away_shots, away_shots_target),
            odds_home: self.odds_home.unwrap_or(0.0),
            odds_draw: self.odds_draw.unwrap_or(0.0),
            odds_away: self.odds_away.unwrap_or(0.0),
        })
    }
}

/// Expected goals from shot counts: 0.30 per shot on target, 0.07 per shot off it.
pub fn approximate_xg(shots: u32, on_target: u32) -> f64 {
    let off_target = shots.saturating_sub(on_target);
    round_dp(
        on_target as f64 * ON_TARGET_XG + off_target as f64 * OFF_TARGET_XG,
        2,
    )
}

/// Parse a results CSV, skipping rows that lack the columns a match needs.
pub fn parse_feed<R: Read>(reader: R) -> Result<Vec<MatchRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<FeedRow>().enumerate() {
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                tracing::warn!("Skipping feed line {}: {}", line, e);
                continue;
            }
        };
        match row.into_record() {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("Skipping feed line {}: {}", line, e),
        }
    }

    Ok(records)
}

/// Matches played strictly after the newest stored date.
pub fn newer_than(records: Vec<MatchRecord>, latest: Option<NaiveDate>) -> Vec<MatchRecord> {
    match latest {
        Some(latest) => records.into_iter().filter(|m| m.date > latest).collect(),
        None => records,
    }
}

// ── DataFetcher ──────────────────────────────────────────────────────────────

pub struct DataFetcher {
    client: Client,
    feed_url: String,
}

impl DataFetcher {
    pub fn new() -> Self {
        Self::with_feed_url(config::feed_url())
    }

    pub fn with_feed_url(feed_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            feed_url: feed_url.into(),
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    /// Download and parse the season CSV.
    pub async fn download_feed(&self) -> Result<Vec<MatchRecord>> {
        tracing::info!("Downloading match feed from {}…", self.feed_url);

        // Retry up to 3 times on 429 with exponential backoff
        let mut attempts = 0u32;
        let body = loop {
            attempts += 1;
            let resp = self.client.get(&self.feed_url).send().await?;

            if resp.status() == 429 {
                let wait = 2u64.pow(attempts) * 5; // 10s, 20s, 40s
                tracing::warn!("Feed rate-limited, waiting {}s (attempt {})", wait, attempts);
                if attempts >= 3 {
                    return Err(anyhow!("Feed rate limit exceeded after {} attempts", attempts));
                }
                tokio::time::sleep(tokio::time::Duration::from_secs(wait)).await;
                continue;
            }

            if !resp.status().is_success() {
                let status = resp.status();
                let body = resp.text().await.unwrap_or_default();
                return Err(anyhow!("Feed error {}: {}", status, body));
            }

            break resp.bytes().await?;
        };

        parse_feed(body.as_ref())
    }

    /// Store only the feed matches newer than what the database already holds.
    pub async fn refresh(&self, pool: &SqlitePool) -> Result<usize> {
        let records = self.download_feed().await?;
        store_new_matches(pool, records).await
    }

    pub async fn refresh_from_file(&self, pool: &SqlitePool, path: &Path) -> Result<usize> {
        tracing::info!("Reading match feed from {}", path.display());
        let records = read_feed_file(path)?;
        store_new_matches(pool, records).await
    }
}

impl Default for DataFetcher {
    fn default() -> Self {
        Self::new()
    }
}

pub fn read_feed_file(path: &Path) -> Result<Vec<MatchRecord>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("opening feed file {}", path.display()))?;
    parse_feed(file)
}

async fn store_new_matches(pool: &SqlitePool, records: Vec<MatchRecord>) -> Result<usize> {
    let latest = latest_match_date(pool).await?;
    match latest {
        Some(date) => tracing::info!("Latest match in database: {}", date),
        None => tracing::warn!("Database is empty, importing every feed match"),
    }

    let fresh = newer_than(records, latest);
    if fresh.is_empty() {
        tracing::info!("Database is already up to date");
        return Ok(0);
    }

    insert_matches(pool, &fresh).await?;
    tracing::info!("Stored {} new matches", fresh.len());
    Ok(fresh.len())
}
