use std::future::Future;
use std::str::FromStr;

use anyhow::Result;
use chrono::NaiveDate;
use sqlx::{sqlite::SqliteConnectOptions, FromRow, SqlitePool};

use crate::config;
use crate::models::MatchRecord;
use crate::services::{EngineError, MatchRepository};
use crate::utils::parse_iso_date;

pub async fn create_pool() -> Result<SqlitePool> {
    let database_url = config::database_url();

    // Strip the "sqlite:" prefix to get the file path, create parent dir if needed
    let file_path = database_url
        .strip_prefix("sqlite:///")
        .or_else(|| database_url.strip_prefix("sqlite://"))
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(&database_url);

    if let Some(parent) = std::path::Path::new(file_path).parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await.ok();
        }
    }

    let options = SqliteConnectOptions::from_str(&database_url)?
        .create_if_missing(true);

    let pool = SqlitePool::connect_with(options).await?;
    Ok(pool)
}

/// Called from the CLI where no pool exists yet.
pub async fn init_database() -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await
}

/// Called from the server so schema creation shares the main pool.
pub async fn init_database_with_pool(pool: &SqlitePool) -> Result<()> {
    // One row per match; the autoincrement id preserves feed order
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS matches (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            home_team TEXT NOT NULL,
            away_team TEXT NOT NULL,
            home_score INTEGER NOT NULL,
            away_score INTEGER NOT NULL,
            home_shots INTEGER NOT NULL,
            away_shots INTEGER NOT NULL,
            home_shots_target INTEGER NOT NULL,
            away_shots_target INTEGER NOT NULL,
            home_corners INTEGER NOT NULL,
            away_corners INTEGER NOT NULL,
            home_xg REAL NOT NULL,
            away_xg REAL NOT NULL,
            odds_home REAL DEFAULT 0,
            odds_draw REAL DEFAULT 0,
            odds_away REAL DEFAULT 0
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_matches_date ON matches(date)")
        .execute(pool)
        .await?;

    tracing::info!("Database initialized successfully");
    Ok(())
}

/// A `matches` row as stored, before validation.
#[derive(Debug, Clone, FromRow)]
pub struct MatchRow {
    pub id: i64,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: i64,
    pub away_score: i64,
    pub home_shots: i64,
    pub away_shots: i64,
    pub home_shots_target: i64,
    pub away_shots_target: i64,
    pub home_corners: i64,
    pub away_corners: i64,
    pub home_xg: f64,
    pub away_xg: f64,
    pub odds_home: Option<f64>,
    pub odds_draw: Option<f64>,
    pub odds_away: Option<f64>,
}

impl TryFrom<MatchRow> for MatchRecord {
    type Error = EngineError;

    fn try_from(row: MatchRow) -> Result<Self, Self::Error> {
        let row_id = row.id as usize;
        let invalid = |reason: String| EngineError::InvalidRecord { row: row_id, reason };

        let count = |value: i64, column: &str| {
            u32::try_from(value).map_err(|_| invalid(format!("{} is {}", column, value)))
        };
        let xg = |value: f64, column: &str| {
            if value.is_finite() && value >= 0.0 {
                Ok(value)
            } else {
                Err(invalid(format!("{} is {}", column, value)))
            }
        };

        let date = parse_iso_date(&row.date).map_err(|e| invalid(e.to_string()))?;
        if row.home_team.trim().is_empty() || row.away_team.trim().is_empty() {
            return Err(invalid("blank team name".to_string()));
        }

        Ok(MatchRecord {
            date,
            home_score: count(row.home_score, "home_score")?,
            away_score: count(row.away_score, "away_score")?,
            home_shots: count(row.home_shots, "home_shots")?,
            away_shots: count(row.away_shots, "away_shots")?,
            home_shots_target: count(row.home_shots_target, "home_shots_target")?,
            away_shots_target: count(row.away_shots_target, "away_shots_target")?,
            home_corners: count(row.home_corners, "home_corners")?,
            away_corners: count(row.away_corners, "away_corners")?,
            home_xg: xg(row.home_xg, "home_xg")?,
            away_xg: xg(row.away_xg, "away_xg")?,
            home_team: row.home_team,
            away_team: row.away_team,
            odds_home: row.odds_home.unwrap_or(0.0),
            odds_draw: row.odds_draw.unwrap_or(0.0),
            odds_away: row.odds_away.unwrap_or(0.0),
        })
    }
}

/// Every match in insertion order, validated into typed records.
pub async fn fetch_all_matches(pool: &SqlitePool) -> Result<Vec<MatchRecord>> {
    let rows = sqlx::query_as::<_, MatchRow>("SELECT * FROM matches ORDER BY id ASC")
        .fetch_all(pool)
        .await?;

    let records = rows
        .into_iter()
        .map(MatchRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records)
}

pub async fn latest_match_date(pool: &SqlitePool) -> Result<Option<NaiveDate>> {
    let latest: Option<String> = sqlx::query_scalar("SELECT MAX(date) FROM matches")
        .fetch_one(pool)
        .await?;

    latest.map(|raw| parse_iso_date(&raw)).transpose()
}

pub async fn insert_matches(pool: &SqlitePool, records: &[MatchRecord]) -> Result<()> {
    let mut tx = pool.begin().await?;

    for m in records {
        sqlx::query(
            r#"
            INSERT INTO matches
            (date, home_team, away_team, home_score, away_score, home_shots, away_shots,
             home_shots_target, away_shots_target, home_corners, away_corners,
             home_xg, away_xg, odds_home, odds_draw, odds_away)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(m.date.format("%Y-%m-%d").to_string())
        .bind(&m.home_team)
        .bind(&m.away_team)
        .bind(m.home_score as i64)
        .bind(m.away_score as i64)
        .bind(m.home_shots as i64)
        .bind(m.away_shots as i64)
        .bind(m.home_shots_target as i64)
        .bind(m.away_shots_target as i64)
        .bind(m.home_corners as i64)
        .bind(m.away_corners as i64)
        .bind(m.home_xg)
        .bind(m.away_xg)
        .bind(m.odds_home)
        .bind(m.odds_draw)
        .bind(m.odds_away)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

pub async fn count_matches(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM matches")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// The match table behind a SQLite pool.
#[derive(Debug, Clone)]
pub struct SqliteMatchRepository {
    pool: SqlitePool,
}

impl SqliteMatchRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl MatchRepository for SqliteMatchRepository {
    fn fetch_all(&self) -> impl Future<Output = Result<Vec<MatchRecord>>> + Send {
        fetch_all_matches(&self.pool)
    }
}
