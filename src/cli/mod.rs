use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::EngineConfig;
use crate::db::{count_matches, create_pool, init_database_with_pool, SqliteMatchRepository};
use crate::models::PredictionResult;
use crate::services::{read_feed_file, DataFetcher, Engine, EngineError, InMemoryRepository};

pub async fn refresh_data(file: Option<PathBuf>) -> Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;
    let fetcher = DataFetcher::new();

    let added = match &file {
        Some(path) => {
            println!("📂 Reading matches from {}...", path.display());
            fetcher.refresh_from_file(&pool, path).await?
        }
        None => {
            println!("☁️  Downloading latest results from {}...", fetcher.feed_url());
            fetcher.refresh(&pool).await?
        }
    };

    if added == 0 {
        println!("✅ Database is already up to date. No new matches.");
    } else {
        println!("✅ Added {} new matches ({} stored in total)", added, count_matches(&pool).await?);
    }

    Ok(())
}

/// Load an engine from a local feed file, or from the database when none is given.
async fn load_engine(csv: Option<&Path>) -> Result<Engine> {
    let engine = Engine::new(EngineConfig::from_env());

    match csv {
        Some(path) => {
            let repository = InMemoryRepository::new(read_feed_file(path)?);
            engine.reload(&repository).await?;
        }
        None => {
            let pool = create_pool().await?;
            init_database_with_pool(&pool).await?;
            engine.reload(&SqliteMatchRepository::new(pool)).await?;
        }
    }

    Ok(engine)
}

pub async fn list_teams(csv: Option<PathBuf>) -> Result<()> {
    let engine = load_engine(csv.as_deref())
        .await
        .context("could not load match data (fetch it first with: football-quant refresh)")?;

    let teams = engine.get_team_list()?;
    println!("📋 {} teams:\n", teams.len());
    for team in teams {
        println!("   • {}", team);
    }

    Ok(())
}

pub async fn predict_match(home: &str, away: &str, csv: Option<PathBuf>) -> Result<()> {
    let engine = load_engine(csv.as_deref())
        .await
        .context("could not load match data (fetch it first with: football-quant refresh)")?;

    println!("🔮 Predicting {} vs {}...\n", home, away);

    match engine.predict_match(home, away) {
        Ok(result) => print_prediction(&result),
        Err(e @ EngineError::TeamNotFound { .. }) => {
            println!("❌ {}", e);
            println!("💡 Use 'football-quant teams' to list available teams");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

fn print_prediction(result: &PredictionResult) {
    let p = &result.probabilities;
    let xg = &result.expected_goals;

    println!("⚽ {}", result.match_label);
    println!("   Expected goals: {:.2} - {:.2}", xg.home, xg.away);
    println!(
        "   Home win: {:.1}% | Draw: {:.1}% | Away win: {:.1}%",
        p.home_win, p.draw, p.away_win
    );
    println!(
        "   Recent xG (last matches): {:.2} vs {:.2}",
        result.stats_comparison.home_recent_xg, result.stats_comparison.away_recent_xg
    );

    println!("\n🧠 Insight ({:?} confidence):", result.insight.confidence);
    println!("   {}", result.insight.text);

    println!("\n🔍 Favourite: {}", result.transparency.favorite);
    for strength in &result.transparency.strengths {
        println!("   + {}", strength);
    }
    for risk in &result.transparency.risks {
        println!("   - {}", risk);
    }

    println!("\n📊 Radar      Attack Defense Dominance Form Intensity");
    for (label, radar) in [("Home", &result.radar_data.home), ("Away", &result.radar_data.away)] {
        println!(
            "   {:<9} {:>6} {:>7} {:>9} {:>4} {:>9}",
            label, radar.attack, radar.defense, radar.dominance, radar.form, radar.intensity
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use tempfile::NamedTempFile;

    const FEED: &str = "\
Date,HomeTeam,AwayTeam,FTHG,FTAG,HS,AS,HST,AST,HC,AC
12/08/2023,Arsenal,Chelsea,2,1,15,6,7,2,8,3
19/08/2023,Chelsea,Arsenal,1,1,10,12,4,5,6,4
";

    fn missing_feed() -> Option<PathBuf> {
        Some(PathBuf::from("/nonexistent/football-quant/E0.csv"))
    }

    #[tokio::test]
    async fn test_commands_fail_when_data_cannot_load() {
        assert!(list_teams(missing_feed()).await.is_err());
        assert!(predict_match("Arsenal", "Chelsea", missing_feed()).await.is_err());
    }

    #[tokio::test]
    async fn test_commands_run_from_csv() -> Result<()> {
        let mut feed = NamedTempFile::new()?;
        feed.write_all(FEED.as_bytes())?;
        let path = Some(feed.path().to_path_buf());

        list_teams(path.clone()).await?;
        predict_match("Arsenal", "Chelsea", path.clone()).await?;
        // unknown teams print a hint rather than failing
        predict_match("Leeds", "Chelsea", path).await?;
        Ok(())
    }
}
