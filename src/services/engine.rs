use std::sync::{Arc, PoisonError, RwLock};

use crate::config::EngineConfig;
use crate::models::PredictionResult;
use crate::services::{EngineError, MatchRepository, PredictionEngine, Snapshot};
use crate::utils::validate_team_name;

/// Holds the current snapshot and answers queries against it.
///
/// Readers clone the `Arc` and release the lock straight away, and a reload
/// builds its snapshot before swapping the pointer, so queries never see a
/// half-built snapshot. Until the first successful load the engine is not
/// ready and every query fails with `DataUnavailable`.
pub struct Engine {
    predictor: PredictionEngine,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            predictor: PredictionEngine::new(&config),
            snapshot: RwLock::new(None),
        }
    }

    /// Fetch every match, rebuild the aggregates and swap them in.
    ///
    /// On failure the previous snapshot, if any, stays in service.
    pub async fn reload<R: MatchRepository>(&self, repository: &R) -> Result<usize, EngineError> {
        let result = match repository.fetch_all().await {
            Ok(records) => Snapshot::build(records),
            Err(e) => Err(match e.downcast::<EngineError>() {
                Ok(engine_error) => engine_error,
                Err(other) => EngineError::DataUnavailable(format!("{:#}", other)),
            }),
        };

        match result {
            Ok(snapshot) => {
                let count = snapshot.records().len();
                self.install(snapshot);
                tracing::info!("Loaded {} matches successfully", count);
                Ok(count)
            }
            Err(e) => {
                if self.is_ready() {
                    tracing::warn!("Reload failed, keeping previous snapshot: {}", e);
                } else {
                    tracing::warn!("Load failed, engine not ready: {}", e);
                }
                Err(e)
            }
        }
    }

    pub fn install(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = Some(snapshot);
    }

    pub fn is_ready(&self) -> bool {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn snapshot(&self) -> Result<Arc<Snapshot>, EngineError> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| EngineError::DataUnavailable("match data has not been loaded".to_string()))
    }

    pub fn get_team_list(&self) -> Result<Vec<String>, EngineError> {
        Ok(self.snapshot()?.team_list())
    }

    pub fn predict_match(&self, home_team: &str, away_team: &str) -> Result<PredictionResult, EngineError> {
        let home_team = home_team.trim();
        let away_team = away_team.trim();
        if !validate_team_name(home_team) || !validate_team_name(away_team) {
            return Err(EngineError::InvalidRequest(
                "home_team and away_team must be 1-100 characters".to_string(),
            ));
        }

        let snapshot = self.snapshot()?;
        self.predictor.predict(&snapshot, home_team, away_team)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MatchRecord;
    use crate::services::test_support::{record, sample_league};
    use crate::services::InMemoryRepository;

    struct FailingRepository;

    impl MatchRepository for FailingRepository {
        async fn fetch_all(&self) -> anyhow::Result<Vec<MatchRecord>> {
            Err(anyhow::anyhow!("connection refused"))
        }
    }

    #[tokio::test]
    async fn test_queries_fail_before_first_load() {
        let engine = Engine::new(EngineConfig::default());
        assert!(!engine.is_ready());
        assert!(matches!(
            engine.predict_match("Arsenal", "Chelsea"),
            Err(EngineError::DataUnavailable(_))
        ));
        assert!(matches!(
            engine.get_team_list(),
            Err(EngineError::DataUnavailable(_))
        ));
    }

    #[tokio::test]
    async fn test_reload_installs_snapshot() {
        let engine = Engine::new(EngineConfig::default());
        let count = engine
            .reload(&InMemoryRepository::new(sample_league()))
            .await
            .unwrap();
        assert_eq!(count, 10);
        assert_eq!(
            engine.get_team_list().unwrap(),
            vec!["Arsenal", "Chelsea", "Everton", "Fulham"]
        );
        assert!(engine.predict_match(" Arsenal ", "Chelsea").is_ok());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_last_good_snapshot() {
        let engine = Engine::new(EngineConfig::default());
        engine
            .reload(&InMemoryRepository::new(sample_league()))
            .await
            .unwrap();
        let before = engine.predict_match("Arsenal", "Chelsea").unwrap();

        let err = engine.reload(&FailingRepository).await.unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(ref msg) if msg.contains("connection refused")));

        let err = engine.reload(&InMemoryRepository::default()).await.unwrap_err();
        assert!(matches!(err, EngineError::DataUnavailable(_)));

        assert_eq!(engine.predict_match("Arsenal", "Chelsea").unwrap(), before);
    }

    #[tokio::test]
    async fn test_reload_swaps_whole_snapshot() {
        let engine = Engine::new(EngineConfig::default());
        engine
            .reload(&InMemoryRepository::new(sample_league()))
            .await
            .unwrap();
        let held = engine.snapshot().unwrap();

        engine
            .reload(&InMemoryRepository::new(vec![record("2024-05-01", "Leeds", "Burnley", 2, 1)]))
            .await
            .unwrap();

        // an in-flight reader keeps its own snapshot
        assert_eq!(held.team_list().len(), 4);
        assert_eq!(engine.get_team_list().unwrap(), vec!["Leeds"]);
    }

    #[tokio::test]
    async fn test_blank_names_are_invalid_requests() {
        let engine = Engine::new(EngineConfig::default());
        engine
            .reload(&InMemoryRepository::new(sample_league()))
            .await
            .unwrap();
        let err = engine.predict_match("  ", "Chelsea").unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_unknown_team_leaves_snapshot_untouched() {
        let engine = Engine::new(EngineConfig::default());
        engine
            .reload(&InMemoryRepository::new(sample_league()))
            .await
            .unwrap();
        assert!(matches!(
            engine.predict_match("Arsenal", "Leeds"),
            Err(EngineError::TeamNotFound { .. })
        ));
        assert!(engine.predict_match("Arsenal", "Chelsea").is_ok());
    }
}
