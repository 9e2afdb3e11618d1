use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::EngineConfig;
use crate::db::{create_pool, init_database_with_pool, SqliteMatchRepository};
use crate::models::{ApiResponse, MatchRequest, PredictionResult, TeamList};
use crate::services::{DataFetcher, Engine, EngineError};

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<Engine>,
    pub repository: SqliteMatchRepository,
    pub fetcher: Arc<DataFetcher>,
}

pub async fn serve(port: u16) -> anyhow::Result<()> {
    let pool = create_pool().await?;
    init_database_with_pool(&pool).await?;

    let state = AppState {
        engine: Arc::new(Engine::new(EngineConfig::from_env())),
        repository: SqliteMatchRepository::new(pool),
        fetcher: Arc::new(DataFetcher::new()),
    };

    // Load once at start-up; a failure leaves the engine not ready until a reload succeeds
    if let Err(e) = state.engine.reload(&state.repository).await {
        tracing::error!("Initial load failed: {}", e);
    }

    let app = create_router().with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    tracing::info!("Football Quant API server listening on port {}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/teams", get(get_teams_handler))
        .route("/predict", post(predict_handler))
        .route("/data/reload", post(reload_handler))
        .route("/data/refresh", post(refresh_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
        )
}

impl IntoResponse for EngineError {
    fn into_response(self) -> Response {
        let status = match &self {
            EngineError::TeamNotFound { .. } => StatusCode::NOT_FOUND,
            EngineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            EngineError::DataUnavailable(_)
            | EngineError::InvalidRecord { .. }
            | EngineError::MetricUndefined(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        error_body(status, self.to_string()).into_response()
    }
}

// Health check endpoint
#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    ready: bool,
    loaded_at: Option<DateTime<Utc>>,
}

async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let snapshot = state.engine.snapshot().ok();
    Json(ApiResponse::success(HealthStatus {
        status: "Football Quant API is running",
        ready: snapshot.is_some(),
        loaded_at: snapshot.map(|s| s.built_at()),
    }))
}

// GET /teams - Team names for the fixture picker
async fn get_teams_handler(
    State(state): State<AppState>,
) -> Result<Json<TeamList>, EngineError> {
    let teams = state.engine.get_team_list()?;
    Ok(Json(TeamList { teams }))
}

// POST /predict - Forecast a fixture
async fn predict_handler(
    State(state): State<AppState>,
    Json(request): Json<MatchRequest>,
) -> Result<Json<PredictionResult>, EngineError> {
    match state.engine.predict_match(&request.home_team, &request.away_team) {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            if e.is_client_error() {
                tracing::debug!("Rejected prediction request: {}", e);
            } else {
                tracing::error!("Prediction failed: {}", e);
            }
            Err(e)
        }
    }
}

#[derive(Serialize)]
struct ReloadSummary {
    matches_loaded: usize,
    new_matches: usize,
}

// POST /data/reload - Rebuild the snapshot from the database
async fn reload_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReloadSummary>>, EngineError> {
    let matches_loaded = state.engine.reload(&state.repository).await?;
    Ok(Json(ApiResponse::success(ReloadSummary {
        matches_loaded,
        new_matches: 0,
    })))
}

type ErrorBody = (StatusCode, Json<ApiResponse<()>>);

fn error_body(status: StatusCode, message: String) -> ErrorBody {
    (status, Json(ApiResponse::error(message)))
}

// POST /data/refresh - Pull new matches from the feed, then reload
async fn refresh_handler(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<ReloadSummary>>, ErrorBody> {
    let new_matches = match state.fetcher.refresh(state.repository.pool()).await {
        Ok(count) => count,
        Err(e) => {
            tracing::error!("Failed to refresh match feed: {:#}", e);
            return Err(error_body(
                StatusCode::BAD_GATEWAY,
                format!("Failed to refresh match feed: {:#}", e),
            ));
        }
    };

    match state.engine.reload(&state.repository).await {
        Ok(matches_loaded) => Ok(Json(ApiResponse::success(ReloadSummary {
            matches_loaded,
            new_matches,
        }))),
        Err(e) => {
            tracing::error!("Failed to reload after refresh: {}", e);
            Err(error_body(StatusCode::SERVICE_UNAVAILABLE, e.to_string()))
        }
    }
}
