use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Serialize;
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::errors::FudCourtError;
use crate::models::{DailySnapshot, MarketAnalysisInput, MarketAnalysisOutput};
use crate::scoring::ScoreWeights;
use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub version: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub weights: ScoreWeights,
    pub recorded_snapshots: usize,
    pub latest_snapshot: Option<DailySnapshot>,
    pub available_endpoints: Vec<String>,
}

impl FudCourtError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            FudCourtError::InvalidInput { .. } | FudCourtError::InvalidWeights(_) => {
                StatusCode::BAD_REQUEST
            }
            FudCourtError::SnapshotNotFound(_) => StatusCode::NOT_FOUND,
            FudCourtError::InsufficientData(_)
            | FudCourtError::ApiError(_)
            | FudCourtError::HttpError(_)
            | FudCourtError::JsonError(_)
            | FudCourtError::InvalidDataFormat(_) => StatusCode::SERVICE_UNAVAILABLE,
            FudCourtError::ConfigError(_) | FudCourtError::TaskError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            FudCourtError::InvalidInput { .. } | FudCourtError::InvalidWeights(_) => {
                "invalid_input"
            }
            FudCourtError::SnapshotNotFound(_) => "not_found",
            FudCourtError::ConfigError(_) | FudCourtError::TaskError(_) => "internal_error",
            _ => "insufficient_data",
        }
    }
}

impl IntoResponse for FudCourtError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();
        if status.is_server_error() {
            tracing::error!("Ошибка обработки запроса: {}", self);
        } else {
            tracing::warn!("Запрос отклонён: {}", self);
        }

        let outcome = match error_type {
            "insufficient_data" => "insufficient_data",
            _ => "error",
        };
        let body = json!({
            "status": outcome,
            "message": self.to_string(),
            "error_type": error_type,
            "field": self.field(),
        });
        (status, Json(body)).into_response()
    }
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        message: "Fud Court market sentiment API is running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<StatusResponse>, FudCourtError> {
    let snapshots = state.analysis.snapshots();

    Ok(Json(StatusResponse {
        status: "ready".to_string(),
        weights: state.analysis.weights().await,
        recorded_snapshots: snapshots.len().await?,
        latest_snapshot: snapshots.latest().await?,
        available_endpoints: vec![
            "/".to_string(),
            "/status".to_string(),
            "/api/market-analysis".to_string(),
            "/api/market-analysis/weights".to_string(),
            "/api/market-analysis/history".to_string(),
            "/api/market-analysis/history/:date".to_string(),
        ],
    }))
}

// Анализ по живым рыночным данным
pub async fn live_market_analysis(
    State(state): State<AppState>,
) -> Result<Json<MarketAnalysisOutput>, FudCourtError> {
    tracing::info!("Начинаем анализ рынка по живым данным");
    let output = state.analysis.analyze_live().await?;
    Ok(Json(output))
}

// Анализ метрик, переданных клиентом
pub async fn score_market(
    State(state): State<AppState>,
    Json(input): Json<MarketAnalysisInput>,
) -> Result<Json<MarketAnalysisOutput>, FudCourtError> {
    let output = state.analysis.analyze_input(&input).await?;
    Ok(Json(output))
}

pub async fn get_weights(State(state): State<AppState>) -> Json<ScoreWeights> {
    Json(state.analysis.weights().await)
}

pub async fn put_weights(
    State(state): State<AppState>,
    Json(weights): Json<ScoreWeights>,
) -> Result<Json<ScoreWeights>, FudCourtError> {
    state.analysis.set_weights(weights).await?;
    Ok(Json(weights))
}

pub async fn get_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<DailySnapshot>>, FudCourtError> {
    Ok(Json(state.analysis.snapshots().get().await?))
}

pub async fn get_history_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DailySnapshot>, FudCourtError> {
    Ok(Json(state.analysis.snapshots().get_day(date).await?))
}

pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "status": "error",
            "message": "Route not found",
            "error_type": "not_found",
        })),
    )
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/status", get(get_status))
        .route(
            "/api/market-analysis",
            get(live_market_analysis).post(score_market),
        )
        .route(
            "/api/market-analysis/weights",
            get(get_weights).put(put_weights),
        )
        .route("/api/market-analysis/history", get(get_history))
        .route("/api/market-analysis/history/:date", get(get_history_day))
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}
