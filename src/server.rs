//! HTTP server for email classification and action suggestions

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{error, info, warn};

use crate::cache::CacheStats;
use crate::config::DEFAULT_WINDOW_DAYS;
use crate::engine::{CatalogListing, SharedActionEngine, TaxonomyEntry};
use crate::error::PipelineError;
use crate::types::{
    ActionMode, ClassificationResult, ClassifyOptions, Email, RankedAction, RegistryQuery,
    RegistryResponse, SuggestionResponse,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub email: Email,
    #[serde(default)]
    pub force_ai: bool,
}

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub emails: Vec<Email>,
}

#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub classifications: Vec<ClassificationResult>,
    pub count: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestRequest {
    pub email: Email,
    pub user_id: Option<String>,
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryParams {
    pub user_id: Option<String>,
    pub mode: Option<String>,
    pub days: Option<u32>,
    pub limit: Option<usize>,
    pub bust_cache: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ModeParams {
    pub mode: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailParams {
    pub user_id: Option<String>,
    pub days: Option<u32>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Health check response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub ai_enabled: bool,
    pub personalization_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct TaxonomyResponse {
    pub count: usize,
    pub intents: Vec<TaxonomyEntry>,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvalidateResponse {
    pub user_id: String,
    pub invalidated: usize,
}

type ApiError = (StatusCode, Json<ErrorResponse>);
type ApiResult<T> = Result<Json<T>, ApiError>;

fn bad_request(error: &str, details: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: error.to_string(),
            details: Some(details.into()),
        }),
    )
}

fn pipeline_error(e: PipelineError) -> ApiError {
    let (status, error) = match &e {
        PipelineError::Validation(_) => (StatusCode::BAD_REQUEST, "Invalid request"),
        PipelineError::NotFound { .. } => (StatusCode::NOT_FOUND, "Not found"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    };
    if e.is_client_error() {
        warn!("Rejected request: {}", e);
    } else {
        error!("Request failed: {:?}", e);
    }
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            details: Some(e.to_string()),
        }),
    )
}

fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| bad_request("Invalid JSON body", rejection.body_text()))
}

fn query_params<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| bad_request("Invalid query parameters", rejection.body_text()))
}

/// Mail when absent; anything unrecognized is a client error
fn parse_mode(raw: Option<&str>) -> Result<ActionMode, ApiError> {
    match raw.map(str::trim).filter(|m| !m.is_empty()) {
        None => Ok(ActionMode::Mail),
        Some(raw) => ActionMode::from_str(raw).map_err(|e| bad_request("Invalid mode", e)),
    }
}

/// Health check handler
async fn health_handler(State(engine): State<SharedActionEngine>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "mailintent".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        ai_enabled: engine.ai_enabled(),
        personalization_enabled: engine.personalization_enabled(),
    })
}

async fn taxonomy_handler(State(engine): State<SharedActionEngine>) -> Json<TaxonomyResponse> {
    let intents = engine.taxonomy_listing();
    Json(TaxonomyResponse {
        count: intents.len(),
        intents,
    })
}

/// Classify a single email
async fn classify_handler(
    State(engine): State<SharedActionEngine>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> ApiResult<ClassificationResult> {
    let req = json_body(payload)?;
    let options = ClassifyOptions {
        force_ai: req.force_ai,
    };
    Ok(Json(engine.classify(&req.email, options).await))
}

async fn classify_batch_handler(
    State(engine): State<SharedActionEngine>,
    payload: Result<Json<BatchRequest>, JsonRejection>,
) -> ApiResult<BatchResponse> {
    let req = json_body(payload)?;
    info!("Received batch classification request: {} emails", req.emails.len());
    let classifications = engine.classify_batch(&req.emails).await.map_err(pipeline_error)?;
    Ok(Json(BatchResponse {
        count: classifications.len(),
        classifications,
    }))
}

async fn suggest_handler(
    State(engine): State<SharedActionEngine>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> ApiResult<SuggestionResponse> {
    let req = json_body(payload)?;
    let mode = parse_mode(req.mode.as_deref())?;
    engine
        .suggest_actions(&req.email, req.user_id.as_deref(), mode)
        .await
        .map(Json)
        .map_err(pipeline_error)
}

async fn registry_handler(
    State(engine): State<SharedActionEngine>,
    params: Result<Query<RegistryParams>, QueryRejection>,
) -> ApiResult<RegistryResponse> {
    let params = query_params(params)?;
    let mode = parse_mode(params.mode.as_deref())?;
    let query = RegistryQuery {
        user_id: params.user_id.unwrap_or_default(),
        mode,
        window_days: params.days.unwrap_or(DEFAULT_WINDOW_DAYS),
        limit: params.limit,
        bust_cache: params.bust_cache.unwrap_or(false),
    };
    info!(
        "Received registry request: user={}, mode={}, days={}, bust_cache={}",
        query.user_id, query.mode, query.window_days, query.bust_cache
    );
    engine.registry(&query).await.map(Json).map_err(pipeline_error)
}

async fn catalog_handler(
    State(engine): State<SharedActionEngine>,
    params: Result<Query<ModeParams>, QueryRejection>,
) -> ApiResult<CatalogListing> {
    let params = query_params(params)?;
    let mode = parse_mode(params.mode.as_deref())?;
    Ok(Json(engine.catalog(mode)))
}

async fn action_detail_handler(
    State(engine): State<SharedActionEngine>,
    Path(action_id): Path<String>,
    params: Result<Query<DetailParams>, QueryRejection>,
) -> ApiResult<RankedAction> {
    let params = query_params(params)?;
    engine
        .action_detail(
            &action_id,
            params.user_id.as_deref(),
            params.days.unwrap_or(DEFAULT_WINDOW_DAYS),
        )
        .await
        .map(Json)
        .map_err(pipeline_error)
}

async fn cache_stats_handler(State(engine): State<SharedActionEngine>) -> Json<CacheStats> {
    Json(engine.cache_stats())
}

async fn cache_clear_handler(State(engine): State<SharedActionEngine>) -> Json<ClearResponse> {
    Json(ClearResponse {
        cleared: engine.clear_cache(),
    })
}

async fn cache_invalidate_handler(
    State(engine): State<SharedActionEngine>,
    Path(user_id): Path<String>,
) -> Json<InvalidateResponse> {
    let invalidated = engine.invalidate_user(&user_id);
    Json(InvalidateResponse { user_id, invalidated })
}

/// Create and configure the HTTP server
pub fn create_router(engine: SharedActionEngine) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/taxonomy", get(taxonomy_handler))
        .route("/classify", post(classify_handler))
        .route("/classify/batch", post(classify_batch_handler))
        .route("/actions/suggest", post(suggest_handler))
        .route("/actions/registry", get(registry_handler))
        .route("/actions/catalog", get(catalog_handler))
        .route("/actions/:action_id", get(action_detail_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache/clear", post(cache_clear_handler))
        .route("/cache/invalidate/:user_id", post(cache_invalidate_handler))
        .with_state(engine)
}

/// Run the HTTP server
pub async fn run_server(engine: SharedActionEngine, port: u16) -> anyhow::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    info!("Starting mailintent server on {}", addr);

    let app = create_router(engine);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
