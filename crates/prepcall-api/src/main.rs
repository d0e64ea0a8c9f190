//! prepcall-api - HTTP API server for prepcall

mod services;
#[cfg(test)]
mod test_support;

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use prepcall_core::{defaults, BriefRepository, BriefSummary, CreateBriefRequest};
use prepcall_db::Database;
use prepcall_inference::OpenAIBackend;

use services::BriefService;

// =============================================================================
// REQUEST ID (UUIDv7)
// =============================================================================

/// Generates time-ordered UUIDv7 request correlation IDs.
///
/// UUIDv7 embeds a Unix timestamp, so IDs sort chronologically, useful for
/// log correlation and debugging production incidents.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

// =============================================================================
// APP STATE
// =============================================================================

#[derive(Clone)]
struct AppState {
    service: Arc<BriefService>,
    repository: Arc<dyn BriefRepository>,
    rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
}

// =============================================================================
// CORS
// =============================================================================

fn parse_allowed_origins() -> Vec<HeaderValue> {
    let origins_str =
        std::env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| "http://localhost:3000".to_string());

    origins_str
        .split(',')
        .filter_map(|s| {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            match trimmed.parse::<HeaderValue>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Invalid CORS origin '{}': {}", trimmed, e);
                    None
                }
            }
        })
        .collect()
}

// =============================================================================
// MAIN
// =============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
    //   RUST_LOG    - standard env filter (default: "prepcall_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();
    let log_ansi = std::env::var("LOG_ANSI")
        .ok()
        .map(|v| v == "true" || v == "1");

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "prepcall_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    // Optionally create a file appender with daily rotation
    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("prepcall-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer().with_writer(non_blocking);
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            } else {
                layer = layer.with_ansi(false); // no ANSI in files
            }
            registry.with(layer).init();
        }
        Some(guard)
    } else {
        // Console-only output
        if log_format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        } else {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).init();
        }
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    // Get configuration from environment
    let database_url = std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "postgres://localhost/prepcall".to_string());
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".to_string())
        .parse()
        .unwrap_or(3000);

    // Rate limiting configuration for the generation endpoint
    // RATE_LIMIT_REQUESTS: generations per period (default: 10)
    // RATE_LIMIT_PERIOD_SECS: period in seconds (default: 60)
    let rate_limit_requests: u64 = std::env::var("RATE_LIMIT_REQUESTS")
        .unwrap_or_else(|_| defaults::RATE_LIMIT_REQUESTS.to_string())
        .parse()
        .unwrap_or(defaults::RATE_LIMIT_REQUESTS);
    let rate_limit_period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .unwrap_or_else(|_| defaults::RATE_LIMIT_PERIOD_SECS.to_string())
        .parse()
        .unwrap_or(defaults::RATE_LIMIT_PERIOD_SECS);
    let rate_limit_enabled: bool = std::env::var("RATE_LIMIT_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    info!(
        "Rate limiting: {} ({} generations per {} seconds)",
        if rate_limit_enabled {
            "enabled"
        } else {
            "disabled"
        },
        rate_limit_requests,
        rate_limit_period_secs
    );

    // Connect to database
    info!("Connecting to database...");
    let db = Database::connect(&database_url).await?;
    info!("Database connected");

    // Run pending database migrations on startup
    info!("Running database migrations...");
    db.migrate().await?;
    info!("Database migrations complete");

    // Initialize generation backend and enrichment providers
    let backend = Arc::new(OpenAIBackend::from_env()?);
    info!(
        model = %prepcall_core::GenerationBackend::model_name(backend.as_ref()),
        "Inference backend initialized"
    );

    let providers = prepcall_enrich::providers_from_env()?;
    info!(provider_count = providers.len(), "Enrichment providers initialized");

    // Create rate limiter if enabled
    let rate_limiter = if rate_limit_enabled {
        let quota = Quota::with_period(std::time::Duration::from_secs(rate_limit_period_secs))
            .expect("Rate limit period must be non-zero")
            .allow_burst(
                NonZeroU32::new(rate_limit_requests as u32).expect("Rate limit must be non-zero"),
            );
        Some(Arc::new(RateLimiter::direct(quota)))
    } else {
        None
    };

    // Create app state
    let repository: Arc<dyn BriefRepository> = db.briefs.clone();
    let service = Arc::new(BriefService::new(
        backend,
        providers,
        repository.clone(),
    ));
    let state = AppState {
        service,
        repository,
        rate_limiter,
    };

    let app = build_router(state);

    // Start server
    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// =============================================================================
// ROUTER
// =============================================================================

fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/v1/briefs", get(list_briefs).post(create_brief))
        .route("/api/v1/briefs/:id", get(get_brief).delete(delete_brief))
        .route("/api/v1/rate-limit/status", get(rate_limit_status))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
        .layer({
            let allowed_origins = parse_allowed_origins();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(allowed_origins))
                .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
                .max_age(std::time::Duration::from_secs(3600))
        })
        // Generation requests are small JSON bodies
        .layer(RequestBodyLimitLayer::new(64 * 1024)) // 64 KB
        .with_state(state)
}

// =============================================================================
// HEALTH CHECK
// =============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Get rate limiting status.
async fn rate_limit_status(State(state): State<AppState>) -> impl IntoResponse {
    if state.rate_limiter.is_some() {
        Json(serde_json::json!({
            "enabled": true,
            "message": "Rate limiting is active"
        }))
    } else {
        Json(serde_json::json!({
            "enabled": false,
            "message": "Rate limiting is disabled"
        }))
    }
}

// =============================================================================
// BRIEF HANDLERS
// =============================================================================

/// Generate a new intelligence brief.
async fn create_brief(
    State(state): State<AppState>,
    Json(request): Json<CreateBriefRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Generation is the expensive path; only it is throttled.
    if let Some(limiter) = &state.rate_limiter {
        if limiter.check().is_err() {
            warn!("Rate limit exceeded for brief generation");
            return Err(ApiError::RateLimited);
        }
    }

    let brief = state.service.generate(request).await?;
    Ok((StatusCode::CREATED, Json(brief)))
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<i64>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    briefs: Vec<BriefSummary>,
}

/// List recently generated briefs, newest first.
async fn list_briefs(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let limit = query
        .limit
        .unwrap_or(defaults::HISTORY_LIMIT)
        .clamp(1, defaults::HISTORY_LIMIT_MAX);

    let briefs = state.repository.list_recent(limit).await?;
    Ok(Json(HistoryResponse { briefs }))
}

/// Fetch a single brief.
async fn get_brief(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let brief = state.repository.fetch(id).await?;
    Ok(Json(brief))
}

/// Delete a brief.
async fn delete_brief(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    state.repository.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// ERROR HANDLING
// =============================================================================

#[derive(Debug)]
enum ApiError {
    Internal(prepcall_core::Error),
    NotFound(String),
    BadRequest(String),
    Upstream(String),
    RateLimited,
}

impl From<prepcall_core::Error> for ApiError {
    fn from(err: prepcall_core::Error) -> Self {
        match err {
            prepcall_core::Error::BriefNotFound(id) => {
                ApiError::NotFound(format!("Brief {} not found", id))
            }
            prepcall_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            prepcall_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            prepcall_core::Error::Inference(msg) => ApiError::Upstream(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Generation backend error: {}", msg),
            ),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "Too many generation requests. Please wait before retrying.".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryBriefRepository;
    use prepcall_inference::MockGenerationBackend;

    const MODEL_OUTPUT: &str = "\
# 1. COMPANY CONTEXT
- Builds rockets

# 4. COMPETITIVE LANDSCAPE
- Competes with Initech

# 5. SUGGESTED QUESTIONS & TALKING POINTS
- Ask about cloud plans";

    fn test_state(
        backend: MockGenerationBackend,
        rate_limiter: Option<Arc<DefaultDirectRateLimiter>>,
    ) -> AppState {
        let repository: Arc<dyn BriefRepository> = Arc::new(InMemoryBriefRepository::default());
        let service = Arc::new(BriefService::new(
            Arc::new(backend),
            Vec::new(),
            repository.clone(),
        ));
        AppState {
            service,
            repository,
            rate_limiter,
        }
    }

    /// Bind the router to an ephemeral port and return its base URL.
    async fn spawn_app(state: AppState) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        let router = build_router(state);
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn default_state() -> AppState {
        test_state(
            MockGenerationBackend::new().with_fixed_response(MODEL_OUTPUT),
            None,
        )
    }

    #[tokio::test]
    async fn health_endpoint_reports_version() {
        let base = spawn_app(default_state()).await;
        let body: serde_json::Value = reqwest::get(format!("{}/health", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn create_brief_returns_classified_sections() {
        let base = spawn_app(default_state()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/v1/briefs", base))
            .json(&serde_json::json!({
                "company_name": "Acme Corp",
                "attendees": "Jane Doe (CTO)"
            }))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 201);
        let body: serde_json::Value = response.json().await.unwrap();
        assert_eq!(body["company_name"], "Acme Corp");
        assert_eq!(body["company_context"], "- Builds rockets");
        assert_eq!(body["competitive_landscape"], "- Competes with Initech");
        assert_eq!(body["suggested_questions"], "- Ask about cloud plans");
        assert_eq!(body["tech_stack"], "");
        assert!(body["full_brief"]
            .as_str()
            .unwrap()
            .contains("# 1. COMPANY CONTEXT"));
    }

    #[tokio::test]
    async fn create_brief_rejects_blank_company_name() {
        let base = spawn_app(default_state()).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/v1/briefs", base))
            .json(&serde_json::json!({"company_name": "   "}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 400);
        let body: serde_json::Value = response.json().await.unwrap();
        assert!(body["error"].as_str().unwrap().contains("company_name"));
    }

    #[tokio::test]
    async fn failed_generation_maps_to_bad_gateway() {
        let state = test_state(
            MockGenerationBackend::new().with_failure("model down"),
            None,
        );
        let base = spawn_app(state).await;
        let client = reqwest::Client::new();

        let response = client
            .post(format!("{}/api/v1/briefs", base))
            .json(&serde_json::json!({"company_name": "Acme"}))
            .send()
            .await
            .unwrap();

        assert_eq!(response.status(), 502);
    }

    #[tokio::test]
    async fn get_missing_brief_is_404() {
        let base = spawn_app(default_state()).await;
        let response = reqwest::get(format!("{}/api/v1/briefs/{}", base, Uuid::new_v4()))
            .await
            .unwrap();
        assert_eq!(response.status(), 404);
    }

    #[tokio::test]
    async fn created_brief_can_be_fetched_listed_and_deleted() {
        let base = spawn_app(default_state()).await;
        let client = reqwest::Client::new();

        let created: serde_json::Value = client
            .post(format!("{}/api/v1/briefs", base))
            .json(&serde_json::json!({"company_name": "Acme"}))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let fetched: serde_json::Value = client
            .get(format!("{}/api/v1/briefs/{}", base, id))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(fetched["id"], created["id"]);

        let listed: serde_json::Value = client
            .get(format!("{}/api/v1/briefs", base))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let briefs = listed["briefs"].as_array().unwrap();
        assert!(briefs.iter().any(|b| b["id"] == created["id"]));

        let deleted = client
            .delete(format!("{}/api/v1/briefs/{}", base, id))
            .send()
            .await
            .unwrap();
        assert_eq!(deleted.status(), 204);

        let gone = client
            .get(format!("{}/api/v1/briefs/{}", base, id))
            .send()
            .await
            .unwrap();
        assert_eq!(gone.status(), 404);
    }

    #[tokio::test]
    async fn generation_is_rate_limited() {
        let quota = Quota::with_period(std::time::Duration::from_secs(60))
            .unwrap()
            .allow_burst(NonZeroU32::new(1).unwrap());
        let state = test_state(
            MockGenerationBackend::new().with_fixed_response(MODEL_OUTPUT),
            Some(Arc::new(RateLimiter::direct(quota))),
        );
        let base = spawn_app(state).await;
        let client = reqwest::Client::new();

        let first = client
            .post(format!("{}/api/v1/briefs", base))
            .json(&serde_json::json!({"company_name": "Acme"}))
            .send()
            .await
            .unwrap();
        assert_eq!(first.status(), 201);

        let second = client
            .post(format!("{}/api/v1/briefs", base))
            .json(&serde_json::json!({"company_name": "Acme"}))
            .send()
            .await
            .unwrap();
        assert_eq!(second.status(), 429);

        // Read endpoints stay open while generation is throttled.
        let list = client
            .get(format!("{}/api/v1/briefs", base))
            .send()
            .await
            .unwrap();
        assert_eq!(list.status(), 200);
    }

    #[tokio::test]
    async fn rate_limit_status_reflects_configuration() {
        let base = spawn_app(default_state()).await;
        let body: serde_json::Value = reqwest::get(format!("{}/api/v1/rate-limit/status", base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["enabled"], false);
    }
}
