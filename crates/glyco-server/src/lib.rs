//! Glyco Web Server
//!
//! Axum-based REST API for the Glyco glucose tracker.
//!
//! Security features:
//! - Bearer API key authentication (secure by default, use --no-auth for local dev)
//! - Restrictive CORS policy
//! - Security headers (CSP, frame denial, nosniff)
//! - Sanitized error responses

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer, services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer,
};
use tracing::{debug, error, info, warn};

use glyco_core::db::Database;

mod handlers;

/// Environment variable holding comma-separated API keys
pub const API_KEYS_ENV: &str = "GLYCO_API_KEYS";

/// Maximum number of readings returned by a list request
pub const MAX_PAGE_LIMIT: usize = 1000;

/// Authorization header for API key auth
const AUTHORIZATION_HEADER: &str = "authorization";

/// Server configuration
#[derive(Clone)]
pub struct ServerConfig {
    /// Whether authentication is required (secure by default)
    pub require_auth: bool,
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
    /// Accepted API keys, sent as "Bearer <key>" in the Authorization header
    pub api_keys: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_origins: vec![],
            api_keys: vec![],
        }
    }
}

/// Shared application state
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
    /// Optional override for backup directory (for testing)
    pub backup_dir: Option<PathBuf>,
}

/// Split a comma-separated key list, dropping blanks
pub fn parse_api_keys(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Authentication middleware - requires a configured bearer key
async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    if !state.config.require_auth {
        return next.run(request).await;
    }

    let api_key_valid = request
        .headers()
        .get(AUTHORIZATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|key| validate_api_key(key.trim(), &state.config.api_keys))
        .unwrap_or(false);

    if api_key_valid {
        debug!(path = %request.uri().path(), "Authenticated via API key");
        return next.run(request).await;
    }

    warn!(path = %request.uri().path(), "Unauthorized request - no valid auth");
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": "Authentication required"
        })),
    )
        .into_response()
}

/// Validate an API key against the configured keys using constant-time comparison
fn validate_api_key(provided: &str, valid_keys: &[String]) -> bool {
    use subtle::ConstantTimeEq;

    let provided_bytes = provided.as_bytes();
    if provided_bytes.is_empty() {
        return false;
    }

    valid_keys.iter().any(|key| {
        let key_bytes = key.as_bytes();
        key_bytes.len() == provided_bytes.len() && bool::from(provided_bytes.ct_eq(key_bytes))
    })
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router
pub fn create_router(db: Database, static_dir: Option<&Path>, config: ServerConfig) -> Router {
    create_router_with_options(db, static_dir, config, None)
}

/// Create the application router with additional options (for testing)
pub fn create_router_with_options(
    db: Database,
    static_dir: Option<&Path>,
    config: ServerConfig,
    backup_dir: Option<PathBuf>,
) -> Router {
    let state = Arc::new(AppState {
        db,
        config: config.clone(),
        backup_dir,
    });

    let api_routes = Router::new()
        // Dashboard
        .route("/dashboard", get(handlers::get_dashboard))
        // Readings
        .route(
            "/readings",
            get(handlers::list_readings).post(handlers::create_reading),
        )
        .route(
            "/readings/:id",
            get(handlers::get_reading)
                .patch(handlers::update_reading)
                .delete(handlers::delete_reading),
        )
        // Statistics
        .route("/stats", get(handlers::get_stats))
        .route("/stats/detailed", get(handlers::get_detailed_stats))
        // Insights
        .route("/insights", get(handlers::get_insights))
        .route("/insights/weekly", get(handlers::get_weekly))
        .route("/trend", get(handlers::get_trend_handler))
        // Export / import
        .route("/export/csv", get(handlers::export_csv))
        .route("/export/report", get(handlers::export_report))
        .route("/export/json", get(handlers::export_json))
        .route("/import/json", post(handlers::import_json))
        // Backup management
        .route(
            "/backup",
            get(handlers::list_backups).post(handlers::create_backup),
        )
        .route("/backup/prune", post(handlers::prune_backups))
        .route("/backup/:name", axum::routing::delete(handlers::delete_backup))
        .route("/backup/:name/restore", post(handlers::restore_backup))
        // Profile
        .route(
            "/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        );

    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::PATCH,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
    };

    // The HTML report carries its own inline stylesheet
    let csp_value = HeaderValue::from_static(
        "default-src 'self'; script-src 'self'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; font-src 'self'; connect-src 'self'; frame-ancestors 'none'"
    );

    let mut app = Router::new()
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("1; mode=block"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CONTENT_SECURITY_POLICY,
            csp_value,
        ));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app
}

/// Start the server
pub async fn serve(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> anyhow::Result<()> {
    serve_with_config(db, host, port, static_dir, ServerConfig::default()).await
}

/// Start the server with custom configuration
pub async fn serve_with_config(
    db: Database,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if !config.require_auth {
        warn!("⚠️  Authentication disabled - do not expose to network!");
    } else if config.api_keys.is_empty() {
        warn!(
            "No API keys configured ({}); every API request will be rejected",
            API_KEYS_ENV
        );
    }

    match db.count_readings() {
        Ok(count) => info!(readings = count, encrypted = db.is_encrypted(), "Database ready"),
        Err(e) => warn!("Failed to count readings: {}", e),
    }

    let app = create_router(db, static_dir, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }

    /// Map a core error: invalid input is the client's fault, missing
    /// records are 404, everything else is a sanitized 500
    pub fn from_core(err: glyco_core::Error) -> Self {
        match err {
            glyco_core::Error::InvalidData(msg) => Self::bad_request(&msg),
            glyco_core::Error::NotFound(what) => Self::not_found(&format!("Not found: {}", what)),
            other => Self::from(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let err = err.into();
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            internal: Some(err),
        }
    }
}
