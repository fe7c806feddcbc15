// Savings Dashboard - Web Server
// JSON API over the sheet pipeline for the dashboard frontend
//
// Environment:
//   DASHBOARD_DATA_DIR  sheet CSVs (config.csv, log.csv, yearly.csv), default "data"
//   DASHBOARD_WEB_DIR   built frontend served at "/", default "web" (not shipped with this crate)
//   DASHBOARD_ADDR      bind address, default "0.0.0.0:3000"
//   DASHBOARD_SETTINGS  optional JSON settings file

use anyhow::{Context, Result};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use savings_dashboard::{init_logging, is_valid_drive_id, DashboardConfig, SheetKind, SheetPipeline};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

/// Shared application state
#[derive(Clone)]
struct AppState {
    pipeline: Arc<SheetPipeline>,
    data_dir: Arc<PathBuf>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(Self {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }

    fn err(status: StatusCode, message: String) -> Response {
        (
            status,
            Json(Self {
                success: false,
                data: None,
                error: Some(message),
            }),
        )
            .into_response()
    }
}

#[derive(Deserialize)]
struct AvatarQuery {
    id: Option<String>,
    name: Option<String>,
}

#[derive(Serialize)]
struct AvatarResponse {
    valid: bool,
    url: String,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> Response {
    ApiResponse::ok("OK")
}

/// GET /api/snapshot - Full dashboard (config + avatar + log + yearly)
async fn get_snapshot(State(state): State<AppState>) -> Response {
    match state.pipeline.load_snapshot(&state.data_dir) {
        Ok(snapshot) => ApiResponse::ok(snapshot),
        Err(e) => {
            tracing::error!("Error building snapshot: {:#}", e);
            ApiResponse::<()>::err(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Read one sheet from the data directory, fresh on every request
fn sheet_response(state: &AppState, kind: SheetKind) -> Response {
    let path = state.data_dir.join(kind.file_name());
    if !path.exists() {
        return ApiResponse::<()>::err(
            StatusCode::NOT_FOUND,
            format!("{} sheet not found: {}", kind.name(), path.display()),
        );
    }

    let result = state
        .pipeline
        .read_rows(&path)
        .and_then(|rows| state.pipeline.extract_json(kind, &rows));

    match result {
        Ok(value) => ApiResponse::ok(value),
        Err(e) => {
            tracing::error!("Error reading {} sheet: {:#}", kind.name(), e);
            ApiResponse::<()>::err(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// GET /api/config - Config record
async fn get_config(State(state): State<AppState>) -> Response {
    sheet_response(&state, SheetKind::Config)
}

/// GET /api/log - Log entries, newest first
async fn get_log(State(state): State<AppState>) -> Response {
    sheet_response(&state, SheetKind::Log)
}

/// GET /api/yearly - Yearly chart points, oldest first
async fn get_yearly(State(state): State<AppState>) -> Response {
    sheet_response(&state, SheetKind::Yearly)
}

/// GET /api/avatar?id=...&name=... - Resolve an avatar URL
async fn get_avatar(State(state): State<AppState>, Query(query): Query<AvatarQuery>) -> Response {
    let id = query.id.unwrap_or_default();
    ApiResponse::ok(AvatarResponse {
        valid: is_valid_drive_id(&id),
        url: state.pipeline.avatar_url(&id, query.name.as_deref()),
    })
}

// ============================================================================
// Main Server
// ============================================================================

/// Where the server reads from and listens on
#[derive(Debug, Clone, PartialEq)]
struct ServerSettings {
    data_dir: PathBuf,
    web_dir: PathBuf,
    addr: String,
    settings_file: Option<PathBuf>,
}

impl ServerSettings {
    /// Read settings from any key lookup (env vars in production, a map in tests)
    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        ServerSettings {
            data_dir: PathBuf::from(get("DASHBOARD_DATA_DIR").unwrap_or_else(|| "data".to_string())),
            web_dir: PathBuf::from(get("DASHBOARD_WEB_DIR").unwrap_or_else(|| "web".to_string())),
            addr: get("DASHBOARD_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            settings_file: get("DASHBOARD_SETTINGS").map(PathBuf::from),
        }
    }

    fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn load_config(&self) -> Result<DashboardConfig> {
        let config = match &self.settings_file {
            Some(path) => DashboardConfig::from_file(path)?,
            None => DashboardConfig::default(),
        };
        Ok(config.with_env_overrides())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    println!("🌐 Savings Dashboard - Web Server");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let settings = ServerSettings::from_env();
    let config = settings.load_config()?;
    let ServerSettings {
        data_dir, web_dir, addr, ..
    } = settings;

    if !data_dir.is_dir() {
        tracing::warn!("Data directory {:?} not found; every sheet will use defaults", data_dir);
    }
    if !web_dir.is_dir() {
        tracing::warn!("Frontend directory {:?} not found; only /api routes will answer", web_dir);
    }

    // Create shared state
    let state = AppState {
        pipeline: Arc::new(SheetPipeline::new(config)),
        data_dir: Arc::new(data_dir),
    };

    // Build API routes
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/snapshot", get(get_snapshot))
        .route("/config", get(get_config))
        .route("/log", get(get_log))
        .route("/yearly", get(get_yearly))
        .route("/avatar", get(get_avatar))
        .with_state(state);

    // Build main router; the frontend is served as static files
    let app = Router::new()
        .nest("/api", api_routes)
        .fallback_service(ServeDir::new(web_dir))
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    println!("\n🚀 Server running on http://{}", addr);
    println!("   API: http://{}/api/snapshot", addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
