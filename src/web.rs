//! Axum-based HTTP API for the configurator front-end
//!
//! The browser renders widgets from `/api/sections`, writes edits back with
//! `PUT /api/sections` and draws the QR code from `/api/payload/stream`.

use crate::config::{Config, UiConfig};
use crate::error::{HammerError, Result};
use crate::logging::{LogContext, get_logger_with_context};
use crate::payload::{LivePayload, PayloadSettings, QrPayload, serialize};
use crate::schema::SectionDefinition;
use crate::state::EditableSection;
use crate::store::ConfigStore;
use crate::timezone::Clock;
use axum::response::Redirect;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, get_service, post},
};
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio_stream::StreamExt;
use tower_http::services::ServeDir;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigStore>,
    pub settings: PayloadSettings,
    pub ui: UiConfig,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(store: Arc<ConfigStore>, config: &Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            settings: PayloadSettings::from_config(config),
            ui: config.ui.clone(),
            clock,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdvancedBody {
    pub show_advanced: bool,
}

/// Form settings the front-end needs before rendering
#[derive(Debug, Serialize, Deserialize)]
pub struct UiSettings {
    pub show_config_keys: bool,
    pub advanced_warning: String,
    pub time_sync_update_interval_ms: u64,
    pub max_config_values: usize,
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

pub async fn version() -> impl IntoResponse {
    Json(serde_json::json!({ "version": env!("APP_VERSION") }))
}

pub async fn ui_settings(State(state): State<AppState>) -> Json<UiSettings> {
    Json(UiSettings {
        show_config_keys: state.ui.show_config_keys,
        advanced_warning: state.ui.advanced_warning.clone(),
        time_sync_update_interval_ms: state.ui.time_sync_update_interval_ms,
        max_config_values: state.settings.capacity,
    })
}

pub async fn get_schema(State(state): State<AppState>) -> Json<Vec<SectionDefinition>> {
    Json(state.store.schema().to_vec())
}

pub async fn get_sections(State(state): State<AppState>) -> Json<Vec<EditableSection>> {
    Json(state.store.visible_sections())
}

pub async fn put_sections(
    State(state): State<AppState>,
    Json(edited): Json<Vec<EditableSection>>,
) -> Json<Vec<EditableSection>> {
    state.store.merge_visible(&edited);
    Json(state.store.visible_sections())
}

pub async fn get_advanced(State(state): State<AppState>) -> Json<AdvancedBody> {
    Json(AdvancedBody {
        show_advanced: state.store.show_advanced(),
    })
}

pub async fn put_advanced(
    State(state): State<AppState>,
    Json(body): Json<AdvancedBody>,
) -> Json<Vec<EditableSection>> {
    state.store.set_show_advanced(body.show_advanced);
    Json(state.store.visible_sections())
}

pub async fn clear_values(State(state): State<AppState>) -> Json<Vec<EditableSection>> {
    state.store.clear_all_values();
    Json(state.store.visible_sections())
}

pub async fn reset_advanced(State(state): State<AppState>) -> Json<Vec<EditableSection>> {
    state.store.reset_advanced_values();
    Json(state.store.visible_sections())
}

pub async fn reset_defaults(State(state): State<AppState>) -> Json<Vec<EditableSection>> {
    state.store.reset_to_default();
    Json(state.store.visible_sections())
}

pub async fn get_payload(State(state): State<AppState>) -> Json<QrPayload> {
    Json(serialize(
        &state.store.sections(),
        state.settings.capacity,
        state.clock.as_ref(),
    ))
}

/// One live subscription per connection; closing the connection drops it
pub async fn payload_stream(State(state): State<AppState>) -> impl IntoResponse {
    let live = LivePayload::spawn(&state.store, state.settings, Arc::clone(&state.clock));
    let stream = live
        .into_stream()
        .map(|payload| Event::default().event("payload").json_data(payload));
    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn build_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::to("/ui/index.html") }))
        .route("/api/health", get(health))
        .route("/api/version", get(version))
        .route("/api/ui", get(ui_settings))
        .route("/api/schema", get(get_schema))
        .route("/api/sections", get(get_sections).put(put_sections))
        .route("/api/advanced", get(get_advanced).put(put_advanced))
        .route("/api/clear", post(clear_values))
        .route("/api/reset-advanced", post(reset_advanced))
        .route("/api/reset", post(reset_defaults))
        .route("/api/payload", get(get_payload))
        .route("/api/payload/stream", get(payload_stream))
        .nest_service(
            "/ui",
            get_service(ServeDir::new(static_dir).append_index_html_on_directories(true))
                .handle_error(|_| async { StatusCode::INTERNAL_SERVER_ERROR }),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

pub async fn serve(state: AppState, config: &Config) -> Result<()> {
    let host = config.web.host.as_str();
    let port = config.web.port;
    let router = build_router(state, &config.web.static_dir);

    let logger = get_logger_with_context(
        LogContext::new("web")
            .with_field("host", host.to_string())
            .with_field("port", port.to_string()),
    );
    logger.info("Starting web server");

    let addr = match host.parse::<IpAddr>() {
        Ok(ip) => SocketAddr::new(ip, port),
        Err(_) => {
            logger.warn(&format!("Invalid host '{host}'; falling back to 127.0.0.1"));
            SocketAddr::from(([127, 0, 0, 1], port))
        }
    };

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| HammerError::web(format!("Failed to bind {addr}: {e}")))?;
    let local_addr = listener.local_addr()?;
    logger.info(&format!(
        "Web server listening at http://{local_addr} (UI /ui, API /api)"
    ));

    axum::serve(listener, router)
        .await
        .map_err(|e| HammerError::web(e.to_string()))?;
    Ok(())
}
