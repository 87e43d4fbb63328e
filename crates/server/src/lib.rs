//! HTTP service for the assembly guide.
//!
//! Each session is a headless [`GuideHarness`] held in memory. Simulated
//! delays (recognition, chat typing) are awaited outside the session lock.

pub mod config;
pub mod error;
pub mod routes;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{delete, get, post};
use axum::Router;
use sarmobi_guide_lib::chat::SeededPicker;
use sarmobi_guide_lib::harness::GuideHarness;
use sarmobi_guide_lib::identify::{Identifier, SeededDecisions, SimulatedIdentifier, SimulationTimings};
use sarmobi_guide_lib::state::Preferences;
use shared::Catalog;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use config::ServerConfig;
use error::ApiError;

pub struct AppContext {
    pub catalog: Catalog,
    pub config: ServerConfig,
    pub identifier: Arc<dyn Identifier>,
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
}

struct SessionEntry {
    harness: GuideHarness,
    last_seen: Instant,
}

pub type AppState = Arc<AppContext>;

impl AppContext {
    /// Context with the simulated recognition service configured from `config`.
    pub fn new(catalog: Catalog, config: ServerConfig) -> Self {
        let decisions = match config.photo_seed {
            Some(seed) => SeededDecisions::new(seed),
            None => SeededDecisions::from_entropy(),
        };
        let timings = SimulationTimings::scaled(config.simulation_scale).unwrap_or_else(|| {
            tracing::warn!(
                "Simulation scale {} is out of range; using default timings",
                config.simulation_scale
            );
            SimulationTimings::default()
        });
        let identifier = SimulatedIdentifier::new(&catalog, timings, Box::new(decisions));
        Self::with_identifier(catalog, config, Arc::new(identifier))
    }

    pub fn with_identifier(
        catalog: Catalog,
        config: ServerConfig,
        identifier: Arc<dyn Identifier>,
    ) -> Self {
        Self {
            catalog,
            config,
            identifier,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a fresh session and return its id. Sessions idle for longer
    /// than the configured TTL are dropped first.
    pub async fn create_session(&self) -> Uuid {
        let preferences = Preferences {
            language: self.config.default_language,
            voice_mode: false,
        };
        let mut harness = GuideHarness::with_preferences(self.catalog.clone(), preferences);
        if let Some(seed) = self.config.chat_seed {
            harness = harness.with_picker(Box::new(SeededPicker::new(seed)));
        }

        let id = Uuid::new_v4();
        let now = Instant::now();
        let ttl = self.config.session_ttl;
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, entry| now.duration_since(entry.last_seen) <= ttl);
        if sessions.len() < before {
            tracing::info!("Expired {} idle sessions", before - sessions.len());
        }
        sessions.insert(
            id,
            SessionEntry {
                harness,
                last_seen: now,
            },
        );
        tracing::info!("Session {id} created ({} active)", sessions.len());
        id
    }

    /// Drop a session. Requests still waiting on a delay for it get 404.
    pub async fn remove_session(&self, id: &str) -> Result<(), ApiError> {
        let key = Uuid::parse_str(id).map_err(|_| ApiError::SessionNotFound(id.to_string()))?;
        let mut sessions = self.sessions.lock().await;
        if sessions.remove(&key).is_none() {
            return Err(ApiError::SessionNotFound(id.to_string()));
        }
        tracing::info!("Session {id} removed ({} active)", sessions.len());
        Ok(())
    }

    /// Run `f` on a session under the lock.
    pub async fn with_session<T>(
        &self,
        id: &str,
        f: impl FnOnce(&mut GuideHarness) -> T,
    ) -> Result<T, ApiError> {
        let not_found = || ApiError::SessionNotFound(id.to_string());
        let key = Uuid::parse_str(id).map_err(|_| not_found())?;
        let mut sessions = self.sessions.lock().await;
        let entry = sessions.get_mut(&key).ok_or_else(not_found)?;
        entry.last_seen = Instant::now();
        Ok(f(&mut entry.harness))
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/catalog", get(routes::catalog))
        .route("/api/sessions", post(routes::sessions::create_session))
        .route(
            "/api/sessions/{id}",
            delete(routes::sessions::delete_session),
        )
        .route(
            "/api/sessions/{id}/views/{route}",
            get(routes::sessions::render_view),
        )
        .route(
            "/api/sessions/{id}/commands",
            post(routes::sessions::run_command),
        )
        .route("/api/sessions/{id}/identify", post(routes::identify::identify))
        .route("/api/sessions/{id}/chat", post(routes::sessions::chat))
        .route("/api/sessions/{id}/summary", get(routes::sessions::summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
