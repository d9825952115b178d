use anyhow::{Context, Result};
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use parking_lot::RwLock;
use search_core::{EngineConfig, SearchEngine, StopWordSource};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

/// Upper bound on results returned by one `/search` request.
pub const MAX_RESPONSES_PER_REQUEST: usize = 10;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Directory of `.txt` documents indexed at startup and on rebuild.
    pub corpus_dir: PathBuf,
    pub stop_words: StopWordSource,
    pub engine: EngineConfig,
    pub admin_token: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(alias = "q")]
    pub query: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { MAX_RESPONSES_PER_REQUEST }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct SearchResult {
    pub title: String,
    pub file: String,
    pub score: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexStats {
    pub num_docs: usize,
    pub num_terms: usize,
    pub corpus_size: usize,
}

impl IndexStats {
    fn of(engine: &SearchEngine) -> Self {
        Self {
            num_docs: engine.index().num_documents(),
            num_terms: engine.index().num_terms(),
            corpus_size: engine.corpus_size(),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    /// Published engine. Readers clone the inner `Arc`; rebuilds swap it.
    pub engine: Arc<RwLock<Arc<SearchEngine>>>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    fn engine(&self) -> Arc<SearchEngine> {
        self.engine.read().clone()
    }
}

/// Index the configured corpus, then build the router around it.
pub fn build_app(config: ServerConfig) -> Result<Router> {
    let engine = load_engine(&config)?;
    Ok(build_router(engine, config))
}

fn load_engine(config: &ServerConfig) -> Result<SearchEngine> {
    let stop_words = config.stop_words.load()?;
    SearchEngine::load(&config.corpus_dir, stop_words, config.engine)
        .with_context(|| format!("indexing {}", config.corpus_dir.display()))
}

/// Serve an already built engine.
pub fn build_router(engine: SearchEngine, config: ServerConfig) -> Router {
    let app_state = AppState { engine: Arc::new(RwLock::new(Arc::new(engine))), config: Arc::new(config) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/index/stats", get(stats_handler))
        .route("/index/rebuild", post(rebuild_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let query = params.query.to_lowercase();
    let hits = state
        .engine()
        .search(&query)
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    let total_hits = hits.len();
    let k = params.k.max(1).min(MAX_RESPONSES_PER_REQUEST);
    let results = hits
        .into_iter()
        .take(k)
        .map(|hit| SearchResult { title: hit.title, file: hit.key, score: hit.score })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %query, total_hits, "search");
    Ok(Json(SearchResponse { query, took_ms: elapsed.as_millis(), took_s: elapsed.as_secs_f64(), total_hits, results }))
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(IndexStats::of(&state.engine()))
}

/// Re-read the corpus and publish a fresh index. The build runs without the
/// lock held; only the swap takes the write guard.
async fn rebuild_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<IndexStats>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let config = state.config.clone();
    let engine = tokio::task::spawn_blocking(move || load_engine(&config))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;
    let stats = IndexStats::of(&engine);
    *state.engine.write() = Arc::new(engine);
    tracing::info!(num_docs = stats.num_docs, num_terms = stats.num_terms, "index rebuilt");
    Ok(Json(stats))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.config.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
