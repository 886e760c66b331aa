use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use crate::dataset::{DatasetAnalysis, DatasetStats};
use crate::game::ParsedHand;
use crate::scenario::ScenarioFilter;
use crate::session::{
    AnswerOutcome, InMemorySessionStore, IssuedScenario, Session, SessionError, SessionStore,
    StatsReport,
};
use crate::state::{TrainerError, TrainerState};

#[derive(Clone)]
struct AppState {
    trainer: TrainerState,
    sessions: Arc<dyn SessionStore>,
}

impl AppState {
    fn session(&self, id: &Uuid) -> Result<Arc<Mutex<Session>>, ApiError> {
        self.sessions.get(id).ok_or(ApiError::NotFound)
    }
}

#[derive(Debug, Deserialize)]
struct ScenarioQuery {
    #[serde(rename = "type")]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct AnswerRequest {
    #[serde(default)]
    scenario_id: Option<Uuid>,
    #[serde(default)]
    answer: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionCreated {
    pub session_id: Uuid,
    pub stats: StatsReport,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("session not found")]
    NotFound,
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Trainer(#[from] TrainerError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::StaleScenario) => StatusCode::BAD_REQUEST,
            ApiError::Trainer(TrainerError::NoScenariosAvailable) => StatusCode::NOT_FOUND,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub async fn serve(addr: SocketAddr, trainer: TrainerState) -> Result<()> {
    let app = router(trainer);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/overview", get(overview))
        .route("/dataset-analysis", get(dataset_analysis))
        .route("/hand", get(random_hand))
        .route("/sessions", post(start_session))
        .route("/sessions/:id", delete(end_session))
        .route("/sessions/:id/scenario", get(issue_scenario))
        .route("/sessions/:id/answers", post(check_answer))
        .route("/sessions/:id/stats", get(fetch_stats))
        .route("/sessions/:id/stats/reset", post(reset_stats));

    Router::new()
        .route("/healthz", get(health))
        .nest("/api", api)
        .fallback_service(ServeDir::new("public"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub fn router(trainer: TrainerState) -> Router {
    router_with_store(trainer, Arc::new(InMemorySessionStore::new()))
}

pub fn router_with_store(trainer: TrainerState, sessions: Arc<dyn SessionStore>) -> Router {
    build_router(AppState { trainer, sessions })
}

async fn health() -> &'static str {
    "ok"
}

async fn overview(State(state): State<AppState>) -> Json<DatasetStats> {
    Json(state.trainer.stats())
}

async fn dataset_analysis(State(state): State<AppState>) -> Json<DatasetAnalysis> {
    Json(state.trainer.analysis())
}

async fn random_hand(State(state): State<AppState>) -> Result<Json<ParsedHand>, ApiError> {
    let hand = state.trainer.draw_hand(&mut rand::thread_rng())?;
    Ok(Json(hand))
}

async fn start_session(State(state): State<AppState>) -> Json<SessionCreated> {
    let session_arc = state.sessions.create();
    let session = session_arc.lock();
    Json(SessionCreated {
        session_id: session.id(),
        stats: session.stats().report(),
    })
}

async fn end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

async fn issue_scenario(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ScenarioQuery>,
) -> Result<Json<IssuedScenario>, ApiError> {
    let session_arc = state.session(&id)?;
    // An unknown type selects nothing, like an empty pool.
    let filter = query
        .kind
        .as_deref()
        .unwrap_or_default()
        .parse::<ScenarioFilter>()
        .map_err(|_| TrainerError::NoScenariosAvailable)?;
    let scenario = state.trainer.draw(filter, &mut rand::thread_rng())?;
    let issued = session_arc.lock().issue(scenario);
    Ok(Json(issued))
}

async fn check_answer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<AnswerOutcome>, ApiError> {
    let session_arc = state.session(&id)?;
    let outcome = session_arc
        .lock()
        .check_answer(req.scenario_id, &req.answer)?;
    Ok(Json(outcome))
}

async fn fetch_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<StatsReport>, ApiError> {
    let session_arc = state.session(&id)?;
    let stats = session_arc.lock().stats().report();
    Ok(Json(stats))
}

async fn reset_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    let session_arc = state.session(&id)?;
    session_arc.lock().reset_stats();
    Ok(Json(MessageResponse {
        message: "Statistics reset successfully.",
    }))
}
