use axum::{
    extract::{DefaultBodyLimit, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::advice::summary::FOOTER;
use crate::error::NutritionError;
use crate::food::{MealImage, TdeeEstimate, UserProfile};
use crate::session::{AdviceResult, AnalysisResult, Session};
use crate::workflow::MealWorkflow;

const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Sessions untouched for this long are dropped when the next one is created.
pub const SESSION_IDLE_TIMEOUT: Duration = Duration::from_secs(60 * 60);

pub struct SessionEntry {
    session: Arc<Mutex<Session>>,
    last_seen: Instant,
}

/// Live sessions. Each session has its own lock, so requests for different
/// users never wait on each other.
pub type SessionStore = Arc<RwLock<HashMap<Uuid, SessionEntry>>>;

#[derive(Clone)]
pub struct AppState {
    workflow: MealWorkflow,
    sessions: SessionStore,
    idle_timeout: Duration,
}

impl AppState {
    pub fn new(workflow: MealWorkflow) -> Self {
        Self::with_idle_timeout(workflow, SESSION_IDLE_TIMEOUT)
    }

    pub fn with_idle_timeout(workflow: MealWorkflow, idle_timeout: Duration) -> Self {
        Self {
            workflow,
            sessions: SessionStore::default(),
            idle_timeout,
        }
    }

    fn session(&self, id: Uuid) -> Result<Arc<Mutex<Session>>, ApiError> {
        let mut sessions = self.sessions.write();
        let entry = sessions.get_mut(&id).ok_or_else(|| ApiError::not_found(id))?;
        entry.last_seen = Instant::now();
        Ok(entry.session.clone())
    }

    fn insert(&self, session: Session) {
        let id = session.id();
        let entry = SessionEntry {
            session: Arc::new(Mutex::new(session)),
            last_seen: Instant::now(),
        };
        self.sessions.write().insert(id, entry);
    }

    /// Drops idle sessions. A session some request still holds is kept.
    pub fn evict_idle(&self) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, entry| {
            entry.last_seen.elapsed() < self.idle_timeout || Arc::strong_count(&entry.session) > 1
        });
        let evicted = before - sessions.len();
        if evicted > 0 {
            info!(evicted, remaining = sessions.len(), "evicted idle sessions");
        }
        evicted
    }
}

#[derive(Deserialize)]
pub struct ImageRequest {
    /// Base64 JPEG or PNG, optionally as a data URL.
    image: String,
}

#[derive(Serialize)]
pub struct TdeeResponse {
    #[serde(flatten)]
    tdee: TdeeEstimate,
    display: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    id: Uuid,
    created_at: chrono::DateTime<chrono::Utc>,
    profile: UserProfile,
    tdee: TdeeEstimate,
    missing_fields: Vec<String>,
    has_image: bool,
    analysis: Option<AnalysisResult>,
    advice: Option<AdviceResult>,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            id: session.id(),
            created_at: session.created_at(),
            profile: session.profile.clone(),
            tdee: session.profile.tdee(),
            missing_fields: crate::food::validation::missing_required_fields(&session.profile),
            has_image: session.image().is_some(),
            analysis: session.analysis().cloned(),
            advice: session.advice().cloned(),
        }
    }
}

#[derive(Serialize)]
pub struct ImageResponse {
    mime_type: &'static str,
    width: u32,
    height: u32,
}

#[derive(Serialize)]
pub struct AdviceResponse {
    #[serde(flatten)]
    advice: AdviceResult,
    footer: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    details: Vec<String>,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    fn not_found(id: Uuid) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            body: ErrorBody { error: format!("Session {} not found", id), details: Vec::new() },
        }
    }
}

impl From<NutritionError> for ApiError {
    fn from(e: NutritionError) -> Self {
        let status = if e.is_input_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::BAD_GATEWAY
        };
        let details = match &e {
            NutritionError::MissingFields(fields) => fields.clone(),
            _ => Vec::new(),
        };
        Self {
            status,
            body: ErrorBody { error: e.to_string(), details },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Create and configure the API router
pub fn create_api(workflow: MealWorkflow) -> Router {
    router(AppState::new(workflow))
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/health", get(health_check))
        .route("/tdee", post(tdee_handler))
        .route("/sessions", post(create_session))
        .route("/sessions/:id", get(get_session).delete(delete_session))
        .route("/sessions/:id/profile", put(update_profile))
        .route("/sessions/:id/image", post(upload_image))
        .route("/sessions/:id/analyze", post(analyze_meal))
        .route("/sessions/:id/advice", post(get_advice))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "vision_model": state.workflow.vision_model(),
        "sessions": state.sessions.read().len(),
    }))
}

async fn tdee_handler(Json(profile): Json<UserProfile>) -> ApiResult<TdeeResponse> {
    profile.validate().map_err(NutritionError::from)?;
    let tdee = profile.tdee();
    Ok(Json(TdeeResponse { tdee, display: tdee.to_string() }))
}

#[instrument(skip(state))]
async fn create_session(State(state): State<AppState>) -> (StatusCode, Json<SessionResponse>) {
    state.evict_idle();
    let session = Session::new();
    let response = SessionResponse::from(&session);
    state.insert(session);
    info!(session = %response.id, "session created");
    (StatusCode::CREATED, Json(response))
}

async fn get_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<SessionResponse> {
    let session = state.session(id)?;
    let session = session.lock().await;
    Ok(Json(SessionResponse::from(&*session)))
}

async fn delete_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    state
        .sessions
        .write()
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| ApiError::not_found(id))
}

/// Replaces the whole profile. Results computed from the old profile stay
/// until the next analysis.
async fn update_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(profile): Json<UserProfile>,
) -> ApiResult<SessionResponse> {
    profile.validate().map_err(NutritionError::from)?;
    let session = state.session(id)?;
    let mut session = session.lock().await;
    session.profile = profile;
    Ok(Json(SessionResponse::from(&*session)))
}

#[instrument(skip(state, request))]
async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ImageRequest>,
) -> ApiResult<ImageResponse> {
    let session = state.session(id)?;
    let image = MealImage::decode_base64(&request.image)?;
    let (width, height) = image.dimensions();
    let mime_type = image.mime_type();

    session.lock().await.attach_image(image);
    Ok(Json(ImageResponse { mime_type, width, height }))
}

#[instrument(skip(state))]
async fn analyze_meal(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<AnalysisResult> {
    let session = state.session(id)?;
    let mut session = session.lock().await;
    Ok(Json(state.workflow.analyze(&mut session).await?))
}

#[instrument(skip(state))]
async fn get_advice(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<AdviceResponse> {
    let session = state.session(id)?;
    let mut session = session.lock().await;
    let advice = state.workflow.advise(&mut session).await?;
    Ok(Json(AdviceResponse { advice, footer: FOOTER }))
}
