//! HTTP request handlers

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::AppState;
use super::types::{
    AnswerRequest, ErrorResponse, HealthResponse, SessionResponse, StartRequest, TurnResponse,
};
use crate::enrich::{EnrichedPlan, localize, localize_step};
use crate::guide::{Answer, GuideError, Step, StepResult, TravelPlan};
use crate::language::Language;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/sessions/:id/start", post(start_session))
        .route("/api/sessions/:id/answer", post(answer))
        .route("/api/sessions/:id", get(get_session).delete(delete_session))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

async fn start_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<StartRequest>>,
) -> Result<Json<TurnResponse>, AppError> {
    let req = body.map(|Json(req)| req).unwrap_or_default();
    let lang = state.language(req.lang.as_deref())?;

    let step = state.engine.start(&id);
    tracing::info!(session = %id, "session started");
    Ok(Json(question_turn(&state, &step, lang).await))
}

async fn answer(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AnswerRequest>,
) -> Result<Json<TurnResponse>, AppError> {
    let lang = state.language(req.lang.as_deref())?;

    match state.engine.submit(&id, Answer::new(&req.text))? {
        StepResult::NextQuestion(step) => Ok(Json(question_turn(&state, &step, lang).await)),
        StepResult::Complete(plan) => {
            tracing::info!(session = %id, mood = %plan.mood, "plan complete");
            let enriched = enrich_bounded(&state, plan).await;
            Ok(Json(plan_turn(&state, enriched, lang).await))
        }
    }
}

async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionResponse>, AppError> {
    let progress = state
        .engine
        .progress(&id)
        .ok_or_else(|| AppError::NotFound(format!("no session {id}")))?;
    Ok(Json(SessionResponse {
        cursor: progress.cursor,
        total: progress.total,
        answers: progress.answers,
        current: state.engine.current_step(&id),
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.engine.forget(&id) {
        tracing::info!(session = %id, "session deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("no session {id}")))
    }
}

async fn question_turn(state: &AppState, step: &Step, lang: Language) -> TurnResponse {
    let shown = localize_step(state.translator.as_ref(), step, lang).await;
    TurnResponse {
        response: shown.prompt,
        next_options: step.choices.clone(),
        labels: shown.labels,
        done: false,
        plan: None,
        narrative: None,
        videos: Vec::new(),
    }
}

async fn plan_turn(state: &AppState, enriched: EnrichedPlan, lang: Language) -> TurnResponse {
    let response = localize(state.translator.as_ref(), &enriched.to_markdown(), lang).await;
    TurnResponse {
        response,
        next_options: Vec::new(),
        labels: Vec::new(),
        done: true,
        plan: Some(enriched.plan),
        narrative: enriched.narrative,
        videos: enriched.videos,
    }
}

/// Enrichment under the configured deadline. Past it, the bare plan.
async fn enrich_bounded(state: &AppState, plan: TravelPlan) -> EnrichedPlan {
    match tokio::time::timeout(state.enrich_timeout, state.enricher.enrich(&plan)).await {
        Ok(enriched) => enriched,
        Err(_) => {
            tracing::warn!(
                timeout_secs = state.enrich_timeout.as_secs(),
                "enrichment timed out, returning bare plan"
            );
            EnrichedPlan::bare(plan)
        }
    }
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
pub enum AppError {
    Guide(GuideError),
    BadRequest(String),
    NotFound(String),
}

impl From<GuideError> for AppError {
    fn from(e: GuideError) -> Self {
        AppError::Guide(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Guide(e) => {
                let status = match e {
                    GuideError::InvalidChoice { .. } | GuideError::AlreadyComplete => {
                        StatusCode::UNPROCESSABLE_ENTITY
                    }
                    GuideError::UnknownConversant => StatusCode::NOT_FOUND,
                    GuideError::IncompleteAnswers { .. } | GuideError::InvalidSpec(_) => {
                        tracing::error!(error = %e, "guide invariant broken");
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                (status, e.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
