//! HTTP endpoint handlers
//!
//! Browser routes drive the session controller and redirect back to the page;
//! the `/api` routes run the same pipeline statelessly over JSON.

use crate::core::config::Config;
use crate::core::constants::message;
use crate::core::pipeline::{Pipeline, PipelineError};
use crate::core::provider::GenerationError;
use crate::input::FetchError;
use crate::report::{MIME_TYPE, Report};
use crate::session::store::{expired_session_cookie, session_cookie, session_id_from_cookies};
use crate::session::{Credential, FunFacts, Notice, NoticeLevel, Session, SessionStore};
use crate::tools::{ToolKind, ToolParams, ToolRequest};
use crate::ui::{Branding, page};
use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<Pipeline>,
    pub sessions: SessionStore,
    pub fun_facts: Arc<FunFacts>,
    pub branding: Arc<Branding>,
}

/// Create the router with all endpoints
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/session/credential", post(set_credential))
        .route("/session/tool", post(select_tool))
        .route("/session/clear", post(clear_all))
        .route("/session/fun-fact", post(show_fun_fact))
        .route("/session/end", post(end_session))
        .route("/tools/{slug}", post(run_tool))
        .route("/api/tools/run", post(api_run_tool))
        .route("/api/report", post(api_report))
        .route("/branding/logo", get(logo))
        .route("/health", get(health_check))
        .with_state(state)
}

fn session_id(headers: &HeaderMap) -> Option<Uuid> {
    let cookies = headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok());
    session_id_from_cookies(cookies)
}

/// Session loaded for one browser request
///
/// `id` stays `None` until the session is first persisted.
struct SessionContext {
    id: Option<Uuid>,
    session: Session,
    created: bool,
}

impl SessionContext {
    async fn load(state: &AppState, headers: &HeaderMap) -> Self {
        match state.sessions.load(session_id(headers)).await {
            Some((id, session)) => Self {
                id: Some(id),
                session,
                created: false,
            },
            None => Self {
                id: None,
                session: Session::new(),
                created: false,
            },
        }
    }

    /// Write the session to the store, creating it on first use
    async fn persist(&mut self, state: &AppState) -> Uuid {
        match self.id {
            Some(id) => {
                state.sessions.save(id, self.session.clone()).await;
                id
            }
            None => {
                let id = state.sessions.insert(self.session.clone()).await;
                self.id = Some(id);
                self.created = true;
                id
            }
        }
    }

    /// Attach the session cookie when this request created the session
    fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if let (true, Some(id)) = (self.created, self.id) {
            if let Ok(cookie) = HeaderValue::from_str(&session_cookie(id)) {
                response.headers_mut().insert(header::SET_COOKIE, cookie);
            }
        }
        response
    }

    async fn finish(mut self, state: &AppState, response: impl IntoResponse) -> Response {
        self.persist(state).await;
        self.respond(response)
    }
}

fn back_to_page() -> Redirect {
    Redirect::to("/")
}

/// GET / - Page for the current session
///
/// Read-only: a visitor without a session sees the default page and nothing
/// is stored.
async fn index(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let ctx = SessionContext::load(&state, &headers).await;
    Html(page::render(&ctx.session, &state.branding))
}

#[derive(Debug, Deserialize)]
struct CredentialForm {
    #[serde(default)]
    api_key: String,
}

/// POST /session/credential - Store the API key for this session
async fn set_credential(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<CredentialForm>,
) -> Response {
    let mut ctx = SessionContext::load(&state, &headers).await;
    if ctx.session.set_credential(&form.api_key) {
        info!("API key set for session");
        ctx.session.notice = None;
    } else {
        ctx.session.notice = Some(Notice::new(
            NoticeLevel::Warning,
            message::MISSING_CREDENTIAL,
        ));
    }
    ctx.finish(&state, back_to_page()).await
}

#[derive(Debug, Deserialize)]
struct ToolSelectForm {
    tool: String,
}

/// POST /session/tool - Select a tool
async fn select_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ToolSelectForm>,
) -> Response {
    let mut ctx = SessionContext::load(&state, &headers).await;
    match form.tool.parse::<ToolKind>() {
        Ok(kind) => ctx.session.select_tool(kind),
        Err(e) => ctx.session.notice = Some(Notice::new(NoticeLevel::Error, e.to_string())),
    }
    ctx.finish(&state, back_to_page()).await
}

/// POST /session/clear - Clear everything except the API key
async fn clear_all(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut ctx = SessionContext::load(&state, &headers).await;
    ctx.session.clear_all();
    ctx.finish(&state, back_to_page()).await
}

/// POST /session/fun-fact - Show a random fun fact
async fn show_fun_fact(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let mut ctx = SessionContext::load(&state, &headers).await;
    ctx.session.show_fun_fact(state.fun_facts.next());
    ctx.finish(&state, back_to_page()).await
}

/// POST /session/end - Drop the session entirely
async fn end_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(id) = session_id(&headers) {
        state.sessions.remove(&id).await;
    }
    let mut response = back_to_page().into_response();
    if let Ok(cookie) = HeaderValue::from_str(&expired_session_cookie()) {
        response.headers_mut().insert(header::SET_COOKIE, cookie);
    }
    response
}

/// POST /tools/{slug} - Run a tool from the HTML form
async fn run_tool(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    headers: HeaderMap,
    Form(mut form): Form<HashMap<String, String>>,
) -> Response {
    let mut ctx = SessionContext::load(&state, &headers).await;

    let kind = match slug.parse::<ToolKind>() {
        Ok(kind) => kind,
        Err(e) => {
            ctx.session.notice = Some(Notice::new(NoticeLevel::Error, e.to_string()));
            return ctx.finish(&state, back_to_page()).await;
        }
    };
    ctx.session.select_tool(kind);
    ctx.session.outcome = None;
    ctx.session.notice = None;

    let input = form.remove("input").unwrap_or_default();
    ctx.session.input_text = input.clone();

    let params = match ToolParams::from_form(kind, &form) {
        Ok(params) => params,
        Err(e) => {
            ctx.session.notice = Some(Notice::new(NoticeLevel::Error, e.to_string()));
            return ctx.finish(&state, back_to_page()).await;
        }
    };
    ctx.session.params = Some(params);

    let id = ctx.persist(&state).await;

    let request = ToolRequest::new(params, input.clone());
    let (outcome, notice) = match state.pipeline.run(ctx.session.credential(), &request).await {
        Ok(outcome) => (Some(outcome), None),
        Err(e) => (None, Some(notice_for(&e))),
    };

    // Other actions may have changed the session while the run was in flight.
    state
        .sessions
        .update(id, |session| {
            session.select_tool(kind);
            session.input_text = input;
            session.params = Some(params);
            session.outcome = outcome;
            session.notice = notice;
        })
        .await;
    ctx.respond(back_to_page())
}

fn notice_for(e: &PipelineError) -> Notice {
    match e {
        PipelineError::EmptyInput => Notice::new(NoticeLevel::Warning, message::EMPTY_INPUT),
        PipelineError::Fetch(e) => Notice::new(NoticeLevel::Error, e.to_string()),
        PipelineError::Generation(GenerationError::MissingCredential) => {
            Notice::new(NoticeLevel::Warning, message::MISSING_CREDENTIAL)
        }
        PipelineError::Generation(e) => Notice::new(
            NoticeLevel::Error,
            format!("Error interacting with OpenAI: {e}. {}", message::GENERATION_FAILED),
        ),
    }
}

/// Credential from `x-api-key` or `Authorization: Bearer`
fn credential_from_headers(headers: &HeaderMap) -> Option<Credential> {
    headers
        .get("x-api-key")
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
        })
        .and_then(Credential::new)
}

fn error_response(status: StatusCode, error_type: &str, message: String) -> Response {
    let body = json!({
        "type": "error",
        "error": {
            "type": error_type,
            "message": message,
        }
    });
    (status, Json(body)).into_response()
}

fn pipeline_error_response(e: &PipelineError) -> Response {
    let (status, error_type) = match e {
        PipelineError::EmptyInput => (StatusCode::BAD_REQUEST, "empty_input"),
        PipelineError::Fetch(FetchError::Status(_) | FetchError::Request(_)) => {
            (StatusCode::BAD_GATEWAY, "fetch_error")
        }
        PipelineError::Fetch(_) => (StatusCode::UNPROCESSABLE_ENTITY, "fetch_error"),
        PipelineError::Generation(g) => {
            let status = match g {
                GenerationError::MissingCredential | GenerationError::Authentication(_) => {
                    StatusCode::UNAUTHORIZED
                }
                GenerationError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
                _ => StatusCode::BAD_GATEWAY,
            };
            (status, g.kind())
        }
    };
    error_response(status, error_type, e.to_string())
}

/// POST /api/tools/run - Run a tool over JSON
async fn api_run_tool(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ToolRequest>,
) -> Response {
    let credential = credential_from_headers(&headers);
    match state.pipeline.run(credential.as_ref(), &request).await {
        Ok(outcome) => Json(outcome).into_response(),
        Err(e) => {
            warn!("Tool run failed: {}", e);
            pipeline_error_response(&e)
        }
    }
}

/// POST /api/report - Render a report as a downloadable HTML file
async fn api_report(Json(report): Json<Report>) -> Response {
    let disposition = format!(
        "attachment; filename=\"{}\"",
        report.file_name().replace(['"', '\\'], "_")
    );
    let Ok(disposition) = HeaderValue::from_str(&disposition) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            "invalid_request_error",
            "Report title cannot be used as a file name".to_string(),
        );
    };
    (
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(MIME_TYPE)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report.to_bytes(),
    )
        .into_response()
}

/// GET /branding/logo - Branding image
async fn logo(State(state): State<AppState>) -> Response {
    match &state.branding.logo {
        Some(logo) => (
            [(header::CONTENT_TYPE, logo.content_type)],
            logo.bytes.clone(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// GET /health - Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let sessions = state.sessions.len().await;
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "provider": state.pipeline.generator().provider_name(),
        "model": state.pipeline.generator().model(),
        "base_url": state.config.base_url,
        "max_output_tokens": state.config.max_output_tokens,
        "logo_loaded": state.branding.logo.is_some(),
        "active_sessions": sessions,
    }))
}
