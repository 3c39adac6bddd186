//! Route handler functions for all API endpoints.
//!
//! Each handler extracts query/path/body parameters via axum extractors,
//! calls one engine operation, and returns a JSON response.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use frontdesk_core::types::{HelpRequest, KnowledgeEntry, RequestStatus};
use frontdesk_core::validate::{is_valid_phone, is_valid_text_length};
use frontdesk_knowledge::KnowledgeSummary;

use crate::error::ApiError;
use crate::state::AppState;

/// Upper bound for the search `limit` parameter.
const MAX_SEARCH_LIMIT: usize = 20;

/// Question length bounds for inbound help requests.
const MAX_QUESTION_LENGTH: usize = 1000;

/// Default search result count.
const DEFAULT_SEARCH_LIMIT: usize = 5;

// =============================================================================
// Request / response types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct CreateHelpRequestBody {
    pub customer_phone: String,
    pub customer_name: Option<String>,
    pub question: String,
    pub context: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListHelpRequestsParams {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
    pub supervisor_answer: String,
    pub supervisor_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateKnowledgeBody {
    pub question: String,
    pub answer: String,
    pub category: Option<String>,
    pub keywords: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
    pub customer_phone: Option<String>,
    pub customer_name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SweepResponse {
    pub message: String,
    pub timed_out_count: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_requests: usize,
    pub pending_requests: usize,
    pub resolved_requests: usize,
    pub timed_out_requests: usize,
    pub knowledge_entries: usize,
    pub knowledge_usage: u64,
}

// =============================================================================
// Health
// =============================================================================

/// GET /health - liveness and uptime.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "frontdesk".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

// =============================================================================
// Help requests
// =============================================================================

/// POST /help-requests - create a help request (201).
pub async fn create_help_request(
    State(state): State<AppState>,
    Json(body): Json<CreateHelpRequestBody>,
) -> Result<(StatusCode, Json<HelpRequest>), ApiError> {
    if !is_valid_phone(&body.customer_phone) {
        return Err(ApiError::BadRequest(format!(
            "invalid phone number: {}",
            body.customer_phone
        )));
    }
    if !is_valid_text_length(&body.question, 1, MAX_QUESTION_LENGTH) {
        return Err(ApiError::BadRequest(format!(
            "question must be between 1 and {} characters",
            MAX_QUESTION_LENGTH
        )));
    }

    let request = state
        .escalation
        .create(
            &body.customer_phone,
            body.customer_name,
            &body.question,
            body.context,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(request)))
}

/// GET /help-requests?status= - list requests, newest first.
pub async fn list_help_requests(
    State(state): State<AppState>,
    Query(params): Query<ListHelpRequestsParams>,
) -> Result<Json<Vec<HelpRequest>>, ApiError> {
    let status = match params.status.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<RequestStatus>().map_err(ApiError::BadRequest)?),
    };

    let requests = state.escalation.list(status).await?;
    Ok(Json(requests))
}

/// GET /help-requests/{id} - fetch one request.
pub async fn get_help_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HelpRequest>, ApiError> {
    let id = parse_id(&id)?;
    let request = state
        .escalation
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("help request not found".to_string()))?;
    Ok(Json(request))
}

/// POST /help-requests/check-timeouts - manual sweep trigger.
pub async fn check_timeouts(
    State(state): State<AppState>,
) -> Result<Json<SweepResponse>, ApiError> {
    let timed_out_count = state.escalation.sweep_timeouts().await?;
    Ok(Json(SweepResponse {
        message: "Checked timeouts successfully".to_string(),
        timed_out_count,
    }))
}

// =============================================================================
// Knowledge base
// =============================================================================

/// GET /knowledge - all entries, most recently used first.
pub async fn list_knowledge(
    State(state): State<AppState>,
) -> Result<Json<Vec<KnowledgeEntry>>, ApiError> {
    Ok(Json(state.knowledge.list_all().await?))
}

/// GET /knowledge/search?query=&limit= - relevance-ranked search.
pub async fn search_knowledge(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<KnowledgeEntry>>, ApiError> {
    let query = params
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("query parameter is required".to_string()))?;

    let limit = params.limit.unwrap_or(DEFAULT_SEARCH_LIMIT);
    if limit < 1 || limit > MAX_SEARCH_LIMIT {
        return Err(ApiError::BadRequest(format!(
            "limit must be between 1 and {}",
            MAX_SEARCH_LIMIT
        )));
    }

    Ok(Json(state.knowledge.search(&query, limit).await?))
}

/// POST /knowledge - manually seed an entry (201).
pub async fn create_knowledge_entry(
    State(state): State<AppState>,
    Json(body): Json<CreateKnowledgeBody>,
) -> Result<(StatusCode, Json<KnowledgeEntry>), ApiError> {
    if body.question.trim().is_empty() || body.answer.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "question and answer must not be empty".to_string(),
        ));
    }

    let entry = state
        .knowledge
        .add_entry(body.question, body.answer, body.category, body.keywords, None)
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

/// GET /knowledge/{id} - fetch one entry.
pub async fn get_knowledge_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<KnowledgeEntry>, ApiError> {
    let id = parse_id(&id)?;
    let entry = state
        .knowledge
        .get(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("knowledge entry not found".to_string()))?;
    Ok(Json(entry))
}

/// GET /knowledge/summary/stats - corpus statistics.
pub async fn knowledge_summary(
    State(state): State<AppState>,
) -> Result<Json<KnowledgeSummary>, ApiError> {
    Ok(Json(state.knowledge.summary().await?))
}

// =============================================================================
// Supervisor
// =============================================================================

/// POST /supervisor/{id}/resolve - resolve a pending request.
pub async fn resolve_help_request(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<ResolveBody>,
) -> Result<Json<HelpRequest>, ApiError> {
    let id = parse_id(&id)?;
    let request = state
        .escalation
        .resolve(id, &body.supervisor_answer, body.supervisor_id)
        .await?;
    Ok(Json(request))
}

/// GET /supervisor/dashboard/stats - request and knowledge totals.
pub async fn dashboard_stats(
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, ApiError> {
    let requests = state.escalation.list(None).await?;
    let summary = state.knowledge.summary().await?;

    let pending = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Pending)
        .count();
    let resolved = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Resolved)
        .count();
    let timed_out = requests
        .iter()
        .filter(|r| r.status == RequestStatus::Timeout)
        .count();

    Ok(Json(DashboardStats {
        total_requests: requests.len(),
        pending_requests: pending,
        resolved_requests: resolved,
        timed_out_requests: timed_out,
        knowledge_entries: summary.total_entries,
        knowledge_usage: summary.total_usage,
    }))
}

// =============================================================================
// Chat
// =============================================================================

/// POST /chat/{session_id} - one conversation turn.
pub async fn chat(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatResponse>, ApiError> {
    if let Some(phone) = body.customer_phone.as_deref() {
        state
            .agent
            .set_caller(&session_id, phone, body.customer_name)
            .await?;
    }

    let reply = state.agent.process_message(&session_id, &body.message).await?;
    Ok(Json(ChatResponse { reply }))
}

// =============================================================================
// Helpers
// =============================================================================

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::BadRequest(format!("invalid id: {}", raw)))
}
