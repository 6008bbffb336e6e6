use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use farelist_core::{filter_flights_with, FilterError, Pagination, RawFilterParams};
use farelist_shared::FlightOffer;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Search results as handed over by the search step. Either a bare array of
/// offers or the upstream response envelope with the offers under `data`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SearchPayload {
    Offers(Vec<FlightOffer>),
    Envelope { data: Vec<FlightOffer> },
}

impl SearchPayload {
    pub fn into_offers(self) -> Vec<FlightOffer> {
        match self {
            SearchPayload::Offers(offers) | SearchPayload::Envelope { data: offers } => offers,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlightListResponse<'a> {
    pub status: &'static str,
    pub data: Vec<&'a FlightOffer>,
    pub pagination: Pagination,
    pub message: &'static str,
}

const MAX_SESSION_ID_LEN: usize = 128;

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route(
            "/api/sessions/{session_id}/flights",
            get(list_flights).put(store_flights).delete(clear_flights),
        )
}

/// POST /api/sessions
/// Hand out a fresh session id for clients that do not bring their own
pub async fn create_session() -> impl IntoResponse {
    let session_id = Uuid::new_v4().to_string();
    tracing::debug!("Issued session {}", session_id);
    (
        StatusCode::CREATED,
        Json(json!({
            "status": "ok",
            "data": { "sessionId": session_id },
            "message": "Session created",
        })),
    )
}

/// PUT /api/sessions/{session_id}/flights
/// Replace the session's stored search results
pub async fn store_flights(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    payload: Result<Json<SearchPayload>, JsonRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_session_id(&session_id)?;
    let Json(payload) = payload.map_err(|rejection| {
        AppError::ValidationError(format!("Invalid search results: {}", rejection.body_text()))
    })?;

    let stored = state.store.replace(&session_id, payload.into_offers()).await?;

    Ok(Json(json!({
        "status": "ok",
        "data": { "sessionId": session_id, "stored": stored },
        "message": "Search results stored",
    })))
}

/// GET /api/sessions/{session_id}/flights
/// Filter, sort and paginate the session's stored search results
pub async fn list_flights(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    query: Result<Query<RawFilterParams>, QueryRejection>,
) -> Result<Response, AppError> {
    check_session_id(&session_id)?;

    // An empty session wins over any query problem
    let offers = state.store.snapshot(&session_id).await?.unwrap_or_default();
    if offers.is_empty() {
        return Err(AppError::filter(FilterError::NoPriorSearch));
    }
    let Query(params) =
        query.map_err(|rejection| AppError::ValidationError(rejection.body_text()))?;

    let result = filter_flights_with(&offers, &params, &state.filter_options)
        .map_err(AppError::filter)?;

    tracing::debug!(
        session = %session_id,
        matched = result.pagination.total_flights,
        page = result.pagination.current_page,
        "Flight list served"
    );

    let body = FlightListResponse {
        status: "ok",
        data: result.data,
        pagination: result.pagination,
        message: "Flight list filtered and paginated successfully",
    };
    Ok(Json(body).into_response())
}

/// DELETE /api/sessions/{session_id}/flights
pub async fn clear_flights(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, AppError> {
    check_session_id(&session_id)?;
    if state.store.clear(&session_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFoundError(format!(
            "No stored search for session {}",
            session_id
        )))
    }
}

/// Session ids end up in store keys, so keep them short and plain
fn check_session_id(session_id: &str) -> Result<(), AppError> {
    let valid = !session_id.is_empty()
        && session_id.len() <= MAX_SESSION_ID_LEN
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::ValidationError(format!(
            "Session id must be 1-{} characters of letters, digits, '-' or '_'",
            MAX_SESSION_ID_LEN
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_shapes() {
        let bare: SearchPayload = serde_json::from_value(json!([{ "id": "1" }])).unwrap();
        assert_eq!(bare.into_offers().len(), 1);

        let envelope: SearchPayload = serde_json::from_value(json!({
            "meta": { "count": 2 },
            "data": [{ "id": "1" }, { "id": "2" }]
        }))
        .unwrap();
        assert_eq!(envelope.into_offers().len(), 2);
    }

    #[test]
    fn test_session_id_rules() {
        assert!(check_session_id("3f2c1a9e-aaaa-4bbb-8ccc-123456789abc").is_ok());
        assert!(check_session_id("user_42").is_ok());
        assert!(check_session_id("").is_err());
        assert!(check_session_id("a:b").is_err());
        assert!(check_session_id(&"x".repeat(MAX_SESSION_ID_LEN + 1)).is_err());
    }
}
