//! Route definitions for the certificate service stub.
//!
//! Implements the endpoints that `cnd-client` calls, with the service's JSON
//! field names. Errors are `{"message": "..."}` bodies.

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use cnd_core::{CndError, Jurisdiction, RecordDraft, RecordId, TaxpayerId};
use serde::Deserialize;
use serde_json::json;

use crate::store::AppState;

/// Build the complete router with all stub routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/certidoes", get(list_records).post(create_record))
        .route("/api/certidoes/excluir", post(delete_many))
        .route("/api/certidoes/historico", get(history))
        .route("/api/certidoes/:id", put(update_record).delete(delete_one))
        .route("/api/certidoes/:id/arquivo", get(document))
        .fallback(not_implemented)
        .with_state(state)
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(json!({ "message": message.into() }))).into_response()
}

fn failure(err: CndError) -> Response {
    let status = match &err {
        CndError::NotFound(_) => StatusCode::NOT_FOUND,
        CndError::Conflict(_) => StatusCode::CONFLICT,
        CndError::Validation(_) | CndError::Json(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        CndError::NotFound(m) | CndError::Conflict(m) => m,
        CndError::Validation(v) => v.to_string(),
        other => other.to_string(),
    };
    tracing::debug!(%status, %message, "request rejected");
    error_response(status, message)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

// ── Records ─────────────────────────────────────────────────────────

async fn list_records(State(state): State<AppState>) -> Response {
    Json(state.list()).into_response()
}

async fn create_record(State(state): State<AppState>, Json(draft): Json<RecordDraft>) -> Response {
    match state.create(draft) {
        Ok(record) => {
            tracing::info!(id = %record.id, "record created");
            (StatusCode::CREATED, Json(record)).into_response()
        }
        Err(e) => failure(e),
    }
}

async fn update_record(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(draft): Json<RecordDraft>,
) -> Response {
    let id = RecordId::from_raw(id);
    match state.update(&id, draft) {
        Ok(record) => {
            tracing::info!(%id, "record updated");
            Json(record).into_response()
        }
        Err(e) => failure(e),
    }
}

async fn delete_one(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.delete(&[RecordId::from_raw(id)]) {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => failure(e),
    }
}

#[derive(Debug, Deserialize)]
struct BulkDelete {
    ids: Vec<RecordId>,
}

async fn delete_many(State(state): State<AppState>, Json(body): Json<BulkDelete>) -> Response {
    if body.ids.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "ids must not be empty");
    }
    match state.delete(&body.ids) {
        Ok(removed) => {
            tracing::info!(count = removed.len(), "records deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => failure(e),
    }
}

// ── Documents ───────────────────────────────────────────────────────

async fn document(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = RecordId::from_raw(id);
    match state.document(&id) {
        Ok(bytes) => (
            [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"cnd-{id}.pdf\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => failure(e),
    }
}

// ── History ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    cnpj: String,
    tipo: Jurisdiction,
}

async fn history(State(state): State<AppState>, Query(q): Query<HistoryQuery>) -> Response {
    Json(state.history(&TaxpayerId::from_raw(q.cnpj), q.tipo)).into_response()
}

async fn not_implemented() -> Response {
    error_response(StatusCode::NOT_IMPLEMENTED, "endpoint not implemented by the stub")
}
