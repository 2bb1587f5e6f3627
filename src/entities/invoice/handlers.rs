//! Invoice HTTP handlers

use super::model::{CreateInvoice, SettleInvoice};
use crate::core::error::{TallyError, TallyResult};
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

/// GET /invoices
pub async fn list_invoices(State(state): State<AppState>) -> TallyResult<Json<Value>> {
    let invoices = state.store.list_invoices().await?;
    Ok(Json(json!({ "invoices": invoices })))
}

/// GET /invoices/{id}
pub async fn get_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> TallyResult<Json<Value>> {
    let invoice = state
        .store
        .get_invoice(id)
        .await?
        .ok_or_else(|| TallyError::not_found("invoice", id.to_string()))?;

    Ok(Json(json!({ "invoice": invoice })))
}

/// POST /invoices
///
/// The server assigns id and add_date; new invoices start unpaid.
pub async fn create_invoice(
    State(state): State<AppState>,
    Json(body): Json<CreateInvoice>,
) -> TallyResult<(StatusCode, Json<Value>)> {
    let invoice = state.store.create_invoice(&body.comp_code, body.amt).await?;
    Ok((StatusCode::CREATED, Json(json!({ "invoice": invoice }))))
}

/// PUT /invoices/{id}
///
/// Applies the paid-date transition rule against the stored row; see
/// [`next_paid_date`](super::model::next_paid_date).
pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<SettleInvoice>,
) -> TallyResult<Json<Value>> {
    let invoice = state
        .store
        .settle_invoice(id, body.amt, body.paid)
        .await?
        .ok_or_else(|| TallyError::not_found("invoice", id.to_string()))?;

    Ok(Json(json!({ "invoice": invoice })))
}

/// DELETE /invoices/{id}
pub async fn delete_invoice(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> TallyResult<Json<Value>> {
    if !state.store.delete_invoice(id).await? {
        return Err(TallyError::not_found("invoice", id.to_string()));
    }
    Ok(Json(json!({ "status": "Deleted" })))
}
