//! Industry HTTP handlers

use super::model::{CreateIndustry, Industry};
use crate::core::error::TallyResult;
use crate::core::slug::Slugifier;
use crate::server::AppState;
use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

/// GET /industries
///
/// One entry per industry, each with the (possibly empty) set of associated
/// company codes.
pub async fn list_industries(State(state): State<AppState>) -> TallyResult<Json<Value>> {
    let industries = state.store.list_industries().await?;
    Ok(Json(json!({ "industries": industries })))
}

/// POST /industries
pub async fn create_industry(
    State(state): State<AppState>,
    Json(body): Json<CreateIndustry>,
) -> TallyResult<(StatusCode, Json<Value>)> {
    let industry = Industry {
        code: Slugifier::slugify(&body.code),
        industry: body.industry,
    };
    let industry = state.store.create_industry(industry).await?;
    Ok((StatusCode::CREATED, Json(json!({ "industry": industry }))))
}
