//! Company HTTP handlers

use super::model::{AttachIndustry, Company, CompanyDetail, CreateCompany, UpdateCompany};
use crate::core::error::{TallyError, TallyResult};
use crate::core::slug::Slugifier;
use crate::server::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde_json::{Value, json};

/// GET /companies
pub async fn list_companies(State(state): State<AppState>) -> TallyResult<Json<Value>> {
    let companies = state.store.list_companies().await?;
    Ok(Json(json!({ "companies": companies })))
}

/// GET /companies/{code}
///
/// Returns the full company row with its invoice ids and industry labels
/// attached. The order of either array is whatever the store returns.
pub async fn get_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> TallyResult<Json<Value>> {
    let company = state
        .store
        .get_company(&code)
        .await?
        .ok_or_else(|| TallyError::not_found("company", code.as_str()))?;

    let invoices = state.store.company_invoice_ids(&code).await?;
    let industries = state.store.company_industry_labels(&code).await?;

    let detail = CompanyDetail::new(company, invoices, industries);
    Ok(Json(json!({ "company": detail })))
}

/// POST /companies
///
/// The caller-supplied code is slugified before insertion, never used
/// verbatim.
pub async fn create_company(
    State(state): State<AppState>,
    Json(body): Json<CreateCompany>,
) -> TallyResult<(StatusCode, Json<Value>)> {
    let company = Company {
        code: Slugifier::slugify(&body.code),
        name: body.name,
        description: body.description,
    };
    let company = state.store.create_company(company).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// PUT /companies/{code}
pub async fn update_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<UpdateCompany>,
) -> TallyResult<Json<Value>> {
    let company = state
        .store
        .update_company(&code, body.name, body.description)
        .await?
        .ok_or_else(|| TallyError::not_found("company", code.as_str()))?;

    Ok(Json(json!({ "company": company })))
}

/// DELETE /companies/{code}
pub async fn delete_company(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> TallyResult<Json<Value>> {
    if !state.store.delete_company(&code).await? {
        return Err(TallyError::not_found("company", code.as_str()));
    }
    Ok(Json(json!({ "status": "Deleted" })))
}

/// POST /companies/{code}/industries
pub async fn attach_industry(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<AttachIndustry>,
) -> TallyResult<(StatusCode, Json<Value>)> {
    let link = state.store.attach_industry(&code, &body.industry_code).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company_industry": link }))))
}
