//! Route table for the tally service

use crate::core::error::TallyError;
use crate::entities::{company, industry, invoice};
use crate::server::AppState;
use axum::{
    Router,
    http::Uri,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Build the full application router
///
/// - GET/POST /companies, GET/PUT/DELETE /companies/{code}
/// - POST /companies/{code}/industries
/// - GET/POST /industries
/// - GET/POST /invoices, GET/PUT/DELETE /invoices/{id}
///
/// Unknown routes fall back to a JSON 404.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/companies",
            get(company::handlers::list_companies).post(company::handlers::create_company),
        )
        .route(
            "/companies/{code}",
            get(company::handlers::get_company)
                .put(company::handlers::update_company)
                .delete(company::handlers::delete_company),
        )
        .route(
            "/companies/{code}/industries",
            post(company::handlers::attach_industry),
        )
        .route(
            "/industries",
            get(industry::handlers::list_industries).post(industry::handlers::create_industry),
        )
        .route(
            "/invoices",
            get(invoice::handlers::list_invoices).post(invoice::handlers::create_invoice),
        )
        .route(
            "/invoices/{id}",
            get(invoice::handlers::get_invoice)
                .put(invoice::handlers::update_invoice)
                .delete(invoice::handlers::delete_invoice),
        )
        .fallback(unknown_route)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn unknown_route(uri: Uri) -> TallyError {
    TallyError::not_found("route", uri.path())
}
