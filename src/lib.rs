//! # Tally
//!
//! A small HTTP service tracking companies, the invoices billed to them, and
//! the industries they belong to.
//!
//! ## Architecture
//!
//! - **Entity handlers** (`entities`): stateless axum handlers per resource
//!   (companies, invoices, industries), each reshaping store rows into the
//!   wire format
//! - **Store trait** (`core::service`): async persistence gateway with two
//!   backends: PostgreSQL via sqlx for production, in-memory for tests and
//!   dependency-free runs
//! - **Typed errors** (`core::error`): one tagged error enum mapped to HTTP
//!   status codes at a single `IntoResponse` boundary
//! - **Slug keys** (`core::slug`): company and industry codes are normalized
//!   from free-text labels before they ever reach the database
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tally::prelude::*;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let app = build_router(AppState { store });
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod core;
pub mod entities;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ErrorResponse, TallyError, TallyResult},
        service::Store,
        slug::Slugifier,
    };

    // === Entities ===
    pub use crate::entities::{
        company::model::{Company, CompanyDetail, CompanyIndustry, CompanySummary},
        industry::model::{Industry, IndustryWithCompanies},
        invoice::model::{Invoice, InvoiceDetail, InvoiceSummary},
    };

    // === Server ===
    pub use crate::server::{AppState, build_router};

    // === Storage ===
    pub use crate::storage::{InMemoryStore, PostgresStore};

    // === Config ===
    pub use crate::config::{Config, StorageBackend};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, NaiveDate, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use std::sync::Arc;
}
