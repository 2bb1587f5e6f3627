//! Industry entity model

use serde::{Deserialize, Serialize};

/// An industry row as persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Industry {
    pub code: String,
    pub industry: String,
}

/// Industry list shape: each industry grouped with the codes of its
/// associated companies. An industry with no associations carries an empty
/// array.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct IndustryWithCompanies {
    pub code: String,
    pub industry: String,
    pub companies: Vec<String>,
}

/// Request body for creating an industry
///
/// The `code` field is a free-text label; it is slugified before insertion.
#[derive(Debug, Deserialize)]
pub struct CreateIndustry {
    pub code: String,
    pub industry: String,
}
