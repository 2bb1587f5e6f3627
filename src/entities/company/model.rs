//! Company entity model

use serde::{Deserialize, Serialize};

/// A company row as persisted
///
/// `code` is a slug primary key, immutable after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Company {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

/// Projection used by the company list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompanySummary {
    pub code: String,
    pub name: String,
}

/// Single-company read shape: the full row plus the ids of its invoices and
/// the labels of its industries
#[derive(Debug, Serialize)]
pub struct CompanyDetail {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub invoices: Vec<i32>,
    pub industries: Vec<String>,
}

impl CompanyDetail {
    pub fn new(company: Company, invoices: Vec<i32>, industries: Vec<String>) -> Self {
        Self {
            code: company.code,
            name: company.name,
            description: company.description,
            invoices,
            industries,
        }
    }
}

/// A company–industry association row
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct CompanyIndustry {
    pub comp_code: String,
    pub industry_code: String,
}

/// Request body for creating a company
///
/// The `code` field is a free-text label; it is slugified before insertion.
#[derive(Debug, Deserialize)]
pub struct CreateCompany {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for updating a company
#[derive(Debug, Deserialize)]
pub struct UpdateCompany {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Request body for associating an industry with a company
#[derive(Debug, Deserialize)]
pub struct AttachIndustry {
    pub industry_code: String,
}
