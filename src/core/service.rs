//! Persistence gateway trait for the tally service
//!
//! Handlers never touch a connection pool directly: every query goes through
//! [`Store`], so the HTTP layer stays agnostic to the storage backend.
//!
//! Keyed mutations return `Option`/`bool` rather than erroring, leaving the
//! not-found decision (and its HTTP mapping) to the handler.

use crate::core::error::TallyResult;
use crate::entities::company::model::{Company, CompanyIndustry, CompanySummary};
use crate::entities::industry::model::{Industry, IndustryWithCompanies};
use crate::entities::invoice::model::{Invoice, InvoiceDetail, InvoiceSummary};
use async_trait::async_trait;

/// Storage service for companies, invoices, and industries
#[async_trait]
pub trait Store: Send + Sync {
    // === Companies ===

    /// List all companies projected to `{code, name}`
    async fn list_companies(&self) -> TallyResult<Vec<CompanySummary>>;

    /// Fetch a full company row by code
    async fn get_company(&self, code: &str) -> TallyResult<Option<Company>>;

    /// Ids of all invoices billed to a company
    async fn company_invoice_ids(&self, code: &str) -> TallyResult<Vec<i32>>;

    /// Labels of all industries associated with a company
    async fn company_industry_labels(&self, code: &str) -> TallyResult<Vec<String>>;

    /// Insert a company; fails with `Conflict` when the code is taken
    async fn create_company(&self, company: Company) -> TallyResult<Company>;

    /// Update name/description of the company matching `code`.
    /// Returns `None` when no row matched.
    async fn update_company(
        &self,
        code: &str,
        name: String,
        description: Option<String>,
    ) -> TallyResult<Option<Company>>;

    /// Delete a company by code, cascading to its invoices and
    /// industry associations. Returns `false` when no row matched.
    async fn delete_company(&self, code: &str) -> TallyResult<bool>;

    /// Record a company–industry association; fails with `Invalid` when
    /// either side is missing and `Conflict` when the pair already exists
    async fn attach_industry(
        &self,
        comp_code: &str,
        industry_code: &str,
    ) -> TallyResult<CompanyIndustry>;

    // === Industries ===

    /// List every industry with the (possibly empty) set of associated
    /// company codes, exactly one entry per industry
    async fn list_industries(&self) -> TallyResult<Vec<IndustryWithCompanies>>;

    /// Insert an industry; fails with `Conflict` when the code is taken
    async fn create_industry(&self, industry: Industry) -> TallyResult<Industry>;

    // === Invoices ===

    /// List all invoices projected to `{id, comp_code}`
    async fn list_invoices(&self) -> TallyResult<Vec<InvoiceSummary>>;

    /// Fetch an invoice joined with its owning company.
    /// Returns `None` when no invoice matched.
    async fn get_invoice(&self, id: i32) -> TallyResult<Option<InvoiceDetail>>;

    /// Insert an invoice with server-assigned id and add_date, unpaid;
    /// fails with `Invalid` when `comp_code` references no company
    async fn create_invoice(&self, comp_code: &str, amt: f64) -> TallyResult<Invoice>;

    /// Update amount and paid flag, applying the paid-date transition rule
    /// ([`next_paid_date`](crate::entities::invoice::model::next_paid_date))
    /// against the currently stored row. The read and write are a single
    /// atomic step per invoice. Returns `None` when no row matched.
    async fn settle_invoice(&self, id: i32, amt: f64, paid: bool) -> TallyResult<Option<Invoice>>;

    /// Delete an invoice by id. Returns `false` when no row matched.
    async fn delete_invoice(&self, id: i32) -> TallyResult<bool>;
}
