//! Invoice entity model and the paid-date transition rule

use crate::entities::company::model::Company;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// An invoice row as persisted
///
/// Invariant: `paid_date` is non-null exactly when `paid` is true. The
/// invariant is maintained by funneling every update through
/// [`next_paid_date`]; nothing else writes `paid` or `paid_date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invoice {
    pub id: i32,
    pub comp_code: String,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<NaiveDate>,
}

/// Projection used by the invoice list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvoiceSummary {
    pub id: i32,
    pub comp_code: String,
}

/// Single-invoice read shape: the owning company nested as a sub-object
#[derive(Debug, Serialize)]
pub struct InvoiceDetail {
    pub id: i32,
    pub amt: f64,
    pub paid: bool,
    pub add_date: DateTime<Utc>,
    pub paid_date: Option<NaiveDate>,
    pub company: Company,
}

/// Request body for creating an invoice
#[derive(Debug, Deserialize)]
pub struct CreateInvoice {
    pub comp_code: String,
    pub amt: f64,
}

/// Request body for updating an invoice
#[derive(Debug, Deserialize)]
pub struct SettleInvoice {
    pub amt: f64,
    pub paid: bool,
}

/// Compute the `paid_date` an invoice update must write.
///
/// - unpaid → paid: stamp today's date (UTC)
/// - paid → unpaid: clear the date
/// - no transition: keep the stored date as-is
///
/// Both storage backends route every invoice update through this function,
/// which is what keeps the `paid ⇔ paid_date` invariant intact.
pub fn next_paid_date(
    currently_paid: bool,
    current_paid_date: Option<NaiveDate>,
    pay: bool,
) -> Option<NaiveDate> {
    match (currently_paid, pay) {
        (false, true) => Some(Utc::now().date_naive()),
        (true, false) => None,
        _ => current_paid_date,
    }
}
