//! PostgreSQL store backed by sqlx
//!
//! Every statement is parameter-bound; constraint violations surface as
//! typed errors through the `From<sqlx::Error>` mapping, with the key
//! conflicts renamed at the call site so the client sees the resource it
//! collided on rather than a constraint name.

use crate::core::error::{TallyError, TallyResult};
use crate::core::service::Store;
use crate::entities::company::model::{Company, CompanyIndustry, CompanySummary};
use crate::entities::industry::model::{Industry, IndustryWithCompanies};
use crate::entities::invoice::model::{
    Invoice, InvoiceDetail, InvoiceSummary, next_paid_date,
};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

/// Store implementation backed by a PostgreSQL connection pool
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new `PostgresStore` with the given connection pool.
    ///
    /// Expects the schema from `migrations/` to be in place; the binary
    /// runs the embedded migrations before constructing the store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Rename a unique-violation conflict after the resource the caller was
/// inserting, keeping every other error untouched.
fn named_conflict(err: sqlx::Error, resource: &'static str, key: &str) -> TallyError {
    match TallyError::from(err) {
        TallyError::Conflict { .. } => TallyError::conflict(resource, key),
        other => other,
    }
}

/// Flat row for the invoice/company inner join
#[derive(sqlx::FromRow)]
struct InvoiceCompanyRow {
    id: i32,
    amt: f64,
    paid: bool,
    add_date: DateTime<Utc>,
    paid_date: Option<NaiveDate>,
    code: String,
    name: String,
    description: Option<String>,
}

impl From<InvoiceCompanyRow> for InvoiceDetail {
    fn from(row: InvoiceCompanyRow) -> Self {
        InvoiceDetail {
            id: row.id,
            amt: row.amt,
            paid: row.paid,
            add_date: row.add_date,
            paid_date: row.paid_date,
            company: Company {
                code: row.code,
                name: row.name,
                description: row.description,
            },
        }
    }
}

#[async_trait]
impl Store for PostgresStore {
    async fn list_companies(&self) -> TallyResult<Vec<CompanySummary>> {
        let companies = sqlx::query_as::<_, CompanySummary>("SELECT code, name FROM companies")
            .fetch_all(&self.pool)
            .await?;
        Ok(companies)
    }

    async fn get_company(&self, code: &str) -> TallyResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "SELECT code, name, description FROM companies WHERE code = $1",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn company_invoice_ids(&self, code: &str) -> TallyResult<Vec<i32>> {
        let ids = sqlx::query_scalar::<_, i32>("SELECT id FROM invoices WHERE comp_code = $1")
            .bind(code)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn company_industry_labels(&self, code: &str) -> TallyResult<Vec<String>> {
        let labels = sqlx::query_scalar::<_, String>(
            "SELECT i.industry FROM industries AS i \
             JOIN company_industries AS ci ON i.code = ci.industry_code \
             WHERE ci.comp_code = $1",
        )
        .bind(code)
        .fetch_all(&self.pool)
        .await?;
        Ok(labels)
    }

    async fn create_company(&self, company: Company) -> TallyResult<Company> {
        sqlx::query_as::<_, Company>(
            "INSERT INTO companies (code, name, description) VALUES ($1, $2, $3) \
             RETURNING code, name, description",
        )
        .bind(&company.code)
        .bind(&company.name)
        .bind(&company.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| named_conflict(e, "company", &company.code))
    }

    async fn update_company(
        &self,
        code: &str,
        name: String,
        description: Option<String>,
    ) -> TallyResult<Option<Company>> {
        let company = sqlx::query_as::<_, Company>(
            "UPDATE companies SET name = $1, description = $2 WHERE code = $3 \
             RETURNING code, name, description",
        )
        .bind(name)
        .bind(description)
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        Ok(company)
    }

    async fn delete_company(&self, code: &str) -> TallyResult<bool> {
        let result = sqlx::query("DELETE FROM companies WHERE code = $1")
            .bind(code)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn attach_industry(
        &self,
        comp_code: &str,
        industry_code: &str,
    ) -> TallyResult<CompanyIndustry> {
        sqlx::query_as::<_, CompanyIndustry>(
            "INSERT INTO company_industries (comp_code, industry_code) VALUES ($1, $2) \
             RETURNING comp_code, industry_code",
        )
        .bind(comp_code)
        .bind(industry_code)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            named_conflict(
                e,
                "company_industry",
                &format!("{comp_code}/{industry_code}"),
            )
        })
    }

    async fn list_industries(&self) -> TallyResult<Vec<IndustryWithCompanies>> {
        // ARRAY_REMOVE drops the NULL a LEFT JOIN leaves behind for an
        // industry with no associations, so its set aggregates to '{}'.
        let industries = sqlx::query_as::<_, IndustryWithCompanies>(
            "SELECT i.code, i.industry, \
                    ARRAY_REMOVE(ARRAY_AGG(ci.comp_code), NULL) AS companies \
             FROM industries AS i \
             LEFT JOIN company_industries AS ci ON i.code = ci.industry_code \
             GROUP BY i.code, i.industry",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(industries)
    }

    async fn create_industry(&self, industry: Industry) -> TallyResult<Industry> {
        sqlx::query_as::<_, Industry>(
            "INSERT INTO industries (code, industry) VALUES ($1, $2) \
             RETURNING code, industry",
        )
        .bind(&industry.code)
        .bind(&industry.industry)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| named_conflict(e, "industry", &industry.code))
    }

    async fn list_invoices(&self) -> TallyResult<Vec<InvoiceSummary>> {
        let invoices =
            sqlx::query_as::<_, InvoiceSummary>("SELECT id, comp_code FROM invoices")
                .fetch_all(&self.pool)
                .await?;
        Ok(invoices)
    }

    async fn get_invoice(&self, id: i32) -> TallyResult<Option<InvoiceDetail>> {
        let row = sqlx::query_as::<_, InvoiceCompanyRow>(
            "SELECT i.id, i.amt, i.paid, i.add_date, i.paid_date, \
                    c.code, c.name, c.description \
             FROM invoices AS i \
             JOIN companies AS c ON i.comp_code = c.code \
             WHERE i.id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(InvoiceDetail::from))
    }

    async fn create_invoice(&self, comp_code: &str, amt: f64) -> TallyResult<Invoice> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "INSERT INTO invoices (comp_code, amt) VALUES ($1, $2) \
             RETURNING id, comp_code, amt, paid, add_date, paid_date",
        )
        .bind(comp_code)
        .bind(amt)
        .fetch_one(&self.pool)
        .await?;
        Ok(invoice)
    }

    async fn settle_invoice(&self, id: i32, amt: f64, paid: bool) -> TallyResult<Option<Invoice>> {
        // Row-locked read-modify-write: two concurrent settlements of the
        // same invoice serialize instead of racing on paid_date.
        let mut tx = self.pool.begin().await?;

        let current: Option<(bool, Option<NaiveDate>)> =
            sqlx::query_as("SELECT paid, paid_date FROM invoices WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((currently_paid, current_paid_date)) = current else {
            return Ok(None);
        };

        let paid_date = next_paid_date(currently_paid, current_paid_date, paid);

        let invoice = sqlx::query_as::<_, Invoice>(
            "UPDATE invoices SET amt = $1, paid = $2, paid_date = $3 WHERE id = $4 \
             RETURNING id, comp_code, amt, paid, add_date, paid_date",
        )
        .bind(amt)
        .bind(paid)
        .bind(paid_date)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(Some(invoice))
    }

    async fn delete_invoice(&self, id: i32) -> TallyResult<bool> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
