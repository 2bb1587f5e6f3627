//! In-memory implementation of the store for testing and development
//!
//! Mirrors the relational constraints the PostgreSQL backend gets for free:
//! primary-key uniqueness, foreign keys, pair uniqueness on associations,
//! the positive-amount check, and cascade deletes. Both backends must be
//! interchangeable from the handlers' point of view.

use crate::core::error::{TallyError, TallyResult};
use crate::core::service::Store;
use crate::entities::company::model::{Company, CompanyIndustry, CompanySummary};
use crate::entities::industry::model::{Industry, IndustryWithCompanies};
use crate::entities::invoice::model::{
    Invoice, InvoiceDetail, InvoiceSummary, next_paid_date,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Default)]
struct Tables {
    companies: BTreeMap<String, Company>,
    invoices: BTreeMap<i32, Invoice>,
    industries: BTreeMap<String, Industry>,
    /// (comp_code, industry_code) pairs; the set makes the pair unique
    associations: BTreeSet<(String, String)>,
    next_invoice_id: i32,
}

/// In-memory store implementation
///
/// Uses a single RwLock so each operation is atomic, including the
/// read-modify-write of [`Store::settle_invoice`].
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            tables: Arc::new(RwLock::new(Tables {
                next_invoice_id: 1,
                ..Tables::default()
            })),
        }
    }

    fn read(&self) -> TallyResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| TallyError::storage("state lock poisoned"))
    }

    fn write(&self) -> TallyResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| TallyError::storage("state lock poisoned"))
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Store for InMemoryStore {
    async fn list_companies(&self) -> TallyResult<Vec<CompanySummary>> {
        let tables = self.read()?;
        Ok(tables
            .companies
            .values()
            .map(|c| CompanySummary {
                code: c.code.clone(),
                name: c.name.clone(),
            })
            .collect())
    }

    async fn get_company(&self, code: &str) -> TallyResult<Option<Company>> {
        Ok(self.read()?.companies.get(code).cloned())
    }

    async fn company_invoice_ids(&self, code: &str) -> TallyResult<Vec<i32>> {
        let tables = self.read()?;
        Ok(tables
            .invoices
            .values()
            .filter(|inv| inv.comp_code == code)
            .map(|inv| inv.id)
            .collect())
    }

    async fn company_industry_labels(&self, code: &str) -> TallyResult<Vec<String>> {
        let tables = self.read()?;
        Ok(tables
            .associations
            .iter()
            .filter(|(comp, _)| comp == code)
            .filter_map(|(_, ind)| tables.industries.get(ind))
            .map(|ind| ind.industry.clone())
            .collect())
    }

    async fn create_company(&self, company: Company) -> TallyResult<Company> {
        let mut tables = self.write()?;
        if tables.companies.contains_key(&company.code) {
            return Err(TallyError::conflict("company", company.code));
        }
        if tables.companies.values().any(|c| c.name == company.name) {
            return Err(TallyError::conflict("company", company.name));
        }
        tables
            .companies
            .insert(company.code.clone(), company.clone());
        Ok(company)
    }

    async fn update_company(
        &self,
        code: &str,
        name: String,
        description: Option<String>,
    ) -> TallyResult<Option<Company>> {
        let mut tables = self.write()?;
        let Some(company) = tables.companies.get_mut(code) else {
            return Ok(None);
        };
        company.name = name;
        company.description = description;
        Ok(Some(company.clone()))
    }

    async fn delete_company(&self, code: &str) -> TallyResult<bool> {
        let mut tables = self.write()?;
        if tables.companies.remove(code).is_none() {
            return Ok(false);
        }
        // ON DELETE CASCADE
        tables.invoices.retain(|_, inv| inv.comp_code != code);
        tables.associations.retain(|(comp, _)| comp != code);
        Ok(true)
    }

    async fn attach_industry(
        &self,
        comp_code: &str,
        industry_code: &str,
    ) -> TallyResult<CompanyIndustry> {
        let mut tables = self.write()?;
        if !tables.companies.contains_key(comp_code) {
            return Err(TallyError::invalid(format!("no such company: {comp_code}")));
        }
        if !tables.industries.contains_key(industry_code) {
            return Err(TallyError::invalid(format!(
                "no such industry: {industry_code}"
            )));
        }
        let pair = (comp_code.to_string(), industry_code.to_string());
        if !tables.associations.insert(pair) {
            return Err(TallyError::conflict(
                "company_industry",
                format!("{comp_code}/{industry_code}"),
            ));
        }
        Ok(CompanyIndustry {
            comp_code: comp_code.to_string(),
            industry_code: industry_code.to_string(),
        })
    }

    async fn list_industries(&self) -> TallyResult<Vec<IndustryWithCompanies>> {
        let tables = self.read()?;
        Ok(tables
            .industries
            .values()
            .map(|ind| IndustryWithCompanies {
                code: ind.code.clone(),
                industry: ind.industry.clone(),
                companies: tables
                    .associations
                    .iter()
                    .filter(|(_, industry)| *industry == ind.code)
                    .map(|(comp, _)| comp.clone())
                    .collect(),
            })
            .collect())
    }

    async fn create_industry(&self, industry: Industry) -> TallyResult<Industry> {
        let mut tables = self.write()?;
        if tables.industries.contains_key(&industry.code) {
            return Err(TallyError::conflict("industry", industry.code));
        }
        tables
            .industries
            .insert(industry.code.clone(), industry.clone());
        Ok(industry)
    }

    async fn list_invoices(&self) -> TallyResult<Vec<InvoiceSummary>> {
        let tables = self.read()?;
        Ok(tables
            .invoices
            .values()
            .map(|inv| InvoiceSummary {
                id: inv.id,
                comp_code: inv.comp_code.clone(),
            })
            .collect())
    }

    async fn get_invoice(&self, id: i32) -> TallyResult<Option<InvoiceDetail>> {
        let tables = self.read()?;
        let Some(invoice) = tables.invoices.get(&id) else {
            return Ok(None);
        };
        let company = tables
            .companies
            .get(&invoice.comp_code)
            .cloned()
            .ok_or_else(|| TallyError::storage("invoice references a missing company"))?;
        Ok(Some(InvoiceDetail {
            id: invoice.id,
            amt: invoice.amt,
            paid: invoice.paid,
            add_date: invoice.add_date,
            paid_date: invoice.paid_date,
            company,
        }))
    }

    async fn create_invoice(&self, comp_code: &str, amt: f64) -> TallyResult<Invoice> {
        let mut tables = self.write()?;
        if !tables.companies.contains_key(comp_code) {
            return Err(TallyError::invalid(format!("no such company: {comp_code}")));
        }
        if amt <= 0.0 {
            return Err(TallyError::invalid("amt must be greater than zero"));
        }
        let id = tables.next_invoice_id;
        tables.next_invoice_id += 1;
        let invoice = Invoice {
            id,
            comp_code: comp_code.to_string(),
            amt,
            paid: false,
            add_date: Utc::now(),
            paid_date: None,
        };
        tables.invoices.insert(id, invoice.clone());
        Ok(invoice)
    }

    async fn settle_invoice(&self, id: i32, amt: f64, paid: bool) -> TallyResult<Option<Invoice>> {
        let mut tables = self.write()?;
        let Some(invoice) = tables.invoices.get_mut(&id) else {
            return Ok(None);
        };
        if amt <= 0.0 {
            return Err(TallyError::invalid("amt must be greater than zero"));
        }
        invoice.paid_date = next_paid_date(invoice.paid, invoice.paid_date, paid);
        invoice.paid = paid;
        invoice.amt = amt;
        Ok(Some(invoice.clone()))
    }

    async fn delete_invoice(&self, id: i32) -> TallyResult<bool> {
        Ok(self.write()?.invoices.remove(&id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn company(code: &str, name: &str) -> Company {
        Company {
            code: code.to_string(),
            name: name.to_string(),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_duplicate_company_code_conflicts() {
        let store = InMemoryStore::new();
        store.create_company(company("acme", "Acme")).await.unwrap();
        let err = store
            .create_company(company("acme", "Other"))
            .await
            .unwrap_err();
        assert!(matches!(err, TallyError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_invoice_requires_existing_company() {
        let store = InMemoryStore::new();
        let err = store.create_invoice("ghost", 100.0).await.unwrap_err();
        assert!(matches!(err, TallyError::Invalid { .. }));
    }

    #[tokio::test]
    async fn test_invoice_ids_are_sequential() {
        let store = InMemoryStore::new();
        store.create_company(company("acme", "Acme")).await.unwrap();
        let a = store.create_invoice("acme", 100.0).await.unwrap();
        let b = store.create_invoice("acme", 200.0).await.unwrap();
        assert_eq!(b.id, a.id + 1);
    }

    #[tokio::test]
    async fn test_settle_transitions_paid_date() {
        let store = InMemoryStore::new();
        store.create_company(company("acme", "Acme")).await.unwrap();
        let invoice = store.create_invoice("acme", 100.0).await.unwrap();

        let paid = store
            .settle_invoice(invoice.id, 100.0, true)
            .await
            .unwrap()
            .unwrap();
        assert!(paid.paid);
        assert_eq!(paid.paid_date, Some(Utc::now().date_naive()));

        let unpaid = store
            .settle_invoice(invoice.id, 100.0, false)
            .await
            .unwrap()
            .unwrap();
        assert!(!unpaid.paid);
        assert_eq!(unpaid.paid_date, None);
    }

    #[tokio::test]
    async fn test_delete_company_cascades() {
        let store = InMemoryStore::new();
        store.create_company(company("acme", "Acme")).await.unwrap();
        let invoice = store.create_invoice("acme", 100.0).await.unwrap();
        store
            .create_industry(Industry {
                code: "tech".to_string(),
                industry: "Technology".to_string(),
            })
            .await
            .unwrap();
        store.attach_industry("acme", "tech").await.unwrap();

        assert!(store.delete_company("acme").await.unwrap());
        assert!(store.get_invoice(invoice.id).await.unwrap().is_none());

        let industries = store.list_industries().await.unwrap();
        assert_eq!(industries[0].companies, Vec::<String>::new());
    }

    #[tokio::test]
    async fn test_attach_industry_rejects_duplicates() {
        let store = InMemoryStore::new();
        store.create_company(company("acme", "Acme")).await.unwrap();
        store
            .create_industry(Industry {
                code: "tech".to_string(),
                industry: "Technology".to_string(),
            })
            .await
            .unwrap();
        store.attach_industry("acme", "tech").await.unwrap();
        let err = store.attach_industry("acme", "tech").await.unwrap_err();
        assert!(matches!(err, TallyError::Conflict { .. }));
    }
}
