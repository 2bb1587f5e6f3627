//! Store-contract tests for the PostgreSQL backend.
//!
//! These verify that `PostgresStore` observes the same contract the
//! in-memory backend does: constraint mapping, the paid-date transition,
//! aggregation shapes, and cascade deletes.
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a PostgreSQL container)
//! - Feature flag `pg-integration` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features pg-integration --test postgres_tests -- --test-threads=1
//! ```
//!
//! # Test isolation
//!
//! One PostgreSQL container serves the whole binary; every test opens a
//! fresh `PgPool` and truncates all four tables before running, and
//! `--test-threads=1` keeps the tests from interleaving on shared state.

#![cfg(feature = "pg-integration")]

use chrono::Utc;
use sqlx::PgPool;
use std::sync::OnceLock;
use tally::core::error::TallyError;
use tally::core::service::Store;
use tally::entities::company::model::Company;
use tally::entities::industry::model::Industry;
use tally::storage::PostgresStore;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

/// Shared container handle and connection URL.
///
/// Lives in a process-global `OnceLock` so the container outlives the
/// per-test tokio runtimes `#[tokio::test]` spins up. Pools cannot be
/// shared the same way (they die with their runtime), so each test opens
/// its own from the URL.
struct PgTestEnv {
    /// Dropping this stops the container; the static keeps it alive.
    _container: testcontainers::ContainerAsync<Postgres>,
    connection_url: String,
}

static TEST_ENV: OnceLock<PgTestEnv> = OnceLock::new();

async fn init_pg_env() -> &'static PgTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Postgres::default()
        .start()
        .await
        .expect("failed to start postgres container (is Docker running?)");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(5432).await.unwrap();
    let url = format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

    let pool = PgPool::connect(&url)
        .await
        .expect("failed to connect to postgres");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("failed to run migrations");

    // This pool belongs to the first test's runtime; close it before caching
    pool.close().await;

    let env = PgTestEnv {
        _container: container,
        connection_url: url,
    };
    let _ = TEST_ENV.set(env);
    TEST_ENV.get().unwrap()
}

/// Fresh store with truncated tables for one test
async fn fresh_store() -> PostgresStore {
    let env = init_pg_env().await;
    let pool = PgPool::connect(&env.connection_url).await.unwrap();
    sqlx::query("TRUNCATE companies, invoices, industries, company_industries CASCADE")
        .execute(&pool)
        .await
        .unwrap();
    PostgresStore::new(pool)
}

fn company(code: &str, name: &str) -> Company {
    Company {
        code: code.to_string(),
        name: name.to_string(),
        description: Some("seeded".to_string()),
    }
}

#[tokio::test]
async fn test_company_crud_round_trip() {
    let store = fresh_store().await;

    let created = store.create_company(company("acme", "Acme")).await.unwrap();
    assert_eq!(created.code, "acme");

    let fetched = store.get_company("acme").await.unwrap().unwrap();
    assert_eq!(fetched, created);

    let updated = store
        .update_company("acme", "Acme 2.0".to_string(), None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.name, "Acme 2.0");
    assert_eq!(updated.description, None);

    assert!(store.delete_company("acme").await.unwrap());
    assert!(!store.delete_company("acme").await.unwrap());
    assert!(store.get_company("acme").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_company_code_maps_to_conflict() {
    let store = fresh_store().await;
    store.create_company(company("acme", "Acme")).await.unwrap();

    let err = store
        .create_company(company("acme", "Other"))
        .await
        .unwrap_err();
    match err {
        TallyError::Conflict { resource, key } => {
            assert_eq!(resource, "company");
            assert_eq!(key, "acme");
        }
        other => panic!("expected Conflict, got {other:?}"),
    }
}

#[tokio::test]
async fn test_foreign_key_violation_maps_to_invalid() {
    let store = fresh_store().await;
    let err = store.create_invoice("ghost", 100.0).await.unwrap_err();
    assert!(matches!(err, TallyError::Invalid { .. }));
}

#[tokio::test]
async fn test_check_violation_maps_to_invalid() {
    let store = fresh_store().await;
    store.create_company(company("acme", "Acme")).await.unwrap();
    let err = store.create_invoice("acme", -5.0).await.unwrap_err();
    assert!(matches!(err, TallyError::Invalid { .. }));
}

#[tokio::test]
async fn test_invoice_defaults_and_detail_join() {
    let store = fresh_store().await;
    store.create_company(company("acme", "Acme")).await.unwrap();

    let invoice = store.create_invoice("acme", 100.0).await.unwrap();
    assert!(!invoice.paid);
    assert_eq!(invoice.paid_date, None);

    let detail = store.get_invoice(invoice.id).await.unwrap().unwrap();
    assert_eq!(detail.id, invoice.id);
    assert_eq!(detail.company.code, "acme");
    assert_eq!(detail.company.name, "Acme");

    assert!(store.get_invoice(invoice.id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_settle_invoice_transitions_paid_date() {
    let store = fresh_store().await;
    store.create_company(company("acme", "Acme")).await.unwrap();
    let invoice = store.create_invoice("acme", 100.0).await.unwrap();
    let today = Utc::now().date_naive();

    let paid = store
        .settle_invoice(invoice.id, 10.0, true)
        .await
        .unwrap()
        .unwrap();
    assert!(paid.paid);
    assert_eq!(paid.paid_date, Some(today));

    let still_paid = store
        .settle_invoice(invoice.id, 20.0, true)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(still_paid.paid_date, Some(today));
    assert_eq!(still_paid.amt, 20.0);

    let unpaid = store
        .settle_invoice(invoice.id, 20.0, false)
        .await
        .unwrap()
        .unwrap();
    assert!(!unpaid.paid);
    assert_eq!(unpaid.paid_date, None);

    assert!(store.settle_invoice(9999, 10.0, true).await.unwrap().is_none());
}

#[tokio::test]
async fn test_list_industries_aggregates_empty_sets() {
    let store = fresh_store().await;
    store.create_company(company("acme", "Acme")).await.unwrap();
    store
        .create_industry(Industry {
            code: "tech".to_string(),
            industry: "Technology".to_string(),
        })
        .await
        .unwrap();
    store
        .create_industry(Industry {
            code: "mining".to_string(),
            industry: "Mining".to_string(),
        })
        .await
        .unwrap();
    store.attach_industry("acme", "tech").await.unwrap();

    let mut industries = store.list_industries().await.unwrap();
    industries.sort_by(|a, b| a.code.cmp(&b.code));
    assert_eq!(industries.len(), 2);
    assert_eq!(industries[0].code, "mining");
    assert_eq!(industries[0].companies, Vec::<String>::new());
    assert_eq!(industries[1].code, "tech");
    assert_eq!(industries[1].companies, vec!["acme".to_string()]);
}

#[tokio::test]
async fn test_delete_company_cascades() {
    let store = fresh_store().await;
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
    assert!(
        store
            .company_industry_labels("acme")
            .await
            .unwrap()
            .is_empty()
    );
}
