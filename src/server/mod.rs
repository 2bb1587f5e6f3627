//! HTTP server wiring: shared state and the route table

pub mod router;

use crate::core::service::Store;
use std::sync::Arc;

pub use router::build_router;

/// Application state shared across handlers
///
/// Handlers are stateless functions; the only thing they share is the
/// injected persistence handle.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
}
