//! Storage backends implementing the [`Store`](crate::core::service::Store) trait

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryStore;
pub use postgres::PostgresStore;
