//! Faktura Database — SurrealDB connection management, schema
//! migrations, and repository implementations.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - Implementations of the `faktura-core` repository traits
//!
//! Uniqueness of organisation numbers, user emails, invoice numbers, and
//! membership pairs is enforced by UNIQUE indexes in the schema; the
//! repositories translate index violations raised at write time into the
//! matching business-rule errors.

mod connection;
mod error;
pub mod repository;
mod schema;
mod transaction;

pub use connection::{DbConfig, DbManager};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
