//! PostgreSQL persistence for user accounts.
//!
//! - **Thin adapters**: `DieselUserRepository` translates between Diesel rows
//!   and domain types and holds no business rules.
//! - **Internal models**: row structs (`models.rs`) and the table definition
//!   (`schema.rs`) never leave this module.
//! - **Async pooling**: connections come from a `bb8` pool through
//!   `diesel-async`.
//!
//! # Example
//!
//! ```ignore
//! use virusdecode::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/virusdecode")).await?;
//! let repo = DieselUserRepository::new(pool);
//! ```

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
