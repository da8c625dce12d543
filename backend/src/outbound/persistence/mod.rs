//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`.
//!
//! ```ignore
//! use homestock::outbound::persistence::{DbPool, DieselStockRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/homestock")).await?;
//! let repo = DieselStockRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_stock_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_stock_repository::DieselStockRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
