//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's driven ports, backed by
//! PostgreSQL through `diesel-async` and a `bb8` pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Bounded operations**: every call runs under
//!   [`OPERATION_DEADLINE`](diesel_helpers::OPERATION_DEADLINE).
//! - **Strongly typed errors**: database errors are mapped onto port errors.
//!
//! # Example
//!
//! ```no_run
//! use backend::outbound::persistence::{DbPool, DieselPatientStore, PoolConfig};
//!
//! # async fn build() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/clinic")).await?;
//! let store = DieselPatientStore::new(pool);
//! # let _ = store;
//! # Ok(())
//! # }
//! ```

pub(crate) mod diesel_helpers;
mod diesel_patient_store;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_patient_store::DieselPatientStore;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DEFAULT_MAX_SIZE, DbPool, PoolConfig, PoolError};
