//! Persistence for the VetClinic backend
//!
//! One `sqlx::Any` pool ([`DbClient`]) is shared by a repository per entity.
//! Each repository is a trait plus an `Sql*` implementation so controllers
//! can be tested against other implementations.
//!
//! ```rust,no_run
//! use vetclinic_db::{schema, DbClient, SqlSpecialtyRepository};
//!
//! async fn setup() -> Result<SqlSpecialtyRepository, vetclinic_db::DbError> {
//!     let db = DbClient::from_url("sqlite://data/vetclinic.db").await?;
//!     schema::init_schema(&db).await?;
//!     Ok(SqlSpecialtyRepository::new(db))
//! }
//! ```

pub mod client;
pub mod error;
pub mod repositories;
pub mod schema;

pub use client::{DbBackend, DbClient};
pub use error::DbError;
pub use repositories::*;
