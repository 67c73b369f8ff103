//! Repository implementations for database access.
//!
//! Each repository:
//! - Wraps a SQLx connection or transaction
//! - Provides strongly-typed catalog operations
//! - Handles query construction and parameter binding
//! - Returns domain models from [`crate::db::models`]
//!
//! # Available Repositories
//!
//! - [`Tools`]: catalog tools, filtered listings, keyset pagination
//! - [`Categories`] / [`UseCases`]: taxonomy entries and their tools
//! - [`Reviews`]: tool reviews joined with reviewer profiles
//! - [`Users`]: account management and credential lookup
//!
//! All repositories follow this usage pattern:
//!
//! ```ignore
//! use aidex::db::handlers::{Tools, Repository};
//!
//! async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Tools::new(&mut tx);
//!     let tools = repo.list(&filter).await?;
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod categories;
pub mod repository;
pub mod reviews;
pub mod tools;
pub mod use_cases;
pub mod users;

pub use categories::Categories;
pub use repository::Repository;
pub use reviews::Reviews;
pub use tools::Tools;
pub use use_cases::UseCases;
pub use users::Users;
