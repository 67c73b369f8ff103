//! API request/response models.
//!
//! These are the wire types: serde for JSON, utoipa for the OpenAPI document.
//! Database records from [`crate::db::models`] are converted into these before
//! leaving a handler.

pub mod auth;
pub mod categories;
pub mod pagination;
pub mod reviews;
pub mod tools;
pub mod use_cases;
pub mod users;
