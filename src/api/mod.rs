//! HTTP API layer.
//!
//! `handlers` holds the axum handler functions, `models` the request and
//! response types they exchange with clients. Database types never cross this
//! boundary; handlers convert them to `*Response` models before serializing.

pub mod handlers;
pub mod models;
