//! Database record structures matching table schemas.

pub mod categories;
pub mod reviews;
pub mod tools;
pub mod use_cases;
pub mod users;
