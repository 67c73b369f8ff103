//! Common type definitions shared across the API and database layers.
//!
//! All entity IDs are UUIDs wrapped in type aliases:
//!
//! - [`UserId`]: account identifier
//! - [`ToolId`]: catalog tool identifier
//! - [`CategoryId`] / [`UseCaseId`]: taxonomy identifiers
//! - [`ReviewId`]: review identifier
//!
//! [`Operation`] names the action behind a permission failure so 403 responses
//! can say what was attempted.

use std::fmt;
use uuid::Uuid;

// Type aliases for IDs
pub type UserId = Uuid;
pub type ToolId = Uuid;
pub type CategoryId = Uuid;
pub type UseCaseId = Uuid;
pub type ReviewId = Uuid;

/// Abbreviate a UUID to its first 8 characters for more readable logs and traces
/// Example: "550e8400-e29b-41d4-a716-446655440000" -> "550e8400"
pub fn abbrev_uuid(uuid: &Uuid) -> String {
    uuid.to_string().chars().take(8).collect()
}

// Actions that can be attempted on catalog resources. Catalog entities have no
// update or delete surface; the variants exist for error reporting on the
// operations that do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Read,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Create => write!(f, "create"),
            Operation::Read => write!(f, "read"),
        }
    }
}
