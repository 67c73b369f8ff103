//! Axum handlers, one module per resource.

pub mod auth;
pub mod categories;
pub mod tools;
pub mod use_cases;

/// Slugs are lowercase ASCII letters, digits and hyphens only.
pub(crate) fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty() && slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}
