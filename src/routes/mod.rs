// ABOUTME: Route module organization for the workout diary HTTP API
// ABOUTME: Groups auth, generic document, catalog, exercise, record, user, and health routes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Route module for the Workout Diary Server
//!
//! Every collection under `/api/v1/<entity>` gets the generic routes from
//! [`documents`]; entity modules add their own endpoints on top.

/// Sign-in, sign-up, and logout
pub mod auth;
/// Roles, muscle groups, exercise types, and difficulties
pub mod catalog;
/// Generic base, named, and record controllers
pub mod documents;
/// Exercise catalog search and creation
pub mod exercises;
/// Health check and readiness routes
pub mod health;
/// Exercise and physique records
pub mod records;
/// User accounts
pub mod users;

pub use auth::AuthRoutes;
pub use catalog::CatalogRoutes;
pub use documents::{DocumentRoutes, DocumentRules};
pub use exercises::ExerciseRoutes;
pub use health::HealthRoutes;
pub use records::RecordRoutes;
pub use users::UserRoutes;

use workout_diary_core::constants::paths;

/// Split a comma separated query value, dropping blanks
#[must_use]
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Render ids or names the way response messages list them: `[a, b]`
#[must_use]
pub fn format_list(items: &[String]) -> String {
    format!("[{}]", items.join(", "))
}

/// `/api/v1/<entity>`
#[must_use]
pub fn api_path(entity: &str) -> String {
    format!("{}/{entity}", paths::API_V1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_list() {
        assert_eq!(split_list("a, b,,c "), vec!["a", "b", "c"]);
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn test_format_list() {
        assert_eq!(format_list(&["x".to_owned(), "y".to_owned()]), "[x, y]");
        assert_eq!(api_path("exercise"), "/api/v1/exercise");
    }
}
