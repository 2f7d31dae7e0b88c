//! Maitri AI - Voice scheme advisor backend
//!
//! This library provides the scheme matching engine used by the Maitri AI
//! voice assistant, along with the collaborators the voice pipeline calls:
//! transcription, intent classification, reply generation and speech synthesis.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{CatalogError, FallbackRule, MatchResult, SchemeCatalog, SchemeMatcher};
pub use crate::models::{Constraint, Intent, IntentKind, MatchPass, ProfileValue, SchemeRecord, UserProfile};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let catalog = SchemeCatalog::builtin().unwrap();
        assert_eq!(catalog.len(), 5);
    }
}
