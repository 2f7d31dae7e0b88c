// Core algorithm exports
pub mod catalog;
pub mod filters;
pub mod matcher;

pub use catalog::{CatalogError, SchemeCatalog};
pub use filters::{evaluate_constraint, matches_fallback, matches_strict, satisfies_criteria, CriterionError, FallbackRule};
pub use matcher::{MatchResult, SchemeMatcher, DEFAULT_MAX_RESULTS};
