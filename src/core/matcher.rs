use crate::core::catalog::SchemeCatalog;
use crate::core::filters::{matches_fallback, matches_strict, FallbackRule};
use crate::models::{MatchPass, SchemeRecord, UserProfile};
use std::sync::Arc;

/// Default cap on returned schemes
pub const DEFAULT_MAX_RESULTS: usize = 3;

/// Result of the matching process
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<'a> {
    pub matches: Vec<&'a SchemeRecord>,
    pub pass: MatchPass,
    pub total_candidates: usize,
}

impl MatchResult<'_> {
    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Owned copies of the matched records, for responses
    pub fn to_records(&self) -> Vec<SchemeRecord> {
        self.matches.iter().map(|s| (*s).clone()).collect()
    }
}

/// Scheme matcher over an injected, read-only catalog
///
/// # Pipeline Stages
/// 1. Strict pass: every criterion the profile has a value for must hold
/// 2. Fallback pass, only if stage 1 is empty: identity-document rule
/// 3. Truncation in catalog order
#[derive(Debug, Clone)]
pub struct SchemeMatcher {
    catalog: Arc<SchemeCatalog>,
    fallback: FallbackRule,
    max_results: usize,
}

impl SchemeMatcher {
    pub fn new(catalog: Arc<SchemeCatalog>, fallback: FallbackRule, max_results: usize) -> Self {
        Self {
            catalog,
            fallback,
            max_results,
        }
    }

    pub fn with_defaults(catalog: Arc<SchemeCatalog>) -> Self {
        Self::new(catalog, FallbackRule::default(), DEFAULT_MAX_RESULTS)
    }

    pub fn catalog(&self) -> &SchemeCatalog {
        &self.catalog
    }

    pub fn fallback_rule(&self) -> &FallbackRule {
        &self.fallback
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Schemes passing the strict rule, in catalog order, untruncated
    pub fn strict_candidates<'a, 'p>(
        &'a self,
        profile: &'p UserProfile,
    ) -> impl Iterator<Item = &'a SchemeRecord> + 'p
    where
        'a: 'p,
    {
        self.catalog
            .iter()
            .filter(move |scheme| matches_strict(scheme, profile))
    }

    /// Schemes passing the identity-document rule, in catalog order, untruncated
    pub fn fallback_candidates<'a, 'p>(
        &'a self,
        profile: &'p UserProfile,
    ) -> impl Iterator<Item = &'a SchemeRecord> + 'p
    where
        'a: 'p,
    {
        self.catalog
            .iter()
            .filter(move |scheme| matches_fallback(scheme, profile, &self.fallback))
    }

    /// Find the schemes a profile is eligible for
    ///
    /// Never fails: schemes whose criteria cannot be evaluated are skipped,
    /// and an empty result is a valid outcome.
    pub fn match_profile(&self, profile: &UserProfile) -> MatchResult<'_> {
        let strict: Vec<&SchemeRecord> = self.strict_candidates(profile).collect();

        let (mut matches, pass) = if !strict.is_empty() {
            (strict, MatchPass::Strict)
        } else {
            let fallback: Vec<&SchemeRecord> = self.fallback_candidates(profile).collect();
            if fallback.is_empty() {
                (fallback, MatchPass::None)
            } else {
                (fallback, MatchPass::Fallback)
            }
        };

        let total_candidates = matches.len();
        matches.truncate(self.max_results);

        tracing::info!(
            "Matched {} schemes ({:?} pass, {} candidates) for profile with {} fields",
            matches.len(),
            pass,
            total_candidates,
            profile.len()
        );

        MatchResult {
            matches,
            pass,
            total_candidates,
        }
    }

    pub fn get_by_id(&self, id: &str) -> Option<&SchemeRecord> {
        self.catalog.get_by_id(id)
    }
}
