use crate::models::{Constraint, ProfileValue, SchemeRecord, UserProfile, ValueKind};
use thiserror::Error;

/// A criterion that cannot be evaluated against the supplied profile value
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CriterionError {
    #[error("field '{field}': expected {expected}, got {actual}")]
    TypeMismatch {
        field: String,
        expected: ValueKind,
        actual: ValueKind,
    },
}

/// Evaluate one constraint against one profile value
///
/// A `OneOf` set only reports a mismatch when none of its members share
/// the value's kind; mixed sets are evaluated member by member.
pub fn evaluate_constraint(
    field: &str,
    constraint: &Constraint,
    value: &ProfileValue,
) -> Result<bool, CriterionError> {
    let mismatch = |expected: ValueKind| CriterionError::TypeMismatch {
        field: field.to_string(),
        expected,
        actual: value.kind(),
    };

    match constraint {
        Constraint::Flag(required) => match value {
            ProfileValue::Bool(actual) => Ok(actual == required),
            _ => Err(mismatch(ValueKind::Bool)),
        },
        Constraint::Exact(required) => value
            .same_as(required)
            .ok_or_else(|| mismatch(required.kind())),
        Constraint::OneOf(permitted) => {
            let mut comparable = false;
            for candidate in permitted {
                match value.same_as(candidate) {
                    Some(true) => return Ok(true),
                    Some(false) => comparable = true,
                    None => {}
                }
            }
            match permitted.first() {
                Some(first) if !comparable => Err(mismatch(first.kind())),
                _ => Ok(false),
            }
        }
    }
}

/// Check every criterion whose field appears in the profile
///
/// Criteria whose field is absent from the profile are skipped. A field
/// present with an unknown (null) value fails its criterion.
pub fn satisfies_criteria(
    scheme: &SchemeRecord,
    profile: &UserProfile,
) -> Result<bool, CriterionError> {
    for (field, constraint) in &scheme.eligibility_criteria {
        match profile.lookup(field) {
            None => {}
            Some(None) => return Ok(false),
            Some(Some(value)) => {
                if !evaluate_constraint(field, constraint, value)? {
                    return Ok(false);
                }
            }
        }
    }
    Ok(true)
}

/// Strict pass predicate
///
/// A criterion that fails to evaluate excludes this scheme only.
#[inline]
pub fn matches_strict(scheme: &SchemeRecord, profile: &UserProfile) -> bool {
    match satisfies_criteria(scheme, profile) {
        Ok(matched) => matched,
        Err(e) => {
            tracing::warn!("Skipping scheme {}: {}", scheme.id, e);
            false
        }
    }
}

/// Identity-document rule applied when the strict pass finds nothing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackRule {
    /// Boolean profile field asserting possession of the identity document
    pub identity_field: String,
    /// Document labels that count as the identity document
    pub identity_documents: Vec<String>,
}

impl FallbackRule {
    pub fn new(identity_field: impl Into<String>, identity_documents: Vec<String>) -> Self {
        Self {
            identity_field: identity_field.into(),
            identity_documents,
        }
    }

    /// Aadhaar rule used by the reference catalog
    pub fn aadhaar() -> Self {
        Self::new("has_aadhaar", vec!["Aadhaar Card".to_string()])
    }
}

impl Default for FallbackRule {
    fn default() -> Self {
        Self::aadhaar()
    }
}

/// Fallback pass predicate
#[inline]
pub fn matches_fallback(scheme: &SchemeRecord, profile: &UserProfile, rule: &FallbackRule) -> bool {
    profile.asserts(&rule.identity_field)
        && rule
            .identity_documents
            .iter()
            .any(|document| scheme.requires_document(document))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn create_scheme(criteria: Vec<(&str, Constraint)>, documents: &[&str]) -> SchemeRecord {
        SchemeRecord {
            id: "test_scheme".to_string(),
            title: "Test Scheme".to_string(),
            description: "A scheme for tests".to_string(),
            eligibility: None,
            eligibility_criteria: criteria
                .into_iter()
                .map(|(k, c)| (k.to_string(), c))
                .collect::<BTreeMap<_, _>>(),
            documents: documents.iter().map(|d| d.to_string()).collect(),
            steps: vec![],
            benefits: String::new(),
        }
    }

    #[test]
    fn test_flag_constraint() {
        let flag = Constraint::Flag(false);
        assert_eq!(evaluate_constraint("f", &flag, &false.into()), Ok(true));
        assert_eq!(evaluate_constraint("f", &flag, &true.into()), Ok(false));
        assert!(evaluate_constraint("f", &flag, &"no".into()).is_err());
    }

    #[test]
    fn test_one_of_membership() {
        let set = Constraint::OneOf(vec!["bpl".into(), "low".into()]);
        assert_eq!(evaluate_constraint("income", &set, &"low".into()), Ok(true));
        assert_eq!(evaluate_constraint("income", &set, &"high".into()), Ok(false));
    }

    #[test]
    fn test_one_of_type_mismatch() {
        let set = Constraint::OneOf(vec![0i64.into()]);
        let err = evaluate_constraint("children_count", &set, &"zero".into()).unwrap_err();
        assert_eq!(
            err,
            CriterionError::TypeMismatch {
                field: "children_count".to_string(),
                expected: ValueKind::Number,
                actual: ValueKind::Text,
            }
        );
    }

    #[test]
    fn test_mixed_set_is_evaluated_per_member() {
        let set = Constraint::OneOf(vec!["small".into(), 2i64.into()]);
        assert_eq!(evaluate_constraint("land", &set, &2i64.into()), Ok(true));
        assert_eq!(evaluate_constraint("land", &set, &"large".into()), Ok(false));
    }

    #[test]
    fn test_empty_set_never_matches() {
        let set = Constraint::OneOf(vec![]);
        assert_eq!(evaluate_constraint("any", &set, &true.into()), Ok(false));
    }

    #[test]
    fn test_exact_scalar() {
        let exact = Constraint::Exact("married".into());
        assert_eq!(evaluate_constraint("status", &exact, &"married".into()), Ok(true));
        assert_eq!(evaluate_constraint("status", &exact, &"single".into()), Ok(false));
        assert!(evaluate_constraint("status", &exact, &1i64.into()).is_err());
    }

    #[test]
    fn test_absent_field_does_not_disqualify() {
        let scheme = create_scheme(vec![("is_farmer", Constraint::Flag(true))], &[]);
        assert!(matches_strict(&scheme, &UserProfile::new()));
    }

    #[test]
    fn test_unknown_field_fails_its_criterion() {
        let flag = create_scheme(vec![("is_pregnant", Constraint::Flag(false))], &[]);
        let set = create_scheme(vec![("income_level", Constraint::OneOf(vec!["bpl".into()]))], &[]);
        let unrelated = create_scheme(vec![("is_farmer", Constraint::Flag(true))], &[]);

        let profile: UserProfile =
            serde_json::from_str(r#"{"is_pregnant": null, "income_level": null}"#).unwrap();

        assert_eq!(satisfies_criteria(&flag, &profile), Ok(false));
        assert_eq!(satisfies_criteria(&set, &profile), Ok(false));
        assert!(matches_strict(&unrelated, &profile));
    }

    #[test]
    fn test_malformed_criterion_excludes_scheme() {
        let scheme = create_scheme(vec![("is_farmer", Constraint::Flag(true))], &[]);
        let profile = UserProfile::new().with("is_farmer", "yes");
        assert!(satisfies_criteria(&scheme, &profile).is_err());
        assert!(!matches_strict(&scheme, &profile));
    }

    #[test]
    fn test_fallback_requires_assertion_and_document() {
        let rule = FallbackRule::aadhaar();
        let with_aadhaar = create_scheme(vec![], &["Aadhaar Card", "Land Records"]);
        let without = create_scheme(vec![], &["Address Proof"]);

        let holder = UserProfile::new().with("has_aadhaar", true);
        let denier = UserProfile::new().with("has_aadhaar", false);

        assert!(matches_fallback(&with_aadhaar, &holder, &rule));
        assert!(!matches_fallback(&without, &holder, &rule));
        assert!(!matches_fallback(&with_aadhaar, &denier, &rule));
        assert!(!matches_fallback(&with_aadhaar, &UserProfile::new(), &rule));
    }

    #[test]
    fn test_fallback_accepts_any_configured_document() {
        let rule = FallbackRule::new(
            "has_identity",
            vec!["Aadhaar Card".to_string(), "Voter ID".to_string()],
        );
        let scheme = create_scheme(vec![], &["Voter ID"]);
        let profile = UserProfile::new().with("has_identity", true);
        assert!(matches_fallback(&scheme, &profile, &rule));
    }
}
