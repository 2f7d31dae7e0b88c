use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar value carried by a user profile field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProfileValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

/// Shape of a profile value, used when reporting mismatches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Bool,
    Number,
    Text,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Bool => write!(f, "boolean"),
            ValueKind::Number => write!(f, "number"),
            ValueKind::Text => write!(f, "string"),
        }
    }
}

impl ProfileValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            ProfileValue::Bool(_) => ValueKind::Bool,
            ProfileValue::Number(_) => ValueKind::Number,
            ProfileValue::Text(_) => ValueKind::Text,
        }
    }

    /// Compare two values of the same kind.
    ///
    /// Numbers compare by numeric value, so `0` and `0.0` are equal.
    /// Returns `None` when the kinds differ.
    pub fn same_as(&self, other: &ProfileValue) -> Option<bool> {
        match (self, other) {
            (ProfileValue::Bool(a), ProfileValue::Bool(b)) => Some(a == b),
            (ProfileValue::Text(a), ProfileValue::Text(b)) => Some(a == b),
            (ProfileValue::Number(a), ProfileValue::Number(b)) => Some(numbers_equal(a, b)),
            _ => None,
        }
    }
}

/// Numeric equality that never rounds an integer through `f64`
fn numbers_equal(a: &serde_json::Number, b: &serde_json::Number) -> bool {
    match (integer_value(a), integer_value(b)) {
        (Some(x), Some(y)) => x == y,
        (Some(x), None) => float_equals_integer(b, x),
        (None, Some(y)) => float_equals_integer(a, y),
        (None, None) => a.as_f64() == b.as_f64(),
    }
}

fn integer_value(n: &serde_json::Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn float_equals_integer(float: &serde_json::Number, integer: i128) -> bool {
    match float.as_f64() {
        // Whole floats below 1e38 fit in i128
        Some(f) if f.fract() == 0.0 && f.abs() < 1.0e38 => f as i128 == integer,
        _ => false,
    }
}

impl From<bool> for ProfileValue {
    fn from(value: bool) -> Self {
        ProfileValue::Bool(value)
    }
}

impl From<&str> for ProfileValue {
    fn from(value: &str) -> Self {
        ProfileValue::Text(value.to_string())
    }
}

impl From<String> for ProfileValue {
    fn from(value: String) -> Self {
        ProfileValue::Text(value)
    }
}

impl From<i64> for ProfileValue {
    fn from(value: i64) -> Self {
        ProfileValue::Number(value.into())
    }
}

/// Eligibility constraint on a single profile field
///
/// The variant is fixed when the catalog is loaded: JSON booleans become
/// `Flag`, arrays become `OneOf`, any other scalar becomes `Exact`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Constraint {
    Flag(bool),
    OneOf(Vec<ProfileValue>),
    Exact(ProfileValue),
}

/// Government scheme catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eligibility: Option<String>,
    #[serde(default)]
    pub eligibility_criteria: BTreeMap<String, Constraint>,
    #[serde(default)]
    pub documents: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub benefits: String,
}

impl SchemeRecord {
    pub fn requires_document(&self, document: &str) -> bool {
        self.documents.iter().any(|d| d == document)
    }
}

/// Per-request user attributes keyed by criterion field name
///
/// A field missing from the profile never disqualifies a scheme. A field
/// present with a `null` value is kept as unknown and fails any criterion
/// on that field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserProfile {
    fields: BTreeMap<String, Option<ProfileValue>>,
}

impl UserProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<ProfileValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Mark a field as present but unknown
    pub fn with_unknown(mut self, field: impl Into<String>) -> Self {
        self.fields.insert(field.into(), None);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<ProfileValue>) {
        self.fields.insert(field.into(), Some(value.into()));
    }

    /// Known value of a field
    pub fn get(&self, field: &str) -> Option<&ProfileValue> {
        self.fields.get(field).and_then(Option::as_ref)
    }

    /// `None` if the field is missing, `Some(None)` if it is present but null
    pub fn lookup(&self, field: &str) -> Option<Option<&ProfileValue>> {
        self.fields.get(field).map(Option::as_ref)
    }

    /// True only when the field is present and set to boolean `true`
    pub fn asserts(&self, field: &str) -> bool {
        matches!(self.get(field), Some(ProfileValue::Bool(true)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Fields with known values
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ProfileValue)> {
        self.fields
            .iter()
            .filter_map(|(field, value)| value.as_ref().map(|v| (field, v)))
    }
}

impl<K, V> FromIterator<(K, V)> for UserProfile
where
    K: Into<String>,
    V: Into<ProfileValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        }
    }
}

/// Kind of request the user made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntentKind {
    SchemeInfo,
    EligibilityCheck,
    ApplicationProcess,
    DocumentRequirements,
    GeneralInquiry,
    Other,
    Error,
}

impl IntentKind {
    /// Lenient parse for labels produced by a language model
    pub fn parse(label: &str) -> Self {
        match label.trim().to_lowercase().as_str() {
            "scheme_info" => IntentKind::SchemeInfo,
            "eligibility_check" => IntentKind::EligibilityCheck,
            "application_process" => IntentKind::ApplicationProcess,
            "document_requirements" => IntentKind::DocumentRequirements,
            "general_inquiry" => IntentKind::GeneralInquiry,
            "error" => IntentKind::Error,
            _ => IntentKind::Other,
        }
    }
}

/// Classified user request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    pub intent: IntentKind,
    #[serde(default)]
    pub scheme: Option<String>,
    #[serde(default)]
    pub user_profile: UserProfile,
}

impl Intent {
    /// Intent used when classification fails
    pub fn error() -> Self {
        Self {
            intent: IntentKind::Error,
            scheme: None,
            user_profile: UserProfile::default(),
        }
    }
}

/// Which matching pass produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPass {
    Strict,
    Fallback,
    None,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraint_variants_from_json() {
        let flag: Constraint = serde_json::from_str("false").unwrap();
        assert_eq!(flag, Constraint::Flag(false));

        let set: Constraint = serde_json::from_str(r#"["bpl", "low"]"#).unwrap();
        assert_eq!(set, Constraint::OneOf(vec!["bpl".into(), "low".into()]));

        let exact: Constraint = serde_json::from_str("2").unwrap();
        assert_eq!(exact, Constraint::Exact(2i64.into()));
    }

    #[test]
    fn test_constraint_rejects_null_and_objects() {
        assert!(serde_json::from_str::<Constraint>("null").is_err());
        assert!(serde_json::from_str::<Constraint>(r#"{"a": 1}"#).is_err());
    }

    #[test]
    fn test_profile_keeps_null_fields_as_unknown() {
        let profile: UserProfile =
            serde_json::from_str(r#"{"has_aadhaar": true, "income_level": null}"#).unwrap();
        assert_eq!(profile.len(), 2);
        assert!(profile.asserts("has_aadhaar"));
        assert!(profile.get("income_level").is_none());
        assert_eq!(profile.lookup("income_level"), Some(None));
        assert_eq!(profile.lookup("is_farmer"), None);
        assert_eq!(profile, UserProfile::new().with("has_aadhaar", true).with_unknown("income_level"));
    }

    #[test]
    fn test_profile_rejects_nested_values() {
        assert!(serde_json::from_str::<UserProfile>(r#"{"address": {"city": "Pune"}}"#).is_err());
    }

    #[test]
    fn test_numbers_compare_by_value() {
        let int = ProfileValue::from(0i64);
        let float: ProfileValue = serde_json::from_str("0.0").unwrap();
        assert_eq!(int.same_as(&float), Some(true));
        assert_eq!(int.same_as(&ProfileValue::from("0")), None);
    }

    #[test]
    fn test_large_integers_compare_exactly() {
        let above: ProfileValue = serde_json::from_str("9007199254740993").unwrap();
        let below: ProfileValue = serde_json::from_str("9007199254740992").unwrap();
        let max: ProfileValue = serde_json::from_str("18446744073709551615").unwrap();
        let max_again: ProfileValue = serde_json::from_str("18446744073709551615").unwrap();

        assert_eq!(above.same_as(&below), Some(false));
        assert_eq!(max.same_as(&max_again), Some(true));
        assert_eq!(max.same_as(&ProfileValue::from(-1i64)), Some(false));

        let whole_float: ProfileValue = serde_json::from_str("9007199254740992.0").unwrap();
        assert_eq!(above.same_as(&whole_float), Some(false));
        assert_eq!(below.same_as(&whole_float), Some(true));
        let fractional: ProfileValue = serde_json::from_str("2.5").unwrap();
        assert_eq!(ProfileValue::from(2i64).same_as(&fractional), Some(false));
    }

    #[test]
    fn test_intent_kind_parse() {
        assert_eq!(IntentKind::parse(" Scheme_Info "), IntentKind::SchemeInfo);
        assert_eq!(IntentKind::parse("something_else"), IntentKind::Other);
    }
}
