//! Untyped outcome parameters with typed, validating accessors

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::OutcomeError;

/// The `parameters` object supplied to `execute-outcome`
///
/// Values stay as JSON until a handler reads them; every accessor reports
/// problems as a [`OutcomeError::Validation`] naming the parameter.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Parameters(Map<String, Value>);

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept an object, or `null` as an empty set
    pub fn from_value(value: Value) -> Result<Self, OutcomeError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            _ => Err(OutcomeError::validation(
                "parameters",
                "'parameters' must be an object/map",
            )),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A non-empty string
    pub fn require_str(&self, name: &str) -> Result<&str, OutcomeError> {
        self.require_str_any(&[name])
    }

    /// A non-empty string found under the first present of `names`
    ///
    /// Errors name the first (preferred) spelling.
    pub fn require_str_any(&self, names: &[&str]) -> Result<&str, OutcomeError> {
        let preferred = names.first().copied().unwrap_or_default();
        let value = names.iter().find_map(|name| self.0.get(*name));

        match value.and_then(Value::as_str) {
            Some(s) if !s.trim().is_empty() => Ok(s),
            _ => Err(OutcomeError::validation(
                preferred,
                format!(
                    "'{}' parameter is required and must be a non-empty string",
                    preferred
                ),
            )),
        }
    }

    /// A string that may be absent, `null`, or empty
    pub fn optional_str(&self, name: &str) -> Result<Option<&str>, OutcomeError> {
        match self.0.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(_) => Err(OutcomeError::validation(
                name,
                format!("'{}' parameter must be a string", name),
            )),
        }
    }

    /// A JSON boolean; strings such as `"true"` are rejected
    pub fn require_bool(&self, name: &str) -> Result<bool, OutcomeError> {
        self.0.get(name).and_then(Value::as_bool).ok_or_else(|| {
            OutcomeError::validation(
                name,
                format!("'{}' parameter is required and must be a boolean", name),
            )
        })
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Parameters {
        Parameters::from_value(value).unwrap()
    }

    #[test]
    fn test_null_is_empty() {
        assert!(params(Value::Null).is_empty());
    }

    #[test]
    fn test_non_object_rejected() {
        let err = Parameters::from_value(json!(["a"])).unwrap_err();
        assert!(matches!(err, OutcomeError::Validation { ref parameter, .. } if parameter == "parameters"));
    }

    #[test]
    fn test_require_str() {
        let p = params(json!({"instance_id": "abc", "empty": "  ", "number": 5}));
        assert_eq!(p.require_str("instance_id").unwrap(), "abc");

        for name in ["empty", "number", "missing"] {
            let err = p.require_str(name).unwrap_err();
            assert_eq!(
                err.to_string(),
                format!("'{}' parameter is required and must be a non-empty string", name)
            );
        }
    }

    #[test]
    fn test_require_str_any_uses_first_present() {
        let p = params(json!({"tenant_id": "t1"}));
        assert_eq!(p.require_str_any(&["tenantId", "tenant_id"]).unwrap(), "t1");

        let err = params(json!({})).require_str_any(&["tenantId", "tenant_id"]).unwrap_err();
        assert!(err.to_string().starts_with("'tenantId'"));
    }

    #[test]
    fn test_optional_str() {
        let p = params(json!({"name": "x", "blank": "", "null": null, "bad": true}));
        assert_eq!(p.optional_str("name").unwrap(), Some("x"));
        assert_eq!(p.optional_str("blank").unwrap(), None);
        assert_eq!(p.optional_str("null").unwrap(), None);
        assert_eq!(p.optional_str("missing").unwrap(), None);
        assert!(p.optional_str("bad").is_err());
    }

    #[test]
    fn test_require_bool_is_strict() {
        let p = params(json!({"yes": true, "no": false, "text": "true"}));
        assert!(p.require_bool("yes").unwrap());
        assert!(!p.require_bool("no").unwrap());
        assert!(p.require_bool("text").is_err());
        assert!(p.require_bool("missing").is_err());
    }
}
