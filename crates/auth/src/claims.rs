use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Role;

/// Reserved claim holding the expiry (seconds since the Unix epoch).
pub const EXP: &str = "exp";

/// Conventional claim holding the principal identifier.
pub const ID: &str = "id";

/// Conventional claim holding the principal's role.
pub const ROLE: &str = "role";

/// Claims asserted by a token (transport-agnostic).
///
/// Subject fields are opaque to the codec; only `exp` is interpreted, and the
/// codec always assigns it at encode time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(Map<String, Value>);

impl ClaimSet {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Principal identifier, when present as a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID).and_then(Value::as_str)
    }

    pub fn role(&self) -> Option<Role> {
        self.0
            .get(ROLE)
            .and_then(Value::as_str)
            .map(|r| Role::new(r.to_string()))
    }

    /// Expiry in seconds since the epoch; `None` when absent or not an integer.
    pub fn exp(&self) -> Option<i64> {
        self.0.get(EXP).and_then(Value::as_i64)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for ClaimSet {
    fn from(value: Map<String, Value>) -> Self {
        Self(value)
    }
}

impl From<ClaimSet> for Value {
    fn from(value: ClaimSet) -> Self {
        Value::Object(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accessors_read_conventional_claims() {
        let claims = ClaimSet::new()
            .with(ID, "u1")
            .with(ROLE, "officer")
            .with(EXP, 1_700_000_000_i64);

        assert_eq!(claims.id(), Some("u1"));
        assert_eq!(claims.role(), Some(Role::OFFICER));
        assert_eq!(claims.exp(), Some(1_700_000_000));
    }

    #[test]
    fn non_string_role_is_ignored() {
        let claims = ClaimSet::new().with(ROLE, 7);
        assert_eq!(claims.role(), None);
    }

    #[test]
    fn non_integer_exp_reads_as_none() {
        let claims = ClaimSet::new().with(EXP, "tomorrow");
        assert!(claims.contains(EXP));
        assert_eq!(claims.exp(), None);
    }

    #[test]
    fn serializes_as_flat_object() {
        let claims = ClaimSet::new().with("role", "admin").with("id", "u1");
        assert_eq!(
            serde_json::to_value(&claims).unwrap(),
            json!({ "id": "u1", "role": "admin" })
        );
    }
}
