use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Role name carried in the `role` claim.
///
/// Roles are opaque, case-sensitive strings. There is no hierarchy: `admin`
/// does not satisfy a route that requires `officer`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub const SOLDIER: Role = Role(Cow::Borrowed("soldier"));
    pub const OFFICER: Role = Role(Cow::Borrowed("officer"));
    pub const ADMIN: Role = Role(Cow::Borrowed("admin"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
