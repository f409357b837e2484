use crate::{ClaimSet, Role};

/// Identity attached to a request once its token has been verified.
#[derive(Debug, Clone, PartialEq)]
pub struct Principal {
    id: Option<String>,
    role: Option<Role>,
    claims: ClaimSet,
}

impl Principal {
    /// Build a principal from an already verified claim set.
    pub fn from_claims(claims: ClaimSet) -> Self {
        Self {
            id: claims.id().map(str::to_string),
            role: claims.role(),
            claims,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    /// Expiry of the token this principal was authenticated with.
    pub fn expires_at(&self) -> Option<i64> {
        self.claims.exp()
    }

    /// Full decoded claim set, for handlers needing caller-specific claims.
    pub fn claims(&self) -> &ClaimSet {
        &self.claims
    }
}
