use garrison_auth::{Principal, Role};

/// Principal context for a request (authenticated identity + role).
///
/// Inserted by the authentication middleware; immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn id(&self) -> Option<&str> {
        self.principal.id()
    }

    pub fn role(&self) -> Option<&Role> {
        self.principal.role()
    }
}
