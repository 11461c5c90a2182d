//! Per-method role allow-list
//!
//! Keys are full gRPC method paths as they appear in the HTTP/2 `:path`
//! pseudo-header, e.g. `/techschool.pcbook.LaptopService/CreateLaptop`.
//! A method without an entry is open: no token is required to reach it.

use crate::claims::{Claims, Role};
use crate::error::AuthError;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: HashMap<String, HashSet<Role>>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict `method` to `roles`, replacing any earlier rule for it
    pub fn allow(mut self, method: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        self.rules.insert(method.into(), roles.into_iter().collect());
        self
    }

    /// Parse `Method=role,role;Method=role`
    ///
    /// Method names without a leading `/` are qualified with `service`
    /// (e.g. `techschool.pcbook.LaptopService`).
    pub fn parse(text: &str, service: &str) -> Result<Self, AuthError> {
        let mut policy = Self::new();

        for entry in text.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let (method, roles) = entry.split_once('=').ok_or_else(|| {
                AuthError::InvalidPolicy(format!("expected Method=roles, got '{}'", entry))
            })?;

            let method = method.trim();
            if method.is_empty() {
                return Err(AuthError::InvalidPolicy(format!("missing method in '{}'", entry)));
            }

            let path = if method.starts_with('/') {
                method.to_string()
            } else {
                format!("/{}/{}", service, method)
            };

            let roles = roles
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::parse::<Role>)
                .collect::<Result<HashSet<_>, _>>()?;

            if roles.is_empty() {
                return Err(AuthError::InvalidPolicy(format!("no roles for '{}'", method)));
            }

            policy.rules.insert(path, roles);
        }

        Ok(policy)
    }

    pub fn allowed_roles(&self, method: &str) -> Option<&HashSet<Role>> {
        self.rules.get(method)
    }

    pub fn is_restricted(&self, method: &str) -> bool {
        self.rules.contains_key(method)
    }

    /// Check an authenticated caller against the rule for `method`
    pub fn authorize(&self, method: &str, claims: &Claims) -> Result<(), AuthError> {
        match self.rules.get(method) {
            Some(roles) if !roles.contains(&claims.role) => Err(AuthError::PermissionDenied {
                role: claims.role,
                method: method.to_string(),
            }),
            _ => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SERVICE: &str = "techschool.pcbook.LaptopService";

    fn claims(role: Role) -> Claims {
        Claims {
            sub: "someone".to_string(),
            role,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_parse_qualifies_short_names() {
        let policy = AccessPolicy::parse("CreateLaptop=admin; RateLaptop=admin,user", SERVICE)
            .expect("policy should parse");

        let create = policy
            .allowed_roles("/techschool.pcbook.LaptopService/CreateLaptop")
            .expect("create should be restricted");
        assert_eq!(create.len(), 1);
        assert!(create.contains(&Role::Admin));

        let rate = policy
            .allowed_roles("/techschool.pcbook.LaptopService/RateLaptop")
            .expect("rate should be restricted");
        assert!(rate.contains(&Role::Admin) && rate.contains(&Role::User));
    }

    #[test]
    fn test_parse_keeps_full_paths() {
        let policy = AccessPolicy::parse("/other.Service/Do=user", SERVICE).unwrap();
        assert!(policy.is_restricted("/other.Service/Do"));
        assert_eq!(policy.len(), 1);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            AccessPolicy::parse("CreateLaptop", SERVICE),
            Err(AuthError::InvalidPolicy(_))
        ));
        assert!(matches!(
            AccessPolicy::parse("CreateLaptop=", SERVICE),
            Err(AuthError::InvalidPolicy(_))
        ));
        assert!(matches!(
            AccessPolicy::parse("CreateLaptop=root", SERVICE),
            Err(AuthError::UnknownRole(_))
        ));
    }

    #[test]
    fn test_empty_spec_is_open() {
        let policy = AccessPolicy::parse("  ", SERVICE).unwrap();
        assert!(policy.is_empty());
    }

    #[test]
    fn test_authorize() {
        let policy = AccessPolicy::new().allow("/svc/Create", [Role::Admin]);

        assert!(policy.authorize("/svc/Create", &claims(Role::Admin)).is_ok());
        assert!(matches!(
            policy.authorize("/svc/Create", &claims(Role::User)),
            Err(AuthError::PermissionDenied { role: Role::User, .. })
        ));
        // Unlisted methods are open
        assert!(policy.authorize("/svc/Search", &claims(Role::User)).is_ok());
    }
}
