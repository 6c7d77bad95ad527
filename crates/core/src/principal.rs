//! Request principal and the internal identity-header contract
//!
//! The gateway rewrites a verified token's claims into three plain headers;
//! every internal service rebuilds a [`Principal`] from them. Presence of the
//! user-id header is the sole authentication check inside the services, which
//! only holds because they are network-reachable exclusively from the
//! gateway.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Header carrying the identity-provider subject id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the principal's email address.
pub const USER_EMAIL_HEADER: &str = "x-user-email";
/// Header carrying the resolved role(s), comma-joined if multiple.
pub const USER_ROLE_HEADER: &str = "x-user-role";

/// Closed role set. Kept deliberately small so a typo in a role header can
/// never grant an unexpected privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            _ => Err(Error::Validation(format!("Unsupported role '{}'", value))),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated identity associated with one request. Derived fresh per
/// request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl Principal {
    /// Build a principal from the three identity header values.
    ///
    /// A missing or empty user id is the single authentication failure
    /// condition; email and role headers are optional. Unrecognized role
    /// tokens are dropped rather than mapped to any privilege.
    pub fn from_header_values(
        user_id: Option<&str>,
        email: Option<&str>,
        roles: Option<&str>,
    ) -> Result<Self> {
        let id = user_id
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| Error::Unauthorized("User ID missing".to_string()))?;

        let roles = roles
            .map(|raw| {
                raw.split(',')
                    .filter_map(|token| Role::from_str(token).ok())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: id.to_string(),
            email: email.map(str::trim).unwrap_or_default().to_string(),
            roles,
        })
    }

    pub fn is_admin(&self) -> bool {
        self.roles.contains(&Role::Admin)
    }

    /// Comma-joined role list as it travels on the role header.
    pub fn roles_header_value(&self) -> String {
        self.roles
            .iter()
            .map(|role| role.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_user_id_is_unauthorized() {
        let result = Principal::from_header_values(None, Some("a@x.com"), Some("admin"));
        assert!(matches!(result, Err(Error::Unauthorized(_))));

        let result = Principal::from_header_values(Some("  "), Some("a@x.com"), Some("admin"));
        assert!(matches!(result, Err(Error::Unauthorized(_))));
    }

    #[test]
    fn id_alone_is_sufficient() {
        let principal = Principal::from_header_values(Some("u1"), None, None).unwrap();
        assert_eq!(principal.id, "u1");
        assert!(principal.email.is_empty());
        assert!(principal.roles.is_empty());
        assert!(!principal.is_admin());
    }

    #[test]
    fn role_header_splits_on_comma() {
        let principal =
            Principal::from_header_values(Some("u1"), Some("u1@x.com"), Some("user,admin"))
                .unwrap();
        assert_eq!(principal.roles, vec![Role::User, Role::Admin]);
        assert!(principal.is_admin());
        assert_eq!(principal.roles_header_value(), "user,admin");
    }

    #[test]
    fn unknown_role_tokens_are_dropped() {
        let principal =
            Principal::from_header_values(Some("u1"), Some("u1@x.com"), Some("superadmin,user"))
                .unwrap();
        assert_eq!(principal.roles, vec![Role::User]);
        assert!(!principal.is_admin());
    }
}
