//! User model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::principal::Principal;
use crate::{Error, Result};

pub const MAX_NAME_FIELD_LEN: usize = 50;

/// A user profile. `external_id` is the identity provider's subject id and is
/// the idempotency key for creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(external_id: impl Into<String>, email: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            external_id: external_id.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_first_name(mut self, first_name: impl Into<String>) -> Self {
        self.first_name = Some(first_name.into());
        self
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = Some(last_name.into());
        self
    }

    /// A profile may be updated by the principal it belongs to or by an
    /// admin. This is the one place the admin role crosses an ownership
    /// boundary.
    pub fn can_be_updated_by(&self, principal: &Principal) -> bool {
        self.external_id == principal.id || principal.is_admin()
    }
}

pub fn validate_name_field(label: &str, value: &str) -> Result<()> {
    if value.trim().chars().count() > MAX_NAME_FIELD_LEN {
        return Err(Error::Validation(format!(
            "{} cannot exceed {} characters",
            label, MAX_NAME_FIELD_LEN
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::principal::Role;

    fn principal(id: &str, roles: Vec<Role>) -> Principal {
        Principal {
            id: id.to_string(),
            email: format!("{}@x.com", id),
            roles,
        }
    }

    #[test]
    fn self_and_admin_may_update() {
        let user = User::new("sub-1", "sub-1@x.com");
        assert!(user.can_be_updated_by(&principal("sub-1", vec![Role::User])));
        assert!(user.can_be_updated_by(&principal("other", vec![Role::Admin])));
        assert!(!user.can_be_updated_by(&principal("other", vec![Role::User])));
    }

    #[test]
    fn name_field_bound() {
        assert!(validate_name_field("First name", "Ada").is_ok());
        assert!(validate_name_field("First name", &"x".repeat(51)).is_err());
    }
}
