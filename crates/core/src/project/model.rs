//! Project model definitions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::principal::Principal;
use crate::task::{MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};
use crate::{Error, Result};

/// A project, owned by one principal and shared read-only with the member
/// emails on its list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub owner_id: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            owner_id: owner_id.into(),
            members: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_members(mut self, members: Vec<String>) -> Self {
        self.members = members;
        self
    }

    /// Read access: the owner and anyone whose email is on the member list.
    pub fn can_view(&self, principal: &Principal) -> bool {
        self.owner_id == principal.id
            || (!principal.email.is_empty() && self.members.iter().any(|m| *m == principal.email))
    }

    /// Write access is restricted to the owner, even for members.
    pub fn can_modify(&self, principal: &Principal) -> bool {
        self.owner_id == principal.id
    }
}

pub fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("Project name is required".to_string()));
    }
    if trimmed.chars().count() > MAX_TITLE_LEN {
        return Err(Error::Validation(format!(
            "Project name cannot exceed {} characters",
            MAX_TITLE_LEN
        )));
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<()> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(
            "Project description is required".to_string(),
        ));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(Error::Validation(format!(
            "Project description cannot exceed {} characters",
            MAX_DESCRIPTION_LEN
        )));
    }
    Ok(())
}
