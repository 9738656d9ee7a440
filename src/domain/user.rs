use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{Result, TrackerError};

/// Minimal profile of the signed-in session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl User {
    /// Creates a profile with a fresh identity token.
    pub fn new(email: &str, name: &str) -> Result<Self> {
        let email = email.trim();
        let name = name.trim();
        if email.is_empty() {
            return Err(TrackerError::Validation("email must not be empty".into()));
        }
        if name.is_empty() {
            return Err(TrackerError::Validation("name must not be empty".into()));
        }
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            email: email.to_string(),
            name: name.to_string(),
        })
    }

    pub(crate) fn is_well_formed(&self) -> bool {
        !self.id.trim().is_empty() && !self.email.trim().is_empty() && !self.name.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_assigns_identity() {
        let user = User::new("  ada@example.com ", " Ada ").unwrap();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.name, "Ada");
        assert!(!user.id.is_empty());
    }

    #[test]
    fn blank_fields_are_rejected() {
        assert!(User::new("", "Ada").is_err());
        assert!(User::new("ada@example.com", "   ").is_err());
    }
}
