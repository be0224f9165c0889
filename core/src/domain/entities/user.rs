//! User entity representing an operator of the RetinaVerify system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role of a user, deciding which endpoints it may call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Platform operator, unrestricted
    SuperAdmin,
    /// Administrator of a single organization
    #[serde(alias = "ADMIN")]
    OrgAdmin,
    /// May only run retina validations
    Validator,
}

impl UserRole {
    /// Canonical name as stored in the database
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => "SUPER_ADMIN",
            UserRole::OrgAdmin => "ORG_ADMIN",
            UserRole::Validator => "VALIDATOR",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "SUPER_ADMIN" => Ok(UserRole::SuperAdmin),
            "ORG_ADMIN" | "ADMIN" => Ok(UserRole::OrgAdmin),
            "VALIDATOR" => Ok(UserRole::Validator),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

/// User entity; the password hash is never serialized
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,

    /// bcrypt hash
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub role: UserRole,

    /// Organization the user belongs to, if any
    pub organization_id: Option<Uuid>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Creates a new User instance
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: UserRole,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            organization_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Places the user inside an organization
    pub fn with_organization(mut self, organization_id: Uuid) -> Self {
        self.organization_id = Some(organization_id);
        self
    }

    /// Bumps `updated_at`; call after every mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn is_super_admin(&self) -> bool {
        self.role == UserRole::SuperAdmin
    }

    /// Whether the user is a member of the given organization
    pub fn belongs_to(&self, organization_id: Uuid) -> bool {
        self.organization_id == Some(organization_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_creation() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "hash", UserRole::Validator);
        assert_eq!(user.role, UserRole::Validator);
        assert!(user.organization_id.is_none());
        assert_eq!(user.created_at, user.updated_at);
    }

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new("Ada", "Lovelace", "ada@example.com", "secret-hash", UserRole::OrgAdmin);
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["firstName"], "Ada");
        assert_eq!(json["role"], "ORG_ADMIN");
        assert!(json["organizationId"].is_null());
    }

    #[test]
    fn test_role_accepts_admin_alias() {
        let role: UserRole = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(role, UserRole::OrgAdmin);
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::OrgAdmin);
        assert_eq!("SUPER_ADMIN".parse::<UserRole>().unwrap(), UserRole::SuperAdmin);
        assert!("USER".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_membership() {
        let org = Uuid::new_v4();
        let user = User::new("A", "B", "a@b.c", "h", UserRole::OrgAdmin).with_organization(org);
        assert!(user.belongs_to(org));
        assert!(!user.belongs_to(Uuid::new_v4()));
        assert!(!user.is_super_admin());
    }
}
