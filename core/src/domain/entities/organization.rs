//! Organization entity grouping users and employees.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of an organization name
pub const MAX_ORGANIZATION_NAME_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: Uuid,
    /// Unique display name
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Organization {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
        self.updated_at = Utc::now();
    }
}

/// Member counts shown next to an organization in listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationCounts {
    pub users: u64,
    pub employees: u64,
}

/// Organization together with its member counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationSummary {
    #[serde(flatten)]
    pub organization: Organization,
    #[serde(rename = "_count")]
    pub count: OrganizationCounts,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_bumps_updated_at() {
        let mut org = Organization::new("Acme");
        let before = org.updated_at;
        org.rename("Acme Corp");
        assert_eq!(org.name, "Acme Corp");
        assert!(org.updated_at >= before);
    }

    #[test]
    fn test_summary_serialization() {
        let summary = OrganizationSummary {
            organization: Organization::new("Acme"),
            count: OrganizationCounts { users: 2, employees: 5 },
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["name"], "Acme");
        assert_eq!(json["_count"]["users"], 2);
        assert_eq!(json["_count"]["employees"], 5);
        assert!(json["createdAt"].is_string());
    }
}
