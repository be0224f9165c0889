//! Employee entity: a person whose retina is enrolled for verification.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub birth_date: NaiveDate,
    pub position: String,
    pub organization_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of an employee that may be changed after creation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmployeeChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub position: Option<String>,
}

impl Employee {
    pub fn new(
        organization_id: Uuid,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        birth_date: NaiveDate,
        position: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date,
            position: position.into(),
            organization_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies a partial update
    pub fn apply(&mut self, changes: EmployeeChanges) {
        if let Some(first_name) = changes.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            self.last_name = last_name;
        }
        if let Some(birth_date) = changes.birth_date {
            self.birth_date = birth_date;
        }
        if let Some(position) = changes.position {
            self.position = position;
        }
        self.updated_at = Utc::now();
    }
}
