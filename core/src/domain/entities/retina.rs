//! Retina image records and the messages exchanged with the matching service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stored retina photo of an employee
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetinaImage {
    pub id: Uuid,
    pub employee_id: Uuid,
    /// Blob path inside the storage container
    pub path: String,
    /// Template id assigned by the analysis service once processed
    pub document_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl RetinaImage {
    pub fn new(id: Uuid, employee_id: Uuid, path: impl Into<String>) -> Self {
        Self {
            id,
            employee_id,
            path: path.into(),
            document_id: None,
            created_at: Utc::now(),
        }
    }
}

/// Listing shape of a retina photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetinaSummary {
    pub id: Uuid,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

impl From<RetinaImage> for RetinaSummary {
    fn from(image: RetinaImage) -> Self {
        Self {
            id: image.id,
            path: image.path,
            created_at: image.created_at,
        }
    }
}

/// Employee enrolled for matching, as sent in validation commands
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRetinaRef {
    pub employee_id: Uuid,
    /// Empty when the image was not processed yet
    pub document_id: String,
}

/// Asks the analysis service to extract a template from a new retina photo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetinaImageCommand {
    pub image_path: String,
    #[serde(rename = "employeeId")]
    pub employee_id: Uuid,
    #[serde(rename = "imgId")]
    pub img_id: Uuid,
}

/// Asks the matching service to compare a presented image with enrolled employees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetinaValidationCommand {
    pub image_path: String,
    pub employees: Vec<EmployeeRetinaRef>,
    #[serde(rename = "messageId")]
    pub message_id: String,
    #[serde(rename = "originatingInstance", skip_serializing_if = "Option::is_none")]
    pub originating_instance: Option<String>,
}

/// Result of processing a retina photo, delivered by the analysis service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageProcessingResult {
    pub status: String,
    /// Template id to store as `document_id`
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub employee_id: Option<Uuid>,
    pub img_id: Uuid,
}

impl ImageProcessingResult {
    pub fn is_success(&self) -> bool {
        self.status == "success"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_wire_names() {
        let command = RetinaImageCommand {
            image_path: "organizations/o/employees/e/retinas/x.jpg".into(),
            employee_id: Uuid::nil(),
            img_id: Uuid::nil(),
        };
        let json = serde_json::to_value(command).unwrap();
        assert!(json.get("image_path").is_some());
        assert!(json.get("employeeId").is_some());
        assert!(json.get("imgId").is_some());
    }

    #[test]
    fn test_validation_command_wire_names() {
        let command = RetinaValidationCommand {
            image_path: "validation/a.jpg".into(),
            employees: vec![EmployeeRetinaRef {
                employee_id: Uuid::nil(),
                document_id: String::new(),
            }],
            message_id: "m-1".into(),
            originating_instance: None,
        };
        let json = serde_json::to_value(command).unwrap();
        assert_eq!(json["messageId"], "m-1");
        assert_eq!(json["employees"][0]["documentId"], "");
        assert!(json.get("originatingInstance").is_none());
    }

    #[test]
    fn test_processing_result_parsing() {
        let result: ImageProcessingResult = serde_json::from_value(serde_json::json!({
            "status": "success",
            "id": "doc-42",
            "employeeId": Uuid::nil(),
            "imgId": Uuid::nil(),
        }))
        .unwrap();
        assert!(result.is_success());
        assert_eq!(result.id.as_deref(), Some("doc-42"));
    }
}
