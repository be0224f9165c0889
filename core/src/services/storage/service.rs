//! Retina image enrolment and generic image storage.

use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::entities::retina::{
    ImageProcessingResult, RetinaImage, RetinaImageCommand, RetinaSummary,
};
use crate::domain::entities::user::User;
use crate::errors::DomainError;
use crate::repositories::{EmployeeRepository, RetinaImageRepository};
use crate::services::access::ensure_organization_access;
use crate::services::recent_ids::RecentIds;
use crate::services::validation::MatchingGateway;

use super::{content_type_for, BlobStorage, StoredBlob, UploadedFile};

const RETINA_NOT_FOUND: &str = "Retina photo not found";

/// Result of a retina enrolment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedRetina {
    pub id: Uuid,
    pub url: String,
}

/// Stores retina photos and keeps their records in sync with blob storage
pub struct RetinaService<R, E, B, M>
where
    R: RetinaImageRepository,
    E: EmployeeRepository,
    B: BlobStorage,
    M: MatchingGateway,
{
    retinas: Arc<R>,
    employees: Arc<E>,
    blobs: Arc<B>,
    matcher: Arc<M>,
    processed: Mutex<RecentIds>,
}

impl<R, E, B, M> RetinaService<R, E, B, M>
where
    R: RetinaImageRepository,
    E: EmployeeRepository,
    B: BlobStorage,
    M: MatchingGateway,
{
    pub fn new(retinas: Arc<R>, employees: Arc<E>, blobs: Arc<B>, matcher: Arc<M>) -> Self {
        Self {
            retinas,
            employees,
            blobs,
            matcher,
            processed: Mutex::new(RecentIds::default()),
        }
    }

    /// Stores an arbitrary image under `uploads/`
    pub async fn upload_image(&self, file: UploadedFile) -> Result<StoredBlob, DomainError> {
        let path = format!("uploads/{}{}", Uuid::new_v4(), file.extension());
        let content_type = file.content_type().to_string();
        let stored = self.blobs.upload(&path, file.bytes, &content_type).await?;
        tracing::info!(path = %stored.path, "Image uploaded");
        Ok(stored)
    }

    /// Image bytes with the content type derived from the name
    pub async fn get_image(&self, name: &str) -> Result<(Vec<u8>, &'static str), DomainError> {
        let bytes = self
            .blobs
            .download(name)
            .await?
            .ok_or_else(|| DomainError::not_found("Image not found"))?;
        Ok((bytes, content_type_for(name)))
    }

    /// Enrols a retina photo for an employee and queues it for analysis
    pub async fn upload_retina(
        &self,
        actor: &User,
        organization_id: Uuid,
        employee_id: Uuid,
        file: UploadedFile,
    ) -> Result<UploadedRetina, DomainError> {
        ensure_organization_access(actor, organization_id)?;
        self.ensure_employee(organization_id, employee_id).await?;

        let id = Uuid::new_v4();
        let path = format!(
            "organizations/{}/employees/{}/retinas/{}{}",
            organization_id,
            employee_id,
            id,
            file.extension()
        );
        let content_type = file.content_type().to_string();
        let stored = self.blobs.upload(&path, file.bytes, &content_type).await?;
        self.retinas
            .create(RetinaImage::new(id, employee_id, stored.path.clone()))
            .await?;
        tracing::info!(retina_id = %id, employee_id = %employee_id, "Retina photo stored");

        let command = RetinaImageCommand {
            image_path: stored.path,
            employee_id,
            img_id: id,
        };
        if let Err(e) = self.matcher.submit_image(&command).await {
            tracing::error!(retina_id = %id, error = %e, "Failed to submit retina for analysis");
        }

        Ok(UploadedRetina { id, url: stored.url })
    }

    pub async fn list_retinas(
        &self,
        actor: &User,
        organization_id: Uuid,
        employee_id: Uuid,
    ) -> Result<Vec<RetinaSummary>, DomainError> {
        ensure_organization_access(actor, organization_id)?;
        self.ensure_employee(organization_id, employee_id).await?;

        let images = self.retinas.find_by_employee(employee_id).await?;
        if images.is_empty() {
            return Err(DomainError::not_found(
                "No retina photos found for this employee",
            ));
        }
        Ok(images.into_iter().map(RetinaSummary::from).collect())
    }

    /// Bytes of one retina photo
    pub async fn get_retina(
        &self,
        actor: &User,
        organization_id: Uuid,
        employee_id: Uuid,
        retina_id: Uuid,
    ) -> Result<Vec<u8>, DomainError> {
        ensure_organization_access(actor, organization_id)?;
        self.ensure_employee(organization_id, employee_id).await?;
        let image = self.find_retina(employee_id, retina_id).await?;

        self.blobs
            .download(&image.path)
            .await?
            .ok_or_else(|| DomainError::not_found(RETINA_NOT_FOUND))
    }

    /// Removes the blob, then the record
    pub async fn delete_retina(
        &self,
        actor: &User,
        organization_id: Uuid,
        employee_id: Uuid,
        retina_id: Uuid,
    ) -> Result<(), DomainError> {
        ensure_organization_access(actor, organization_id)?;
        self.ensure_employee(organization_id, employee_id).await?;
        let image = self.find_retina(employee_id, retina_id).await?;

        if !self.blobs.delete(&image.path).await? {
            tracing::warn!(retina_id = %retina_id, path = %image.path, "Retina blob already gone");
        }
        self.retinas.delete(retina_id).await?;
        tracing::info!(retina_id = %retina_id, "Retina photo deleted");
        Ok(())
    }

    /// Applies an analysis result; returns `false` for repeated deliveries
    pub async fn apply_analysis_result(
        &self,
        result: ImageProcessingResult,
    ) -> Result<bool, DomainError> {
        if !self.processed.lock().await.insert(&result.img_id.to_string()) {
            tracing::debug!(img_id = %result.img_id, "Analysis result already processed");
            return Ok(false);
        }

        if !result.is_success() {
            tracing::warn!(img_id = %result.img_id, status = %result.status, "Retina analysis failed");
            return Ok(true);
        }

        match result.id.as_deref().filter(|id| !id.is_empty()) {
            Some(document_id) => {
                if !self.retinas.set_document_id(result.img_id, document_id).await? {
                    tracing::warn!(img_id = %result.img_id, "Analysed retina no longer exists");
                }
            }
            None => tracing::warn!(img_id = %result.img_id, "Analysis result without document id"),
        }
        Ok(true)
    }

    async fn ensure_employee(&self, organization_id: Uuid, employee_id: Uuid) -> Result<(), DomainError> {
        match self.employees.find_by_id(employee_id).await? {
            Some(employee) if employee.organization_id == organization_id => Ok(()),
            _ => Err(DomainError::not_found(format!(
                "Employee with ID {} not found",
                employee_id
            ))),
        }
    }

    async fn find_retina(&self, employee_id: Uuid, retina_id: Uuid) -> Result<RetinaImage, DomainError> {
        self.retinas
            .find_by_id(retina_id)
            .await?
            .filter(|image| image.employee_id == employee_id)
            .ok_or_else(|| DomainError::not_found(RETINA_NOT_FOUND))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::employee::Employee;
    use crate::domain::entities::user::UserRole;
    use crate::repositories::{MockEmployeeRepository, MockRetinaImageRepository};
    use crate::services::storage::MockBlobStorage;
    use crate::services::validation::MockMatchingGateway;
    use chrono::NaiveDate;

    type Service = RetinaService<
        MockRetinaImageRepository,
        MockEmployeeRepository,
        MockBlobStorage,
        MockMatchingGateway,
    >;

    struct Fixture {
        service: Service,
        retinas: Arc<MockRetinaImageRepository>,
        blobs: Arc<MockBlobStorage>,
        matcher: Arc<MockMatchingGateway>,
        employee: Employee,
        admin: User,
    }

    async fn fixture() -> Fixture {
        let employees = MockEmployeeRepository::new();
        let retinas = Arc::new(MockRetinaImageRepository::with_employees(employees.clone()));
        let blobs = Arc::new(MockBlobStorage::new());
        let matcher = Arc::new(MockMatchingGateway::new());
        let employee = employees
            .create(Employee::new(
                Uuid::new_v4(),
                "Alan",
                "Turing",
                NaiveDate::from_ymd_opt(1912, 6, 23).unwrap(),
                "Cryptanalyst",
            ))
            .await
            .unwrap();

        Fixture {
            service: RetinaService::new(
                retinas.clone(),
                Arc::new(employees),
                blobs.clone(),
                matcher.clone(),
            ),
            retinas,
            blobs,
            matcher,
            employee,
            admin: User::new("S", "A", "s@a.io", "h", UserRole::SuperAdmin),
        }
    }

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.into(),
            content_type: Some("image/png".into()),
            bytes: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn test_upload_retina_stores_and_submits() {
        let f = fixture().await;
        let org = f.employee.organization_id;

        let uploaded = f
            .service
            .upload_retina(&f.admin, org, f.employee.id, file("eye.png"))
            .await
            .unwrap();

        let expected = format!(
            "organizations/{}/employees/{}/retinas/{}.png",
            org, f.employee.id, uploaded.id
        );
        assert_eq!(f.blobs.paths().await, vec![expected.clone()]);
        assert!(uploaded.url.ends_with(&expected));

        let commands = f.matcher.image_commands().await;
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].img_id, uploaded.id);
        assert_eq!(commands[0].image_path, expected);
    }

    #[tokio::test]
    async fn test_submit_failure_is_not_fatal() {
        let f = fixture().await;
        f.matcher.fail().await;

        let uploaded = f
            .service
            .upload_retina(&f.admin, f.employee.organization_id, f.employee.id, file("eye.jpg"))
            .await;
        assert!(uploaded.is_ok());
    }

    #[tokio::test]
    async fn test_upload_checks_scope() {
        let f = fixture().await;
        let outsider = User::new("O", "A", "o@a.io", "h", UserRole::OrgAdmin)
            .with_organization(Uuid::new_v4());

        let err = f
            .service
            .upload_retina(&outsider, f.employee.organization_id, f.employee.id, file("a.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden { .. }));

        let err = f
            .service
            .upload_retina(&f.admin, Uuid::new_v4(), f.employee.id, file("a.png"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_get_delete() {
        let f = fixture().await;
        let org = f.employee.organization_id;

        let err = f.service.list_retinas(&f.admin, org, f.employee.id).await.unwrap_err();
        assert_eq!(err.to_string(), "No retina photos found for this employee");

        let uploaded = f
            .service
            .upload_retina(&f.admin, org, f.employee.id, file("eye.png"))
            .await
            .unwrap();
        let listed = f.service.list_retinas(&f.admin, org, f.employee.id).await.unwrap();
        assert_eq!(listed[0].id, uploaded.id);

        let bytes = f
            .service
            .get_retina(&f.admin, org, f.employee.id, uploaded.id)
            .await
            .unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);

        f.service
            .delete_retina(&f.admin, org, f.employee.id, uploaded.id)
            .await
            .unwrap();
        assert!(f.blobs.paths().await.is_empty());
        let err = f
            .service
            .delete_retina(&f.admin, org, f.employee.id, uploaded.id)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), RETINA_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_retinas_of_another_organization_are_hidden() {
        let f = fixture().await;
        let victim_org = f.employee.organization_id;
        let uploaded = f
            .service
            .upload_retina(&f.admin, victim_org, f.employee.id, file("eye.png"))
            .await
            .unwrap();

        let own_org = Uuid::new_v4();
        let intruder = User::new("I", "A", "i@a.io", "h", UserRole::OrgAdmin).with_organization(own_org);

        let err = f.service.list_retinas(&intruder, own_org, f.employee.id).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        let err = f
            .service
            .get_retina(&intruder, own_org, f.employee.id, uploaded.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
        let err = f
            .service
            .delete_retina(&intruder, own_org, f.employee.id, uploaded.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));

        assert_eq!(f.blobs.paths().await.len(), 1);
    }

    #[tokio::test]
    async fn test_generic_upload_and_download() {
        let f = fixture().await;
        let stored = f.service.upload_image(file("scan.gif")).await.unwrap();
        assert!(stored.path.starts_with("uploads/"));
        assert!(stored.path.ends_with(".gif"));

        let (bytes, content_type) = f.service.get_image(&stored.path).await.unwrap();
        assert_eq!(bytes, vec![1, 2, 3]);
        assert_eq!(content_type, "image/gif");

        let err = f.service.get_image("uploads/missing.png").await.unwrap_err();
        assert_eq!(err.to_string(), "Image not found");
    }

    #[tokio::test]
    async fn test_analysis_result_sets_document_once() {
        let f = fixture().await;
        let uploaded = f
            .service
            .upload_retina(&f.admin, f.employee.organization_id, f.employee.id, file("eye.png"))
            .await
            .unwrap();

        let result = ImageProcessingResult {
            status: "success".into(),
            id: Some("doc-1".into()),
            employee_id: Some(f.employee.id),
            img_id: uploaded.id,
        };
        assert!(f.service.apply_analysis_result(result.clone()).await.unwrap());
        assert!(!f.service.apply_analysis_result(result).await.unwrap());

        let stored = f.retinas.find_by_id(uploaded.id).await.unwrap().unwrap();
        assert_eq!(stored.document_id.as_deref(), Some("doc-1"));
    }
}
