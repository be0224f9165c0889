//! Startup tasks run before the server accepts requests

use rv_core::{Backend, DomainError, NewUser, Services, UserRole};

/// Account created by `seed_admin`
pub const SEED_ADMIN_EMAIL: &str = "admin@example.com";

/// Creates the initial super admin unless it already exists
///
/// Returns whether an account was created.
pub async fn seed_admin<B: Backend>(
    services: &Services<B>,
    password: &str,
) -> Result<bool, DomainError> {
    match services.users.find_by_email(SEED_ADMIN_EMAIL).await {
        Ok(_) => return Ok(false),
        Err(DomainError::NotFound { .. }) => {}
        Err(e) => return Err(e),
    }

    let admin = services
        .users
        .create(NewUser {
            first_name: "Super".to_string(),
            last_name: "Admin".to_string(),
            email: SEED_ADMIN_EMAIL.to_string(),
            password: password.to_string(),
            role: Some(UserRole::SuperAdmin),
            organization_id: None,
        })
        .await?;

    tracing::info!(user_id = %admin.id, "Seeded super admin account");
    Ok(true)
}
