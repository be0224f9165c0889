use serde::Deserialize;
use validator::{Validate, ValidationError};

use rv_shared::types::Pagination;

/// Symbols a password may contain besides letters and digits
const PASSWORD_SYMBOLS: &str = "@$!%*?&";

/// Password rule shared by registration and user creation
///
/// At least one lowercase letter, one uppercase letter, one digit and one of
/// `@$!%*?&`, and nothing outside those classes.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let allowed = password
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || PASSWORD_SYMBOLS.contains(c));
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    let has_symbol = password.chars().any(|c| PASSWORD_SYMBOLS.contains(c));

    if allowed && has_lower && has_upper && has_digit && has_symbol {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_strength");
        error.message = Some(
            rv_core::errors::ValidationError::WeakPassword
                .to_string()
                .into(),
        );
        Err(error)
    }
}

/// `?page=&limit=` query of list endpoints
#[derive(Debug, Clone, Copy, Default, Deserialize, Validate)]
pub struct PaginationQuery {
    #[validate(range(min = 1, message = "page must not be less than 1"))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 100, message = "limit must be between 1 and 100"))]
    pub limit: Option<u32>,
}

impl PaginationQuery {
    pub fn pagination(&self) -> Pagination {
        let defaults = Pagination::default();
        Pagination::new(
            self.page.unwrap_or(defaults.page),
            self.limit.unwrap_or(defaults.limit),
        )
    }
}
