//! Authentication service: registration, login and refresh token rotation

use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::{User, UserRole};
use crate::errors::{AuthError, DomainError, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::password::{hash_password, verify_password};
use crate::services::token::TokenService;

/// Input of a self-service registration
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Authenticated user together with a fresh token pair
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: User,
    pub tokens: TokenPair,
}

/// Authentication service coordinating users and tokens
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    users: Arc<U>,
    tokens: TokenService<T>,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    pub fn new(users: Arc<U>, tokens: TokenService<T>) -> Self {
        Self { users, tokens }
    }

    pub fn token_service(&self) -> &TokenService<T> {
        &self.tokens
    }

    /// Creates a `VALIDATOR` account and logs it in
    pub async fn register(&self, registration: Registration) -> Result<AuthSession, DomainError> {
        if self
            .users
            .find_by_email(&registration.email)
            .await?
            .is_some()
        {
            return Err(AuthError::EmailAlreadyExists.into());
        }

        let user = User::new(
            registration.first_name,
            registration.last_name,
            registration.email,
            hash_password(&registration.password)?,
            UserRole::Validator,
        );
        let user = self.users.create(user).await?;
        tracing::info!(user_id = %user.id, "User registered");

        let tokens = self.tokens.issue_pair(&user).await?;
        Ok(AuthSession { user, tokens })
    }

    /// Checks credentials and issues a token pair
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, DomainError> {
        let user = match self.users.find_by_email(email).await? {
            Some(user) if verify_password(password, &user.password_hash) => user,
            _ => {
                tracing::warn!(email = %email, "Login failed");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let tokens = self.tokens.issue_pair(&user).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(AuthSession { user, tokens })
    }

    /// Rotates a refresh token: the presented one is deleted and a new pair issued
    pub async fn refresh(&self, user_id: Uuid, raw_token: &str) -> Result<TokenPair, DomainError> {
        let stored = self
            .tokens
            .find_refresh_token(raw_token)
            .await?
            .filter(|t| t.belongs_to(user_id))
            .ok_or(TokenError::InvalidRefreshToken)?;

        if stored.is_expired() {
            self.tokens.revoke(stored.id).await?;
            return Err(TokenError::RefreshTokenExpired.into());
        }

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        self.tokens.revoke(stored.id).await?;
        self.tokens.issue_pair(&user).await
    }

    /// Deletes the presented refresh token; unknown tokens are ignored
    pub async fn logout(&self, user_id: Uuid, raw_token: &str) -> Result<(), DomainError> {
        let Some(stored) = self.tokens.find_refresh_token(raw_token).await? else {
            return Ok(());
        };

        if !stored.belongs_to(user_id) {
            return Err(TokenError::InvalidRefreshToken.into());
        }

        self.tokens.revoke(stored.id).await?;
        Ok(())
    }

    /// Deletes every refresh token of the user, returning how many existed
    pub async fn logout_all(&self, user_id: Uuid) -> Result<u64, DomainError> {
        let count = self.tokens.revoke_all(user_id).await?;
        tracing::info!(user_id = %user_id, count, "Logged out from all devices");
        Ok(count)
    }

    /// Resolves an access token to the current state of its user
    pub async fn authenticate(&self, access_token: &str) -> Result<User, DomainError> {
        let claims = self.tokens.verify_access_token(access_token)?;
        let user_id = claims
            .user_id()
            .map_err(|_| TokenError::InvalidTokenFormat)?;

        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::UserNotFound.into())
    }

    /// Verifies a refresh JWT and returns the user id it was issued to
    pub fn authenticate_refresh(&self, refresh_token: &str) -> Result<Uuid, DomainError> {
        let claims = self.tokens.verify_refresh_token(refresh_token)?;
        claims
            .user_id()
            .map_err(|_| TokenError::InvalidTokenFormat.into())
    }
}
