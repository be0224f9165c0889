//! Main token service implementation

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::entities::token::{Claims, RefreshToken, TokenPair};
use crate::domain::entities::user::User;
use crate::errors::{DomainError, TokenError};
use crate::repositories::TokenRepository;

use super::config::TokenServiceConfig;

/// Signing and verification material for one token kind
struct KeyPair {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl KeyPair {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// Service for issuing, verifying and persisting JWT tokens
///
/// Access and refresh tokens carry the same claims but are signed with
/// separate secrets, so one can never stand in for the other.
pub struct TokenService<R: TokenRepository> {
    repository: Arc<R>,
    config: TokenServiceConfig,
    access_keys: KeyPair,
    refresh_keys: KeyPair,
    validation: Validation,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service instance
    pub fn new(repository: Arc<R>, config: TokenServiceConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[config.issuer.as_str()]);
        validation.set_audience(&[config.audience.as_str()]);
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.leeway = 0;

        Self {
            repository,
            access_keys: KeyPair::from_secret(&config.access_secret),
            refresh_keys: KeyPair::from_secret(&config.refresh_secret),
            config,
            validation,
        }
    }

    /// Issues an access/refresh pair for a user and stores the refresh token hash
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Both signed tokens
    /// * `Err(DomainError)` - Signing or persistence failed
    pub async fn issue_pair(&self, user: &User) -> Result<TokenPair, DomainError> {
        let access_claims = Claims::for_user(
            user,
            self.config.access_lifetime,
            &self.config.issuer,
            &self.config.audience,
        );
        let refresh_claims = Claims::for_user(
            user,
            self.config.refresh_lifetime,
            &self.config.issuer,
            &self.config.audience,
        );

        let access_token = self.encode_jwt(&access_claims, &self.access_keys)?;
        let refresh_token = self.encode_jwt(&refresh_claims, &self.refresh_keys)?;

        let expires_at = Utc::now() + self.config.refresh_lifetime;
        self.repository
            .save(RefreshToken::new(
                user.id,
                Self::hash_token(&refresh_token),
                expires_at,
            ))
            .await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verifies an access token and returns its claims
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.decode_jwt(token, &self.access_keys)
    }

    /// Verifies a refresh JWT (signature and time claims only)
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, DomainError> {
        self.decode_jwt(token, &self.refresh_keys)
    }

    /// Looks up the stored record of a raw refresh token
    pub async fn find_refresh_token(
        &self,
        raw_token: &str,
    ) -> Result<Option<RefreshToken>, DomainError> {
        self.repository
            .find_by_hash(&Self::hash_token(raw_token.trim()))
            .await
    }

    /// Deletes one stored refresh token
    pub async fn revoke(&self, token_id: Uuid) -> Result<bool, DomainError> {
        self.repository.delete_by_id(token_id).await
    }

    /// Deletes every stored refresh token of a user
    pub async fn revoke_all(&self, user_id: Uuid) -> Result<u64, DomainError> {
        self.repository.delete_all_for_user(user_id).await
    }

    /// Hex SHA-256 of a raw token, the form tokens are stored in
    pub fn hash_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }

    fn encode_jwt(&self, claims: &Claims, keys: &KeyPair) -> Result<String, DomainError> {
        encode(&Header::new(Algorithm::HS256), claims, &keys.encoding).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            DomainError::Token(TokenError::TokenGenerationFailed)
        })
    }

    fn decode_jwt(&self, token: &str, keys: &KeyPair) -> Result<Claims, DomainError> {
        decode::<Claims>(token.trim(), &keys.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let error = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::TokenExpired,
                    ErrorKind::ImmatureSignature => TokenError::TokenNotYetValid,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::InvalidTokenFormat,
                };
                DomainError::Token(error)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::user::UserRole;
    use crate::repositories::MockTokenRepository;
    use chrono::Duration;

    fn service() -> (TokenService<MockTokenRepository>, Arc<MockTokenRepository>) {
        let repo = Arc::new(MockTokenRepository::new());
        (
            TokenService::new(repo.clone(), TokenServiceConfig::default()),
            repo,
        )
    }

    fn user() -> User {
        User::new("Ada", "Lovelace", "ada@example.com", "hash", UserRole::OrgAdmin)
    }

    #[tokio::test]
    async fn test_issue_pair_persists_refresh_hash() {
        let (service, repo) = service();
        let user = user();

        let pair = service.issue_pair(&user).await.unwrap();

        assert_eq!(repo.len().await, 1);
        let stored = service
            .find_refresh_token(&format!("  {}\n", pair.refresh_token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.user_id, user.id);
        assert_ne!(stored.token_hash, pair.refresh_token);
    }

    #[tokio::test]
    async fn test_tokens_are_not_interchangeable() {
        let (service, _) = service();
        let pair = service.issue_pair(&user()).await.unwrap();

        let claims = service.verify_access_token(&pair.access_token).unwrap();
        assert_eq!(claims.role, UserRole::OrgAdmin);
        assert!(service.verify_refresh_token(&pair.refresh_token).is_ok());

        assert!(matches!(
            service.verify_access_token(&pair.refresh_token),
            Err(DomainError::Token(TokenError::InvalidSignature))
        ));
        assert!(service.verify_refresh_token(&pair.access_token).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let (service, _) = service();
        let mut claims = Claims::for_user(&user(), Duration::minutes(5), "retina-verify", "retina-verify-api");
        claims.iat -= 3600;
        claims.nbf -= 3600;
        claims.exp = Utc::now().timestamp() - 60;
        let token = service.encode_jwt(&claims, &service.access_keys).unwrap();

        assert!(matches!(
            service.verify_access_token(&token),
            Err(DomainError::Token(TokenError::TokenExpired))
        ));
    }

    #[test]
    fn test_wrong_audience_rejected() {
        let (service, _) = service();
        let claims = Claims::for_user(&user(), Duration::minutes(5), "retina-verify", "someone-else");
        let token = service.encode_jwt(&claims, &service.access_keys).unwrap();

        assert!(service.verify_access_token(&token).is_err());
        assert!(service.verify_access_token("garbage").is_err());
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let a = TokenService::<MockTokenRepository>::hash_token("abc");
        assert_eq!(a.len(), 64);
        assert_eq!(
            a,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
