//! Token entities for JWT-based authentication.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{User, UserRole};

/// Claims structure for JWT payload (shared by access and refresh tokens)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Email of the user at issue time
    pub email: String,

    /// Role of the user at issue time
    pub role: UserRole,

    /// Issued at timestamp
    pub iat: i64,

    /// Expiration timestamp
    pub exp: i64,

    /// Not before timestamp
    pub nbf: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// JWT ID; keeps two tokens issued in the same second distinct
    pub jti: String,
}

impl Claims {
    /// Creates claims for `user` valid for `lifetime` from now
    pub fn for_user(user: &User, lifetime: Duration, issuer: &str, audience: &str) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id.to_string(),
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
            nbf: now.timestamp(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        Utc::now().timestamp() >= self.exp
    }

    /// Gets the user ID from the claims
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }
}

/// Access and refresh token returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Refresh token record stored in the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    /// Unique identifier for the refresh token
    pub id: Uuid,

    /// User ID this token belongs to
    pub user_id: Uuid,

    /// SHA-256 of the refresh JWT, hex encoded
    pub token_hash: String,

    /// Timestamp when the token was created
    pub created_at: DateTime<Utc>,

    /// Timestamp when the token expires
    pub expires_at: DateTime<Utc>,
}

impl RefreshToken {
    pub fn new(user_id: Uuid, token_hash: String, expires_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            token_hash,
            created_at: Utc::now(),
            expires_at,
        }
    }

    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }

    pub fn belongs_to(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claims_for_user() {
        let user = User::new("A", "B", "a@b.c", "h", UserRole::Validator);
        let claims = Claims::for_user(&user, Duration::minutes(15), "iss", "aud");

        assert_eq!(claims.user_id().unwrap(), user.id);
        assert_eq!(claims.email, "a@b.c");
        assert_eq!(claims.role, UserRole::Validator);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
        assert!(!claims.is_expired());
    }

    #[test]
    fn test_claims_are_unique() {
        let user = User::new("A", "B", "a@b.c", "h", UserRole::Validator);
        let a = Claims::for_user(&user, Duration::minutes(1), "iss", "aud");
        let b = Claims::for_user(&user, Duration::minutes(1), "iss", "aud");
        assert_ne!(a.jti, b.jti);
    }

    #[test]
    fn test_refresh_token_expiry() {
        let user_id = Uuid::new_v4();
        let live = RefreshToken::new(user_id, "h".into(), Utc::now() + Duration::days(1));
        let dead = RefreshToken::new(user_id, "h".into(), Utc::now() - Duration::seconds(1));
        assert!(!live.is_expired());
        assert!(dead.is_expired());
        assert!(live.belongs_to(user_id));
    }

    #[test]
    fn test_token_pair_serialization() {
        let pair = TokenPair {
            access_token: "a".into(),
            refresh_token: "r".into(),
        };
        let json = serde_json::to_value(pair).unwrap();
        assert_eq!(json["accessToken"], "a");
        assert_eq!(json["refreshToken"], "r");
    }
}
