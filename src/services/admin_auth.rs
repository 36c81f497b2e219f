use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::{generate_jwt, Claims, JwtError};
use crate::config::SecurityConfig;
use crate::domain::redact_email;

/// A verified identity: who the credentials belong to. Says nothing about
/// admin capability.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

/// Credential verification seam. The hosted-provider call sits behind this
/// so the authorization logic stays provider-agnostic.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verify(&self, email: &str, password: &str) -> Result<Identity, IdentityError>;
}

struct StaticUser {
    id: Uuid,
    password_digest: String,
}

/// Identity provider backed by configured `email:sha256-hex` credential
/// records. Each user gets a stable id for the lifetime of the process.
pub struct StaticIdentityProvider {
    users: HashMap<String, StaticUser>,
}

impl StaticIdentityProvider {
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let users = pairs
            .iter()
            .map(|(email, digest)| {
                (
                    email.to_lowercase(),
                    StaticUser {
                        id: Uuid::new_v4(),
                        password_digest: digest.to_lowercase(),
                    },
                )
            })
            .collect();
        Self { users }
    }
}

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify(&self, email: &str, password: &str) -> Result<Identity, IdentityError> {
        let user = self
            .users
            .get(&email.trim().to_lowercase())
            .ok_or(IdentityError::InvalidCredentials)?;

        if sha256_hex(password) != user.password_digest {
            return Err(IdentityError::InvalidCredentials);
        }

        Ok(Identity {
            id: user.id,
            email: email.trim().to_lowercase(),
        })
    }
}

pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Error)]
pub enum AuthGateError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("not an admin")]
    NotAnAdmin,

    #[error("identity provider unavailable: {0}")]
    ProviderUnavailable(String),

    #[error(transparent)]
    Jwt(#[from] JwtError),
}

/// A freshly issued admin session.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub token: String,
    pub user_id: Uuid,
    pub email: String,
    pub is_super_admin: bool,
}

/// The admin gate: identity verification, then allow-list authorization,
/// then session issue. Identity success without allow-list membership issues
/// nothing - the caller stays signed out.
pub struct AdminAuthService {
    provider: Arc<dyn IdentityProvider>,
    admin_emails: Vec<String>,
    super_admin_emails: Vec<String>,
    jwt_secret: String,
    session_hours: u64,
}

impl AdminAuthService {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        admin_emails: Vec<String>,
        super_admin_emails: Vec<String>,
        jwt_secret: String,
        session_hours: u64,
    ) -> Self {
        Self {
            provider,
            admin_emails,
            super_admin_emails,
            jwt_secret,
            session_hours,
        }
    }

    /// Build the gate from configuration, using the static credential
    /// provider.
    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(
            Arc::new(StaticIdentityProvider::from_pairs(&security.auth_users)),
            security.admin_emails.clone(),
            security.super_admin_emails.clone(),
            security.jwt_secret.clone(),
            security.jwt_expiry_hours,
        )
    }

    pub async fn authenticate(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AdminSession, AuthGateError> {
        let identity = self.provider.verify(email, password).await.map_err(|err| match err {
            IdentityError::InvalidCredentials => AuthGateError::InvalidCredentials,
            IdentityError::Unavailable(detail) => AuthGateError::ProviderUnavailable(detail),
        })?;

        // Identity success alone is insufficient; admin capability requires
        // allow-list membership.
        let email = identity.email.to_lowercase();
        if !self.admin_emails.contains(&email) {
            tracing::warn!(
                email = %redact_email(&email),
                "authenticated identity is not on the admin allow-list"
            );
            return Err(AuthGateError::NotAnAdmin);
        }

        let is_super_admin = self.super_admin_emails.contains(&email);
        let claims = Claims::new(identity.id, email.clone(), is_super_admin, self.session_hours);
        let token = generate_jwt(&claims, &self.jwt_secret)?;

        tracing::info!(email = %redact_email(&email), "admin session issued");
        Ok(AdminSession {
            token,
            user_id: identity.id,
            email,
            is_super_admin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::decode_jwt;

    fn provider_with(email: &str, password: &str) -> Arc<StaticIdentityProvider> {
        Arc::new(StaticIdentityProvider::from_pairs(&[(
            email.to_string(),
            sha256_hex(password),
        )]))
    }

    fn gate(provider: Arc<dyn IdentityProvider>, admins: &[&str], supers: &[&str]) -> AdminAuthService {
        AdminAuthService::new(
            provider,
            admins.iter().map(|s| s.to_string()).collect(),
            supers.iter().map(|s| s.to_string()).collect(),
            "test-secret".to_string(),
            24,
        )
    }

    #[tokio::test]
    async fn wrong_password_is_invalid_credentials() {
        let service = gate(provider_with("admin@fynda.io", "pw"), &["admin@fynda.io"], &[]);
        let err = service.authenticate("admin@fynda.io", "nope").await.unwrap_err();
        assert!(matches!(err, AuthGateError::InvalidCredentials));
    }

    #[tokio::test]
    async fn unknown_identity_is_invalid_credentials() {
        let service = gate(provider_with("admin@fynda.io", "pw"), &["admin@fynda.io"], &[]);
        let err = service.authenticate("ghost@fynda.io", "pw").await.unwrap_err();
        assert!(matches!(err, AuthGateError::InvalidCredentials));
    }

    #[tokio::test]
    async fn authenticated_but_unlisted_identity_gets_no_session() {
        let service = gate(provider_with("user@fynda.io", "pw"), &["admin@fynda.io"], &[]);
        let err = service.authenticate("user@fynda.io", "pw").await.unwrap_err();
        assert!(matches!(err, AuthGateError::NotAnAdmin));
    }

    #[tokio::test]
    async fn listed_admin_gets_a_decodable_session() {
        let service = gate(
            provider_with("Admin@Fynda.io", "pw"),
            &["admin@fynda.io"],
            &["admin@fynda.io"],
        );
        let session = service.authenticate("Admin@Fynda.io", "pw").await.unwrap();
        assert!(session.is_super_admin);
        assert_eq!(session.email, "admin@fynda.io");

        let claims = decode_jwt(&session.token, "test-secret").unwrap();
        assert_eq!(claims.sub, session.user_id);
        assert!(claims.admin);
        assert!(claims.is_super_admin);
    }

    #[tokio::test]
    async fn non_super_admin_is_flagged_as_such() {
        let service = gate(provider_with("ops@fynda.io", "pw"), &["ops@fynda.io"], &[]);
        let session = service.authenticate("ops@fynda.io", "pw").await.unwrap();
        assert!(!session.is_super_admin);
    }
}
