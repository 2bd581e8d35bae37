//! Verification of caller credentials.
//!
//! The platform does not issue credentials itself. Callers present a bearer
//! token from the identity provider and `IdentityProvider::verify` turns it
//! into the caller's `Identity`.

use crate::error::Error;
use async_trait::async_trait;
use claims::IdentityClaims;
use entity::UserId;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use log::*;

pub(crate) mod claims;

/// The verified caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub user_id: UserId,
    pub email: String,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fails with `Unauthenticated` for any credential that does not verify.
    async fn verify(&self, credential: &str) -> Result<Identity, Error>;
}

/// Verifies HS256 tokens signed with a secret shared with the identity provider.
pub struct JwtIdentityProvider {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify(&self, credential: &str) -> Result<Identity, Error> {
        let token = decode::<IdentityClaims>(credential, &self.decoding_key, &self.validation)
            .map_err(|err| {
                debug!("Rejected identity token: {err}");
                Error::from(err)
            })?;

        if token.claims.sub.is_empty() {
            return Err(Error::unauthenticated());
        }

        Ok(Identity {
            user_id: token.claims.sub,
            email: token.claims.email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainErrorKind;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(sub: &str, exp_offset_secs: i64, iss: Option<&str>, secret: &str) -> String {
        let claims = IdentityClaims {
            sub: sub.to_string(),
            email: format!("{sub}@example.com"),
            exp: (chrono::Utc::now().timestamp() + exp_offset_secs) as usize,
            iss: iss.map(str::to_string),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_identity() {
        let provider = JwtIdentityProvider::new(SECRET, None);

        let identity = provider
            .verify(&token("user-1", 3600, None, SECRET))
            .await
            .unwrap();

        assert_eq!(
            identity,
            Identity {
                user_id: "user-1".to_string(),
                email: "user-1@example.com".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn wrong_secret_expired_or_garbage_tokens_are_unauthenticated() {
        let provider = JwtIdentityProvider::new(SECRET, None);

        for credential in [
            token("user-1", 3600, None, "another-secret"),
            token("user-1", -3600, None, SECRET),
            "not-a-token".to_string(),
        ] {
            let err = provider.verify(&credential).await.unwrap_err();
            assert_eq!(err.error_kind, DomainErrorKind::Unauthenticated);
        }
    }

    #[tokio::test]
    async fn issuer_is_enforced_when_configured() {
        let provider = JwtIdentityProvider::new(SECRET, Some("https://id.example.com"));

        assert!(provider
            .verify(&token("user-1", 3600, Some("https://id.example.com"), SECRET))
            .await
            .is_ok());

        let err = provider
            .verify(&token("user-1", 3600, Some("https://elsewhere"), SECRET))
            .await
            .unwrap_err();
        assert_eq!(err.error_kind, DomainErrorKind::Unauthenticated);
    }
}
