use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use shub_domain::config::JwtConfig;
use std::borrow::Cow;
use std::fmt::{self, Debug};

#[shub_derive::shub_error]
pub enum TokenError {
    #[error("JWT error{}: {source}", format_context(.context))]
    Jwt { source: jsonwebtoken::errors::Error, context: Option<Cow<'static, str>> },

    #[error("Invalid token configuration{}: {message}", format_context(.context))]
    Config { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// Session token payload. `sub` is the account id and nothing else about the account is embedded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
    pub iss: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

/// Issues and verifies session tokens.
#[async_trait]
pub trait TokenService: Debug + Send + Sync {
    async fn issue(&self, account_id: &str) -> Result<String, TokenError>;

    async fn verify(&self, token: &str) -> Result<Claims, TokenError>;
}

/// HS256 tokens signed with a shared secret.
pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: String,
    audience: Option<String>,
    ttl_seconds: u64,
}

impl Debug for JwtTokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl JwtTokenService {
    /// # Errors
    /// Returns [`TokenError::Config`] for an empty secret or a zero lifetime.
    pub fn new(config: &JwtConfig) -> Result<Self, TokenError> {
        if config.secret.is_empty() {
            return Err(TokenError::Config { message: "secret is empty".into(), context: None });
        }
        if config.ttl_seconds == 0 {
            return Err(TokenError::Config {
                message: "ttl_seconds must be greater than zero".into(),
                context: None,
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        match &config.audience {
            Some(audience) => validation.set_audience(&[audience]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            ttl_seconds: config.ttl_seconds,
        })
    }
}

#[async_trait]
impl TokenService for JwtTokenService {
    async fn issue(&self, account_id: &str) -> Result<String, TokenError> {
        let now = u64::try_from(Utc::now().timestamp()).unwrap_or_default();
        let claims = Claims {
            sub: account_id.to_owned(),
            iat: now,
            exp: now.saturating_add(self.ttl_seconds),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding).context("issuing token")
    }

    async fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> JwtTokenService {
        JwtTokenService::new(&JwtConfig { secret: secret.to_owned(), ..JwtConfig::default() })
            .expect("token service")
    }

    #[tokio::test]
    async fn issued_tokens_verify_to_the_account() {
        let tokens = service("s3cret");
        let jwt = tokens.issue("Ab3xK9pQ2mZt").await.expect("issue");
        let claims = tokens.verify(&jwt).await.expect("verify");

        assert_eq!(claims.sub, "Ab3xK9pQ2mZt");
        assert_eq!(claims.iss, "storehub");
        assert!(claims.exp > claims.iat);
    }

    #[tokio::test]
    async fn foreign_signatures_are_rejected() {
        let jwt = service("one").issue("u1").await.expect("issue");
        let err = service("two").verify(&jwt).await.unwrap_err();

        assert!(matches!(err, TokenError::Jwt { .. }));
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        let err = JwtTokenService::new(&JwtConfig { secret: String::new(), ..JwtConfig::default() })
            .unwrap_err();
        assert!(matches!(err, TokenError::Config { .. }));
    }
}
