use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

use super::storage;

/// Source of the raw access token
pub trait TokenSource: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Token kept in the browser's localStorage by the login screen
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageTokens;

impl TokenSource for LocalStorageTokens {
    fn access_token(&self) -> Option<String> {
        storage::get_access_token()
    }
}

/// Fixed token, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct StaticToken(pub Option<String>);

impl TokenSource for StaticToken {
    fn access_token(&self) -> Option<String> {
        self.0.clone()
    }
}

/// No usable credential: missing, blank or expired
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Authentication required")]
pub struct AuthRequired;

/// Bearer credential attached to every reports request
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

// Не печатаем токен в логах
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

#[derive(Deserialize)]
struct ExpiryClaim {
    exp: Option<i64>,
}

/// `exp` claim of a JWT, if the token is a JWT and carries one
fn jwt_expiry(token: &str) -> Option<i64> {
    let mut parts = token.split('.');
    let (_header, payload, _signature) = (parts.next()?, parts.next()?, parts.next()?);
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice::<ExpiryClaim>(&bytes).ok()?.exp
}

/// Explicit auth dependency of the reports engine
#[derive(Clone)]
pub struct AuthContext {
    source: Arc<dyn TokenSource>,
}

impl AuthContext {
    pub fn new(source: impl TokenSource + 'static) -> Self {
        Self {
            source: Arc::new(source),
        }
    }

    /// Context backed by localStorage
    pub fn browser() -> Self {
        Self::new(LocalStorageTokens)
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self::new(StaticToken(Some(token.into())))
    }

    pub fn anonymous() -> Self {
        Self::new(StaticToken(None))
    }

    pub fn credential(&self) -> Result<Credential, AuthRequired> {
        self.credential_at(chrono::Utc::now().timestamp())
    }

    /// Credential check against an explicit clock (unix seconds)
    pub fn credential_at(&self, now: i64) -> Result<Credential, AuthRequired> {
        let token = self.source.access_token().ok_or(AuthRequired)?;
        let token = token.trim();
        if token.is_empty() {
            return Err(AuthRequired);
        }
        if let Some(exp) = jwt_expiry(token) {
            if exp <= now {
                log::warn!("access token expired at {}", exp);
                return Err(AuthRequired);
            }
        }
        Ok(Credential(token.to_string()))
    }
}

impl fmt::Debug for AuthContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthContext").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jwt(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_missing_token_requires_auth() {
        assert_eq!(AuthContext::anonymous().credential_at(0), Err(AuthRequired));
        assert_eq!(AuthContext::with_token("   ").credential_at(0), Err(AuthRequired));
    }

    #[test]
    fn test_opaque_token_is_accepted() {
        let credential = AuthContext::with_token("abc123").credential_at(0).unwrap();
        assert_eq!(credential.bearer_header(), "Bearer abc123");
    }

    #[test]
    fn test_expired_jwt_requires_auth() {
        let auth = AuthContext::with_token(jwt(1_000));
        assert_eq!(auth.credential_at(2_000), Err(AuthRequired));
        assert!(auth.credential_at(500).is_ok());
    }

    #[test]
    fn test_credential_debug_hides_token() {
        let credential = AuthContext::with_token("secret").credential_at(0).unwrap();
        assert_eq!(format!("{credential:?}"), "Credential(***)");
    }
}
