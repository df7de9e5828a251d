//! Vendor id resolution strategies.
//!
//! Each strategy looks at the hints gathered for one resolution attempt and
//! either produces a non-empty vendor id or nothing. Strategies never fail:
//! network, backend and decode errors are logged and read as "no result".

use super::cookie::{ACCESS_TOKEN_COOKIE, SESSION_COOKIE};
use super::token::decode_subject;
use super::IdentityHints;
use crate::backend::Backend;
use async_trait::async_trait;
use log::*;
use std::sync::Arc;

/// One step of the resolution chain.
///
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short name used in log output.
    fn name(&self) -> &'static str;

    /// Try to produce a vendor id from the hints.
    async fn attempt(&self, hints: &IdentityHints) -> Option<String>;
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Id already known to the caller: route parameter, session, or configured default.
///
pub struct HintStrategy;

#[async_trait]
impl Strategy for HintStrategy {
    fn name(&self) -> &'static str {
        "hint"
    }

    async fn attempt(&self, hints: &IdentityHints) -> Option<String> {
        hints.vendor_id.as_deref().and_then(non_empty)
    }
}

/// Id carried directly in the login response body.
///
pub struct LoginResponseStrategy;

#[async_trait]
impl Strategy for LoginResponseStrategy {
    fn name(&self) -> &'static str {
        "login-response"
    }

    async fn attempt(&self, hints: &IdentityHints) -> Option<String> {
        hints
            .login
            .as_ref()
            .and_then(|login| login.vendor_id.as_deref())
            .and_then(non_empty)
    }
}

/// Subject claim of the access token, taken from the login response or,
/// failing that, from the access token cookie.
///
pub struct TokenStrategy;

#[async_trait]
impl Strategy for TokenStrategy {
    fn name(&self) -> &'static str {
        "token"
    }

    async fn attempt(&self, hints: &IdentityHints) -> Option<String> {
        let from_login = hints
            .login
            .as_ref()
            .and_then(|login| login.access_token.as_deref())
            .and_then(|token| non_empty(&decode_subject(token)));
        from_login.or_else(|| {
            hints
                .cookies
                .get(ACCESS_TOKEN_COOKIE)
                .and_then(|token| non_empty(&decode_subject(token)))
        })
    }
}

/// Direct `findVendorByEmail` lookup.
///
pub struct EmailLookupStrategy {
    backend: Arc<Backend>,
}

impl EmailLookupStrategy {
    pub fn new(backend: Arc<Backend>) -> Self {
        EmailLookupStrategy { backend }
    }
}

#[async_trait]
impl Strategy for EmailLookupStrategy {
    fn name(&self) -> &'static str {
        "email-lookup"
    }

    async fn attempt(&self, hints: &IdentityHints) -> Option<String> {
        let email = hints.email.as_deref().and_then(non_empty)?;
        match self.backend.find_vendor_by_email(&email).await {
            Ok(Some(vendor)) => non_empty(&vendor.id),
            Ok(None) => {
                debug!("No vendor registered with email {}", email);
                None
            }
            Err(e) => {
                warn!("Vendor lookup by email failed: {}", e);
                None
            }
        }
    }
}

/// `findAllVendors` followed by a client-side email match. Without an email
/// to match against, the first listed vendor is taken.
///
pub struct VendorListStrategy {
    backend: Arc<Backend>,
}

impl VendorListStrategy {
    pub fn new(backend: Arc<Backend>) -> Self {
        VendorListStrategy { backend }
    }
}

#[async_trait]
impl Strategy for VendorListStrategy {
    fn name(&self) -> &'static str {
        "vendor-list"
    }

    async fn attempt(&self, hints: &IdentityHints) -> Option<String> {
        let vendors = match self.backend.find_all_vendors().await {
            Ok(vendors) => vendors,
            Err(e) => {
                warn!("Vendor list lookup failed: {}", e);
                return None;
            }
        };
        let target = hints
            .email
            .as_deref()
            .map(|email| email.trim().to_lowercase())
            .filter(|email| !email.is_empty());
        let found = match target {
            Some(target) => vendors
                .iter()
                .find(|vendor| vendor.email.trim().to_lowercase() == target),
            None => vendors.first(),
        };
        found.and_then(|vendor| non_empty(&vendor.id))
    }
}

/// Subject claim of the vendor session cookie.
///
pub struct CookieStrategy;

#[async_trait]
impl Strategy for CookieStrategy {
    fn name(&self) -> &'static str {
        "cookie"
    }

    async fn attempt(&self, hints: &IdentityHints) -> Option<String> {
        hints
            .cookies
            .get(SESSION_COOKIE)
            .and_then(|token| non_empty(&decode_subject(token)))
    }
}

/// The full chain in priority order.
///
pub fn default_chain(backend: Arc<Backend>) -> Vec<Box<dyn Strategy>> {
    vec![
        Box::new(HintStrategy),
        Box::new(LoginResponseStrategy),
        Box::new(TokenStrategy),
        Box::new(EmailLookupStrategy::new(Arc::clone(&backend))),
        Box::new(VendorListStrategy::new(backend)),
        Box::new(CookieStrategy),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::LoginResponse;
    use crate::identity::CookieJar;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;
    use httpmock::MockServer;
    use serde_json::json;

    fn token_for(sub: &str) -> String {
        format!(
            "e30.{}.sig",
            URL_SAFE_NO_PAD.encode(json!({ "sub": sub }).to_string())
        )
    }

    fn backend_for(server: &MockServer) -> Arc<Backend> {
        Arc::new(Backend::new(&server.base_url(), &server.url("/graphql")).unwrap())
    }

    #[tokio::test]
    async fn hint_strategy_ignores_blank_ids() {
        let hints = IdentityHints {
            vendor_id: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(HintStrategy.attempt(&hints).await, None);

        let hints = IdentityHints {
            vendor_id: Some(" V9 ".to_string()),
            ..Default::default()
        };
        assert_eq!(HintStrategy.attempt(&hints).await.as_deref(), Some("V9"));
    }

    #[tokio::test]
    async fn token_strategy_prefers_login_token() {
        let mut cookies = CookieJar::default();
        cookies.insert(ACCESS_TOKEN_COOKIE, &token_for("FROM_COOKIE"));
        let hints = IdentityHints {
            login: Some(LoginResponse {
                access_token: Some(token_for("FROM_LOGIN")),
                vendor_id: None,
                ..Default::default()
            }),
            cookies: cookies.clone(),
            ..Default::default()
        };
        assert_eq!(TokenStrategy.attempt(&hints).await.as_deref(), Some("FROM_LOGIN"));

        let hints = IdentityHints {
            login: Some(LoginResponse {
                access_token: Some("garbage".to_string()),
                vendor_id: None,
                ..Default::default()
            }),
            cookies,
            ..Default::default()
        };
        assert_eq!(TokenStrategy.attempt(&hints).await.as_deref(), Some("FROM_COOKIE"));
    }

    #[tokio::test]
    async fn cookie_strategy_reads_session_cookie_only() {
        let mut cookies = CookieJar::default();
        cookies.insert(ACCESS_TOKEN_COOKIE, &token_for("ACCESS"));
        let hints = IdentityHints {
            cookies: cookies.clone(),
            ..Default::default()
        };
        assert_eq!(CookieStrategy.attempt(&hints).await, None);

        cookies.insert(SESSION_COOKIE, &token_for("SESSION"));
        let hints = IdentityHints {
            cookies,
            ..Default::default()
        };
        assert_eq!(CookieStrategy.attempt(&hints).await.as_deref(), Some("SESSION"));
    }

    #[tokio::test]
    async fn vendor_list_matches_email_case_insensitively() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/graphql").body_contains("findAllVendors");
                then.status(200).json_body(json!({
                    "data": { "findAllVendors": [
                        { "id": "1", "email": "a@b.com" },
                        { "id": "2", "email": "c@d.com" }
                    ] }
                }));
            })
            .await;

        let strategy = VendorListStrategy::new(backend_for(&server));
        let hints = IdentityHints {
            email: Some("  C@D.COM ".to_string()),
            ..Default::default()
        };
        assert_eq!(strategy.attempt(&hints).await.as_deref(), Some("2"));

        let hints = IdentityHints::default();
        assert_eq!(strategy.attempt(&hints).await.as_deref(), Some("1"));

        let hints = IdentityHints {
            email: Some("nobody@example.com".to_string()),
            ..Default::default()
        };
        assert_eq!(strategy.attempt(&hints).await, None);
        mock.assert_hits_async(3).await;
    }

    #[tokio::test]
    async fn email_lookup_without_email_skips_network() {
        let server = MockServer::start();
        let mock = server
            .mock_async(|when, then| {
                when.method("POST").path("/graphql");
                then.status(200);
            })
            .await;

        let strategy = EmailLookupStrategy::new(backend_for(&server));
        assert_eq!(strategy.attempt(&IdentityHints::default()).await, None);
        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn email_lookup_swallows_backend_errors() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/graphql");
                then.status(503).body("unavailable");
            })
            .await;

        let strategy = EmailLookupStrategy::new(backend_for(&server));
        let hints = IdentityHints {
            email: Some("a@b.com".to_string()),
            ..Default::default()
        };
        assert_eq!(strategy.attempt(&hints).await, None);
    }
}
