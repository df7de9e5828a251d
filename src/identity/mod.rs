//! Vendor identity resolution.
//!
//! Screens only know fragments of who the vendor is: a route parameter, the
//! session, a login response, a token, a cookie. The `Resolver` runs an
//! ordered chain of strategies over those fragments and the first non-empty
//! vendor id wins. The result is written back into the session so later
//! screens skip the chain entirely.

mod cookie;
mod error;
pub mod strategy;
mod token;

pub use cookie::{CookieJar, ACCESS_TOKEN_COOKIE, SESSION_COOKIE};
pub use error::IdentityError;
pub use strategy::Strategy;
pub use token::decode_subject;

use crate::backend::{Backend, LoginResponse};
use crate::session::{SessionStore, VendorSession};
use log::*;
use std::fmt;
use std::sync::Arc;

/// A vendor id known to be non-empty. Data queries take this type, so they
/// cannot be issued for an unresolved vendor.
///
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VendorId(String);

impl VendorId {
    /// Returns `None` for empty or whitespace-only input.
    ///
    pub fn parse(raw: &str) -> Option<VendorId> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(VendorId(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything known about the vendor for a single resolution attempt.
///
#[derive(Clone, Debug, Default)]
pub struct IdentityHints {
    pub vendor_id: Option<String>,
    pub email: Option<String>,
    pub login: Option<LoginResponse>,
    pub cookies: CookieJar,
}

impl IdentityHints {
    /// Build hints for a screen mount. The id comes from the route parameter,
    /// then the session, then the configured default; the first non-empty
    /// one is kept.
    ///
    pub fn assemble(
        route_id: Option<&str>,
        session: &VendorSession,
        default_id: Option<&str>,
    ) -> Self {
        let vendor_id = [route_id, session.vendor_id.as_deref(), default_id]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|id| !id.is_empty())
            .map(str::to_owned);
        IdentityHints {
            vendor_id,
            email: session.email.clone().filter(|e| !e.trim().is_empty()),
            login: None,
            cookies: CookieJar::default(),
        }
    }

    pub fn with_login(mut self, login: LoginResponse) -> Self {
        self.login = Some(login);
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = Some(email.to_string());
        self
    }

    pub fn with_cookies(mut self, cookies: CookieJar) -> Self {
        self.cookies = cookies;
        self
    }
}

/// Runs the strategy chain and records the outcome in the session store.
///
pub struct Resolver {
    strategies: Vec<Box<dyn Strategy>>,
    session: Arc<SessionStore>,
}

impl Resolver {
    pub fn new(strategies: Vec<Box<dyn Strategy>>, session: Arc<SessionStore>) -> Self {
        Resolver {
            strategies,
            session,
        }
    }

    /// Resolver with the standard chain: hint, login response, token, email
    /// lookup, vendor list, cookie.
    ///
    pub fn with_backend(backend: Arc<Backend>, session: Arc<SessionStore>) -> Self {
        Resolver::new(strategy::default_chain(backend), session)
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Returns the first non-empty id produced by the chain, or an empty
    /// string when every strategy comes up short. Strategies run strictly in
    /// order and nothing is retried.
    ///
    pub async fn resolve(&self, hints: &IdentityHints) -> String {
        for strategy in &self.strategies {
            debug!("Trying vendor id strategy '{}'...", strategy.name());
            if let Some(id) = strategy.attempt(hints).await {
                if !id.trim().is_empty() {
                    debug!("Resolved vendor id {} via '{}'", id, strategy.name());
                    return id;
                }
            }
        }
        debug!("No strategy resolved a vendor id");
        String::new()
    }

    /// Resolve and persist the vendor id, surfacing `IdentityError::Unresolved`
    /// when the chain produced nothing.
    ///
    pub async fn resolve_vendor(&self, hints: &IdentityHints) -> Result<VendorId, IdentityError> {
        let resolved = self.resolve(hints).await;
        let vendor_id = match VendorId::parse(&resolved) {
            Some(id) => id,
            None => {
                warn!("Could not resolve vendor id from available hints");
                return Err(IdentityError::Unresolved);
            }
        };
        self.session.merge(VendorSession {
            vendor_id: Some(vendor_id.as_str().to_string()),
            email: hints.email.clone().filter(|e| !e.trim().is_empty()),
        });
        Ok(vendor_id)
    }

    /// Assemble hints from the route parameter, the current session and the
    /// default id, then resolve.
    ///
    pub async fn resolve_for_screen(
        &self,
        route_id: Option<&str>,
        default_id: Option<&str>,
        cookies: &CookieJar,
    ) -> Result<VendorId, IdentityError> {
        let session = self.session.read();
        let hints =
            IdentityHints::assemble(route_id, &session, default_id).with_cookies(cookies.clone());
        self.resolve_vendor(&hints).await
    }
}
