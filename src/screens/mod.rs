//! Screen data loaders.
//!
//! Each screen resolves the vendor id first and only then queries the
//! backend. The result is a `ViewState` the caller renders however it likes;
//! calling a loader again is the "Try Again" action.

mod calendar;

pub use calendar::{parse_month, ReservationCalendar};

use crate::backend::{ApiError, Backend, Dashboard, Package, Vendor};
use crate::config::Config;
use crate::error::AppResult;
use crate::identity::{
    CookieJar, IdentityError, IdentityHints, Resolver, VendorId, ACCESS_TOKEN_COOKIE,
};
use crate::session::{DurableStore, FileStore, SessionStore, VendorSession};
use log::*;
use std::future::Future;
use std::sync::Arc;

/// Specifying the different view states of a screen.
///
#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Error(String),
    Loaded(T),
}

impl<T> Default for ViewState<T> {
    fn default() -> Self {
        ViewState::Loading
    }
}

impl<T> ViewState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, ViewState::Loading)
    }

    pub fn loaded(&self) -> Option<&T> {
        match self {
            ViewState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ViewState::Error(message) => Some(message),
            _ => None,
        }
    }
}

/// Owns the backend client, the resolver and the session shared by all screens.
///
pub struct Portal {
    backend: Arc<Backend>,
    resolver: Resolver,
    default_vendor_id: Option<String>,
    cookies: CookieJar,
}

impl Portal {
    pub fn new(
        backend: Arc<Backend>,
        session: Arc<SessionStore>,
        default_vendor_id: Option<String>,
        cookies: CookieJar,
    ) -> Self {
        let resolver = Resolver::with_backend(Arc::clone(&backend), session);
        Portal {
            backend,
            resolver,
            default_vendor_id,
            cookies,
        }
    }

    /// Build a portal from configuration, persisting the session next to the
    /// configuration file when its location is known. A configured access
    /// token cookie becomes the bearer token.
    ///
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let backend = Arc::new(Backend::new(&config.api_base_url, &config.graphql_url())?);
        let cookies = config.cookies();
        if let Some(token) = cookies.get(ACCESS_TOKEN_COOKIE) {
            debug!("Using access token from configured cookie");
            backend.set_access_token(Some(token.to_string()));
        }
        let durable = config
            .store_dir()
            .map(|dir| Box::new(FileStore::new(dir)) as Box<dyn DurableStore>);
        if durable.is_none() {
            debug!("No storage directory configured; session will not survive restarts");
        }
        Ok(Portal::new(
            backend,
            Arc::new(SessionStore::new(durable)),
            config.default_vendor_id.clone(),
            cookies,
        ))
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        self.resolver.session()
    }

    pub fn backend(&self) -> &Arc<Backend> {
        &self.backend
    }

    /// Log in and resolve the vendor id from the login response.
    ///
    /// Any previous session is dropped once the credentials are accepted, so
    /// a cached id from another account cannot leak into the new session.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<VendorId> {
        let email = email.trim();
        let response = self.backend.login_vendor(email, password).await?;
        info!("Vendor {} logged in", email);

        let session = self.session();
        session.clear();
        session.merge(VendorSession {
            vendor_id: None,
            email: Some(email.to_string()),
        });

        let mut cookies = self.cookies.clone();
        cookies.merge(response.cookies.clone());
        let hints = IdentityHints::default()
            .with_email(email)
            .with_login(response)
            .with_cookies(cookies);
        Ok(self.resolver.resolve_vendor(&hints).await?)
    }

    /// Forget the session and the bearer token.
    ///
    pub fn logout(&self) {
        self.session().clear();
        self.backend.set_access_token(None);
        info!("Vendor session cleared");
    }

    /// Resolve the vendor id for a screen mount.
    ///
    pub async fn vendor_id(&self, route_id: Option<&str>) -> Result<VendorId, IdentityError> {
        self.resolver
            .resolve_for_screen(route_id, self.default_vendor_id.as_deref(), &self.cookies)
            .await
    }

    pub async fn dashboard(&self, route_id: Option<&str>) -> ViewState<Dashboard> {
        let backend = Arc::clone(&self.backend);
        self.load("dashboard", route_id, |id| async move {
            backend.vendor_dashboard(&id).await
        })
        .await
    }

    pub async fn reservations(&self, route_id: Option<&str>) -> ViewState<ReservationCalendar> {
        let backend = Arc::clone(&self.backend);
        self.load("reservations", route_id, |id| async move {
            let reservations = backend.vendor_reservations(&id).await?;
            Ok::<_, ApiError>(ReservationCalendar::from_reservations(reservations))
        })
        .await
    }

    pub async fn packages(&self, route_id: Option<&str>) -> ViewState<Vec<Package>> {
        let backend = Arc::clone(&self.backend);
        self.load("packages", route_id, |id| async move {
            backend.vendor_packages(&id).await
        })
        .await
    }

    pub async fn profile(&self, route_id: Option<&str>) -> ViewState<Vendor> {
        let backend = Arc::clone(&self.backend);
        match self
            .load("profile", route_id, |id| async move {
                backend.vendor_profile(&id).await
            })
            .await
        {
            ViewState::Loaded(Some(vendor)) => ViewState::Loaded(vendor),
            ViewState::Loaded(None) => ViewState::Error("vendor not found".to_string()),
            ViewState::Error(message) => ViewState::Error(message),
            ViewState::Loading => ViewState::Loading,
        }
    }

    /// Resolve the vendor id, then run the screen's query. No query is issued
    /// when the id cannot be resolved.
    ///
    async fn load<T, F, Fut>(&self, screen: &str, route_id: Option<&str>, fetch: F) -> ViewState<T>
    where
        F: FnOnce(VendorId) -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        debug!("Loading {} screen...", screen);
        let vendor_id = match self.vendor_id(route_id).await {
            Ok(id) => id,
            Err(e) => {
                warn!("Cannot load {} screen: {}", screen, e);
                return ViewState::Error(e.to_string());
            }
        };
        match fetch(vendor_id).await {
            Ok(data) => ViewState::Loaded(data),
            Err(e) => {
                error!("Failed to load {} screen: {}", screen, e);
                ViewState::Error(e.to_string())
            }
        }
    }
}
