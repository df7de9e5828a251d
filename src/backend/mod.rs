mod client;
mod error;
mod models;
pub mod queries;
mod resource;

pub use client::Client;
pub use error::ApiError;
pub use resource::*;

use crate::identity::{VendorId, ACCESS_TOKEN_COOKIE};
use log::*;
use models::*;
use serde_json::json;

/// Responsible for asynchronous interaction with the marketplace backend
/// including transformation of response data into explicitly-defined types.
///
pub struct Backend {
    client: Client,
}

impl Backend {
    /// Returns a new instance for the given REST base URL and GraphQL endpoint.
    ///
    pub fn new(base_url: &str, graphql_url: &str) -> Result<Backend, ApiError> {
        debug!(
            "Initializing backend client for {} (GraphQL at {})...",
            base_url, graphql_url
        );
        Ok(Backend {
            client: Client::new(base_url, graphql_url)?,
        })
    }

    /// Use the given bearer token for subsequent GraphQL requests.
    ///
    pub fn set_access_token(&self, token: Option<String>) {
        self.client.set_access_token(token);
    }

    pub fn access_token(&self) -> Option<String> {
        self.client.access_token()
    }

    /// Authenticate a vendor with email and password. The bearer token is
    /// taken from the body, or from the access token cookie when the body
    /// has none.
    ///
    pub async fn login_vendor(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        debug!("Logging in vendor {}...", email);
        let response = self.client.login(email, password).await?;
        let token = response
            .access_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .or_else(|| response.cookies.get(ACCESS_TOKEN_COOKIE));
        if let Some(token) = token {
            self.client.set_access_token(Some(token.to_string()));
        }
        Ok(response)
    }

    /// Look a vendor up directly by email.
    ///
    pub async fn find_vendor_by_email(&self, email: &str) -> Result<Option<VendorSummary>, ApiError> {
        debug!("Requesting vendor with email {}...", email);
        let data: FindVendorByEmailData = self
            .client
            .graphql(queries::FIND_VENDOR_BY_EMAIL, json!({ "email": email }))
            .await?;
        Ok(data.vendor.map(VendorSummary::from))
    }

    /// Returns every vendor the backend exposes.
    ///
    pub async fn find_all_vendors(&self) -> Result<Vec<VendorSummary>, ApiError> {
        debug!("Requesting full vendor list...");
        let data: FindAllVendorsData = self
            .client
            .graphql(queries::FIND_ALL_VENDORS, json!({}))
            .await?;
        debug!("Retrieved {} vendors", data.vendors.len());
        Ok(data.vendors.into_iter().map(VendorSummary::from).collect())
    }

    /// Returns the vendor's profile, or `None` if the backend does not know the id.
    ///
    pub async fn vendor_profile(&self, vendor_id: &VendorId) -> Result<Option<Vendor>, ApiError> {
        debug!("Requesting profile for vendor {}...", vendor_id);
        let data: FindVendorByIdData = self
            .client
            .graphql(queries::FIND_VENDOR_BY_ID, json!({ "id": vendor_id.as_str() }))
            .await?;
        Ok(data.vendor.map(Vendor::from))
    }

    /// Returns booking/view analytics for the vendor. A vendor with no
    /// analytics yet reads as all zeroes.
    ///
    pub async fn vendor_dashboard(&self, vendor_id: &VendorId) -> Result<Dashboard, ApiError> {
        debug!("Requesting dashboard for vendor {}...", vendor_id);
        let data: VendorDashboardData = self
            .client
            .graphql(
                queries::VENDOR_DASHBOARD,
                json!({ "vendorId": vendor_id.as_str() }),
            )
            .await?;
        Ok(data.dashboard.unwrap_or_default().into())
    }

    /// Returns the vendor's reservations sorted by event date.
    ///
    pub async fn vendor_reservations(&self, vendor_id: &VendorId) -> Result<Vec<Reservation>, ApiError> {
        debug!("Requesting reservations for vendor {}...", vendor_id);
        let data: BookingsByVendorData = self
            .client
            .graphql(
                queries::BOOKINGS_BY_VENDOR,
                json!({ "vendorId": vendor_id.as_str() }),
            )
            .await?;
        let mut reservations: Vec<Reservation> = data
            .reservations
            .into_iter()
            .filter_map(ReservationModel::into_reservation)
            .collect();
        reservations.sort_by(|a, b| a.event_date.cmp(&b.event_date));
        debug!(
            "Retrieved {} reservations for vendor {}",
            reservations.len(),
            vendor_id
        );
        Ok(reservations)
    }

    /// Returns the vendor's package catalog.
    ///
    pub async fn vendor_packages(&self, vendor_id: &VendorId) -> Result<Vec<Package>, ApiError> {
        debug!("Requesting packages for vendor {}...", vendor_id);
        let data: PackagesByVendorData = self
            .client
            .graphql(
                queries::PACKAGES_BY_VENDOR,
                json!({ "vendorId": vendor_id.as_str() }),
            )
            .await?;
        Ok(data.packages.into_iter().map(Package::from).collect())
    }
}
