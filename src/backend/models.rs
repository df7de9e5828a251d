//! Wire models for login and GraphQL payloads.
//!
//! These mirror the JSON the backend sends. They are converted into the
//! types in `resource` before leaving the backend module.

use super::resource::*;
use crate::identity::CookieJar;
use chrono::NaiveDate;
use log::*;
use serde::{Deserialize, Deserializer, Serialize};

/// Accept ids sent either as JSON strings or numbers.
///
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_opt_id(deserializer)?.unwrap_or_default())
}

/// Optional variant of `deserialize_id`; `null` and non-scalar values read as `None`.
///
pub(crate) fn deserialize_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[derive(Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Body of a successful login. Deployments differ on the id spelling and some
/// send both, so each spelling gets its own field.
///
#[derive(Default, Deserialize)]
pub(crate) struct LoginResponseModel {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(rename = "vendorId", default, deserialize_with = "deserialize_opt_id")]
    pub vendor_id_camel: Option<String>,
    #[serde(rename = "vendor_id", default, deserialize_with = "deserialize_opt_id")]
    pub vendor_id_snake: Option<String>,
}

impl LoginResponseModel {
    pub fn into_response(self, cookies: CookieJar) -> LoginResponse {
        let vendor_id = self
            .vendor_id_camel
            .filter(|id| !id.is_empty())
            .or(self.vendor_id_snake.filter(|id| !id.is_empty()));
        LoginResponse {
            access_token: self.access_token,
            vendor_id,
            cookies,
        }
    }
}

/// Body of a failed login, when the backend answers with JSON.
///
#[derive(Deserialize)]
pub(crate) struct MessageBody {
    pub message: Option<String>,
}

#[derive(Serialize)]
pub(crate) struct GraphQlRequest<'a> {
    pub query: &'a str,
    pub variables: serde_json::Value,
}

#[derive(Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlErrorModel>,
}

#[derive(Deserialize)]
pub(crate) struct GraphQlErrorModel {
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize)]
pub(crate) struct VendorSummaryModel {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub email: Option<String>,
}

impl From<VendorSummaryModel> for VendorSummary {
    fn from(model: VendorSummaryModel) -> Self {
        VendorSummary {
            id: model.id,
            email: model.email.unwrap_or_default(),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct FindVendorByEmailData {
    #[serde(rename = "findVendorByEmail")]
    pub vendor: Option<VendorSummaryModel>,
}

#[derive(Deserialize)]
pub(crate) struct FindAllVendorsData {
    #[serde(rename = "findAllVendors", default)]
    pub vendors: Vec<VendorSummaryModel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VendorModel {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
}

impl From<VendorModel> for Vendor {
    fn from(model: VendorModel) -> Self {
        Vendor {
            id: model.id,
            business_name: model.business_name.unwrap_or_default(),
            email: model.email.unwrap_or_default(),
            phone: model.phone,
            category: model.category,
            location: model.location,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct FindVendorByIdData {
    #[serde(rename = "findVendorById")]
    pub vendor: Option<VendorModel>,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct DashboardModel {
    pub total_bookings: u64,
    pub total_views: u64,
    pub pending_bookings: u64,
    pub confirmed_bookings: u64,
    pub revenue: f64,
}

impl From<DashboardModel> for Dashboard {
    fn from(model: DashboardModel) -> Self {
        Dashboard {
            total_bookings: model.total_bookings,
            total_views: model.total_views,
            pending_bookings: model.pending_bookings,
            confirmed_bookings: model.confirmed_bookings,
            revenue: model.revenue,
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct VendorDashboardData {
    #[serde(rename = "vendorDashboard")]
    pub dashboard: Option<DashboardModel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReservationModel {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub event_date: Option<String>,
    pub customer_name: Option<String>,
    pub status: Option<String>,
    pub package_name: Option<String>,
    pub amount: Option<f64>,
}

impl ReservationModel {
    /// Normalize into a `Reservation`, dropping entries whose event date
    /// cannot be read as a calendar day.
    ///
    pub(crate) fn into_reservation(self) -> Option<Reservation> {
        let raw_date = self.event_date.unwrap_or_default();
        let event_date = match parse_event_date(&raw_date) {
            Some(date) => date,
            None => {
                warn!(
                    "Skipping reservation {} with unreadable event date '{}'",
                    self.id, raw_date
                );
                return None;
            }
        };
        Some(Reservation {
            id: self.id,
            event_date,
            customer_name: self.customer_name.unwrap_or_default(),
            status: ReservationStatus::parse(self.status.as_deref().unwrap_or_default()),
            package_name: self.package_name,
            amount: self.amount,
        })
    }
}

/// Read the calendar day from either `YYYY-MM-DD` or a full ISO timestamp.
///
pub(crate) fn parse_event_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[derive(Deserialize)]
pub(crate) struct BookingsByVendorData {
    #[serde(rename = "bookingsByVendor", default)]
    pub reservations: Vec<ReservationModel>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PackageModel {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub is_active: Option<bool>,
}

impl From<PackageModel> for Package {
    fn from(model: PackageModel) -> Self {
        Package {
            id: model.id,
            name: model.name.unwrap_or_default(),
            description: model.description,
            price: model.price.unwrap_or_default(),
            active: model.is_active.unwrap_or(true),
        }
    }
}

#[derive(Deserialize)]
pub(crate) struct PackagesByVendorData {
    #[serde(rename = "packagesByVendor", default)]
    pub packages: Vec<PackageModel>,
}
