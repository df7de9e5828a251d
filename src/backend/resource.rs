use crate::identity::CookieJar;
use chrono::NaiveDate;
use fake::Dummy;

/// Defines the successful login payload along with the cookies the login
/// response set.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: Option<String>,
    pub vendor_id: Option<String>,
    pub cookies: CookieJar,
}

/// Defines the id/email pair returned by vendor lookups.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct VendorSummary {
    pub id: String,
    pub email: String,
}

/// Defines vendor profile data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub struct Vendor {
    pub id: String,
    pub business_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
}

/// Defines dashboard analytics as aggregated by the backend.
///
#[derive(Clone, Debug, Default, Dummy, PartialEq)]
pub struct Dashboard {
    pub total_bookings: u64,
    pub total_views: u64,
    pub pending_bookings: u64,
    pub confirmed_bookings: u64,
    pub revenue: f64,
}

/// Specifying the different reservation states.
///
#[derive(Clone, Debug, Dummy, PartialEq, Eq)]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
    Other(String),
}

impl ReservationStatus {
    /// Parse a backend status string, ignoring case and surrounding space.
    ///
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" => ReservationStatus::Pending,
            "confirmed" => ReservationStatus::Confirmed,
            "cancelled" | "canceled" => ReservationStatus::Cancelled,
            "completed" => ReservationStatus::Completed,
            _ => ReservationStatus::Other(raw.trim().to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Other(other) => other,
        }
    }
}

/// Defines reservation (booking) data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub event_date: NaiveDate,
    pub customer_name: String,
    pub status: ReservationStatus,
    pub package_name: Option<String>,
    pub amount: Option<f64>,
}

/// Defines package (offering) data structure.
///
#[derive(Clone, Debug, Dummy, PartialEq)]
pub struct Package {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub active: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reservation_status_parse() {
        assert_eq!(ReservationStatus::parse(" Confirmed "), ReservationStatus::Confirmed);
        assert_eq!(ReservationStatus::parse("CANCELED"), ReservationStatus::Cancelled);
        assert_eq!(
            ReservationStatus::parse("on-hold"),
            ReservationStatus::Other("on-hold".to_string())
        );
        assert_eq!(ReservationStatus::parse("on-hold").label(), "on-hold");
    }
}
