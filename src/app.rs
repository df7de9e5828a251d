use crate::backend::{Dashboard, Package, Vendor};
use crate::config::Config;
use crate::screens::{Portal, ReservationCalendar, ViewState};
use anyhow::{anyhow, Result};
use chrono::{Datelike, Utc};
use log::*;
use std::fmt::Write;

/// Specify the different commands the binary accepts.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { email: String, password: String },
    Logout,
    WhoAmI,
    Dashboard,
    Reservations { month: Option<(i32, u32)> },
    Packages,
    Profile,
}

/// Oversees command dispatch against the portal.
///
pub struct App {
    portal: Portal,
    route_vendor_id: Option<String>,
}

impl App {
    /// Run a single command according to the given configuration and print
    /// its output.
    ///
    pub async fn run(config: Config, route_vendor_id: Option<String>, command: Command) -> Result<()> {
        debug!("Running command {:?}...", command);
        let app = App {
            portal: Portal::from_config(&config)?,
            route_vendor_id,
        };
        let output = app.execute(command).await?;
        println!("{}", output);
        Ok(())
    }

    /// Execute a command and return the text to show.
    ///
    pub async fn execute(&self, command: Command) -> Result<String> {
        let route_id = self.route_vendor_id.as_deref();
        match command {
            Command::Login { email, password } => {
                let vendor_id = self.portal.login(&email, &password).await?;
                Ok(format!("Logged in as vendor {}", vendor_id))
            }
            Command::Logout => {
                self.portal.logout();
                Ok("Logged out".to_string())
            }
            Command::WhoAmI => {
                let vendor_id = self.portal.vendor_id(route_id).await?;
                let session = self.portal.session().read();
                Ok(format!(
                    "vendor: {}\nemail: {}",
                    vendor_id,
                    session.email.as_deref().unwrap_or("-")
                ))
            }
            Command::Dashboard => into_output(self.portal.dashboard(route_id).await, render_dashboard),
            Command::Reservations { month } => {
                let (year, month) = month.unwrap_or_else(|| {
                    let today = Utc::now().date_naive();
                    (today.year(), today.month())
                });
                into_output(self.portal.reservations(route_id).await, |calendar| {
                    render_reservations(calendar, year, month)
                })
            }
            Command::Packages => into_output(self.portal.packages(route_id).await, |p| render_packages(p)),
            Command::Profile => into_output(self.portal.profile(route_id).await, render_profile),
        }
    }
}

fn into_output<T, F>(state: ViewState<T>, render: F) -> Result<String>
where
    F: FnOnce(&T) -> String,
{
    match state {
        ViewState::Loaded(data) => Ok(render(&data)),
        ViewState::Error(message) => Err(anyhow!(message)),
        ViewState::Loading => Err(anyhow!("screen did not finish loading")),
    }
}

fn render_dashboard(dashboard: &Dashboard) -> String {
    format!(
        "bookings: {} ({} pending, {} confirmed)\nviews: {}\nrevenue: {:.2}",
        dashboard.total_bookings,
        dashboard.pending_bookings,
        dashboard.confirmed_bookings,
        dashboard.total_views,
        dashboard.revenue
    )
}

fn render_reservations(calendar: &ReservationCalendar, year: i32, month: u32) -> String {
    let mut out = format!("{:04}-{:02}", year, month);
    let reservations = calendar.for_month(year, month);
    if reservations.is_empty() {
        out.push_str("\nno reservations");
        let months = calendar.months();
        if !months.is_empty() {
            let listed: Vec<String> = months
                .iter()
                .map(|(y, m)| format!("{:04}-{:02}", y, m))
                .collect();
            let _ = write!(out, "\nbooked months: {}", listed.join(", "));
        }
        return out;
    }
    for reservation in reservations {
        let _ = write!(
            out,
            "\n{}  {:<24} {:<10} {}",
            reservation.event_date,
            reservation.customer_name,
            reservation.status.label(),
            reservation.package_name.as_deref().unwrap_or("-")
        );
    }
    out
}

fn render_packages(packages: &[Package]) -> String {
    if packages.is_empty() {
        return "no packages".to_string();
    }
    packages
        .iter()
        .map(|p| {
            format!(
                "{:<24} {:>10.2}{}",
                p.name,
                p.price,
                if p.active { "" } else { "  (inactive)" }
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_profile(vendor: &Vendor) -> String {
    let mut out = format!("{}\nemail: {}", vendor.business_name, vendor.email);
    for (label, value) in [
        ("phone", &vendor.phone),
        ("category", &vendor.category),
        ("location", &vendor.location),
    ] {
        if let Some(value) = value {
            let _ = write!(out, "\n{}: {}", label, value);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, Reservation, ReservationStatus};
    use crate::identity::CookieJar;
    use crate::session::SessionStore;
    use chrono::NaiveDate;
    use fake::{Fake, Faker};
    use httpmock::MockServer;
    use serde_json::json;
    use std::sync::Arc;

    fn app_for(server: &MockServer, route_id: Option<&str>) -> App {
        let backend = Arc::new(Backend::new(&server.base_url(), &server.url("/graphql")).unwrap());
        App {
            portal: Portal::new(
                backend,
                Arc::new(SessionStore::in_memory()),
                None,
                CookieJar::default(),
            ),
            route_vendor_id: route_id.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn whoami_without_identity_fails() {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/graphql");
                then.status(500);
            })
            .await;

        let app = app_for(&server, None);
        let error = app.execute(Command::WhoAmI).await.unwrap_err();
        assert_eq!(error.to_string(), "could not resolve vendor id");
    }

    #[tokio::test]
    async fn packages_command_renders_list() -> Result<()> {
        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/graphql");
                then.status(200).json_body(json!({
                    "data": { "packagesByVendor": [
                        { "id": "1", "name": "Gold", "price": 2500.0, "isActive": false }
                    ] }
                }));
            })
            .await;

        let app = app_for(&server, Some("V1"));
        let output = app.execute(Command::Packages).await?;
        assert!(output.contains("Gold"));
        assert!(output.contains("2500.00"));
        assert!(output.contains("(inactive)"));
        Ok(())
    }

    #[test]
    fn test_render_reservations_for_month() {
        let mut reservation: Reservation = Faker.fake();
        reservation.event_date = NaiveDate::from_ymd_opt(2026, 6, 14).unwrap();
        reservation.customer_name = "Ana".to_string();
        reservation.status = ReservationStatus::Confirmed;
        let calendar = ReservationCalendar::from_reservations(vec![reservation]);

        let june = render_reservations(&calendar, 2026, 6);
        assert!(june.starts_with("2026-06"));
        assert!(june.contains("2026-06-14  Ana"));
        assert!(june.contains("confirmed"));
        let july = render_reservations(&calendar, 2026, 7);
        assert!(july.contains("no reservations"));
        assert!(july.ends_with("booked months: 2026-06"));
        let empty = render_reservations(&ReservationCalendar::default(), 2026, 7);
        assert!(!empty.contains("booked months"));
    }

    #[test]
    fn test_render_profile_skips_missing_fields() {
        let vendor = Vendor {
            id: "V1".to_string(),
            business_name: "Blossom Florals".to_string(),
            email: "hi@blossom.test".to_string(),
            phone: None,
            category: Some("Florist".to_string()),
            location: None,
        };
        let output = render_profile(&vendor);
        assert!(output.contains("category: Florist"));
        assert!(!output.contains("phone"));
    }
}
