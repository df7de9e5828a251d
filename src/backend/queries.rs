//! GraphQL documents sent to the backend.

pub const FIND_VENDOR_BY_EMAIL: &str = r#"
query FindVendorByEmail($email: String!) {
  findVendorByEmail(email: $email) { id email }
}"#;

pub const FIND_ALL_VENDORS: &str = r#"
query FindAllVendors {
  findAllVendors { id email }
}"#;

pub const FIND_VENDOR_BY_ID: &str = r#"
query FindVendorById($id: ID!) {
  findVendorById(id: $id) { id businessName email phone category location }
}"#;

pub const VENDOR_DASHBOARD: &str = r#"
query VendorDashboard($vendorId: ID!) {
  vendorDashboard(vendorId: $vendorId) {
    totalBookings totalViews pendingBookings confirmedBookings revenue
  }
}"#;

pub const BOOKINGS_BY_VENDOR: &str = r#"
query BookingsByVendor($vendorId: ID!) {
  bookingsByVendor(vendorId: $vendorId) {
    id eventDate customerName status packageName amount
  }
}"#;

pub const PACKAGES_BY_VENDOR: &str = r#"
query PackagesByVendor($vendorId: ID!) {
  packagesByVendor(vendorId: $vendorId) { id name description price isActive }
}"#;
