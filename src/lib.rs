//! Vendor client for a wedding-services marketplace.
//!
//! The crate logs vendors in, works out which vendor id to query with, keeps
//! that identity in a session cache and loads dashboard, reservation, package
//! and profile data from the marketplace backend.

pub mod app;
pub mod backend;
pub mod config;
pub mod error;
pub mod identity;
pub mod logger;
pub mod screens;
pub mod session;

pub use error::{AppError, AppResult};
