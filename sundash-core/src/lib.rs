//! Core library for the `sundash` sunrise/sunset dashboard.
//!
//! This crate defines:
//! - Configuration handling
//! - Abstractions over the location and sun-data services
//! - The today/tomorrow orchestration and its text rendering
//!
//! It is used by `sundash-cli`, but can also be reused by other front ends.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod orchestrator;
pub mod provider;
pub mod render;

pub use config::{Config, HomeConfig};
pub use dashboard::{Dashboard, RunTicket, Screen};
pub use error::LookupError;
pub use model::{Coordinates, DaySunData, Place, SunReport};
pub use orchestrator::SunDashboard;
pub use provider::{GeocodeClient, GeolocationProvider, LocatorId, SunDataClient};
