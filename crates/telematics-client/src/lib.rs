//! Telematics Client Library
//!
//! Async client for a remote vehicle-telematics service. Issues
//! authenticated commands (doors, hazards, engine, charging, navigation),
//! reads vehicle status, and keeps a per-vehicle lock-state cache that
//! reconciles optimistic command results with the service's lagging reports.
//!
//! # Example
//!
//! ```rust,no_run
//! use telematics_client::{ClientConfig, Region, TelematicsClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ClientConfig::new("driver@example.com", "secret", Region::Mnao);
//!     let client = TelematicsClient::with_http("https://relay.example.com/prod/", config)?;
//!
//!     for vehicle in client.get_vehicles().await? {
//!         client.lock_doors(&vehicle.id).await?;
//!
//!         // Reports locked right away, even if the service still says unlocked
//!         println!("{}: locked = {:?}", vehicle.vin, client.get_assumed_lock_state(&vehicle.id));
//!     }
//!
//!     client.close().await;
//!     Ok(())
//! }
//! ```
//!
//! # Testing
//!
//! [`transport::MockTransport`] records every request for unit tests, and the
//! `testing` module runs an axum router as a fake service:
//!
//! ```rust,ignore
//! use telematics_client::testing::TestServer;
//!
//! let server = TestServer::start(fake_service_router()).await?;
//! let vehicles = server.client.get_vehicles().await?;
//! ```

mod client;
mod config;
pub mod controller;
pub mod directory;
mod error;
pub mod testing;
pub mod transport;

pub use client::TelematicsClient;
pub use config::{ClientConfig, Credentials, Region};
pub use controller::{Controller, RemoteCommand, SUCCESS_RESULT_CODE};
pub use error::{ErrorKind, Result, TelematicsError};
pub use transport::{ApiRequest, HttpMethod, HttpTransport, Transport, TransportError};

// Re-export core types for convenience
pub use telematics_core::{
    DoorLockStatus, DoorStatus, PointOfInterest, TirePressure, VehicleId, VehicleRecord,
    VehicleStatus, WindowStatus,
};
