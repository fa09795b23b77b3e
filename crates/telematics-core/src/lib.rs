//! telematics-core - Core types and pure logic for the telematics client
//!
//! Everything in this crate is synchronous and performs no IO. The async
//! client in `telematics-client` feeds raw service payloads through these
//! functions and keeps a [`StateReconciler`] per client instance.

pub mod codec;
pub mod error;
pub mod listing;
pub mod models;
pub mod poi;
pub mod reconcile;
pub mod status;

pub use error::{DecodeError, DecodeResult};
pub use listing::{parse_vehicle_listing, EnrolledVehicle, ENROLLED_FLAG};
pub use models::*;
pub use poi::{derive_poi_id, PointOfInterest};
pub use reconcile::{
    trust_window, LockObservation, ReconciliationEntry, StateReconciler, TRUST_WINDOW_SECS,
};
pub use status::normalize_status;
