//! POI command - send a destination to the vehicle's navigation

use anyhow::{bail, Result};
use telematics_client::{PointOfInterest, TelematicsClient, VehicleId};

use crate::output::OutputContext;

/// Send a named point of interest
pub async fn poi(
    client: &TelematicsClient,
    vehicle: &VehicleId,
    name: &str,
    latitude: f64,
    longitude: f64,
    ctx: &OutputContext,
) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        bail!("Coordinates out of range: {}, {}", latitude, longitude);
    }

    client.send_poi(vehicle, latitude, longitude, name).await?;

    let id = PointOfInterest::new(name, latitude, longitude).poi_id();
    ctx.success(&format!("Sent '{}' to vehicle {} (poi {})", name, vehicle, id));
    Ok(())
}
