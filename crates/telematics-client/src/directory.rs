//! Vehicle directory: the enrolled vehicles on the account

use telematics_core::{parse_vehicle_listing, VehicleRecord};
use tracing::{info, instrument};

use crate::controller::Controller;
use crate::error::Result;

/// List enrolled vehicles in listing order.
///
/// One listing call, then one nickname call per enrolled vehicle, issued
/// sequentially. A vehicle whose embedded document does not parse fails the
/// whole listing.
#[instrument(skip(controller))]
pub async fn list_vehicles(controller: &Controller) -> Result<Vec<VehicleRecord>> {
    let payload = controller.get_vec_base_infos().await?;
    let enrolled = parse_vehicle_listing(&payload)?;

    let mut vehicles = Vec::with_capacity(enrolled.len());
    for vehicle in enrolled {
        let nickname = controller.get_nickname(vehicle.vin()).await?;
        vehicles.push(vehicle.with_nickname(nickname));
    }

    info!(count = vehicles.len(), "Listed enrolled vehicles");
    Ok(vehicles)
}
