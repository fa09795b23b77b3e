//! Status command - poll and display vehicle status

use anyhow::Result;
use telematics_client::{TelematicsClient, VehicleId};

use crate::output::{or_dash, yes_no, OutputContext};

/// Show the latest status report for a vehicle
pub async fn status(
    client: &TelematicsClient,
    vehicle: &VehicleId,
    ctx: &OutputContext,
) -> Result<()> {
    let status = client.get_vehicle_status(vehicle).await?;

    let position = match (status.latitude, status.longitude) {
        (Some(lat), Some(lon)) => format!("{:.6}, {:.6}", lat, lon),
        _ => "-".to_string(),
    };
    let tires = &status.tire_pressure;
    let open_doors = [
        ("driver", status.doors.driver_door_open),
        ("passenger", status.doors.passenger_door_open),
        ("rear left", status.doors.rear_left_door_open),
        ("rear right", status.doors.rear_right_door_open),
        ("trunk", status.doors.trunk_open),
        ("hood", status.doors.hood_open),
        ("fuel lid", status.doors.fuel_lid_open),
    ]
    .iter()
    .filter(|(_, open)| *open)
    .map(|(name, _)| *name)
    .collect::<Vec<_>>();

    // Lock state as reconciled against any command issued by this client
    let resolved = client.get_assumed_lock_state(vehicle);

    let pairs = vec![
        ("Vehicle", vehicle.round_trip_text()),
        ("Last updated", status.last_updated.to_rfc3339()),
        ("Position", position),
        ("Fuel", or_dash(status.fuel_remaining_percent, "%")),
        ("Range", or_dash(status.fuel_distance_remaining_km, " km")),
        ("Odometer", or_dash(status.odometer_km, " km")),
        (
            "Open",
            if open_doors.is_empty() {
                "none".to_string()
            } else {
                open_doors.join(", ")
            },
        ),
        ("Locked", yes_no(resolved)),
        ("Hazard lights", yes_no(Some(status.hazard_lights_on))),
        (
            "Tires (psi)",
            format!(
                "FL {} / FR {} / RL {} / RR {}",
                or_dash(tires.front_left_psi, ""),
                or_dash(tires.front_right_psi, ""),
                or_dash(tires.rear_left_psi, ""),
                or_dash(tires.rear_right_psi, ""),
            ),
        ),
    ];

    ctx.print_kv(&pairs);
    Ok(())
}
