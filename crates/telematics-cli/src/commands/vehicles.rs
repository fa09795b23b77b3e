//! Vehicles command - list enrolled vehicles

use anyhow::Result;
use telematics_client::TelematicsClient;

use crate::output::{OutputContext, VehicleRow};

/// List every vehicle enrolled on the account
pub async fn vehicles(client: &TelematicsClient, ctx: &OutputContext) -> Result<()> {
    let vehicles = client.get_vehicles().await?;

    let rows: Vec<VehicleRow> = vehicles
        .into_iter()
        .map(|v| {
            let model = match (v.carline_name, v.model_name) {
                (Some(carline), Some(model)) => format!("{} {}", carline, model),
                (Some(name), None) | (None, Some(name)) => name,
                (None, None) => "-".to_string(),
            };
            VehicleRow {
                id: v.id.round_trip_text(),
                vin: v.vin,
                nickname: v.nickname.unwrap_or_else(|| "-".to_string()),
                model,
                year: v.model_year.unwrap_or_else(|| "-".to_string()),
                color: v.exterior_color_name.unwrap_or_else(|| "-".to_string()),
            }
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}
