//! Health command - dump the raw health report

use anyhow::Result;
use telematics_client::{TelematicsClient, VehicleId};

use crate::output::OutputContext;

pub async fn health(
    client: &TelematicsClient,
    vehicle: &VehicleId,
    ctx: &OutputContext,
) -> Result<()> {
    let report = client.get_health_report(vehicle).await?;
    ctx.print_value(&report);
    Ok(())
}
