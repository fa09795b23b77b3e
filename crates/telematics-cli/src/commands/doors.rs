//! Lock and unlock commands

use anyhow::Result;
use telematics_client::{TelematicsClient, VehicleId};

use crate::output::OutputContext;

/// Lock all doors
pub async fn lock(
    client: &TelematicsClient,
    vehicle: &VehicleId,
    ctx: &OutputContext,
) -> Result<()> {
    client.lock_doors(vehicle).await?;
    ctx.success(&format!("Lock requested for vehicle {}", vehicle));
    Ok(())
}

/// Unlock all doors
pub async fn unlock(
    client: &TelematicsClient,
    vehicle: &VehicleId,
    ctx: &OutputContext,
) -> Result<()> {
    client.unlock_doors(vehicle).await?;
    ctx.success(&format!("Unlock requested for vehicle {}", vehicle));
    Ok(())
}
