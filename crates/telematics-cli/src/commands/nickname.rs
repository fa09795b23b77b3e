//! Nickname command - rename a vehicle

use anyhow::Result;
use telematics_client::TelematicsClient;

use crate::output::OutputContext;

/// Set the nickname for the vehicle with the given VIN
pub async fn nickname(
    client: &TelematicsClient,
    vin: &str,
    nickname: &str,
    ctx: &OutputContext,
) -> Result<()> {
    client.update_nickname(vin, nickname).await?;
    ctx.success(&format!("{} is now '{}'", vin, nickname));
    Ok(())
}
