//! Hazard light, engine, and charging commands

use anyhow::Result;
use clap::ValueEnum;
use telematics_client::{TelematicsClient, VehicleId};

use crate::output::OutputContext;

/// Two-way switch shared by the on/off and start/stop commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Switch {
    #[value(alias = "start")]
    On,
    #[value(alias = "stop")]
    Off,
}

/// Turn hazard lights on or off
pub async fn hazards(
    client: &TelematicsClient,
    vehicle: &VehicleId,
    switch: Switch,
    ctx: &OutputContext,
) -> Result<()> {
    match switch {
        Switch::On => client.turn_on_hazard_lights(vehicle).await?,
        Switch::Off => client.turn_off_hazard_lights(vehicle).await?,
    }
    ctx.success(&format!(
        "Hazard lights {} for vehicle {}",
        if switch == Switch::On { "on" } else { "off" },
        vehicle
    ));
    Ok(())
}

/// Start or stop the engine remotely
pub async fn engine(
    client: &TelematicsClient,
    vehicle: &VehicleId,
    switch: Switch,
    ctx: &OutputContext,
) -> Result<()> {
    match switch {
        Switch::On => client.start_engine(vehicle).await?,
        Switch::Off => client.stop_engine(vehicle).await?,
    }
    ctx.success(&format!(
        "Engine {} requested for vehicle {}",
        if switch == Switch::On { "start" } else { "stop" },
        vehicle
    ));
    Ok(())
}

/// Start or stop charging
pub async fn charge(
    client: &TelematicsClient,
    vehicle: &VehicleId,
    switch: Switch,
    ctx: &OutputContext,
) -> Result<()> {
    match switch {
        Switch::On => client.start_charging(vehicle).await?,
        Switch::Off => client.stop_charging(vehicle).await?,
    }
    ctx.success(&format!(
        "Charging {} requested for vehicle {}",
        if switch == Switch::On { "start" } else { "stop" },
        vehicle
    ));
    Ok(())
}
