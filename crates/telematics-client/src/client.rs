//! Telematics client implementation

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use telematics_core::{
    normalize_status, PointOfInterest, ReconciliationEntry, StateReconciler, VehicleId,
    VehicleRecord, VehicleStatus,
};
use tracing::{debug, info, instrument};

use crate::config::ClientConfig;
use crate::controller::Controller;
use crate::directory;
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};

/// Telematics service client
///
/// Issues remote commands and keeps a per-vehicle lock-state cache. Status
/// polls feed the authoritative half of the cache, lock/unlock commands the
/// assumed half; [`get_assumed_lock_state`](Self::get_assumed_lock_state)
/// resolves the two without touching the network.
///
/// All methods take `&self`, so one client can be shared behind an `Arc`.
pub struct TelematicsClient {
    controller: Controller,
    config: ClientConfig,
    reconciler: StateReconciler,
}

impl TelematicsClient {
    /// Create a client over an existing transport
    ///
    /// Fails with a configuration error if the credentials are empty.
    pub fn new(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            controller: Controller::new(transport),
            config,
            reconciler: StateReconciler::new(),
        })
    }

    /// Create a client that talks JSON over HTTP to `base_url`
    pub fn with_http(base_url: &str, config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(base_url, config.credentials.clone(), config.region)?;
        Self::new(config, Arc::new(transport))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the command dispatcher, for endpoints without a typed wrapper
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Log in with the configured credentials
    #[instrument(skip(self))]
    pub async fn validate_credentials(&self) -> Result<()> {
        self.controller.transport().login().await?;
        Ok(())
    }

    // =========================================================================
    // Vehicles and status
    // =========================================================================

    /// List enrolled vehicles
    #[instrument(skip(self))]
    pub async fn get_vehicles(&self) -> Result<Vec<VehicleRecord>> {
        directory::list_vehicles(&self.controller).await
    }

    /// Fetch and normalize the current status.
    ///
    /// Also records the authoritative lock state (locked only if no door
    /// reports unlocked) stamped with the report time.
    #[instrument(skip(self))]
    pub async fn get_vehicle_status(&self, vehicle_id: &VehicleId) -> Result<VehicleStatus> {
        let payload = self.controller.get_vehicle_status(vehicle_id).await?;
        let status = normalize_status(&payload)?;

        self.reconciler.record_authoritative(
            vehicle_id,
            status.all_doors_locked(),
            status.last_updated,
        );

        debug!(vehicle = %vehicle_id, last_updated = %status.last_updated, "Vehicle status updated");
        Ok(status)
    }

    /// Raw health report
    #[instrument(skip(self))]
    pub async fn get_health_report(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.controller.get_health_report(vehicle_id).await
    }

    /// Resolved lock state from the cache; `None` if nothing is known yet.
    /// No network call.
    pub fn get_assumed_lock_state(&self, vehicle_id: &VehicleId) -> Option<bool> {
        self.reconciler.resolve(vehicle_id)
    }

    /// Snapshot of the cached lock observations for a vehicle
    pub fn lock_state_entry(&self, vehicle_id: &VehicleId) -> ReconciliationEntry {
        self.reconciler.entry(vehicle_id)
    }

    pub fn reconciler(&self) -> &StateReconciler {
        &self.reconciler
    }

    // =========================================================================
    // Doors
    // =========================================================================

    /// Lock all doors. The cache assumes "locked" as soon as the command is
    /// issued; a failed command leaves that assumption until the trust
    /// window expires or a newer status poll overrides it.
    #[instrument(skip(self))]
    pub async fn lock_doors(&self, vehicle_id: &VehicleId) -> Result<()> {
        self.reconciler.record_assumed(vehicle_id, true, Utc::now());
        self.controller.door_lock(vehicle_id).await?;
        info!(vehicle = %vehicle_id, "Doors locked");
        Ok(())
    }

    /// Unlock all doors, assuming "unlocked" immediately
    #[instrument(skip(self))]
    pub async fn unlock_doors(&self, vehicle_id: &VehicleId) -> Result<()> {
        self.reconciler.record_assumed(vehicle_id, false, Utc::now());
        self.controller.door_unlock(vehicle_id).await?;
        info!(vehicle = %vehicle_id, "Doors unlocked");
        Ok(())
    }

    // =========================================================================
    // Other commands
    // =========================================================================

    #[instrument(skip(self))]
    pub async fn turn_on_hazard_lights(&self, vehicle_id: &VehicleId) -> Result<()> {
        self.controller.light_on(vehicle_id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn turn_off_hazard_lights(&self, vehicle_id: &VehicleId) -> Result<()> {
        self.controller.light_off(vehicle_id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn start_engine(&self, vehicle_id: &VehicleId) -> Result<()> {
        self.controller.engine_start(vehicle_id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn stop_engine(&self, vehicle_id: &VehicleId) -> Result<()> {
        self.controller.engine_stop(vehicle_id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn start_charging(&self, vehicle_id: &VehicleId) -> Result<()> {
        self.controller.charge_start(vehicle_id).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn stop_charging(&self, vehicle_id: &VehicleId) -> Result<()> {
        self.controller.charge_stop(vehicle_id).await?;
        Ok(())
    }

    /// Send a named destination to the vehicle's navigation system
    #[instrument(skip(self))]
    pub async fn send_poi(
        &self,
        vehicle_id: &VehicleId,
        latitude: f64,
        longitude: f64,
        name: &str,
    ) -> Result<()> {
        let poi = PointOfInterest::new(name, latitude, longitude);
        self.controller.send_poi(vehicle_id, &poi).await?;
        Ok(())
    }

    /// Rename a vehicle (VIN must be 17 characters, nickname at most 20)
    #[instrument(skip(self))]
    pub async fn update_nickname(&self, vin: &str, nickname: &str) -> Result<()> {
        self.controller.update_nickname(vin, nickname).await
    }

    #[instrument(skip(self))]
    pub async fn get_terms_and_conditions(&self) -> Result<Value> {
        self.controller.get_tac().await
    }

    #[instrument(skip(self))]
    pub async fn get_language_package(&self) -> Result<Value> {
        self.controller.get_language_pkg(self.config.region).await
    }

    /// Release the transport. The cache goes away with the client.
    pub async fn close(&self) {
        self.controller.transport().close().await;
    }
}
