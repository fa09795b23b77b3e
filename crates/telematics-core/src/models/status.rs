//! Normalized vehicle status snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time status produced by one status poll
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleStatus {
    /// When the vehicle generated this report (UTC)
    pub last_updated: DateTime<Utc>,
    /// Signed latitude, negative in the southern hemisphere
    pub latitude: Option<f64>,
    /// Signed longitude, negative in the western hemisphere
    pub longitude: Option<f64>,
    /// Raw GPS acquisition time as reported
    pub position_timestamp: Option<String>,
    pub fuel_remaining_percent: Option<f64>,
    pub fuel_distance_remaining_km: Option<f64>,
    pub odometer_km: Option<f64>,
    pub doors: DoorStatus,
    pub door_locks: DoorLockStatus,
    pub windows: WindowStatus,
    pub hazard_lights_on: bool,
    pub tire_pressure: TirePressure,
}

impl VehicleStatus {
    /// Authoritative lock state: locked only when no door reports unlocked
    pub fn all_doors_locked(&self) -> bool {
        self.door_locks.all_locked()
    }
}

/// Open/closed state of doors and lids
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorStatus {
    pub driver_door_open: bool,
    pub passenger_door_open: bool,
    pub rear_left_door_open: bool,
    pub rear_right_door_open: bool,
    pub trunk_open: bool,
    pub hood_open: bool,
    pub fuel_lid_open: bool,
}

/// Per-door lock switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoorLockStatus {
    pub driver_door_unlocked: bool,
    pub passenger_door_unlocked: bool,
    pub rear_left_door_unlocked: bool,
    pub rear_right_door_unlocked: bool,
}

impl DoorLockStatus {
    pub fn all_locked(&self) -> bool {
        !(self.driver_door_unlocked
            || self.passenger_door_unlocked
            || self.rear_left_door_unlocked
            || self.rear_right_door_unlocked)
    }
}

/// Power window positions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowStatus {
    pub driver_window_open: bool,
    pub passenger_window_open: bool,
    pub rear_left_window_open: bool,
    pub rear_right_window_open: bool,
}

/// Tire pressures in PSI as displayed in the vehicle
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TirePressure {
    pub front_left_psi: Option<f64>,
    pub front_right_psi: Option<f64>,
    pub rear_left_psi: Option<f64>,
    pub rear_right_psi: Option<f64>,
}
