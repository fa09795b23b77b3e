//! Status payload normalization
//!
//! A status payload carries two arrays, `alertInfos` (doors, locks,
//! windows, hazards, report time) and `remoteInfos` (position, fuel,
//! odometer, tire pressure). Only the first element of each is read.

use serde::Deserialize;
use serde_json::Value;

use crate::codec::{decode_latitude, decode_longitude, flag_is_set, parse_report_timestamp};
use crate::error::{DecodeError, DecodeResult};
use crate::models::{DoorLockStatus, DoorStatus, TirePressure, VehicleStatus, WindowStatus};

#[derive(Debug, Deserialize)]
struct RawStatus {
    #[serde(rename = "alertInfos", default)]
    alert_infos: Vec<RawAlertInfo>,
    #[serde(rename = "remoteInfos", default)]
    remote_infos: Vec<RawRemoteInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawAlertInfo {
    occurrence_date: Option<String>,
    door: Option<RawDoor>,
    pw: Option<RawWindows>,
    hazard_lamp: Option<RawHazardLamp>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawDoor {
    dr_stat_drv: Option<Value>,
    dr_stat_psngr: Option<Value>,
    dr_stat_rl: Option<Value>,
    dr_stat_rr: Option<Value>,
    dr_stat_trnk_lg: Option<Value>,
    dr_stat_hood: Option<Value>,
    fuel_lid_open_status: Option<Value>,
    lock_link_sw_drv: Option<Value>,
    lock_link_sw_psngr: Option<Value>,
    lock_link_sw_rl: Option<Value>,
    lock_link_sw_rr: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawWindows {
    pw_pos_drv: Option<Value>,
    pw_pos_psngr: Option<Value>,
    pw_pos_rl: Option<Value>,
    pw_pos_rr: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawHazardLamp {
    hazard_sw: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct RawRemoteInfo {
    #[serde(rename = "PositionInfo")]
    position_info: Option<RawPosition>,
    #[serde(rename = "ResidualFuel")]
    residual_fuel: Option<RawResidualFuel>,
    #[serde(rename = "DriveInformation")]
    drive_information: Option<RawDriveInformation>,
    #[serde(rename = "TPMSInformation")]
    tpms_information: Option<RawTpms>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPosition {
    latitude: Option<f64>,
    latitude_flag: Option<Value>,
    longitude: Option<f64>,
    longitude_flag: Option<Value>,
    acquisition_datetime: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawResidualFuel {
    // sic: the service spells it "Segement"
    #[serde(rename = "FuelSegementDActl")]
    fuel_segment_percent: Option<f64>,
    #[serde(rename = "RemDrvDistDActlKm")]
    remaining_distance_km: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDriveInformation {
    #[serde(rename = "OdoDispValue")]
    odometer: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTpms {
    #[serde(rename = "FLTPrsDispPsi")]
    front_left: Option<f64>,
    #[serde(rename = "FRTPrsDispPsi")]
    front_right: Option<f64>,
    #[serde(rename = "RLTPrsDispPsi")]
    rear_left: Option<f64>,
    #[serde(rename = "RRTPrsDispPsi")]
    rear_right: Option<f64>,
}

/// Normalize a raw status payload.
///
/// Missing nested groups normalize to absent/false fields. An empty
/// `alertInfos` or `remoteInfos` array, or a report timestamp that is not
/// `YYYYMMDDHHMMSS`, is a decode failure.
pub fn normalize_status(payload: &Value) -> DecodeResult<VehicleStatus> {
    let raw = RawStatus::deserialize(payload)?;

    let alert = raw
        .alert_infos
        .into_iter()
        .next()
        .ok_or(DecodeError::EmptyArray("alertInfos"))?;
    let remote = raw
        .remote_infos
        .into_iter()
        .next()
        .ok_or(DecodeError::EmptyArray("remoteInfos"))?;

    let occurrence = alert
        .occurrence_date
        .ok_or(DecodeError::MissingField("alertInfos[0].OccurrenceDate"))?;
    let last_updated = parse_report_timestamp(&occurrence)?;

    let position = remote.position_info.unwrap_or_default();
    let latitude = position
        .latitude
        .map(|magnitude| decode_latitude(magnitude, position.latitude_flag.as_ref()));
    let longitude = position
        .longitude
        .map(|magnitude| decode_longitude(magnitude, position.longitude_flag.as_ref()));

    let fuel = remote.residual_fuel.unwrap_or_default();
    let drive = remote.drive_information.unwrap_or_default();
    let tpms = remote.tpms_information.unwrap_or_default();
    let door = alert.door.unwrap_or_default();
    let windows = alert.pw.unwrap_or_default();
    let hazard = alert.hazard_lamp.unwrap_or_default();

    Ok(VehicleStatus {
        last_updated,
        latitude,
        longitude,
        position_timestamp: position.acquisition_datetime,
        fuel_remaining_percent: fuel.fuel_segment_percent,
        fuel_distance_remaining_km: fuel.remaining_distance_km,
        odometer_km: drive.odometer,
        doors: DoorStatus {
            driver_door_open: flag_is_set(door.dr_stat_drv.as_ref()),
            passenger_door_open: flag_is_set(door.dr_stat_psngr.as_ref()),
            rear_left_door_open: flag_is_set(door.dr_stat_rl.as_ref()),
            rear_right_door_open: flag_is_set(door.dr_stat_rr.as_ref()),
            trunk_open: flag_is_set(door.dr_stat_trnk_lg.as_ref()),
            hood_open: flag_is_set(door.dr_stat_hood.as_ref()),
            fuel_lid_open: flag_is_set(door.fuel_lid_open_status.as_ref()),
        },
        door_locks: DoorLockStatus {
            driver_door_unlocked: flag_is_set(door.lock_link_sw_drv.as_ref()),
            passenger_door_unlocked: flag_is_set(door.lock_link_sw_psngr.as_ref()),
            rear_left_door_unlocked: flag_is_set(door.lock_link_sw_rl.as_ref()),
            rear_right_door_unlocked: flag_is_set(door.lock_link_sw_rr.as_ref()),
        },
        windows: WindowStatus {
            driver_window_open: flag_is_set(windows.pw_pos_drv.as_ref()),
            passenger_window_open: flag_is_set(windows.pw_pos_psngr.as_ref()),
            rear_left_window_open: flag_is_set(windows.pw_pos_rl.as_ref()),
            rear_right_window_open: flag_is_set(windows.pw_pos_rr.as_ref()),
        },
        hazard_lights_on: flag_is_set(hazard.hazard_sw.as_ref()),
        tire_pressure: TirePressure {
            front_left_psi: tpms.front_left,
            front_right_psi: tpms.front_right,
            rear_left_psi: tpms.rear_left,
            rear_right_psi: tpms.rear_right,
        },
    })
}
