//! Command dispatcher
//!
//! Every remote call is built, sent through the [`Transport`], and (for all
//! but the listing-style reads) checked for the service's embedded success
//! code. A payload with any other `resultCode` becomes
//! [`TelematicsError::CommandFailed`] naming the command.

use std::sync::Arc;

use serde_json::{json, Map, Value};
use telematics_core::{PointOfInterest, VehicleId};
use tracing::{debug, instrument, warn};

use crate::config::Region;
use crate::error::{Result, TelematicsError};
use crate::transport::{ApiRequest, HttpMethod, Transport};

/// The only `resultCode` the service uses for success
pub const SUCCESS_RESULT_CODE: &str = "200S00";

/// Placeholder the service expects in every authenticated body
const INTERNAL_USER_ID: &str = "__INTERNAL_ID__";

/// VINs are exactly this many characters
pub const VIN_LENGTH: usize = 17;

/// Longest nickname the service accepts
pub const MAX_NICKNAME_LENGTH: usize = 20;

/// Remote endpoints used by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteCommand {
    GetTac,
    GetLanguagePkg,
    GetVecBaseInfos,
    GetVehicleStatus,
    GetHealthReport,
    GetNickname,
    UpdateNickname,
    DoorLock,
    DoorUnlock,
    LightOn,
    LightOff,
    EngineStart,
    EngineStop,
    ChargeStart,
    ChargeStop,
    SendPoi,
}

impl RemoteCommand {
    /// Short name used in logs and errors
    pub fn name(&self) -> &'static str {
        match self {
            RemoteCommand::GetTac => "get_tac",
            RemoteCommand::GetLanguagePkg => "get_language_pkg",
            RemoteCommand::GetVecBaseInfos => "get_vec_base_infos",
            RemoteCommand::GetVehicleStatus => "get_vehicle_status",
            RemoteCommand::GetHealthReport => "get_health_report",
            RemoteCommand::GetNickname => "get_nickname",
            RemoteCommand::UpdateNickname => "update_nickname",
            RemoteCommand::DoorLock => "door_lock",
            RemoteCommand::DoorUnlock => "door_unlock",
            RemoteCommand::LightOn => "light_on",
            RemoteCommand::LightOff => "light_off",
            RemoteCommand::EngineStart => "engine_start",
            RemoteCommand::EngineStop => "engine_stop",
            RemoteCommand::ChargeStart => "charge_start",
            RemoteCommand::ChargeStop => "charge_stop",
            RemoteCommand::SendPoi => "send_poi",
        }
    }

    /// Endpoint path, byte-for-byte as the service expects it
    pub fn path(&self) -> &'static str {
        match self {
            RemoteCommand::GetTac => "content/getTac/v4",
            RemoteCommand::GetLanguagePkg => "junction/getLanguagePkg/v4",
            RemoteCommand::GetVecBaseInfos => "remoteServices/getVecBaseInfos/v4",
            RemoteCommand::GetVehicleStatus => "remoteServices/getVehicleStatus/v4",
            RemoteCommand::GetHealthReport => "remoteServices/getHealthReport/v4",
            RemoteCommand::GetNickname => "remoteServices/getNickName/v4",
            RemoteCommand::UpdateNickname => "remoteServices/updateNickName/v4",
            RemoteCommand::DoorLock => "remoteServices/doorLock/v4",
            RemoteCommand::DoorUnlock => "remoteServices/doorUnlock/v4",
            RemoteCommand::LightOn => "remoteServices/lightOn/v4",
            RemoteCommand::LightOff => "remoteServices/lightOff/v4",
            RemoteCommand::EngineStart => "remoteServices/engineStart/v4",
            RemoteCommand::EngineStop => "remoteServices/engineStop/v4",
            RemoteCommand::ChargeStart => "remoteServices/chargeStart/v4",
            RemoteCommand::ChargeStop => "remoteServices/chargeStop/v4",
            RemoteCommand::SendPoi => "remoteServices/sendPOI/v4",
        }
    }

    pub fn method(&self) -> HttpMethod {
        match self {
            RemoteCommand::GetTac => HttpMethod::Get,
            _ => HttpMethod::Post,
        }
    }

    /// Whether the request needs a logged-in session. Session requests also
    /// carry the internal user placeholder in their body.
    pub fn needs_auth(&self) -> bool {
        !matches!(self, RemoteCommand::GetTac | RemoteCommand::GetLanguagePkg)
    }

    /// Whether a non-success `resultCode` fails the call.
    ///
    /// Listing-style reads have no single-record result to check and return
    /// whatever the service sends.
    pub fn checks_result_code(&self) -> bool {
        !matches!(
            self,
            RemoteCommand::GetTac | RemoteCommand::GetLanguagePkg | RemoteCommand::GetVecBaseInfos
        )
    }

    /// Whether the command changes vehicle or account state
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            RemoteCommand::UpdateNickname
                | RemoteCommand::DoorLock
                | RemoteCommand::DoorUnlock
                | RemoteCommand::LightOn
                | RemoteCommand::LightOff
                | RemoteCommand::EngineStart
                | RemoteCommand::EngineStop
                | RemoteCommand::ChargeStart
                | RemoteCommand::ChargeStop
                | RemoteCommand::SendPoi
        )
    }
}

/// Fail unless the payload carries the success result code
pub fn check_result_code(command: RemoteCommand, payload: &Value) -> Result<()> {
    let result_code = payload.get("resultCode").and_then(Value::as_str);
    if result_code == Some(SUCCESS_RESULT_CODE) {
        return Ok(());
    }

    warn!(
        command = command.name(),
        result_code = result_code.unwrap_or("<missing>"),
        "Remote command failed"
    );
    Err(TelematicsError::CommandFailed {
        command: command.name(),
        result_code: result_code.map(str::to_string),
    })
}

/// Issues remote commands over a [`Transport`]
#[derive(Clone)]
pub struct Controller {
    transport: Arc<dyn Transport>,
}

impl Controller {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Build, send and validate one command.
    ///
    /// The body carries the internal user placeholder (session commands),
    /// `internalvin` when `vehicle_id` is given, then `extra_fields`.
    pub async fn execute(
        &self,
        command: RemoteCommand,
        vehicle_id: Option<&VehicleId>,
        extra_fields: Map<String, Value>,
    ) -> Result<Value> {
        let body = match command.method() {
            HttpMethod::Get => None,
            HttpMethod::Post => {
                let mut body = Map::new();
                if command.needs_auth() {
                    body.insert("internaluserid".to_string(), json!(INTERNAL_USER_ID));
                }
                if let Some(id) = vehicle_id {
                    body.insert("internalvin".to_string(), json!(id));
                }
                body.extend(extra_fields);
                Some(Value::Object(body))
            }
        };

        let request = ApiRequest {
            method: command.method(),
            path: command.path(),
            body,
            needs_keys: true,
            needs_auth: command.needs_auth(),
        };

        debug!(command = command.name(), path = command.path(), "Dispatching");
        let payload = self.transport.call(request).await?;

        if command.checks_result_code() {
            check_result_code(command, &payload)?;
        }
        Ok(payload)
    }

    /// Send a per-vehicle command with no extra fields
    pub async fn vehicle_command(
        &self,
        command: RemoteCommand,
        vehicle_id: &VehicleId,
    ) -> Result<Value> {
        self.execute(command, Some(vehicle_id), Map::new()).await
    }

    // =========================================================================
    // Read-only endpoints
    // =========================================================================

    /// Terms and conditions document
    #[instrument(skip(self))]
    pub async fn get_tac(&self) -> Result<Value> {
        self.execute(RemoteCommand::GetTac, None, Map::new()).await
    }

    /// UI language package for the region
    #[instrument(skip(self))]
    pub async fn get_language_pkg(&self, region: Region) -> Result<Value> {
        let fields = object(json!({
            "platformType": "ANDROID",
            "region": region.code(),
            "version": "2.0.4",
        }));
        self.execute(RemoteCommand::GetLanguagePkg, None, fields).await
    }

    /// Raw vehicle listing. The result code is not checked.
    #[instrument(skip(self))]
    pub async fn get_vec_base_infos(&self) -> Result<Value> {
        self.execute(RemoteCommand::GetVecBaseInfos, None, Map::new())
            .await
    }

    /// Raw status payload
    #[instrument(skip(self))]
    pub async fn get_vehicle_status(&self, vehicle_id: &VehicleId) -> Result<Value> {
        let fields = object(json!({ "limit": 1, "offset": 0, "vecinfotype": "0" }));
        self.execute(RemoteCommand::GetVehicleStatus, Some(vehicle_id), fields)
            .await
    }

    /// Raw health report payload
    #[instrument(skip(self))]
    pub async fn get_health_report(&self, vehicle_id: &VehicleId) -> Result<Value> {
        let fields = object(json!({ "limit": 1, "offset": 0 }));
        self.execute(RemoteCommand::GetHealthReport, Some(vehicle_id), fields)
            .await
    }

    /// Nickname registered for a VIN
    #[instrument(skip(self))]
    pub async fn get_nickname(&self, vin: &str) -> Result<Option<String>> {
        let fields = object(json!({ "vin": vin }));
        let payload = self
            .execute(RemoteCommand::GetNickname, None, fields)
            .await?;
        Ok(payload
            .get("carlineDesc")
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    // =========================================================================
    // Mutating commands
    // =========================================================================

    /// Change the nickname of a vehicle. Both arguments are checked locally
    /// before anything is sent.
    #[instrument(skip(self))]
    pub async fn update_nickname(&self, vin: &str, nickname: &str) -> Result<()> {
        validate_vin(vin)?;
        validate_nickname(nickname)?;

        let fields = object(json!({ "vin": vin, "vehicleNickName": nickname }));
        self.execute(RemoteCommand::UpdateNickname, None, fields)
            .await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn door_lock(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.vehicle_command(RemoteCommand::DoorLock, vehicle_id).await
    }

    #[instrument(skip(self))]
    pub async fn door_unlock(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.vehicle_command(RemoteCommand::DoorUnlock, vehicle_id).await
    }

    #[instrument(skip(self))]
    pub async fn light_on(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.vehicle_command(RemoteCommand::LightOn, vehicle_id).await
    }

    #[instrument(skip(self))]
    pub async fn light_off(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.vehicle_command(RemoteCommand::LightOff, vehicle_id).await
    }

    #[instrument(skip(self))]
    pub async fn engine_start(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.vehicle_command(RemoteCommand::EngineStart, vehicle_id).await
    }

    #[instrument(skip(self))]
    pub async fn engine_stop(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.vehicle_command(RemoteCommand::EngineStop, vehicle_id).await
    }

    #[instrument(skip(self))]
    pub async fn charge_start(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.vehicle_command(RemoteCommand::ChargeStart, vehicle_id).await
    }

    #[instrument(skip(self))]
    pub async fn charge_stop(&self, vehicle_id: &VehicleId) -> Result<Value> {
        self.vehicle_command(RemoteCommand::ChargeStop, vehicle_id).await
    }

    /// Send a destination to the vehicle's navigation system
    #[instrument(skip(self))]
    pub async fn send_poi(&self, vehicle_id: &VehicleId, poi: &PointOfInterest) -> Result<Value> {
        let fields = object(json!({ "placemarkinfos": [poi.to_placemark()] }));
        self.execute(RemoteCommand::SendPoi, Some(vehicle_id), fields)
            .await
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn validate_vin(vin: &str) -> Result<()> {
    let len = vin.chars().count();
    if len != VIN_LENGTH {
        return Err(TelematicsError::validation(format!(
            "VIN must be {} characters, got {}",
            VIN_LENGTH, len
        )));
    }
    Ok(())
}

fn validate_nickname(nickname: &str) -> Result<()> {
    let len = nickname.chars().count();
    if len > MAX_NICKNAME_LENGTH {
        return Err(TelematicsError::validation(format!(
            "Nickname must be at most {} characters, got {}",
            MAX_NICKNAME_LENGTH, len
        )));
    }
    Ok(())
}
