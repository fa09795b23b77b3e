//! Integration tests for telematics-client
//!
//! These tests run a fake telematics service on axum and drive the client
//! against it over HTTP, including login, headers, and the service's habit
//! of reporting stale lock state after a command.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use serde_json::{json, Value};
use telematics_client::testing::{TestServer, TEST_EMAIL, TEST_PASSWORD};
use telematics_client::{
    ClientConfig, ErrorKind, HttpTransport, Region, TelematicsClient, TelematicsError,
    TransportError, VehicleId,
};

const TOKEN: &str = "session-token-1";
const ENROLLED_VIN: &str = "JM3KFBCM1M0000002";

// =============================================================================
// Fake service
// =============================================================================

#[derive(Default)]
struct ServiceState {
    logins: usize,
    /// (command, body) for every authenticated request
    commands: Vec<(String, Value)>,
    device_ids: Vec<String>,
    /// Lock state the status endpoint reports; never updated by commands
    reported_locked: bool,
}

type Shared = Arc<Mutex<ServiceState>>;

fn vehicle_document(model: &str) -> String {
    json!({
        "OtherInformation": {
            "carlineName": "CX-5",
            "modelYear": 2021,
            "modelName": model,
            "transmissionType": "A",
            "exteriorColorName": "MACHINE GRAY"
        }
    })
    .to_string()
}

fn listing() -> Value {
    json!({
        "resultCode": "200S00",
        "vecBaseInfos": [
            {
                "vin": "JM3KFBCM1M0000001",
                "Vehicle": {
                    "CvInformation": { "internalVin": 1001 },
                    "vehicleInformation": vehicle_document("Sport")
                }
            },
            {
                "vin": ENROLLED_VIN,
                "Vehicle": {
                    "CvInformation": { "internalVin": 1002 },
                    "vehicleInformation": vehicle_document("Grand Touring")
                }
            }
        ],
        "vehicleFlags": [{ "vinRegistStatus": 2 }, { "vinRegistStatus": 3 }]
    })
}

fn status(locked: bool) -> Value {
    let unlocked = if locked { 0 } else { 1 };
    let reported_at = (Utc::now() - Duration::seconds(30))
        .format("%Y%m%d%H%M%S")
        .to_string();
    json!({
        "resultCode": "200S00",
        "alertInfos": [{
            "OccurrenceDate": reported_at,
            "Door": {
                "DrStatDrv": 0,
                "LockLinkSwDrv": unlocked,
                "LockLinkSwPsngr": unlocked,
                "LockLinkSwRl": unlocked,
                "LockLinkSwRr": unlocked
            },
            "HazardLamp": { "HazardSw": 0 }
        }],
        "remoteInfos": [{
            "PositionInfo": { "Latitude": 42.3, "LatitudeFlag": 0, "Longitude": 83.0, "LongitudeFlag": 0 },
            "ResidualFuel": { "FuelSegementDActl": 75.0, "RemDrvDistDActlKm": 520.5 }
        }]
    })
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    if body["email"] != TEST_EMAIL || body["password"] != TEST_PASSWORD {
        return (StatusCode::UNAUTHORIZED, "bad credentials").into_response();
    }
    state.lock().logins += 1;
    Json(json!({ "accessToken": TOKEN })).into_response()
}

async fn remote_service(
    State(state): State<Shared>,
    Path(command): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false);
    if !authorized {
        return (StatusCode::UNAUTHORIZED, "session required").into_response();
    }

    let mut state = state.lock();
    if let Some(device_id) = headers.get("device-id").and_then(|v| v.to_str().ok()) {
        state.device_ids.push(device_id.to_string());
    }
    state.commands.push((command.clone(), body));

    let payload = match command.as_str() {
        "getVecBaseInfos" => listing(),
        "getNickName" => json!({ "resultCode": "200S00", "carlineDesc": "Family Hauler" }),
        "getVehicleStatus" => status(state.reported_locked),
        "engineStart" => json!({ "resultCode": "500E00" }),
        _ => json!({ "resultCode": "200S00" }),
    };
    Json(payload).into_response()
}

fn fake_service(state: Shared) -> Router {
    Router::new()
        .route("/user/login", post(login))
        .route("/remoteServices/{command}/v4", post(remote_service))
        .with_state(state)
}

async fn start() -> (Shared, TestServer) {
    let state = Shared::default();
    let server = TestServer::start(fake_service(state.clone()))
        .await
        .expect("test server starts");
    (state, server)
}

fn commands(state: &Shared) -> Vec<String> {
    state.lock().commands.iter().map(|(c, _)| c.clone()).collect()
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_list_vehicles_over_http() {
    let (state, server) = start().await;

    let vehicles = server.client.get_vehicles().await.unwrap();

    assert_eq!(vehicles.len(), 1);
    let vehicle = &vehicles[0];
    assert_eq!(vehicle.id, VehicleId::Numeric(1002));
    assert_eq!(vehicle.vin, ENROLLED_VIN);
    assert_eq!(vehicle.nickname.as_deref(), Some("Family Hauler"));
    assert_eq!(vehicle.model_name.as_deref(), Some("Grand Touring"));
    assert_eq!(vehicle.model_year.as_deref(), Some("2021"));
    assert!(vehicle.automatic_transmission);

    assert_eq!(commands(&state), vec!["getVecBaseInfos", "getNickName"]);
    assert_eq!(state.lock().logins, 1);
}

#[tokio::test]
async fn test_lock_survives_stale_status_reports() {
    let (state, server) = start().await;
    let client = &server.client;
    let id = VehicleId::Numeric(1002);

    let status = client.get_vehicle_status(&id).await.unwrap();
    assert_eq!(status.latitude, Some(42.3));
    assert_eq!(status.longitude, Some(-83.0));
    assert_eq!(status.fuel_remaining_percent, Some(75.0));
    assert!(status.door_locks.driver_door_unlocked);
    assert_eq!(client.get_assumed_lock_state(&id), Some(false));

    client.lock_doors(&id).await.unwrap();
    assert_eq!(client.get_assumed_lock_state(&id), Some(true));

    // The service keeps reporting the pre-command state
    client.get_vehicle_status(&id).await.unwrap();
    assert_eq!(client.get_assumed_lock_state(&id), Some(true));

    let (_, lock_body) = state.lock().commands[1].clone();
    assert_eq!(
        lock_body,
        json!({ "internaluserid": "__INTERNAL_ID__", "internalvin": 1002 })
    );
}

#[tokio::test]
async fn test_failed_command_names_command() {
    let (_state, server) = start().await;

    let err = server
        .client
        .start_engine(&VehicleId::Numeric(1002))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RemoteCommand);
    assert_eq!(err.command(), Some("engine_start"));
}

#[tokio::test]
async fn test_invalid_nickname_never_reaches_service() {
    let (state, server) = start().await;

    let err = server
        .client
        .update_nickname(ENROLLED_VIN, "a nickname far too long to fit")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let err = server
        .client
        .update_nickname("SHORTVIN", "ok")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    assert!(commands(&state).is_empty());
    assert_eq!(state.lock().logins, 0);

    server
        .client
        .update_nickname(ENROLLED_VIN, "Commuter")
        .await
        .unwrap();
    assert_eq!(commands(&state), vec!["updateNickName"]);
}

#[tokio::test]
async fn test_requests_carry_device_id() {
    let (state, server) = start().await;

    server
        .client
        .turn_on_hazard_lights(&VehicleId::Numeric(1002))
        .await
        .unwrap();
    server
        .client
        .send_poi(&VehicleId::Numeric(1002), -37.81, 144.96, "Flinders St")
        .await
        .unwrap();

    let state = state.lock();
    assert_eq!(state.device_ids.len(), 2);
    assert!(state.device_ids.iter().all(|d| d.starts_with("ACCT")));

    let (command, body) = &state.commands[1];
    assert_eq!(command, "sendPOI");
    assert_eq!(body["placemarkinfos"][0]["Name"], "Flinders St");
    assert_eq!(body["placemarkinfos"][0]["LatitudeFlag"], 1);
    assert_eq!(body["placemarkinfos"][0]["LongitudeFlag"], 1);
}

#[tokio::test]
async fn test_wrong_credentials_surface_as_transport_error() {
    let (state, server) = start().await;

    let config = ClientConfig::new(TEST_EMAIL, "wrong-password", Region::Mnao);
    let transport =
        HttpTransport::new(&server.base_url(), config.credentials.clone(), config.region).unwrap();
    let client = TelematicsClient::new(config, Arc::new(transport)).unwrap();

    let err = client.validate_credentials().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(matches!(
        err,
        TelematicsError::Transport(TransportError::Authentication(_))
    ));

    let err = client.get_vehicles().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(commands(&state).is_empty());
}

#[tokio::test]
async fn test_close_releases_transport() {
    let (_state, server) = start().await;

    server.client.validate_credentials().await.unwrap();
    server.client.close().await;

    let err = server.client.get_vehicles().await.unwrap_err();
    assert!(matches!(
        err,
        TelematicsError::Transport(TransportError::Closed)
    ));
}
