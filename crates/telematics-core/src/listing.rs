//! Vehicle listing decoding
//!
//! The bulk listing returns two arrays joined by index: `vecBaseInfos`
//! (identity plus a JSON document embedded as a string) and `vehicleFlags`
//! (enrollment status). Only vehicles whose `vinRegistStatus` equals
//! [`ENROLLED_FLAG`] are kept, in listing order.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{DecodeError, DecodeResult};
use crate::models::{VehicleId, VehicleRecord};

/// `vinRegistStatus` value for a vehicle actively enrolled in connected services
pub const ENROLLED_FLAG: i64 = 3;

/// Transmission type code for automatic gearboxes
const AUTOMATIC_TRANSMISSION: &str = "A";

/// Entries stay untyped until the enrollment filter has picked them
#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(rename = "vecBaseInfos")]
    vec_base_infos: Option<Vec<Value>>,
    #[serde(rename = "vehicleFlags")]
    vehicle_flags: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
struct RawBaseInfo {
    #[serde(default)]
    vin: Option<String>,
    #[serde(rename = "Vehicle", default)]
    vehicle: Option<RawVehicle>,
}

#[derive(Debug, Deserialize)]
struct RawVehicle {
    #[serde(rename = "CvInformation", default)]
    cv_information: Option<RawCvInformation>,
    #[serde(rename = "vehicleInformation", default)]
    vehicle_information: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCvInformation {
    #[serde(rename = "internalVin", default)]
    internal_vin: Option<VehicleId>,
}

/// The document embedded in `Vehicle.vehicleInformation`
#[derive(Debug, Deserialize)]
struct RawVehicleInformation {
    #[serde(rename = "OtherInformation", default)]
    other_information: RawOtherInformation,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawOtherInformation {
    carline_code: Option<Value>,
    carline_name: Option<Value>,
    model_year: Option<Value>,
    model_code: Option<Value>,
    model_name: Option<Value>,
    transmission_type: Option<Value>,
    interior_color_code: Option<Value>,
    interior_color_name: Option<Value>,
    exterior_color_code: Option<Value>,
    exterior_color_name: Option<Value>,
}

/// An enrolled vehicle decoded from the listing, still missing its nickname
#[derive(Debug, Clone, PartialEq)]
pub struct EnrolledVehicle {
    record: VehicleRecord,
}

impl EnrolledVehicle {
    pub fn id(&self) -> &VehicleId {
        &self.record.id
    }

    pub fn vin(&self) -> &str {
        &self.record.vin
    }

    /// Finish the record with the nickname fetched separately by VIN
    pub fn with_nickname(mut self, nickname: Option<String>) -> VehicleRecord {
        self.record.nickname = nickname;
        self.record
    }
}

/// Scalar attribute as text; numbers are rendered, anything else is absent.
fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numeric comparison, so `3.0` counts as enrolled too
fn is_enrolled(flags: &Value) -> bool {
    flags.get("vinRegistStatus").and_then(Value::as_f64) == Some(ENROLLED_FLAG as f64)
}

/// Decode a listing payload into the enrolled vehicles, in listing order.
///
/// A missing `vehicleFlags` array, or one whose length differs from
/// `vecBaseInfos`, is a malformed payload. The embedded document of every
/// enrolled vehicle must parse; excluded vehicles are not inspected.
pub fn parse_vehicle_listing(payload: &Value) -> DecodeResult<Vec<EnrolledVehicle>> {
    let listing = RawListing::deserialize(payload)?;

    let base_infos = listing
        .vec_base_infos
        .ok_or(DecodeError::MissingField("vecBaseInfos"))?;
    let flags = listing
        .vehicle_flags
        .ok_or(DecodeError::MissingField("vehicleFlags"))?;

    if base_infos.len() != flags.len() {
        return Err(DecodeError::LengthMismatch {
            left: "vecBaseInfos",
            left_len: base_infos.len(),
            right: "vehicleFlags",
            right_len: flags.len(),
        });
    }

    let total = base_infos.len();
    let vehicles = base_infos
        .into_iter()
        .zip(flags.iter())
        .filter(|(_, flags)| is_enrolled(flags))
        .map(|(base_info, _)| decode_enrolled(base_info))
        .collect::<DecodeResult<Vec<_>>>()?;

    debug!(
        total,
        enrolled = vehicles.len(),
        skipped = total - vehicles.len(),
        "Decoded vehicle listing"
    );

    Ok(vehicles)
}

fn decode_enrolled(base_info: Value) -> DecodeResult<EnrolledVehicle> {
    let base_info = RawBaseInfo::deserialize(base_info)?;
    let vin = base_info.vin.ok_or(DecodeError::MissingField("vin"))?;
    let vehicle = base_info
        .vehicle
        .ok_or(DecodeError::MissingField("Vehicle"))?;

    let id = vehicle
        .cv_information
        .and_then(|cv| cv.internal_vin)
        .ok_or(DecodeError::MissingField("Vehicle.CvInformation.internalVin"))?;

    let document = vehicle.vehicle_information.ok_or_else(|| {
        DecodeError::document("vehicleInformation", format!("absent for VIN {}", vin))
    })?;
    let info: RawVehicleInformation = serde_json::from_str(&document).map_err(|e| {
        DecodeError::document("vehicleInformation", format!("VIN {}: {}", vin, e))
    })?;
    let other = info.other_information;

    let automatic_transmission =
        text(other.transmission_type).as_deref() == Some(AUTOMATIC_TRANSMISSION);

    Ok(EnrolledVehicle {
        record: VehicleRecord {
            id,
            vin,
            nickname: None,
            carline_code: text(other.carline_code),
            carline_name: text(other.carline_name),
            model_year: text(other.model_year),
            model_code: text(other.model_code),
            model_name: text(other.model_name),
            automatic_transmission,
            interior_color_code: text(other.interior_color_code),
            interior_color_name: text(other.interior_color_name),
            exterior_color_code: text(other.exterior_color_code),
            exterior_color_name: text(other.exterior_color_name),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn base_info(vin: &str, internal_vin: Value, info: Value) -> Value {
        json!({
            "vin": vin,
            "Vehicle": {
                "CvInformation": { "internalVin": internal_vin },
                "vehicleInformation": info.to_string(),
            }
        })
    }

    fn other_info(model: &str) -> Value {
        json!({
            "OtherInformation": {
                "carlineCode": "K1",
                "carlineName": "CX-5",
                "modelYear": "2021",
                "modelCode": "K1XA",
                "modelName": model,
                "transmissionType": "A",
                "interiorColorCode": "BY3",
                "interiorColorName": "BLACK",
                "exteriorColorCode": "46V",
                "exteriorColorName": "SOUL RED"
            }
        })
    }

    #[test]
    fn test_keeps_only_enrolled_in_order() {
        let payload = json!({
            "vecBaseInfos": [
                base_info("JM000000000000001", json!(1), other_info("A")),
                base_info("JM000000000000002", json!(2), other_info("B")),
                base_info("JM000000000000003", json!("3"), other_info("C")),
                base_info("JM000000000000004", json!(4), other_info("D")),
            ],
            "vehicleFlags": [
                { "vinRegistStatus": 3 },
                { "vinRegistStatus": 1 },
                { "vinRegistStatus": 3 },
                { "vinRegistStatus": 4 },
            ]
        });

        let vehicles = parse_vehicle_listing(&payload).unwrap();
        let vins: Vec<&str> = vehicles.iter().map(|v| v.vin()).collect();
        assert_eq!(vins, vec!["JM000000000000001", "JM000000000000003"]);
        assert_eq!(vehicles[0].id(), &VehicleId::Numeric(1));
        assert_eq!(vehicles[1].id(), &VehicleId::Text("3".to_string()));
    }

    #[test]
    fn test_decodes_attributes() {
        let payload = json!({
            "vecBaseInfos": [base_info("JM000000000000001", json!(77), other_info("CX-5 GT"))],
            "vehicleFlags": [{ "vinRegistStatus": 3 }]
        });

        let record = parse_vehicle_listing(&payload)
            .unwrap()
            .remove(0)
            .with_nickname(Some("Red".to_string()));

        assert_eq!(
            record,
            VehicleRecord {
                id: VehicleId::Numeric(77),
                vin: "JM000000000000001".to_string(),
                nickname: Some("Red".to_string()),
                carline_code: Some("K1".to_string()),
                carline_name: Some("CX-5".to_string()),
                model_year: Some("2021".to_string()),
                model_code: Some("K1XA".to_string()),
                model_name: Some("CX-5 GT".to_string()),
                automatic_transmission: true,
                interior_color_code: Some("BY3".to_string()),
                interior_color_name: Some("BLACK".to_string()),
                exterior_color_code: Some("46V".to_string()),
                exterior_color_name: Some("SOUL RED".to_string()),
            }
        );
    }

    #[test]
    fn test_missing_other_information_yields_absent_attributes() {
        let payload = json!({
            "vecBaseInfos": [base_info("JM000000000000001", json!(1), json!({}))],
            "vehicleFlags": [{ "vinRegistStatus": 3 }]
        });

        let record = parse_vehicle_listing(&payload)
            .unwrap()
            .remove(0)
            .with_nickname(None);
        assert_eq!(record.model_name, None);
        assert!(!record.automatic_transmission);
    }

    #[test]
    fn test_malformed_document_for_enrolled_vehicle_fails() {
        let payload = json!({
            "vecBaseInfos": [{
                "vin": "JM000000000000001",
                "Vehicle": {
                    "CvInformation": { "internalVin": 1 },
                    "vehicleInformation": "{not json"
                }
            }],
            "vehicleFlags": [{ "vinRegistStatus": 3 }]
        });

        assert!(matches!(
            parse_vehicle_listing(&payload),
            Err(DecodeError::MalformedDocument { field: "vehicleInformation", .. })
        ));
    }

    #[test]
    fn test_absent_document_for_enrolled_vehicle_fails() {
        let payload = json!({
            "vecBaseInfos": [{
                "vin": "JM000000000000001",
                "Vehicle": { "CvInformation": { "internalVin": 1 } }
            }],
            "vehicleFlags": [{ "vinRegistStatus": 3 }]
        });

        assert!(matches!(
            parse_vehicle_listing(&payload),
            Err(DecodeError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn test_malformed_document_for_excluded_vehicle_is_ignored() {
        let payload = json!({
            "vecBaseInfos": [{
                "vin": "JM000000000000001",
                "Vehicle": { "vehicleInformation": "{not json" }
            }],
            "vehicleFlags": [{ "vinRegistStatus": 1 }]
        });

        assert!(parse_vehicle_listing(&payload).unwrap().is_empty());
    }

    #[test]
    fn test_mistyped_excluded_neighbours_are_ignored() {
        let payload = json!({
            "vecBaseInfos": [
                { "vin": 12345 },
                base_info("JM000000000000002", json!(2), other_info("B")),
                {
                    "vin": "JM000000000000003",
                    "Vehicle": { "vehicleInformation": { "not": "a string" } }
                },
                "garbage",
            ],
            "vehicleFlags": [
                { "vinRegistStatus": 0 },
                { "vinRegistStatus": 3 },
                { "vinRegistStatus": 1 },
                null,
            ]
        });

        let vehicles = parse_vehicle_listing(&payload).unwrap();
        assert_eq!(vehicles.len(), 1);
        assert_eq!(vehicles[0].vin(), "JM000000000000002");
    }

    #[test]
    fn test_mistyped_enrolled_entry_fails() {
        let payload = json!({
            "vecBaseInfos": [{ "vin": 12345 }],
            "vehicleFlags": [{ "vinRegistStatus": 3 }]
        });
        assert!(matches!(
            parse_vehicle_listing(&payload),
            Err(DecodeError::Payload(_))
        ));
    }

    #[test]
    fn test_enrollment_flag_compares_numerically() {
        let payload = json!({
            "vecBaseInfos": [
                base_info("JM000000000000001", json!(1), other_info("A")),
                base_info("JM000000000000002", json!(2), other_info("B")),
                base_info("JM000000000000003", json!(3), other_info("C")),
            ],
            "vehicleFlags": [
                { "vinRegistStatus": 3.0 },
                { "vinRegistStatus": 3.5 },
                { "vinRegistStatus": "3" },
            ]
        });

        let vehicles = parse_vehicle_listing(&payload).unwrap();
        let vins: Vec<&str> = vehicles.iter().map(|v| v.vin()).collect();
        assert_eq!(vins, vec!["JM000000000000001"]);
    }

    #[test]
    fn test_missing_flags_array_fails() {
        let payload = json!({ "vecBaseInfos": [] });
        assert_eq!(
            parse_vehicle_listing(&payload),
            Err(DecodeError::MissingField("vehicleFlags"))
        );
    }

    #[test]
    fn test_length_mismatch_fails() {
        let payload = json!({
            "vecBaseInfos": [base_info("JM000000000000001", json!(1), other_info("A"))],
            "vehicleFlags": []
        });
        assert!(matches!(
            parse_vehicle_listing(&payload),
            Err(DecodeError::LengthMismatch { left_len: 1, right_len: 0, .. })
        ));
    }

    #[test]
    fn test_empty_listing() {
        let payload = json!({ "vecBaseInfos": [], "vehicleFlags": [], "resultCode": "500E00" });
        assert!(parse_vehicle_listing(&payload).unwrap().is_empty());
    }
}
