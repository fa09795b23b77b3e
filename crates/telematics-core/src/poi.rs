//! Point-of-interest upload encoding

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use sha2::{Digest, Sha256};

use crate::codec::{encode_latitude, encode_longitude};

/// Number of hex characters kept from the digest
const POI_ID_LEN: usize = 10;

/// A named location to send to the vehicle's navigation system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl PointOfInterest {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// Deterministic id for this place, see [`derive_poi_id`]
    pub fn poi_id(&self) -> String {
        derive_poi_id(&self.name, self.latitude, self.longitude)
    }

    /// Placemark entry for the `placemarkinfos` array of a send-POI request
    pub fn to_placemark(&self) -> Value {
        let (latitude, latitude_flag) = encode_latitude(self.latitude);
        let (longitude, longitude_flag) = encode_longitude(self.longitude);

        json!({
            "Altitude": 0,
            "Latitude": latitude,
            "LatitudeFlag": latitude_flag,
            "Longitude": longitude,
            "LongitudeFlag": longitude_flag,
            "Name": self.name,
            "OtherInformation": "{}",
            "PoiId": self.poi_id(),
            "source": "google",
        })
    }
}

/// SHA-256 over `name + latitude + longitude`, truncated to 10 hex characters.
///
/// Uploading the same name at the same coordinates always yields the same
/// id, so the service treats repeats as one place. Coordinates are rendered
/// with [`coordinate_text`], matching ids created by the vendor's own apps.
pub fn derive_poi_id(name: &str, latitude: f64, longitude: f64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(name.as_bytes());
    hasher.update(coordinate_text(latitude).as_bytes());
    hasher.update(coordinate_text(longitude).as_bytes());
    let mut id = hex::encode(hasher.finalize());
    id.truncate(POI_ID_LEN);
    id
}

/// Shortest round-trip text of `value`, always with a fractional part
/// (`35.0`, not `35`), and with a two-digit signed exponent outside
/// `1e-4..1e16` (`1e-05`).
pub fn coordinate_text(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        let text = format!("{:e}", value);
        return match text.split_once('e') {
            Some((mantissa, exponent)) => {
                let (sign, digits) = match exponent.strip_prefix('-') {
                    Some(digits) => ('-', digits),
                    None => ('+', exponent),
                };
                format!("{}e{}{:0>2}", mantissa, sign, digits)
            }
            None => text,
        };
    }

    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poi_id_is_stable() {
        let a = derive_poi_id("Home", 35.6812, 139.7671);
        let b = derive_poi_id("Home", 35.6812, 139.7671);
        assert_eq!(a, b);
        assert_eq!(a.len(), 10);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_poi_id_changes_with_each_input() {
        let base = derive_poi_id("Home", 35.6812, 139.7671);
        assert_ne!(base, derive_poi_id("Work", 35.6812, 139.7671));
        assert_ne!(base, derive_poi_id("Home", 35.6813, 139.7671));
        assert_ne!(base, derive_poi_id("Home", 35.6812, 139.7672));
    }

    #[test]
    fn test_poi_id_matches_digest_prefix() {
        let expected = hex::encode(Sha256::digest("Home1.52.5".as_bytes()));
        assert_eq!(derive_poi_id("Home", 1.5, 2.5), expected[..10]);
    }

    #[test]
    fn test_whole_number_coordinates_keep_fraction() {
        let expected = hex::encode(Sha256::digest("Home35.0139.0".as_bytes()));
        assert_eq!(derive_poi_id("Home", 35.0, 139.0), expected[..10]);
    }

    #[test]
    fn test_coordinate_text() {
        assert_eq!(coordinate_text(35.0), "35.0");
        assert_eq!(coordinate_text(-87.63), "-87.63");
        assert_eq!(coordinate_text(0.0), "0.0");
        assert_eq!(coordinate_text(-0.0), "-0.0");
        assert_eq!(coordinate_text(0.1), "0.1");
        assert_eq!(coordinate_text(0.0001), "0.0001");
        assert_eq!(coordinate_text(0.00001), "1e-05");
        assert_eq!(coordinate_text(-1.5e-7), "-1.5e-07");
        assert_eq!(coordinate_text(1e16), "1e+16");
        assert_eq!(coordinate_text(f64::NAN), "nan");
    }

    #[test]
    fn test_placemark_encodes_hemispheres() {
        // Sydney: southern, eastern
        let poi = PointOfInterest::new("Opera House", -33.8568, 151.2153);
        let placemark = poi.to_placemark();
        assert_eq!(placemark["Latitude"], 33.8568);
        assert_eq!(placemark["LatitudeFlag"], 1);
        assert_eq!(placemark["Longitude"], 151.2153);
        assert_eq!(placemark["LongitudeFlag"], 1);
        assert_eq!(placemark["PoiId"], poi.poi_id());
        assert_eq!(placemark["OtherInformation"], "{}");

        // Chicago: northern, western
        let placemark = PointOfInterest::new("Loop", 41.88, -87.63).to_placemark();
        assert_eq!(placemark["LatitudeFlag"], 0);
        assert_eq!(placemark["LongitudeFlag"], 0);
        assert_eq!(placemark["Longitude"], 87.63);
    }
}
