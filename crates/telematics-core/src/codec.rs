//! Vendor field encodings
//!
//! The service encodes booleans as integer flags and GPS coordinates as a
//! magnitude plus a hemisphere flag. The hemisphere flag means "south" for
//! latitude but "east" for longitude, so each axis gets its own function.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{DecodeError, DecodeResult};

/// Layout of every report timestamp sent by the service
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";
const TIMESTAMP_WIDTH: usize = 14;

fn is_one(value: Option<&Value>) -> bool {
    value.and_then(Value::as_f64) == Some(1.0)
}

/// Decode an integer status flag. Only `1` is true; `0`, null, strings and
/// out-of-range codes are all false.
pub fn flag_is_set(value: Option<&Value>) -> bool {
    is_one(value)
}

/// Decode a latitude: flag `1` marks the southern hemisphere.
pub fn decode_latitude(magnitude: f64, flag: Option<&Value>) -> f64 {
    if is_one(flag) {
        -magnitude
    } else {
        magnitude
    }
}

/// Decode a longitude: flag `1` marks the eastern hemisphere.
pub fn decode_longitude(magnitude: f64, flag: Option<&Value>) -> f64 {
    if is_one(flag) {
        magnitude
    } else {
        -magnitude
    }
}

/// Encode a signed latitude as `(magnitude, flag)`, inverse of [`decode_latitude`].
pub fn encode_latitude(latitude: f64) -> (f64, u8) {
    let flag = if latitude >= 0.0 { 0 } else { 1 };
    (latitude.abs(), flag)
}

/// Encode a signed longitude as `(magnitude, flag)`, inverse of [`decode_longitude`].
pub fn encode_longitude(longitude: f64) -> (f64, u8) {
    let flag = if longitude < 0.0 { 0 } else { 1 };
    (longitude.abs(), flag)
}

/// Parse a fixed-width `YYYYMMDDHHMMSS` timestamp as UTC.
pub fn parse_report_timestamp(raw: &str) -> DecodeResult<DateTime<Utc>> {
    if raw.len() != TIMESTAMP_WIDTH || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DecodeError::MalformedTimestamp(raw.to_string()));
    }

    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| DecodeError::MalformedTimestamp(raw.to_string()))
}
