//! Vehicle identity and descriptive attributes

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier the service uses for per-vehicle calls (`internalVin`).
///
/// Depending on the listing shape the service sends it as a JSON number or
/// a JSON string. The received shape is kept so it goes back on the wire
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleId::Numeric(n) => write!(f, "{}", n),
            VehicleId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for VehicleId {
    fn from(id: i64) -> Self {
        VehicleId::Numeric(id)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        VehicleId::Text(id.to_string())
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        VehicleId::Text(id)
    }
}

impl VehicleId {
    /// Text that parses back to this exact id: numeric-looking text ids
    /// are double-quoted so they stay text.
    pub fn round_trip_text(&self) -> String {
        match self {
            VehicleId::Text(s) if is_canonical_integer(s) || is_quoted(s) => {
                format!("\"{}\"", s)
            }
            other => other.to_string(),
        }
    }
}

fn is_canonical_integer(s: &str) -> bool {
    s.parse::<i64>().is_ok_and(|n| n.to_string() == s)
}

fn is_quoted(s: &str) -> bool {
    s.len() >= 2 && s.starts_with('"') && s.ends_with('"')
}

impl std::str::FromStr for VehicleId {
    type Err = std::convert::Infallible;

    /// A canonical decimal integer (`42`, `-7`) becomes
    /// [`VehicleId::Numeric`]. Anything else stays text, and a value wrapped
    /// in double quotes (`"42"`) is the text between them.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if is_quoted(s) {
            return Ok(VehicleId::Text(s[1..s.len() - 1].to_string()));
        }

        Ok(match s.parse::<i64>() {
            Ok(n) if n.to_string() == s => VehicleId::Numeric(n),
            _ => VehicleId::Text(s.to_string()),
        })
    }
}

/// An enrolled vehicle, snapshotted from one listing call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Identifier used by every per-vehicle command
    pub id: VehicleId,
    /// 17-character vehicle identification number
    pub vin: String,
    /// User-assigned nickname, if any
    pub nickname: Option<String>,
    pub carline_code: Option<String>,
    pub carline_name: Option<String>,
    pub model_year: Option<String>,
    pub model_code: Option<String>,
    pub model_name: Option<String>,
    /// `true` when the transmission type code is `A`
    pub automatic_transmission: bool,
    pub interior_color_code: Option<String>,
    pub interior_color_name: Option<String>,
    pub exterior_color_code: Option<String>,
    pub exterior_color_name: Option<String>,
}
