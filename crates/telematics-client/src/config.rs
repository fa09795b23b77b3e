//! Client configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TelematicsError};

/// Account credentials for the telematics service
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Service region the account is registered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Region {
    /// North America
    #[default]
    #[serde(rename = "MNAO")]
    Mnao,
    /// Europe
    #[serde(rename = "MME")]
    Mme,
    /// Japan
    #[serde(rename = "MJO")]
    Mjo,
}

impl Region {
    /// Region code as sent to the service
    pub fn code(&self) -> &'static str {
        match self {
            Region::Mnao => "MNAO",
            Region::Mme => "MME",
            Region::Mjo => "MJO",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Region {
    type Err = TelematicsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MNAO" => Ok(Region::Mnao),
            "MME" => Ok(Region::Mme),
            "MJO" => Ok(Region::Mjo),
            other => Err(TelematicsError::Configuration(format!(
                "Unknown region '{}'. Valid regions: MNAO, MME, MJO",
                other
            ))),
        }
    }
}

/// Everything needed to construct a client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub credentials: Credentials,
    #[serde(default)]
    pub region: Region,
}

impl ClientConfig {
    pub fn new(email: impl Into<String>, password: impl Into<String>, region: Region) -> Self {
        Self {
            credentials: Credentials {
                email: email.into(),
                password: password.into(),
            },
            region,
        }
    }

    /// Reject empty credentials before any network activity
    pub fn validate(&self) -> Result<()> {
        if self.credentials.email.trim().is_empty() {
            return Err(TelematicsError::Configuration(
                "Invalid or missing email address".to_string(),
            ));
        }
        if self.credentials.password.is_empty() {
            return Err(TelematicsError::Configuration(
                "Invalid or missing password".to_string(),
            ));
        }
        Ok(())
    }
}
