use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Device deployment context. Echoed verbatim into most submissions so the
/// device knows which configuration tree to touch.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OperatingMode {
    Wind,
    Elevator,
}

impl OperatingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperatingMode::Wind => "wind",
            OperatingMode::Elevator => "elevator",
        }
    }
}

impl fmt::Display for OperatingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draft network addressing. All fields are kept as entered; empty strings
/// are submitted as empty strings.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct NetworkSettings {
    pub ip: String,
    pub subnet_mask: String,
    pub gateway: String,
    pub dns1: String,
    pub dns2: String,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            ip: String::new(),
            subnet_mask: "255.255.255.0".to_string(),
            gateway: String::new(),
            dns1: String::new(),
            dns2: String::new(),
        }
    }
}

/// Draft message-broker credentials.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrokerSettings {
    pub address: String,
    pub username: String,
    pub password: String,
}

/// Draft backend endpoint. The port stays a string, exactly as it travels on
/// the wire.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct BackendSettings {
    pub url: String,
    pub port: String,
}

/// Parameterization of the two near-duplicate admin page variants: default
/// mode, whether the extended network fields exist, and the interval floor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FormProfile {
    pub default_mode: OperatingMode,
    pub extended_network: bool,
    pub min_interval_secs: u32,
}

impl FormProfile {
    /// Variant with subnet mask, gateway and DNS fields.
    pub const fn full() -> Self {
        Self {
            default_mode: OperatingMode::Elevator,
            extended_network: true,
            min_interval_secs: 5,
        }
    }

    /// Variant that only carries the IP field.
    pub const fn minimal() -> Self {
        Self {
            default_mode: OperatingMode::Wind,
            extended_network: false,
            min_interval_secs: 5,
        }
    }
}
