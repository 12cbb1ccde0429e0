use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::scale_device::DeviceIdScheme;

/// Runtime settings, read from an optional JSON file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AdapterConfig {
    /// Prefix of every device id handed to the host
    pub adapter_name: String,
    /// The advertised local name of the scales to listen to
    pub local_name: String,
    pub id_separator: String,
    /// "trace", "debug", "info", "warn" or "error". `RUST_LOG` takes precedence.
    pub log_level: String,
}

impl AdapterConfig {
    const ADAPTER_NAME: &'static str = "MedisanaKS250";
    const BLE_LOCAL_NAME: &'static str = "KS250";

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn id_scheme(&self) -> DeviceIdScheme {
        DeviceIdScheme {
            prefix: self.adapter_name.clone(),
            separator: self.id_separator.clone(),
        }
    }

    fn validate(&self) -> Result<(), crate::Error> {
        if self.local_name.is_empty() {
            return Err(crate::Error::Config("local_name must not be empty".to_string()));
        }
        if self.adapter_name.is_empty() {
            return Err(crate::Error::Config("adapter_name must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            adapter_name: Self::ADAPTER_NAME.to_string(),
            local_name: Self::BLE_LOCAL_NAME.to_string(),
            id_separator: "-".to_string(),
            log_level: "info".to_string(),
        }
    }
}

#[test]
fn test_config_defaults() {
    let config = AdapterConfig::from_json("{}").unwrap();
    assert_eq!(config, AdapterConfig::default());
    assert_eq!(config.local_name, "KS250");
    assert_eq!(config.id_scheme(), DeviceIdScheme::default());
}

#[test]
fn test_config_partial() {
    let config = AdapterConfig::from_json(r#"{"local_name": "KS251", "id_separator": ":"}"#).unwrap();
    assert_eq!(config.local_name, "KS251");
    assert_eq!(config.adapter_name, "MedisanaKS250");
    assert_eq!(config.id_scheme().device_id("abc"), "MedisanaKS250:abc");
}

#[test]
fn test_config_rejects_unknown_field() {
    assert!(AdapterConfig::from_json(r#"{"localName": "KS250"}"#).is_err());
}

#[test]
fn test_config_rejects_empty_local_name() {
    let err = AdapterConfig::from_json(r#"{"local_name": ""}"#).unwrap_err();
    assert_eq!(err.to_string(), "Configuration error: local_name must not be empty");
}
