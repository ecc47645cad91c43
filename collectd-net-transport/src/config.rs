use std::{fs, path::Path};

use collectd_net_common::{DEFAULT_HOST, DEFAULT_INTERVAL_SECS, DEFAULT_PLUGIN, DEFAULT_PORT};
use collectd_net_core::Sample;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransportError};

/// Settings a client is built from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Collector host name or IP address
    pub server: String,
    /// Collector UDP port
    pub port: u16,
    /// Interval reported for samples that do not set their own
    pub interval_secs: u64,
    /// Plugin name used by [`ClientConfig::sample`]
    pub plugin: String,
    /// Reported host name; the local host name when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// TTL applied when `server` is an IPv4 multicast group
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multicast_ttl: Option<u32>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            interval_secs: DEFAULT_INTERVAL_SECS,
            plugin: DEFAULT_PLUGIN.to_string(),
            host: None,
            multicast_ttl: None,
        }
    }
}

impl ClientConfig {
    pub fn new(server: impl Into<String>, port: u16, interval_secs: u64) -> Self {
        Self {
            server: server.into(),
            port,
            interval_secs,
            ..Self::default()
        }
    }

    /// Start a sample carrying the configured plugin and host
    pub fn sample(&self, type_name: &str, values: Vec<f64>) -> Result<Sample> {
        let sample = Sample::new(type_name, values)?.with_plugin(self.plugin.as_str());
        Ok(match &self.host {
            Some(host) => sample.with_host(host.as_str()),
            None => sample,
        })
    }

    /// Load a TOML configuration file, falling back to defaults if it does not exist
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| TransportError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| TransportError::Config(e.to_string()))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TransportError::Config(e.to_string()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = self.to_toml()?;
        fs::write(path, contents)
            .map_err(|e| TransportError::Config(format!("{}: {}", path.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.server, "localhost");
        assert_eq!(config.port, 25826);
        assert_eq!(config.interval_secs, 30);
        assert_eq!(config.plugin, DEFAULT_PLUGIN);
        assert_eq!(config.host, None);
        assert_eq!(config.multicast_ttl, None);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config =
            ClientConfig::from_toml("server = \"10.0.0.5\"\ninterval_secs = 10\n").unwrap();
        assert_eq!(config.server, "10.0.0.5");
        assert_eq!(config.interval_secs, 10);
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.plugin, DEFAULT_PLUGIN);
    }

    #[test]
    fn test_invalid_toml() {
        let result = ClientConfig::from_toml("port = \"not a number\"");
        assert!(matches!(result, Err(TransportError::Config(_))));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("collectd-net.toml");

        let mut config = ClientConfig::new("239.192.74.66", 25826, 15);
        config.host = Some("web-01".to_string());
        config.multicast_ttl = Some(2);
        config.save(&path).unwrap();

        let loaded = ClientConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ClientConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(loaded, ClientConfig::default());
    }

    #[test]
    fn test_sample_uses_configured_defaults() {
        let mut config = ClientConfig::default();
        config.plugin = "nginx".to_string();
        config.host = Some("web-01".to_string());

        let sample = config.sample("requests", vec![12.0]).unwrap();
        assert_eq!(sample.plugin(), "nginx");
        assert_eq!(sample.host(), "web-01");
        assert_eq!(sample.type_name(), "requests");

        let unset = ClientConfig::default().sample("requests", vec![1.0]).unwrap();
        assert_eq!(unset.plugin(), DEFAULT_PLUGIN);
        assert_eq!(unset.host(), collectd_net_core::local_hostname());
    }

    #[test]
    fn test_sample_rejects_empty_values() {
        let result = ClientConfig::default().sample("requests", vec![]);
        assert!(matches!(
            result,
            Err(TransportError::Encode(collectd_net_core::EncodeError::EmptyValues))
        ));
    }
}
