use collectd_net_common::{DEFAULT_HOST, DEFAULT_PLUGIN};

use crate::tlv::EncodeError;

/// One measurement event waiting to be encoded
///
/// Only the type name and a non-empty list of values are required. The
/// remaining fields default as follows:
/// - host: the local machine's host name
/// - plugin: [`DEFAULT_PLUGIN`]
/// - plugin instance: absent, encoded as an empty string
/// - type instance: empty
/// - time: unset, resolved to the current time when the datagram is assembled
/// - interval: unset, taken from the sending client's configured default
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    host: String,
    time: Option<i64>,
    plugin: String,
    plugin_instance: Option<String>,
    type_name: String,
    type_instance: String,
    interval: Option<u64>,
    values: Vec<f64>,
}

impl Sample {
    /// Create a new sample of gauge values for the given type
    pub fn new(type_name: impl Into<String>, values: Vec<f64>) -> Result<Self, EncodeError> {
        let type_name = type_name.into();
        if type_name.is_empty() {
            return Err(EncodeError::MissingType);
        }
        if values.is_empty() {
            return Err(EncodeError::EmptyValues);
        }

        Ok(Self {
            host: local_hostname(),
            time: None,
            plugin: DEFAULT_PLUGIN.to_string(),
            plugin_instance: None,
            type_name,
            type_instance: String::new(),
            interval: None,
            values,
        })
    }

    /// Override the reporting host name
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set an explicit epoch time in seconds
    pub fn with_time(mut self, time: i64) -> Self {
        self.time = Some(time);
        self
    }

    /// Set the plugin name
    pub fn with_plugin(mut self, plugin: impl Into<String>) -> Self {
        self.plugin = plugin.into();
        self
    }

    /// Set the plugin instance
    pub fn with_plugin_instance(mut self, plugin_instance: impl Into<String>) -> Self {
        self.plugin_instance = Some(plugin_instance.into());
        self
    }

    /// Set the type instance
    pub fn with_type_instance(mut self, type_instance: impl Into<String>) -> Self {
        self.type_instance = type_instance.into();
        self
    }

    /// Override the client's default interval, in seconds
    pub fn with_interval(mut self, interval: u64) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn time(&self) -> Option<i64> {
        self.time
    }

    pub fn plugin(&self) -> &str {
        &self.plugin
    }

    /// Plugin instance, empty when absent
    pub fn plugin_instance(&self) -> &str {
        self.plugin_instance.as_deref().unwrap_or("")
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_instance(&self) -> &str {
        &self.type_instance
    }

    pub fn interval(&self) -> Option<u64> {
        self.interval
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Resolve the local machine's host name
///
/// Falls back to `localhost` when the name is empty.
pub fn local_hostname() -> String {
    let name = gethostname::gethostname();
    let name = name.to_string_lossy();
    if name.is_empty() {
        log::debug!("Host name is empty, using {}", DEFAULT_HOST);
        return DEFAULT_HOST.to_string();
    }
    name.into_owned()
}
