#![no_std]

//! Wire constants shared by the collectd-net crates.
//!
//! Codes and sizes follow the collectd binary network protocol
//! (<https://collectd.org/wiki/index.php/Binary_protocol>).

/// Default UDP port of the collectd network plugin
pub const DEFAULT_PORT: u16 = 25826;

/// Default collector host
pub const DEFAULT_HOST: &str = "localhost";

/// Default reporting interval in seconds
pub const DEFAULT_INTERVAL_SECS: u64 = 30;

/// Plugin name reported when the caller does not set one
pub const DEFAULT_PLUGIN: &str = "collectd-net";

/// Size of the type code + length header that starts every part
pub const PART_HEADER_SIZE: usize = 4;

/// Declared length of a numeric part (header + 8 byte value)
pub const NUMERIC_PART_LENGTH: u16 = 12;

/// Size of the value count field inside a values part
pub const VALUE_COUNT_SIZE: usize = 2;

/// Bytes used by a single value: one type tag plus an 8 byte payload
pub const VALUE_ENTRY_SIZE: usize = 1 + 8;

/// Largest length a part can declare in its 16-bit length field
pub const MAX_PART_LENGTH: usize = u16::MAX as usize;

/// Part type codes
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Host name of the reporting machine
    Host = 0x0000,
    /// Epoch time in seconds
    Time = 0x0001,
    /// Plugin name
    Plugin = 0x0002,
    /// Plugin instance
    PluginInstance = 0x0003,
    /// Type name
    Type = 0x0004,
    /// Type instance
    TypeInstance = 0x0005,
    /// List of values
    Values = 0x0006,
    /// Sampling interval in seconds
    Interval = 0x0007,
}

/// How a part's payload is laid out on the wire
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Numeric,
    ValueList,
}

impl FieldType {
    pub const fn code(self) -> u16 {
        self as u16
    }

    pub const fn kind(self) -> FieldKind {
        match self {
            FieldType::Host
            | FieldType::Plugin
            | FieldType::PluginInstance
            | FieldType::Type
            | FieldType::TypeInstance => FieldKind::String,
            FieldType::Time | FieldType::Interval => FieldKind::Numeric,
            FieldType::Values => FieldKind::ValueList,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Host => "host",
            FieldType::Time => "time",
            FieldType::Plugin => "plugin",
            FieldType::PluginInstance => "plugin_instance",
            FieldType::Type => "type",
            FieldType::TypeInstance => "type_instance",
            FieldType::Values => "values",
            FieldType::Interval => "interval",
        }
    }
}

impl TryFrom<u16> for FieldType {
    type Error = u16;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        match code {
            0x0000 => Ok(FieldType::Host),
            0x0001 => Ok(FieldType::Time),
            0x0002 => Ok(FieldType::Plugin),
            0x0003 => Ok(FieldType::PluginInstance),
            0x0004 => Ok(FieldType::Type),
            0x0005 => Ok(FieldType::TypeInstance),
            0x0006 => Ok(FieldType::Values),
            0x0007 => Ok(FieldType::Interval),
            other => Err(other),
        }
    }
}

impl core::fmt::Display for FieldType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} (0x{:04x})", self.name(), self.code())
    }
}

/// Data source type tags used inside a values part
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// Big-endian unsigned 64-bit
    Counter = 0,
    /// Little-endian IEEE-754 double
    Gauge = 1,
    /// Big-endian signed 64-bit
    Derive = 2,
    /// Big-endian unsigned 64-bit
    Absolute = 3,
}

impl ValueType {
    pub const fn code(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for ValueType {
    type Error = u8;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(ValueType::Counter),
            1 => Ok(ValueType::Gauge),
            2 => Ok(ValueType::Derive),
            3 => Ok(ValueType::Absolute),
            other => Err(other),
        }
    }
}
