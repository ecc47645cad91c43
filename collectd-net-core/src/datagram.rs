use collectd_net_common::FieldType;
use log::debug;

use crate::sample::Sample;
use crate::tlv::{encode_part_sequence, EncodeError, Part};
use crate::value::Value;

/// A fully assembled collectd packet, ready to go out as one UDP datagram
///
/// Layout, in this fixed order:
/// 1. Header: Host, Time, Plugin, PluginInstance, Type, Interval
/// 2. Value segment: TypeInstance, Values
///
/// There is no outer envelope; the datagram boundary is the packet boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Datagram {
    bytes: Vec<u8>,
    header_len: usize,
}

impl Datagram {
    /// Assemble a sample, resolving an unset time to the current clock
    pub fn assemble(sample: &Sample, default_interval: u64) -> Result<Self, EncodeError> {
        Self::assemble_at(sample, default_interval, chrono::Utc::now().timestamp())
    }

    /// Assemble a sample, resolving an unset time to `now`
    pub fn assemble_at(
        sample: &Sample,
        default_interval: u64,
        now: i64,
    ) -> Result<Self, EncodeError> {
        let time = sample.time().unwrap_or(now);
        let interval = sample.interval().unwrap_or(default_interval);
        let interval = i64::try_from(interval).map_err(|_| {
            EncodeError::Encoding(format!(
                "interval {} does not fit a signed 64-bit field",
                interval
            ))
        })?;

        let header = [
            Part::String {
                field: FieldType::Host,
                text: sample.host(),
            },
            Part::Numeric {
                field: FieldType::Time,
                value: time,
            },
            Part::String {
                field: FieldType::Plugin,
                text: sample.plugin(),
            },
            Part::String {
                field: FieldType::PluginInstance,
                text: sample.plugin_instance(),
            },
            Part::String {
                field: FieldType::Type,
                text: sample.type_name(),
            },
            Part::Numeric {
                field: FieldType::Interval,
                value: interval,
            },
        ];

        // Sample values are always reported as gauges
        let values: Vec<Value> = sample.values().iter().copied().map(Value::Gauge).collect();
        let segment = [
            Part::String {
                field: FieldType::TypeInstance,
                text: sample.type_instance(),
            },
            Part::Values(&values),
        ];

        let mut bytes = encode_part_sequence(&header)?;
        let header_len = bytes.len();
        for part in &segment {
            part.encode_to(&mut bytes)?;
        }

        debug!(
            "Assembled {}/{} datagram: {} bytes, {} value(s)",
            sample.plugin(),
            sample.type_name(),
            bytes.len(),
            values.len()
        );

        Ok(Self { bytes, header_len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The six header parts
    pub fn header(&self) -> &[u8] {
        &self.bytes[..self.header_len]
    }

    /// The type instance and values parts
    pub fn value_segment(&self) -> &[u8] {
        &self.bytes[self.header_len..]
    }
}

impl AsRef<[u8]> for Datagram {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Datagram> for Vec<u8> {
    fn from(datagram: Datagram) -> Self {
        datagram.bytes
    }
}
