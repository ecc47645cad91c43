use collectd_net_common::ValueType;

/// A single sample value together with its data source type
///
/// Each variant maps to one wire encoding of the 8 byte payload:
/// - Counter: big-endian u64
/// - Gauge: little-endian f64
/// - Derive: big-endian i64
/// - Absolute: big-endian u64
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Counter(u64),
    Gauge(f64),
    Derive(i64),
    Absolute(u64),
}

impl Value {
    /// Type tag written in front of the payloads
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Counter(_) => ValueType::Counter,
            Value::Gauge(_) => ValueType::Gauge,
            Value::Derive(_) => ValueType::Derive,
            Value::Absolute(_) => ValueType::Absolute,
        }
    }

    /// Encode the 8 byte payload
    pub fn payload(&self) -> [u8; 8] {
        match *self {
            Value::Counter(v) => v.to_be_bytes(),
            // Gauges are the one little-endian field in the protocol
            Value::Gauge(v) => v.to_le_bytes(),
            Value::Derive(v) => v.to_be_bytes(),
            Value::Absolute(v) => v.to_be_bytes(),
        }
    }

    /// Decode a payload according to its type tag
    pub fn from_payload(value_type: ValueType, payload: [u8; 8]) -> Self {
        match value_type {
            ValueType::Counter => Value::Counter(u64::from_be_bytes(payload)),
            ValueType::Gauge => Value::Gauge(f64::from_le_bytes(payload)),
            ValueType::Derive => Value::Derive(i64::from_be_bytes(payload)),
            ValueType::Absolute => Value::Absolute(u64::from_be_bytes(payload)),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Gauge(value)
    }
}
