//! Reference decoder for inspecting encoded datagrams.
//!
//! This is not a receiver: it understands exactly the parts this crate
//! writes and is meant for tests and dry-run output.

use collectd_net_common::{
    FieldKind, FieldType, ValueType, PART_HEADER_SIZE, VALUE_COUNT_SIZE, VALUE_ENTRY_SIZE,
};

use crate::value::Value;

/// Errors that can occur while decoding parts
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("Buffer too short")]
    BufferTooShort,
    #[error("Length mismatch: declared {declared}, actual {actual}")]
    LengthMismatch { declared: usize, actual: usize },
    #[error("Invalid field type code: 0x{0:04x}")]
    InvalidFieldCode(u16),
    #[error("Invalid value type: {0}")]
    InvalidValueType(u8),
    #[error("String part is not NUL terminated")]
    MissingTerminator,
    #[error("String part is not valid UTF-8")]
    Utf8,
    #[error("Missing {0} part")]
    MissingField(FieldType),
}

/// A decoded part
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedPart {
    String { field: FieldType, text: String },
    Numeric { field: FieldType, value: i64 },
    Values(Vec<Value>),
}

impl DecodedPart {
    pub fn field(&self) -> FieldType {
        match self {
            DecodedPart::String { field, .. } | DecodedPart::Numeric { field, .. } => *field,
            DecodedPart::Values(_) => FieldType::Values,
        }
    }
}

/// All fields of one decoded sample datagram
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedSample {
    pub host: String,
    pub time: i64,
    pub plugin: String,
    pub plugin_instance: String,
    pub type_name: String,
    pub type_instance: String,
    pub interval: i64,
    pub values: Vec<Value>,
}

/// Decode one part from the start of `data`, returning it and the bytes consumed
pub fn decode_part(data: &[u8]) -> Result<(DecodedPart, usize), DecodeError> {
    if data.len() < PART_HEADER_SIZE {
        return Err(DecodeError::BufferTooShort);
    }

    let code = u16::from_be_bytes([data[0], data[1]]);
    let length = u16::from_be_bytes([data[2], data[3]]) as usize;
    let field = FieldType::try_from(code).map_err(DecodeError::InvalidFieldCode)?;

    if length < PART_HEADER_SIZE {
        return Err(DecodeError::LengthMismatch {
            declared: length,
            actual: PART_HEADER_SIZE,
        });
    }
    if data.len() < length {
        return Err(DecodeError::BufferTooShort);
    }
    let body = &data[PART_HEADER_SIZE..length];

    let part = match field.kind() {
        FieldKind::String => {
            let (&last, text) = body.split_last().ok_or(DecodeError::MissingTerminator)?;
            if last != 0 || text.contains(&0) {
                return Err(DecodeError::MissingTerminator);
            }
            let text = std::str::from_utf8(text).map_err(|_| DecodeError::Utf8)?;
            DecodedPart::String {
                field,
                text: text.to_string(),
            }
        }
        FieldKind::Numeric => {
            let value: [u8; 8] = body.try_into().map_err(|_| DecodeError::LengthMismatch {
                declared: length,
                actual: PART_HEADER_SIZE + 8,
            })?;
            DecodedPart::Numeric {
                field,
                value: i64::from_be_bytes(value),
            }
        }
        FieldKind::ValueList => DecodedPart::Values(decode_values(body, length)?),
    };

    Ok((part, length))
}

fn decode_values(body: &[u8], declared: usize) -> Result<Vec<Value>, DecodeError> {
    if body.len() < VALUE_COUNT_SIZE {
        return Err(DecodeError::BufferTooShort);
    }
    let count = u16::from_be_bytes([body[0], body[1]]) as usize;
    let entries = &body[VALUE_COUNT_SIZE..];

    let expected = count * VALUE_ENTRY_SIZE;
    if entries.len() != expected {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: PART_HEADER_SIZE + VALUE_COUNT_SIZE + expected,
        });
    }

    let (tags, payloads) = entries.split_at(count);
    tags.iter()
        .zip(payloads.chunks_exact(8))
        .map(|(&tag, payload)| -> Result<Value, DecodeError> {
            let value_type = ValueType::try_from(tag).map_err(DecodeError::InvalidValueType)?;
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(payload);
            Ok(Value::from_payload(value_type, bytes))
        })
        .collect()
}

/// Decode every part in a datagram
pub fn decode_parts(data: &[u8]) -> Result<Vec<DecodedPart>, DecodeError> {
    let mut parts = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let (part, consumed) = decode_part(&data[offset..])?;
        parts.push(part);
        offset += consumed;
    }

    Ok(parts)
}

/// Decode a datagram holding a single sample
pub fn decode_sample(data: &[u8]) -> Result<DecodedSample, DecodeError> {
    let mut host = None;
    let mut time = None;
    let mut plugin = None;
    let mut plugin_instance = None;
    let mut type_name = None;
    let mut type_instance = None;
    let mut interval = None;
    let mut values = None;

    for part in decode_parts(data)? {
        match part {
            DecodedPart::String { field, text } => match field {
                FieldType::Host => host = Some(text),
                FieldType::Plugin => plugin = Some(text),
                FieldType::PluginInstance => plugin_instance = Some(text),
                FieldType::Type => type_name = Some(text),
                FieldType::TypeInstance => type_instance = Some(text),
                other => return Err(DecodeError::InvalidFieldCode(other.code())),
            },
            DecodedPart::Numeric { field, value } => match field {
                FieldType::Time => time = Some(value),
                FieldType::Interval => interval = Some(value),
                other => return Err(DecodeError::InvalidFieldCode(other.code())),
            },
            DecodedPart::Values(list) => values = Some(list),
        }
    }

    Ok(DecodedSample {
        host: host.ok_or(DecodeError::MissingField(FieldType::Host))?,
        time: time.ok_or(DecodeError::MissingField(FieldType::Time))?,
        plugin: plugin.ok_or(DecodeError::MissingField(FieldType::Plugin))?,
        plugin_instance: plugin_instance
            .ok_or(DecodeError::MissingField(FieldType::PluginInstance))?,
        type_name: type_name.ok_or(DecodeError::MissingField(FieldType::Type))?,
        type_instance: type_instance.ok_or(DecodeError::MissingField(FieldType::TypeInstance))?,
        interval: interval.ok_or(DecodeError::MissingField(FieldType::Interval))?,
        values: values.ok_or(DecodeError::MissingField(FieldType::Values))?,
    })
}
