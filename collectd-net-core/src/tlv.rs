use std::io::{self, Write};

use collectd_net_common::{
    FieldKind, FieldType, MAX_PART_LENGTH, NUMERIC_PART_LENGTH, PART_HEADER_SIZE,
    VALUE_COUNT_SIZE, VALUE_ENTRY_SIZE,
};

use crate::value::Value;

/// Part (type-length-value) codec for the collectd binary protocol
///
/// Wire format of every part:
/// - Type: 2 bytes, big-endian
/// - Length: 2 bytes, big-endian, counting the 4 header bytes too
/// - Value: `length - 4` bytes whose layout depends on the type
///
/// String values are NUL terminated. Numeric values are big-endian i64.
/// Value lists carry a big-endian count, then one tag byte per value,
/// then one 8 byte payload per value.
#[derive(Debug, Clone, PartialEq)]
pub enum Part<'a> {
    String { field: FieldType, text: &'a str },
    Numeric { field: FieldType, value: i64 },
    Values(&'a [Value]),
}

/// Errors that can occur while encoding parts or assembling a sample
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid field type code: 0x{0:04x}")]
    InvalidFieldCode(u16),
    #[error("Field {field} too large: {length} bytes (max: 65535)")]
    FieldTooLarge { field: FieldType, length: usize },
    #[error("Encoding error: {0}")]
    Encoding(String),
    #[error("Value list must contain at least one value")]
    EmptyValues,
    #[error("Type name must not be empty")]
    MissingType,
}

/// Value accepted by [`encode_field`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(i64),
}

impl<'a> Part<'a> {
    /// Get the total encoded length of this part, header included
    pub fn encoded_length(&self) -> usize {
        match self {
            Part::String { text, .. } => PART_HEADER_SIZE + text.len() + 1,
            Part::Numeric { .. } => NUMERIC_PART_LENGTH as usize,
            Part::Values(values) => {
                PART_HEADER_SIZE + VALUE_COUNT_SIZE + values.len() * VALUE_ENTRY_SIZE
            }
        }
    }

    pub fn field(&self) -> FieldType {
        match self {
            Part::String { field, .. } | Part::Numeric { field, .. } => *field,
            Part::Values(_) => FieldType::Values,
        }
    }

    /// Encode this part to bytes
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buffer = Vec::with_capacity(self.encoded_length());
        self.encode_to(&mut buffer)?;
        Ok(buffer)
    }

    /// Encode this part to a writer
    ///
    /// Nothing is written when validation fails.
    pub fn encode_to<W: Write>(&self, writer: &mut W) -> Result<(), EncodeError> {
        let length = self.declared_length()?;

        writer.write_all(&self.field().code().to_be_bytes())?;
        writer.write_all(&length.to_be_bytes())?;

        match self {
            Part::String { text, .. } => {
                writer.write_all(text.as_bytes())?;
                writer.write_all(&[0])?;
            }
            Part::Numeric { value, .. } => {
                writer.write_all(&value.to_be_bytes())?;
            }
            Part::Values(values) => {
                // Count fits: declared_length already bounded the whole part
                writer.write_all(&(values.len() as u16).to_be_bytes())?;
                for value in values.iter() {
                    writer.write_all(&[value.value_type().code()])?;
                }
                for value in values.iter() {
                    writer.write_all(&value.payload())?;
                }
            }
        }

        Ok(())
    }

    /// Validate the part and compute its 16-bit length field
    fn declared_length(&self) -> Result<u16, EncodeError> {
        let field = self.field();
        match self {
            Part::String { text, .. } => {
                if field.kind() != FieldKind::String {
                    return Err(EncodeError::InvalidFieldCode(field.code()));
                }
                if text.as_bytes().contains(&0) {
                    return Err(EncodeError::Encoding(format!(
                        "{} contains an embedded NUL byte",
                        field.name()
                    )));
                }
            }
            Part::Numeric { .. } => {
                if field.kind() != FieldKind::Numeric {
                    return Err(EncodeError::InvalidFieldCode(field.code()));
                }
            }
            Part::Values(values) => {
                if values.is_empty() {
                    return Err(EncodeError::EmptyValues);
                }
            }
        }

        let length = self.encoded_length();
        u16::try_from(length).map_err(|_| EncodeError::FieldTooLarge { field, length })
    }
}

/// Encode a numeric part (Time or Interval)
///
/// Always produces 12 bytes: type, length and value, all big-endian.
pub fn encode_numeric(field: FieldType, value: i64) -> Result<Vec<u8>, EncodeError> {
    Part::Numeric { field, value }.encode()
}

/// Encode a NUL terminated string part
pub fn encode_string(field: FieldType, text: &str) -> Result<Vec<u8>, EncodeError> {
    Part::String { field, text }.encode()
}

/// Encode a type instance part followed by a values part of gauges
pub fn encode_value_list(type_instance: &str, values: &[f64]) -> Result<Vec<u8>, EncodeError> {
    let gauges: Vec<Value> = values.iter().copied().map(Value::Gauge).collect();
    encode_typed_value_list(type_instance, &gauges)
}

/// Encode a type instance part followed by a values part
///
/// Unlike [`encode_value_list`] every value keeps its own data source type.
pub fn encode_typed_value_list(
    type_instance: &str,
    values: &[Value],
) -> Result<Vec<u8>, EncodeError> {
    let parts = [
        Part::String {
            field: FieldType::TypeInstance,
            text: type_instance,
        },
        Part::Values(values),
    ];
    encode_part_sequence(&parts)
}

/// Encode a string or numeric part selected by its raw type code
///
/// Values parts are never routed through here; use [`encode_value_list`].
pub fn encode_field(code: u16, value: FieldValue<'_>) -> Result<Vec<u8>, EncodeError> {
    let field = FieldType::try_from(code).map_err(EncodeError::InvalidFieldCode)?;

    let part = match (field.kind(), value) {
        (FieldKind::String, FieldValue::Text(text)) => Part::String { field, text },
        (FieldKind::Numeric, FieldValue::Number(value)) => Part::Numeric { field, value },
        (FieldKind::ValueList, _) => return Err(EncodeError::InvalidFieldCode(code)),
        (_, FieldValue::Text(_)) => {
            return Err(EncodeError::Encoding(format!(
                "{} expects a number, got text",
                field.name()
            )))
        }
        (_, FieldValue::Number(_)) => {
            return Err(EncodeError::Encoding(format!(
                "{} expects text, got a number",
                field.name()
            )))
        }
    };

    part.encode()
}

/// Encode multiple parts into a single buffer
pub fn encode_part_sequence(parts: &[Part<'_>]) -> Result<Vec<u8>, EncodeError> {
    let total_size = parts.iter().map(|p| p.encoded_length()).sum();
    let mut buffer = Vec::with_capacity(total_size);

    for part in parts {
        part.encode_to(&mut buffer)?;
    }

    Ok(buffer)
}

/// Largest number of values a single values part can hold
pub const fn max_values_per_part() -> usize {
    (MAX_PART_LENGTH - PART_HEADER_SIZE - VALUE_COUNT_SIZE) / VALUE_ENTRY_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;
    use collectd_net_common::ValueType;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_numeric_declared_length(value in any::<i64>()) {
            let encoded = encode_numeric(FieldType::Time, value).unwrap();

            prop_assert_eq!(encoded.len(), 12);
            prop_assert_eq!(&encoded[0..2], &[0x00, 0x01]);
            prop_assert_eq!(&encoded[2..4], &[0x00, 0x0C]);
            prop_assert_eq!(&encoded[4..], &value.to_be_bytes());
        }

        #[test]
        fn prop_value_list_layout(
            values in prop::collection::vec(any::<f64>(), 1..64),
            type_instance in "[a-z0-9_-]{0,16}",
        ) {
            let encoded = encode_value_list(&type_instance, &values).unwrap();
            let n = values.len();

            // Type instance part first, then the values part
            let values_part = &encoded[5 + type_instance.len()..];
            prop_assert_eq!(values_part.len(), 6 + 9 * n);
            prop_assert_eq!(&values_part[0..2], &[0x00, 0x06]);
            prop_assert_eq!(
                u16::from_be_bytes([values_part[2], values_part[3]]) as usize,
                6 + 9 * n
            );
            prop_assert_eq!(u16::from_be_bytes([values_part[4], values_part[5]]) as usize, n);

            let (tags, payloads) = values_part[6..].split_at(n);
            prop_assert!(tags.iter().all(|&tag| tag == ValueType::Gauge.code()));
            for (payload, value) in payloads.chunks_exact(8).zip(&values) {
                prop_assert_eq!(payload, &value.to_le_bytes()[..]);
            }
        }
    }

    #[test]
    fn test_numeric_encoding() {
        let encoded = encode_numeric(FieldType::Time, 1_000_000_000).unwrap();

        assert_eq!(encoded.len(), 12);
        assert_eq!(&encoded[0..2], &[0x00, 0x01]); // Type
        assert_eq!(&encoded[2..4], &[0x00, 0x0C]); // Length
        assert_eq!(&encoded[4..], &1_000_000_000i64.to_be_bytes());
    }

    #[test]
    fn test_numeric_declared_length_matches_bytes() {
        for value in [i64::MIN, -1, 0, 1, 10, i64::MAX] {
            let encoded = encode_numeric(FieldType::Interval, value).unwrap();
            let declared = u16::from_be_bytes([encoded[2], encoded[3]]) as usize;
            assert_eq!(declared, encoded.len());
            assert_eq!(i64::from_be_bytes(encoded[4..12].try_into().unwrap()), value);
        }
    }

    #[test]
    fn test_string_encoding() {
        let encoded = encode_string(FieldType::Host, "h1").unwrap();

        // Type (0) + Length (5 + 2) + "h1" + NUL
        assert_eq!(encoded, vec![0x00, 0x00, 0x00, 0x07, b'h', b'1', 0x00]);
    }

    #[test]
    fn test_empty_string_encoding() {
        let encoded = encode_string(FieldType::PluginInstance, "").unwrap();
        assert_eq!(encoded, vec![0x00, 0x03, 0x00, 0x05, 0x00]);
    }

    #[test]
    fn test_string_length_counts_bytes_not_chars() {
        let encoded = encode_string(FieldType::Plugin, "é").unwrap();
        assert_eq!(u16::from_be_bytes([encoded[2], encoded[3]]), 7);
        assert_eq!(encoded.len(), 7);
    }

    #[test]
    fn test_embedded_nul_rejected() {
        let result = encode_string(FieldType::Type, "a\0b");
        assert!(matches!(result, Err(EncodeError::Encoding(_))));
    }

    #[test]
    fn test_oversized_string_rejected() {
        // 65530 bytes of text is the most that fits: 4 + 65530 + 1 = 65535
        let fits = "a".repeat(65530);
        let encoded = encode_string(FieldType::Host, &fits).unwrap();
        assert_eq!(u16::from_be_bytes([encoded[2], encoded[3]]), 65535);

        let too_long = "a".repeat(65531);
        let result = encode_string(FieldType::Host, &too_long);
        assert!(matches!(
            result,
            Err(EncodeError::FieldTooLarge {
                field: FieldType::Host,
                length: 65536
            })
        ));
    }

    #[test]
    fn test_single_gauge_value_list() {
        let encoded = encode_value_list("ti", &[42.5]).unwrap();

        let type_instance = &encoded[..7];
        assert_eq!(type_instance, &[0x00, 0x05, 0x00, 0x07, b't', b'i', 0x00]);

        let values = &encoded[7..];
        assert_eq!(values.len(), 15);
        assert_eq!(&values[0..2], &[0x00, 0x06]); // Type
        assert_eq!(&values[2..4], &[0x00, 0x0F]); // Length
        assert_eq!(&values[4..6], &[0x00, 0x01]); // Count
        assert_eq!(values[6], 1); // Gauge tag
        assert_eq!(&values[7..15], &42.5f64.to_le_bytes());
    }

    #[test]
    fn test_multiple_gauges_layout() {
        let samples = [1.0, -2.5, 1e300, 0.0];
        let encoded = encode_value_list("", &samples).unwrap();
        let values = &encoded[5..];

        let n = samples.len();
        assert_eq!(u16::from_be_bytes([values[2], values[3]]) as usize, 6 + 9 * n);
        assert_eq!(values.len(), 6 + 9 * n);
        assert_eq!(u16::from_be_bytes([values[4], values[5]]) as usize, n);

        // Tags first, then payloads
        assert!(values[6..6 + n].iter().all(|&tag| tag == 1));
        for (i, expected) in samples.iter().enumerate() {
            let start = 6 + n + i * 8;
            let payload: [u8; 8] = values[start..start + 8].try_into().unwrap();
            assert_eq!(f64::from_le_bytes(payload), *expected);
        }
    }

    #[test]
    fn test_typed_value_list_keeps_value_types() {
        let values = [Value::Counter(7), Value::Derive(-3), Value::Absolute(9)];
        let encoded = encode_typed_value_list("", &values).unwrap();
        let part = &encoded[5..];

        assert_eq!(&part[6..9], &[0, 2, 3]);
        assert_eq!(&part[9..17], &7u64.to_be_bytes());
        assert_eq!(&part[17..25], &(-3i64).to_be_bytes());
        assert_eq!(&part[25..33], &9u64.to_be_bytes());
    }

    #[test]
    fn test_empty_value_list_rejected() {
        assert!(matches!(encode_value_list("x", &[]), Err(EncodeError::EmptyValues)));
    }

    #[test]
    fn test_value_list_too_large() {
        let max = max_values_per_part();
        assert_eq!(max, 7281);
        assert!(encode_value_list("", &vec![0.0; max]).is_ok());

        let result = encode_value_list("", &vec![0.0; max + 1]);
        assert!(matches!(
            result,
            Err(EncodeError::FieldTooLarge {
                field: FieldType::Values,
                ..
            })
        ));
    }

    #[test]
    fn test_encode_field_dispatch() {
        let host = encode_field(0x0000, FieldValue::Text("h1")).unwrap();
        assert_eq!(host, encode_string(FieldType::Host, "h1").unwrap());

        let interval = encode_field(0x0007, FieldValue::Number(10)).unwrap();
        assert_eq!(interval, encode_numeric(FieldType::Interval, 10).unwrap());
    }

    #[test]
    fn test_encode_field_invalid_code() {
        assert!(matches!(
            encode_field(0x0042, FieldValue::Number(1)),
            Err(EncodeError::InvalidFieldCode(0x0042))
        ));
        assert!(matches!(
            encode_field(0x0006, FieldValue::Number(1)),
            Err(EncodeError::InvalidFieldCode(0x0006))
        ));
    }

    #[test]
    fn test_encode_field_kind_mismatch() {
        assert!(matches!(
            encode_field(0x0001, FieldValue::Text("now")),
            Err(EncodeError::Encoding(_))
        ));
        assert!(matches!(
            encode_field(0x0002, FieldValue::Number(3)),
            Err(EncodeError::Encoding(_))
        ));
    }

    #[test]
    fn test_part_rejects_wrong_field_kind() {
        let part = Part::Numeric {
            field: FieldType::Host,
            value: 1,
        };
        assert!(matches!(part.encode(), Err(EncodeError::InvalidFieldCode(0x0000))));

        let part = Part::String {
            field: FieldType::Time,
            text: "x",
        };
        assert!(matches!(part.encode(), Err(EncodeError::InvalidFieldCode(0x0001))));
    }

    #[test]
    fn test_failed_encode_writes_nothing() {
        let mut buffer = Vec::new();
        let part = Part::String {
            field: FieldType::Host,
            text: "bad\0",
        };
        assert!(part.encode_to(&mut buffer).is_err());
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_sequence_encoding() {
        let parts = [
            Part::String {
                field: FieldType::Host,
                text: "a",
            },
            Part::Numeric {
                field: FieldType::Time,
                value: 5,
            },
        ];
        let encoded = encode_part_sequence(&parts).unwrap();
        assert_eq!(encoded.len(), 6 + 12);
        assert_eq!(&encoded[6..8], &[0x00, 0x01]);
    }
}
