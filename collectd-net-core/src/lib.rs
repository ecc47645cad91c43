//! Encoder for the collectd binary network protocol.
//!
//! A [`Sample`] describes one measurement event. [`Datagram::assemble`] turns
//! it into the exact byte sequence a collectd network plugin expects, built
//! from the part primitives in [`tlv`].

pub mod datagram;
#[cfg(any(test, feature = "inspect"))]
pub mod inspect;
pub mod sample;
pub mod tlv;
pub mod value;

pub use datagram::Datagram;
pub use sample::{local_hostname, Sample};
pub use tlv::{
    encode_field, encode_numeric, encode_string, encode_typed_value_list, encode_value_list,
    EncodeError, FieldValue, Part,
};
pub use value::Value;

pub use collectd_net_common::{FieldKind, FieldType, ValueType};

/// Result type alias for encoding operations
pub type Result<T, E = EncodeError> = std::result::Result<T, E>;
