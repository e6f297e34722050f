//! Binary fixtures
//!
//! [`encode`] turns literal field values into the exact bytes a conformant
//! parser must accept for a schema. [`decode`] is the reference parser: it
//! reads the same packed little-endian layout back.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use sbedg::{FieldSpec, FieldValue, MessageSchema, fixture};
//!
//! let schema = MessageSchema::new(
//!     "Tick",
//!     vec![FieldSpec::new("qty", "u32", None)?, FieldSpec::new("venue", "char[4]", None)?],
//! )?;
//! let values = HashMap::from([
//!     ("qty".to_owned(), FieldValue::from(42u32)),
//!     ("venue".to_owned(), FieldValue::from("XN")),
//! ]);
//! let bytes = fixture::encode(&schema, &values)?;
//! assert_eq!(&bytes[..], b"\x2a\x00\x00\x00XN\x00\x00");
//! # Ok::<(), sbedg::Error>(())
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::schema::{FieldSpec, FieldType, MessageSchema, ValueKind};
use crate::{Error, Result};

/// A literal value for one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Non-negative integer
    Unsigned(u64),
    /// Signed integer
    Signed(i64),
    /// ASCII text for a `char[N]` field
    Text(String),
    /// Raw bytes for a `char[N]` field
    Bytes(Vec<u8>),
}

/// Values keyed by field name
pub type FieldValues = HashMap<String, FieldValue>;

impl FieldValue {
    /// Interpret a JSON value from a fixture value file
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingFieldValue`] for `null`, and
    /// [`Error::InvalidFixtureValue`] for floats, booleans, objects and arrays
    /// that are not all bytes. Whether the value suits the field's type is
    /// decided later by [`encode`].
    pub fn from_json(field: &str, value: &Value) -> Result<Self> {
        let invalid = || Error::InvalidFixtureValue {
            field: field.to_owned(),
            value: value.to_string(),
        };
        match value {
            Value::Null => Err(Error::MissingFieldValue {
                field: field.to_owned(),
            }),
            Value::Number(n) => n
                .as_u64()
                .map(Self::Unsigned)
                .or_else(|| n.as_i64().map(Self::Signed))
                .ok_or_else(invalid),
            Value::String(s) => Ok(Self::Text(s.clone())),
            Value::Array(items) => items
                .iter()
                .map(|item| item.as_u64().and_then(|b| u8::try_from(b).ok()))
                .collect::<Option<Vec<u8>>>()
                .map(Self::Bytes)
                .ok_or_else(invalid),
            Value::Bool(_) | Value::Object(_) => Err(invalid()),
        }
    }

    /// Parse a JSON object of `name -> value` into fixture values
    ///
    /// `null` entries are left out, so [`encode`] reports them as missing.
    pub fn map_from_json(source: &Value) -> Result<FieldValues> {
        let Value::Object(entries) = source else {
            return Err(Error::ValuesNotAnObject);
        };
        entries
            .iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(name, value)| Ok((name.clone(), Self::from_json(name, value)?)))
            .collect()
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        Self::Unsigned(u64::from(value))
    }
}

impl From<u64> for FieldValue {
    fn from(value: u64) -> Self {
        Self::Unsigned(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Signed(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<Vec<u8>> for FieldValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl From<&[u8]> for FieldValue {
    fn from(value: &[u8]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

/// Encode field values into a packed little-endian buffer
///
/// # Format
///
/// ```text
/// [FIELD 0][FIELD 1]...[FIELD N-1]   (declaration order, no padding)
/// ```
///
/// Integers are written at their wire width. `char[N]` values are truncated
/// to N bytes or right-padded with zeros. The result is always exactly
/// [`MessageSchema::total_wire_size`] bytes.
///
/// # Errors
///
/// Returns an error if:
/// - A field has no value ([`Error::MissingFieldValue`])
/// - An integer does not fit the field type ([`Error::EncodingOverflow`])
/// - Text contains a non-ASCII character ([`Error::InvalidCharacterEncoding`])
/// - The value shape does not match the field ([`Error::ValueTypeMismatch`])
#[instrument(level = "trace", skip_all, fields(schema = schema.message()))]
pub fn encode(schema: &MessageSchema, values: &FieldValues) -> Result<Bytes> {
    let mut buf = BytesMut::with_capacity(schema.total_wire_size());

    for field in schema.fields() {
        let value = values
            .get(field.name())
            .ok_or_else(|| Error::MissingFieldValue {
                field: field.name().to_owned(),
            })?;
        trace!(field = field.name(), offset = buf.len(), "encoding field");

        match field.field_type() {
            FieldType::U32 => {
                let v = unsigned(field, value)?;
                let v = u32::try_from(v).map_err(|_| overflow(field, v))?;
                buf.put_u32_le(v);
            }
            FieldType::U64 => buf.put_u64_le(unsigned(field, value)?),
            FieldType::I64 => buf.put_i64_le(signed(field, value)?),
            FieldType::Char(n) => {
                let raw = byte_array(field, value)?;
                let len = raw.len().min(n);
                buf.put_slice(&raw[..len]);
                buf.put_bytes(0, n - len);
            }
        }
    }

    debug_assert_eq!(buf.len(), schema.total_wire_size());
    Ok(buf.freeze())
}

/// Encode a fixture and write it as a raw file with no header or trailer
pub fn write_fixture(
    schema: &MessageSchema,
    values: &FieldValues,
    path: impl AsRef<Path>,
) -> Result<Bytes> {
    let path = path.as_ref();
    let bytes = encode(schema, values)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, &bytes)?;
    debug!(path = %path.display(), bytes = bytes.len(), "fixture written");
    Ok(bytes)
}

fn overflow(field: &FieldSpec, value: impl ToString) -> Error {
    Error::EncodingOverflow {
        field: field.name().to_owned(),
        field_type: field.field_type(),
        value: value.to_string(),
    }
}

fn mismatch(field: &FieldSpec) -> Error {
    Error::ValueTypeMismatch {
        field: field.name().to_owned(),
        expected: field.field_type().value_kind(),
    }
}

fn unsigned(field: &FieldSpec, value: &FieldValue) -> Result<u64> {
    match *value {
        FieldValue::Unsigned(v) => Ok(v),
        FieldValue::Signed(v) => u64::try_from(v).map_err(|_| overflow(field, v)),
        FieldValue::Text(_) | FieldValue::Bytes(_) => Err(mismatch(field)),
    }
}

fn signed(field: &FieldSpec, value: &FieldValue) -> Result<i64> {
    match *value {
        FieldValue::Signed(v) => Ok(v),
        FieldValue::Unsigned(v) => i64::try_from(v).map_err(|_| overflow(field, v)),
        FieldValue::Text(_) | FieldValue::Bytes(_) => Err(mismatch(field)),
    }
}

fn byte_array<'a>(field: &FieldSpec, value: &'a FieldValue) -> Result<&'a [u8]> {
    match value {
        FieldValue::Text(text) => {
            if let Some((position, character)) = text.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
                return Err(Error::InvalidCharacterEncoding {
                    field: field.name().to_owned(),
                    character,
                    position,
                });
            }
            Ok(text.as_bytes())
        }
        FieldValue::Bytes(raw) => Ok(raw),
        FieldValue::Unsigned(_) | FieldValue::Signed(_) => Err(mismatch(field)),
    }
}

/// Field values read back from a buffer, in declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedRecord {
    values: Vec<(String, FieldValue)>,
}

impl DecodedRecord {
    /// Value of a field
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    /// A `char[N]` field as text, cut at the first NUL
    ///
    /// Returns `None` for integer fields or bytes that are not UTF-8.
    #[must_use]
    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            FieldValue::Bytes(raw) => {
                let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
                std::str::from_utf8(&raw[..end]).ok()
            }
            _ => None,
        }
    }

    /// All `(name, value)` pairs in declaration order
    #[must_use]
    pub fn values(&self) -> &[(String, FieldValue)] {
        &self.values
    }
}

/// Parse a buffer laid out per `schema`
///
/// Trailing bytes past the wire size are ignored.
///
/// # Errors
///
/// Returns [`Error::BufferTooSmall`] if the buffer is shorter than the
/// schema's total wire size.
pub fn decode(schema: &MessageSchema, bytes: &[u8]) -> Result<DecodedRecord> {
    let needed = schema.total_wire_size();
    if bytes.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            got: bytes.len(),
        });
    }

    let mut cursor = &bytes[..needed];
    let values = schema
        .fields()
        .iter()
        .map(|field| {
            let value = match field.field_type() {
                FieldType::U32 => FieldValue::Unsigned(u64::from(cursor.get_u32_le())),
                FieldType::U64 => FieldValue::Unsigned(cursor.get_u64_le()),
                FieldType::I64 => FieldValue::Signed(cursor.get_i64_le()),
                FieldType::Char(n) => FieldValue::Bytes(cursor.copy_to_bytes(n).to_vec()),
            };
            (field.name().to_owned(), value)
        })
        .collect();

    Ok(DecodedRecord { values })
}
