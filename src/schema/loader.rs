//! Declarative schema loading
//!
//! Source format:
//!
//! ```json
//! {
//!   "message": "TradeUpdate",
//!   "endianness": "little",
//!   "fields": [
//!     { "name": "ts", "type": "u64" },
//!     { "name": "price", "type": "i64", "scale": -4 }
//!   ]
//! }
//! ```
//!
//! Validation stops at the first violation.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{Error, Result};

use super::{Endianness, FieldSpec, FieldType, MessageSchema};

/// Read and validate a schema file
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::Json`] if the file cannot be read or
/// parsed, or a validation error describing the first violation.
pub fn load_schema(path: impl AsRef<Path>) -> Result<MessageSchema> {
    MessageSchema::from_path(path)
}

impl MessageSchema {
    /// Read and validate a schema file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        debug!(path = %path.display(), bytes = text.len(), "loading schema");
        Self::from_json_str(&text)
    }

    /// Parse and validate a schema from JSON text
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json_value(&value)
    }

    /// Validate an already parsed JSON document
    #[instrument(level = "trace", skip(source))]
    pub fn from_json_value(source: &Value) -> Result<Self> {
        let Value::Object(root) = source else {
            return Err(Error::NotAnObject);
        };

        let message = match root.get("message") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            _ => return Err(Error::InvalidMessageName),
        };

        if let Some(value) = root.get("endianness") {
            let supported = value.as_str().and_then(Endianness::parse).is_some();
            if !supported {
                return Err(Error::UnsupportedEndianness {
                    found: value.to_string(),
                });
            }
        }

        let entries = match root.get("fields") {
            Some(Value::Array(entries)) if !entries.is_empty() => entries,
            _ => return Err(Error::MissingFields),
        };

        let mut fields: Vec<FieldSpec> = Vec::with_capacity(entries.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            let Value::Object(entry) = entry else {
                return Err(Error::FieldNotObject { index });
            };
            let (name, type_tag, scale) = field_entry(index, entry)?;

            if !seen.insert(name) {
                return Err(Error::DuplicateField {
                    name: name.to_owned(),
                });
            }

            let Some(field_type) = FieldType::parse(type_tag) else {
                return Err(Error::UnsupportedType {
                    field: name.to_owned(),
                    type_tag: type_tag.to_owned(),
                });
            };
            fields.push(FieldSpec::with_type(name, field_type, scale));
        }

        let schema = Self::new(message, fields)?;
        debug!(
            schema = schema.message(),
            fields = schema.len(),
            wire_size = schema.total_wire_size(),
            "schema validated"
        );
        Ok(schema)
    }
}

/// Extract `(name, type, scale)` from one field object
fn field_entry(index: usize, entry: &Map<String, Value>) -> Result<(&str, &str, Option<i64>)> {
    let name = match entry.get("name") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.as_str(),
        _ => return Err(Error::InvalidFieldName { index }),
    };

    let type_tag = match entry.get("type") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.as_str(),
        _ => {
            return Err(Error::InvalidFieldType {
                field: name.to_owned(),
            });
        }
    };

    let scale = match entry.get("scale") {
        None | Some(Value::Null) => None,
        Some(value) => match value.as_i64() {
            Some(scale) => Some(scale),
            // integral but wider than i64
            None if value.is_u64() => {
                return Err(Error::ScaleOutOfRange {
                    field: name.to_owned(),
                    value: value.to_string(),
                });
            }
            None => {
                return Err(Error::InvalidScale {
                    field: name.to_owned(),
                });
            }
        },
    };

    Ok((name, type_tag, scale))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn load(value: &Value) -> Result<MessageSchema> {
        MessageSchema::from_json_value(value)
    }

    #[test]
    fn test_load_preserves_declaration_order() {
        let schema = load(&json!({
            "message": "TradeUpdate",
            "fields": [
                {"name": "ts", "type": "u64"},
                {"name": "symbol", "type": "char[8]"},
                {"name": "price", "type": "i64", "scale": -4},
                {"name": "qty", "type": "u32"}
            ]
        }))
        .unwrap();

        assert_eq!(schema.message(), "TradeUpdate");
        assert_eq!(schema.field_names(), vec!["ts", "symbol", "price", "qty"]);
        assert_eq!(schema.field("price").unwrap().scale(), Some(-4));
        assert_eq!(schema.total_wire_size(), 28);
    }

    #[test]
    fn test_endianness_defaults_and_accepts_little() {
        let schema = load(&json!({
            "message": "M",
            "endianness": "little",
            "fields": [{"name": "a", "type": "u32"}]
        }))
        .unwrap();
        assert_eq!(schema.endianness(), Endianness::Little);
    }

    #[test]
    fn test_big_endian_rejected() {
        let err = load(&json!({
            "message": "M",
            "endianness": "big",
            "fields": [{"name": "a", "type": "u32"}]
        }))
        .unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err, Error::UnsupportedEndianness { ref found } if found == "\"big\""));
    }

    #[test]
    fn test_null_endianness_rejected() {
        let err = load(&json!({
            "message": "M",
            "endianness": null,
            "fields": [{"name": "a", "type": "u32"}]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedEndianness { .. }));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(matches!(load(&json!([1, 2])), Err(Error::NotAnObject)));
        assert!(matches!(load(&json!("schema")), Err(Error::NotAnObject)));
    }

    #[test]
    fn test_message_checked_before_fields() {
        assert!(matches!(load(&json!({})), Err(Error::InvalidMessageName)));
        assert!(matches!(
            load(&json!({"message": " ", "fields": []})),
            Err(Error::InvalidMessageName)
        ));
        assert!(matches!(
            load(&json!({"message": 7, "fields": [{"name": "a", "type": "u32"}]})),
            Err(Error::InvalidMessageName)
        ));
    }

    #[test]
    fn test_fields_must_be_non_empty_list() {
        for fields in [json!(null), json!([]), json!({"a": "u32"})] {
            let err = load(&json!({"message": "M", "fields": fields})).unwrap_err();
            assert!(matches!(err, Error::MissingFields));
        }
    }

    #[test]
    fn test_malformed_field_entries() {
        let err = load(&json!({"message": "M", "fields": [{"name": "a", "type": "u32"}, 5]}))
            .unwrap_err();
        assert!(matches!(err, Error::FieldNotObject { index: 1 }));

        let err = load(&json!({"message": "M", "fields": [{"name": "", "type": "u32"}]}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFieldName { index: 0 }));

        let err = load(&json!({"message": "M", "fields": [{"name": "a"}]})).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldType { ref field } if field == "a"));

        let err = load(&json!({"message": "M", "fields": [{"name": "a", "type": "u32", "scale": 1.5}]}))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidScale { ref field } if field == "a"));
    }

    #[test]
    fn test_scale_beyond_i64_is_out_of_range() {
        let err = load(&json!({
            "message": "M",
            "fields": [{"name": "a", "type": "i64", "scale": u64::MAX}]
        }))
        .unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(err, Error::ScaleOutOfRange { ref field, .. } if field == "a"));
        assert!(err.to_string().contains("18446744073709551615"));

        let schema = load(&json!({
            "message": "M",
            "fields": [{"name": "a", "type": "i64", "scale": i64::MIN}]
        }))
        .unwrap();
        assert_eq!(schema.fields()[0].scale(), Some(i64::MIN));
    }

    #[test]
    fn test_oversized_char_is_unsupported() {
        let err = load(&json!({
            "message": "M",
            "fields": [{"name": "blob", "type": "char[18446744073709551615]"}]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedType { ref field, .. } if field == "blob"));

        let schema = load(&json!({"message": "M", "fields": [{"name": "blob", "type": "char[65535]"}]}))
            .unwrap();
        assert_eq!(schema.total_wire_size(), 65_535);
    }

    #[test]
    fn test_null_scale_is_absent() {
        let schema = load(&json!({"message": "M", "fields": [{"name": "a", "type": "u32", "scale": null}]}))
            .unwrap();
        assert_eq!(schema.fields()[0].scale(), None);
    }

    #[test]
    fn test_duplicate_reported_by_name() {
        let err = load(&json!({
            "message": "M",
            "fields": [
                {"name": "x", "type": "u32"},
                {"name": "y", "type": "u32"},
                {"name": "x", "type": "u64"}
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateField { ref name } if name == "x"));
        assert!(err.to_string().contains('x'));
    }

    #[test]
    fn test_duplicate_reported_before_bad_type() {
        let err = load(&json!({
            "message": "M",
            "fields": [
                {"name": "x", "type": "u32"},
                {"name": "x", "type": "float"}
            ]
        }))
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateField { .. }));
    }

    #[test]
    fn test_unsupported_type_names_field() {
        let err = load(&json!({"message": "M", "fields": [{"name": "px", "type": "f64"}]}))
            .unwrap_err();
        assert!(err.is_validation());
        assert!(matches!(
            err,
            Error::UnsupportedType { ref field, ref type_tag } if field == "px" && type_tag == "f64"
        ));
    }

    #[test]
    fn test_invalid_json_text() {
        assert!(matches!(
            MessageSchema::from_json_str("{not json"),
            Err(Error::Json(_))
        ));
    }
}
