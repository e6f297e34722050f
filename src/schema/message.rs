//! Message schema: an ordered, packed sequence of fields

use std::collections::HashSet;
use std::fmt;

use crate::{Error, Result};

use super::{FieldSpec, FieldType, MAX_CHAR_LEN};

/// Byte order of every integer on the wire
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Endianness {
    /// Least significant byte first
    #[default]
    Little,
}

impl Endianness {
    /// Resolve the source spelling
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        (value == "little").then_some(Self::Little)
    }
}

impl fmt::Display for Endianness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Little => write!(f, "little"),
        }
    }
}

/// A fixed-size binary message layout
///
/// Fields are packed in declaration order with no padding, so a field's
/// offset is the sum of the wire sizes declared before it. A schema is
/// immutable once built; a new version is a new `MessageSchema`.
///
/// # Example
///
/// ```
/// use sbedg::{FieldSpec, MessageSchema};
///
/// let schema = MessageSchema::new(
///     "Quote",
///     vec![
///         FieldSpec::new("ts", "u64", None)?,
///         FieldSpec::new("symbol", "char[8]", None)?,
///     ],
/// )?;
/// assert_eq!(schema.total_wire_size(), 16);
/// # Ok::<(), sbedg::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSchema {
    message: String,
    endianness: Endianness,
    fields: Vec<FieldSpec>,
    total_wire_size: usize,
}

impl MessageSchema {
    /// Build a schema, checking name, field list and field-name uniqueness
    ///
    /// # Errors
    ///
    /// Returns a validation error for a blank message name, an empty field
    /// list, a duplicate field name, a `char[N]` longer than
    /// [`MAX_CHAR_LEN`], or a total size that overflows `usize`.
    pub fn new(message: impl Into<String>, fields: Vec<FieldSpec>) -> Result<Self> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(Error::InvalidMessageName);
        }
        if fields.is_empty() {
            return Err(Error::MissingFields);
        }

        let mut seen = HashSet::with_capacity(fields.len());
        let mut total: usize = 0;
        for field in &fields {
            if !seen.insert(field.name()) {
                return Err(Error::DuplicateField {
                    name: field.name().to_owned(),
                });
            }
            if matches!(field.field_type(), FieldType::Char(n) if n > MAX_CHAR_LEN) {
                return Err(Error::UnsupportedType {
                    field: field.name().to_owned(),
                    type_tag: field.field_type().to_string(),
                });
            }
            total = total
                .checked_add(field.wire_size())
                .ok_or_else(|| Error::WireSizeOverflow {
                    field: field.name().to_owned(),
                })?;
        }

        Ok(Self {
            message,
            endianness: Endianness::Little,
            fields,
            total_wire_size: total,
        })
    }

    /// Message name
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Wire byte order
    #[must_use]
    pub const fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Number of fields
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Always false: a schema has at least one field
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order
    #[must_use]
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(FieldSpec::name).collect()
    }

    /// Look up a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Zero-based declaration index of a field
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }

    /// Sum of all field wire sizes
    #[must_use]
    pub const fn total_wire_size(&self) -> usize {
        self.total_wire_size
    }

    /// Fields paired with their packed byte offsets
    pub fn layout(&self) -> impl Iterator<Item = (usize, &FieldSpec)> + '_ {
        self.fields.iter().scan(0usize, |offset, field| {
            let start = *offset;
            *offset += field.wire_size();
            Some((start, field))
        })
    }
}
