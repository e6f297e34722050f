//! Schema field definition

use crate::{Error, Result};

use super::FieldType;

/// One field of a fixed-layout message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    field_type: FieldType,
    /// Carried through untouched; never used for parsing or diffing
    scale: Option<i64>,
}

impl FieldSpec {
    /// Create a field from a type tag
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if the tag does not resolve.
    pub fn new(name: impl Into<String>, type_tag: &str, scale: Option<i64>) -> Result<Self> {
        let name = name.into();
        let Some(field_type) = FieldType::parse(type_tag) else {
            return Err(Error::UnsupportedType {
                field: name,
                type_tag: type_tag.to_owned(),
            });
        };
        Ok(Self::with_type(name, field_type, scale))
    }

    /// Create a field from an already resolved type
    #[must_use]
    pub fn with_type(name: impl Into<String>, field_type: FieldType, scale: Option<i64>) -> Self {
        Self {
            name: name.into(),
            field_type,
            scale,
        }
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Wire type
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Optional scale annotation
    #[must_use]
    pub const fn scale(&self) -> Option<i64> {
        self.scale
    }

    /// Bytes occupied on the wire
    #[must_use]
    pub const fn wire_size(&self) -> usize {
        self.field_type.wire_size()
    }
}
