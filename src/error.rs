//! sbedg error types

use thiserror::Error;

use crate::schema::{FieldType, ValueKind};

/// Errors raised while loading schemas, encoding fixtures or generating parsers
#[derive(Error, Debug)]
pub enum Error {
    /// Schema source is not a structured object
    #[error("schema must be a JSON object")]
    NotAnObject,

    /// `message` missing, not a string, or blank
    #[error("schema must have a non-empty 'message' string")]
    InvalidMessageName,

    /// Endianness other than "little"
    #[error("unsupported endianness {found}: only \"little\" is supported")]
    UnsupportedEndianness {
        /// Value found in the source, rendered as JSON
        found: String,
    },

    /// `fields` missing, not a list, or empty
    #[error("schema must have a non-empty 'fields' list")]
    MissingFields,

    /// Field entry is not an object
    #[error("field at index {index} must be an object")]
    FieldNotObject {
        /// Position in the `fields` list
        index: usize,
    },

    /// Field entry has a missing or blank `name`
    #[error("field at index {index} has a missing or invalid 'name'")]
    InvalidFieldName {
        /// Position in the `fields` list
        index: usize,
    },

    /// Field entry has a missing or blank `type`
    #[error("field '{field}' has a missing or invalid 'type'")]
    InvalidFieldType {
        /// Field name
        field: String,
    },

    /// `scale` present but not an integer
    #[error("field '{field}' scale must be an integer if provided")]
    InvalidScale {
        /// Field name
        field: String,
    },

    /// `scale` is an integer that does not fit in `i64`
    #[error("field '{field}' scale {value} is out of range for a 64-bit signed integer")]
    ScaleOutOfRange {
        /// Field name
        field: String,
        /// Offending value, rendered as JSON
        value: String,
    },

    /// Two fields share a name
    #[error("duplicate field name: {name}")]
    DuplicateField {
        /// The repeated name
        name: String,
    },

    /// Type tag not in the field type model
    #[error("field '{field}' has unsupported type: {type_tag}")]
    UnsupportedType {
        /// Field name
        field: String,
        /// Offending type tag
        type_tag: String,
    },

    /// Total wire size does not fit in `usize`
    #[error("total wire size overflows at field '{field}'")]
    WireSizeOverflow {
        /// Field at which the running size overflowed
        field: String,
    },

    /// No fixture value supplied for a field
    #[error("missing value for field '{field}'")]
    MissingFieldValue {
        /// Field name
        field: String,
    },

    /// Integer value does not fit the field's wire type
    #[error("value {value} does not fit field '{field}' of type {field_type}")]
    EncodingOverflow {
        /// Field name
        field: String,
        /// Field wire type
        field_type: FieldType,
        /// Offending value
        value: String,
    },

    /// Text value contains a character outside 7-bit ASCII
    #[error("field '{field}' has non-ASCII character {character:?} at position {position}")]
    InvalidCharacterEncoding {
        /// Field name
        field: String,
        /// Offending character
        character: char,
        /// Character index within the text
        position: usize,
    },

    /// Value shape does not match the field's value kind
    #[error("field '{field}' expects a {expected} value")]
    ValueTypeMismatch {
        /// Field name
        field: String,
        /// Kind the field requires
        expected: ValueKind,
    },

    /// Fixture value file entry that is not an integer, string or byte list
    #[error("field '{field}' has unsupported fixture value {value}")]
    InvalidFixtureValue {
        /// Field name
        field: String,
        /// Offending value, rendered as JSON
        value: String,
    },

    /// Fixture value file root is not an object
    #[error("fixture values must be a JSON object of field name to value")]
    ValuesNotAnObject,

    /// Buffer shorter than the schema's wire size
    #[error("buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall {
        /// Needed size
        needed: usize,
        /// Actual size
        got: usize,
    },

    /// Name cannot be used as a generated identifier
    #[error("invalid {context} identifier: {ident:?}")]
    InvalidIdentifier {
        /// Offending name
        ident: String,
        /// What the identifier names (struct, field, function)
        context: &'static str,
    },

    /// Formatting failure while rendering generated source
    #[error("failed to render generated source: {0}")]
    Render(#[from] std::fmt::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Whether this error rejects a schema source
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NotAnObject
                | Self::InvalidMessageName
                | Self::UnsupportedEndianness { .. }
                | Self::MissingFields
                | Self::FieldNotObject { .. }
                | Self::InvalidFieldName { .. }
                | Self::InvalidFieldType { .. }
                | Self::InvalidScale { .. }
                | Self::ScaleOutOfRange { .. }
                | Self::DuplicateField { .. }
                | Self::UnsupportedType { .. }
                | Self::WireSizeOverflow { .. }
        )
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
