//! Wire field types
//!
//! The closed set of type tags a schema may use. Validation, layout, fixture
//! encoding and code generation all resolve tags through [`FieldType`].

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Shape of the value a field carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Little-endian unsigned integer
    UnsignedInt,
    /// Little-endian two's complement integer
    SignedInt,
    /// Raw bytes, zero padded
    FixedByteArray,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UnsignedInt => "unsigned integer",
            Self::SignedInt => "signed integer",
            Self::FixedByteArray => "fixed-length byte array",
        };
        write!(f, "{name}")
    }
}

/// Longest `char[N]` the type model accepts
pub const MAX_CHAR_LEN: usize = 65_535;

/// Supported wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// `u32`
    U32,
    /// `u64`
    U64,
    /// `i64`
    I64,
    /// `char[N]`, 0 < N <= [`MAX_CHAR_LEN`]
    Char(usize),
}

impl FieldType {
    /// Resolve a type tag, returning `None` for anything outside the model
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "u32" => Some(Self::U32),
            "u64" => Some(Self::U64),
            "i64" => Some(Self::I64),
            _ => {
                let len = tag.strip_prefix("char[")?.strip_suffix(']')?;
                if len.is_empty() || !len.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                match len.parse::<usize>() {
                    Ok(n) if (1..=MAX_CHAR_LEN).contains(&n) => Some(Self::Char(n)),
                    _ => None,
                }
            }
        }
    }

    /// Bytes occupied on the wire
    #[must_use]
    pub const fn wire_size(self) -> usize {
        match self {
            Self::U32 => 4,
            Self::U64 | Self::I64 => 8,
            Self::Char(n) => n,
        }
    }

    /// Value shape carried by this type
    #[must_use]
    pub const fn value_kind(self) -> ValueKind {
        match self {
            Self::U32 | Self::U64 => ValueKind::UnsignedInt,
            Self::I64 => ValueKind::SignedInt,
            Self::Char(_) => ValueKind::FixedByteArray,
        }
    }

    /// Check if this is an integer type
    #[must_use]
    pub const fn is_integer(self) -> bool {
        !matches!(self, Self::Char(_))
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U32 => write!(f, "u32"),
            Self::U64 => write!(f, "u64"),
            Self::I64 => write!(f, "i64"),
            Self::Char(n) => write!(f, "char[{n}]"),
        }
    }
}

/// Error returned when a string is not a known type tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTypeTag(pub String);

impl fmt::Display for UnknownTypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown type tag: {}", self.0)
    }
}

impl std::error::Error for UnknownTypeTag {}

impl FromStr for FieldType {
    type Err = UnknownTypeTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| UnknownTypeTag(s.to_owned()))
    }
}

impl Serialize for FieldType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
