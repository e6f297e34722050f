//! Schema model
//!
//! Wire types, field definitions and the message layout they form.

mod field;
mod loader;
mod message;
mod types;

pub use field::FieldSpec;
pub use loader::load_schema;
pub use message::{Endianness, MessageSchema};
pub use types::{FieldType, MAX_CHAR_LEN, UnknownTypeTag, ValueKind};
