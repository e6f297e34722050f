//! sbedg (SBE Drift Guard) - fixed-layout binary message schemas
//!
//! This library models fixed-size, packed, little-endian message layouts,
//! detects drift between two versions of a layout, encodes binary fixtures
//! and generates C++ parsers that agree with those fixtures bit for bit.
//!
//! # Quick Start
//!
//! ```rust
//! use sbedg::{MessageSchema, diff};
//!
//! let old = MessageSchema::from_json_str(r#"{
//!     "message": "TradeUpdate",
//!     "fields": [
//!         {"name": "ts", "type": "u64"},
//!         {"name": "qty", "type": "u32"}
//!     ]
//! }"#)?;
//! let new = MessageSchema::from_json_str(r#"{
//!     "message": "TradeUpdate",
//!     "fields": [
//!         {"name": "ts", "type": "u64"},
//!         {"name": "qty", "type": "u64"}
//!     ]
//! }"#)?;
//!
//! let report = diff(&old, &new);
//! assert_eq!(report.pretty(), "Message: TradeUpdate\n~ changed field: qty u32 -> u64");
//! # Ok::<(), sbedg::Error>(())
//! ```
//!
//! # Features
//!
//! - **Closed type model** - `u32`, `u64`, `i64` and `char[N]`, one lookup shared by every component
//! - **Deterministic diffs** - adds, removes, retypes and moves, sorted by kind then text
//! - **Fixtures** - exact wire bytes for conformance testing, plus a reference decoder
//! - **C++ code generation** - header and source with constant packed offsets
//!
//! All core operations are pure functions over immutable values; schemas,
//! diffs and fixtures can be shared freely across threads.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod codegen;
pub mod diff;
mod error;
pub mod fixture;
pub mod schema;

pub use codegen::{CodegenOptions, CppGenerator, GeneratedFile, ParserGenerator, write_generated};
pub use diff::{DiffItem, DiffKind, SchemaDiff, diff};
pub use error::{Error, Result};
pub use fixture::{DecodedRecord, FieldValue, FieldValues};
pub use schema::{
    Endianness, FieldSpec, FieldType, MAX_CHAR_LEN, MessageSchema, ValueKind, load_schema,
};

/// sbedg version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
