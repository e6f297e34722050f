//! Parser code generation
//!
//! A [`ParserGenerator`] turns a validated [`MessageSchema`] into source files
//! that parse the schema's packed little-endian layout. Generated parsers
//! must agree bit-for-bit with [`crate::fixture::encode`].

mod cpp;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::schema::MessageSchema;
use crate::{Error, Result};

pub use cpp::CppGenerator;

/// One emitted source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory
    pub file_name: String,
    /// File contents
    pub contents: String,
}

/// Backend that emits parsing code for a schema
pub trait ParserGenerator {
    /// Render every file for `schema`
    fn generate(&self, schema: &MessageSchema) -> Result<Vec<GeneratedFile>>;
}

/// Naming used by generated code
///
/// Unset names are derived from the message name: `TradeUpdate` produces
/// struct `TradeUpdate`, function `parse_trade_update` and files
/// `trade_update_parser.h` / `trade_update_parser.cpp`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodegenOptions {
    struct_name: Option<String>,
    parser_fn: Option<String>,
    header_file: Option<String>,
    source_file: Option<String>,
}

impl CodegenOptions {
    /// Options with every name derived from the schema
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the struct name
    #[must_use]
    pub fn with_struct_name(mut self, name: impl Into<String>) -> Self {
        self.struct_name = Some(name.into());
        self
    }

    /// Override the parse function name
    #[must_use]
    pub fn with_parser_fn(mut self, name: impl Into<String>) -> Self {
        self.parser_fn = Some(name.into());
        self
    }

    /// Override the header file name
    #[must_use]
    pub fn with_header_file(mut self, name: impl Into<String>) -> Self {
        self.header_file = Some(name.into());
        self
    }

    /// Override the source file name
    #[must_use]
    pub fn with_source_file(mut self, name: impl Into<String>) -> Self {
        self.source_file = Some(name.into());
        self
    }

    /// Resolve every name for `schema`
    pub(crate) fn resolve(&self, schema: &MessageSchema) -> Result<Naming> {
        let snake = snake_case(schema.message());
        let naming = Naming {
            struct_name: self
                .struct_name
                .clone()
                .unwrap_or_else(|| schema.message().to_owned()),
            parser_fn: self
                .parser_fn
                .clone()
                .unwrap_or_else(|| format!("parse_{snake}")),
            header_file: self
                .header_file
                .clone()
                .unwrap_or_else(|| format!("{snake}_parser.h")),
            source_file: self
                .source_file
                .clone()
                .unwrap_or_else(|| format!("{snake}_parser.cpp")),
        };
        check_identifier(&naming.struct_name, "struct")?;
        check_identifier(&naming.parser_fn, "function")?;
        if naming.parser_fn == naming.struct_name {
            return Err(Error::InvalidIdentifier {
                ident: naming.parser_fn,
                context: "function",
            });
        }
        for field in schema.fields() {
            check_identifier(field.name(), "field")?;
            // a member may not share its class's name
            if field.name() == naming.struct_name {
                return Err(Error::InvalidIdentifier {
                    ident: field.name().to_owned(),
                    context: "field",
                });
            }
        }
        Ok(naming)
    }
}

/// Fully resolved names
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Naming {
    pub struct_name: String,
    pub parser_fn: String,
    pub header_file: String,
    pub source_file: String,
}

/// Write generated files into `dir`, creating it if needed
pub fn write_generated(files: &[GeneratedFile], dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    files
        .iter()
        .map(|file| {
            let path = dir.join(&file.file_name);
            fs::write(&path, &file.contents)?;
            debug!(path = %path.display(), bytes = file.contents.len(), "generated file written");
            Ok(path)
        })
        .collect()
}

/// C++20 keywords and alternative tokens
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto", "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char8_t", "char16_t", "char32_t", "class", "co_await",
    "co_return", "co_yield", "compl", "concept", "const", "const_cast", "consteval",
    "constexpr", "constinit", "continue", "decltype", "default", "delete", "do", "double",
    "dynamic_cast", "else", "enum", "explicit", "export", "extern", "false", "float", "for",
    "friend", "goto", "if", "inline", "int", "long", "mutable", "namespace", "new",
    "noexcept", "not", "not_eq", "nullptr", "operator", "or", "or_eq", "private",
    "protected", "public", "register", "reinterpret_cast", "requires", "return", "short",
    "signed", "sizeof", "static", "static_assert", "static_cast", "struct", "switch",
    "template", "this", "thread_local", "throw", "true", "try", "typedef", "typeid",
    "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "wchar_t",
    "while", "xor", "xor_eq",
];

/// Names reserved to the implementation: any `__`, or `_` followed by an uppercase letter
fn is_reserved(ident: &str) -> bool {
    let bytes = ident.as_bytes();
    let underscore_upper =
        bytes.first() == Some(&b'_') && bytes.get(1).is_some_and(u8::is_ascii_uppercase);
    ident.contains("__") || underscore_upper
}

fn check_identifier(ident: &str, context: &'static str) -> Result<()> {
    let mut chars = ident.chars();
    let valid_start = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    let valid_rest = chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid_start && valid_rest && !CPP_KEYWORDS.contains(&ident) && !is_reserved(ident) {
        Ok(())
    } else {
        Err(Error::InvalidIdentifier {
            ident: ident.to_owned(),
            context,
        })
    }
}

/// `TradeUpdate` -> `trade_update`, `HTTPQuote2` -> `httpquote2`
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldSpec;

    fn schema(message: &str, fields: &[&str]) -> MessageSchema {
        MessageSchema::new(
            message,
            fields
                .iter()
                .map(|n| FieldSpec::new(*n, "u32", None).unwrap())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_snake_case() {
        assert_eq!(snake_case("TradeUpdate"), "trade_update");
        assert_eq!(snake_case("trade"), "trade");
        assert_eq!(snake_case("Quote2Side"), "quote2_side");
        assert_eq!(snake_case("HTTPQuote"), "httpquote");
    }

    #[test]
    fn test_default_naming() {
        let naming = CodegenOptions::new().resolve(&schema("TradeUpdate", &["a"])).unwrap();
        assert_eq!(naming.struct_name, "TradeUpdate");
        assert_eq!(naming.parser_fn, "parse_trade_update");
        assert_eq!(naming.header_file, "trade_update_parser.h");
        assert_eq!(naming.source_file, "trade_update_parser.cpp");
    }

    #[test]
    fn test_overrides() {
        let naming = CodegenOptions::new()
            .with_struct_name("Trade")
            .with_parser_fn("parse_trade")
            .with_header_file("trade_parser.h")
            .with_source_file("trade_parser.cpp")
            .resolve(&schema("TradeUpdate", &["a"]))
            .unwrap();
        assert_eq!(naming.struct_name, "Trade");
        assert_eq!(naming.parser_fn, "parse_trade");
        assert_eq!(naming.header_file, "trade_parser.h");
        assert_eq!(naming.source_file, "trade_parser.cpp");
    }

    #[test]
    fn test_invalid_identifiers() {
        let err = CodegenOptions::new()
            .resolve(&schema("Trade Update", &["a"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { context: "struct", .. }));

        let err = CodegenOptions::new()
            .resolve(&schema("Trade", &["ok", "class"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { ref ident, context: "field" } if ident == "class"));

        let err = CodegenOptions::new()
            .resolve(&schema("Trade", &["1st"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { context: "field", .. }));
    }

    #[test]
    fn test_keywords_rejected() {
        for keyword in [
            "static_assert", "thread_local", "typeid", "bitor", "char16_t", "requires",
            "co_await", "reinterpret_cast", "not_eq", "constinit",
        ] {
            let err = CodegenOptions::new()
                .resolve(&schema("Trade", &["ok", keyword]))
                .unwrap_err();
            assert!(
                matches!(err, Error::InvalidIdentifier { ref ident, context: "field" } if ident == keyword),
                "{keyword} should be rejected"
            );
        }
    }

    #[test]
    fn test_reserved_identifiers_rejected() {
        for ident in ["__len", "_Value", "a__b"] {
            let err = CodegenOptions::new()
                .resolve(&schema("Trade", &[ident]))
                .unwrap_err();
            assert!(matches!(err, Error::InvalidIdentifier { context: "field", .. }));
        }
        let err = CodegenOptions::new()
            .with_struct_name("_Trade")
            .resolve(&schema("Trade", &["a"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { context: "struct", .. }));

        // a single leading underscore before a lowercase letter is fine
        assert!(CodegenOptions::new().resolve(&schema("Trade", &["_seq"])).is_ok());
    }

    #[test]
    fn test_field_named_like_struct_rejected() {
        let err = CodegenOptions::new()
            .resolve(&schema("Trade", &["ts", "Trade"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { ref ident, context: "field" } if ident == "Trade"));

        // checked against the overridden struct name
        let err = CodegenOptions::new()
            .with_struct_name("Fill")
            .resolve(&schema("Trade", &["Fill"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { context: "field", .. }));
        assert!(CodegenOptions::new()
            .with_struct_name("Fill")
            .resolve(&schema("Trade", &["Trade"]))
            .is_ok());

        let err = CodegenOptions::new()
            .with_parser_fn("Trade")
            .resolve(&schema("Trade", &["a"]))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidIdentifier { context: "function", .. }));
    }

    #[test]
    fn test_write_generated() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("gen");
        let files = vec![GeneratedFile {
            file_name: "a.h".to_owned(),
            contents: "// a\n".to_owned(),
        }];
        let paths = write_generated(&files, &out).unwrap();
        assert_eq!(paths, vec![out.join("a.h")]);
        assert_eq!(fs::read_to_string(&paths[0]).unwrap(), "// a\n");
    }
}
