//! C++17 parser backend
//!
//! Emits a header declaring one struct per message plus a parse function, and
//! a source file that reads every field at its constant packed offset.

use std::fmt::Write as _;

use tracing::{debug, instrument};

use crate::Result;
use crate::schema::{FieldType, MessageSchema};

use super::{CodegenOptions, GeneratedFile, Naming, ParserGenerator};

/// Generates a header/source pair for C++17
#[derive(Debug, Clone, Default)]
pub struct CppGenerator {
    options: CodegenOptions,
}

impl CppGenerator {
    /// Create a generator with explicit naming options
    #[must_use]
    pub fn new(options: CodegenOptions) -> Self {
        Self { options }
    }
}

impl ParserGenerator for CppGenerator {
    #[instrument(level = "trace", skip_all, fields(schema = schema.message()))]
    fn generate(&self, schema: &MessageSchema) -> Result<Vec<GeneratedFile>> {
        let naming = self.options.resolve(schema)?;
        let header = render_header(schema, &naming)?;
        let source = render_source(schema, &naming)?;
        debug!(
            header = %naming.header_file,
            source = %naming.source_file,
            wire_size = schema.total_wire_size(),
            "rendered C++ parser"
        );
        Ok(vec![
            GeneratedFile {
                file_name: naming.header_file,
                contents: header,
            },
            GeneratedFile {
                file_name: naming.source_file,
                contents: source,
            },
        ])
    }
}

fn cpp_type(field_type: FieldType) -> String {
    match field_type {
        FieldType::U32 => "uint32_t".to_owned(),
        FieldType::U64 => "uint64_t".to_owned(),
        FieldType::I64 => "int64_t".to_owned(),
        FieldType::Char(n) => format!("std::array<char, {n}>"),
    }
}

fn wire_size_const(naming: &Naming) -> String {
    format!("{}_WIRE_SIZE", naming.struct_name.to_ascii_uppercase())
}

fn render_header(schema: &MessageSchema, naming: &Naming) -> std::result::Result<String, std::fmt::Error> {
    let guard = format!("{}_PARSER_H", naming.struct_name.to_ascii_uppercase());
    let mut out = String::new();

    writeln!(out, "// Generated by sbedg from message {}. Do not edit.", schema.message())?;
    writeln!(out, "#ifndef {guard}")?;
    writeln!(out, "#define {guard}")?;
    writeln!(out)?;
    writeln!(out, "#include <array>")?;
    writeln!(out, "#include <cstddef>")?;
    writeln!(out, "#include <cstdint>")?;
    writeln!(out)?;
    writeln!(out, "struct {} {{", naming.struct_name)?;
    for field in schema.fields() {
        writeln!(out, "  {} {};", cpp_type(field.field_type()), field.name())?;
    }
    writeln!(out, "}};")?;
    writeln!(out)?;
    writeln!(out, "/// Total bytes required for this message (fixed-size schema).")?;
    writeln!(
        out,
        "constexpr size_t {} = {};",
        wire_size_const(naming),
        schema.total_wire_size()
    )?;
    writeln!(out)?;
    writeln!(out, "/// Returns true on success, false if the buffer is too small.")?;
    writeln!(out, "/// Parses little-endian encoded fields in schema order.")?;
    writeln!(
        out,
        "bool {}(const uint8_t* buf, size_t len, {}& out);",
        naming.parser_fn, naming.struct_name
    )?;
    writeln!(out)?;
    writeln!(out, "#endif  // {guard}")?;
    Ok(out)
}

fn render_source(schema: &MessageSchema, naming: &Naming) -> std::result::Result<String, std::fmt::Error> {
    let uses = |want: fn(FieldType) -> bool| schema.fields().iter().any(|f| want(f.field_type()));
    let needs_u32 = uses(|t| t == FieldType::U32);
    let needs_i64 = uses(|t| t == FieldType::I64);
    let needs_u64 = needs_i64 || uses(|t| t == FieldType::U64);
    let needs_memcpy = uses(|t| !t.is_integer());

    let mut out = String::new();
    writeln!(out, "// Generated by sbedg from message {}. Do not edit.", schema.message())?;
    writeln!(out, "#include \"{}\"", naming.header_file)?;
    if needs_memcpy {
        writeln!(out)?;
        writeln!(out, "#include <cstring>")?;
    }
    writeln!(out)?;
    writeln!(out, "namespace {{")?;
    if needs_u32 {
        writeln!(out)?;
        writeln!(out, "inline uint32_t read_u32_le(const uint8_t* p) {{")?;
        writeln!(out, "  return static_cast<uint32_t>(p[0])")?;
        for shift in 1..4 {
            let end = if shift == 3 { ";" } else { "" };
            writeln!(out, "       | (static_cast<uint32_t>(p[{shift}]) << {}){end}", shift * 8)?;
        }
        writeln!(out, "}}")?;
    }
    if needs_u64 {
        writeln!(out)?;
        writeln!(out, "inline uint64_t read_u64_le(const uint8_t* p) {{")?;
        writeln!(out, "  return static_cast<uint64_t>(p[0])")?;
        for shift in 1..8 {
            let end = if shift == 7 { ";" } else { "" };
            writeln!(out, "       | (static_cast<uint64_t>(p[{shift}]) << {}){end}", shift * 8)?;
        }
        writeln!(out, "}}")?;
    }
    if needs_i64 {
        writeln!(out)?;
        writeln!(out, "inline int64_t read_i64_le(const uint8_t* p) {{")?;
        writeln!(out, "  return static_cast<int64_t>(read_u64_le(p));")?;
        writeln!(out, "}}")?;
    }
    writeln!(out)?;
    writeln!(out, "}}  // namespace")?;
    writeln!(out)?;

    writeln!(
        out,
        "bool {}(const uint8_t* buf, size_t len, {}& out) {{",
        naming.parser_fn, naming.struct_name
    )?;
    writeln!(out, "  if (buf == nullptr || len < {}) {{", wire_size_const(naming))?;
    writeln!(out, "    return false;")?;
    writeln!(out, "  }}")?;
    for (offset, field) in schema.layout() {
        let name = field.name();
        let field_type = field.field_type();
        writeln!(out, "  // {name}: {field_type} @ {offset}")?;
        match field_type {
            FieldType::U32 => writeln!(out, "  out.{name} = read_u32_le(buf + {offset});")?,
            FieldType::U64 => writeln!(out, "  out.{name} = read_u64_le(buf + {offset});")?,
            FieldType::I64 => writeln!(out, "  out.{name} = read_i64_le(buf + {offset});")?,
            FieldType::Char(n) => {
                writeln!(out, "  std::memcpy(out.{name}.data(), buf + {offset}, {n});")?;
            }
        }
    }
    writeln!(out, "  return true;")?;
    writeln!(out, "}}")?;
    Ok(out)
}
