//! Diff the sample trade schemas and round-trip a fixture

use std::collections::HashMap;

use sbedg::{CppGenerator, FieldValue, ParserGenerator, diff, fixture, load_schema};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("sbedg drift report");
    println!("==================\n");

    let root = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("schemas");
    let old = load_schema(root.join("trade_v1.json"))?;
    let new = load_schema(root.join("trade_v2.json"))?;

    println!("{}\n", diff(&old, &new));

    let values = HashMap::from([
        ("ts".to_owned(), FieldValue::from(1_700_000_000_123u64)),
        ("symbol".to_owned(), FieldValue::from("NVDA")),
        ("price".to_owned(), FieldValue::from(123_456_789i64)),
        ("qty".to_owned(), FieldValue::from(42u64)),
        ("venue".to_owned(), FieldValue::from("XNAS")),
    ]);
    let bytes = fixture::encode(&new, &values)?;
    println!("Encoded fixture: {} bytes (wire size {})", bytes.len(), new.total_wire_size());

    let record = fixture::decode(&new, &bytes)?;
    for (name, value) in record.values() {
        println!("  {name:<8} {value:?}");
    }

    let files = CppGenerator::default().generate(&new)?;
    for file in &files {
        println!("\n--- {} ---\n{}", file.file_name, file.contents);
    }

    Ok(())
}
