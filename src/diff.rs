//! Schema drift detection
//!
//! Compares two versions of a message layout and classifies every field-level
//! difference. Output order depends only on the detected changes, never on
//! field iteration order, so reports are stable across runs.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::schema::{FieldSpec, MessageSchema};

/// Classification of a detected change
///
/// Variant order is the report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Field only in the new schema
    Add,
    /// Field only in the old schema
    Remove,
    /// Field in both with a different type
    Change,
    /// Field in both at a different position
    Reorder,
}

impl DiffKind {
    /// Sort rank (`add` first, `reorder` last)
    #[must_use]
    pub const fn rank(self) -> u8 {
        self as u8
    }

    /// Lowercase tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
            Self::Change => "change",
            Self::Reorder => "reorder",
        }
    }
}

impl fmt::Display for DiffKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected change
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffItem {
    kind: DiffKind,
    field: String,
    description: String,
}

impl DiffItem {
    fn added(field: &FieldSpec) -> Self {
        Self {
            kind: DiffKind::Add,
            field: field.name().to_owned(),
            description: format!("+ added field: {} {}", field.name(), field.field_type()),
        }
    }

    fn removed(field: &FieldSpec) -> Self {
        Self {
            kind: DiffKind::Remove,
            field: field.name().to_owned(),
            description: format!("- removed field: {} {}", field.name(), field.field_type()),
        }
    }

    fn changed(old: &FieldSpec, new: &FieldSpec) -> Self {
        Self {
            kind: DiffKind::Change,
            field: new.name().to_owned(),
            description: format!(
                "~ changed field: {} {} -> {}",
                new.name(),
                old.field_type(),
                new.field_type()
            ),
        }
    }

    fn reordered(name: &str, old_pos: usize, new_pos: usize) -> Self {
        Self {
            kind: DiffKind::Reorder,
            field: name.to_owned(),
            description: format!(
                "↔ reordered field: {name} ({} -> {})",
                old_pos + 1,
                new_pos + 1
            ),
        }
    }

    /// Change classification
    #[must_use]
    pub const fn kind(&self) -> DiffKind {
        self.kind
    }

    /// Affected field name
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Rendered report line
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Ordered result of comparing two schemas
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaDiff {
    message: String,
    items: Vec<DiffItem>,
}

impl SchemaDiff {
    /// Message label: the shared name, or `"old -> new"` when renamed
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Changes in report order
    #[must_use]
    pub fn items(&self) -> &[DiffItem] {
        &self.items
    }

    /// Changes of a single kind, in report order
    pub fn of_kind(&self, kind: DiffKind) -> impl Iterator<Item = &DiffItem> + '_ {
        self.items.iter().filter(move |item| item.kind == kind)
    }

    /// True when no field-level drift was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Human-readable report
    #[must_use]
    pub fn pretty(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SchemaDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Message: {}", self.message)?;
        if self.items.is_empty() {
            return write!(f, "\n(no changes)");
        }
        for item in &self.items {
            write!(f, "\n{}", item.description)?;
        }
        Ok(())
    }
}

/// Compare two schema versions
///
/// Added, removed, retyped and moved fields are detected independently, so a
/// field may be reported as both changed and reordered. Positions are taken
/// from each schema's full field list. Items are sorted by kind, then by
/// description.
#[must_use]
#[instrument(level = "trace", skip_all, fields(old = old.message(), new = new.message()))]
pub fn diff(old: &MessageSchema, new: &MessageSchema) -> SchemaDiff {
    let message = if old.message() == new.message() {
        old.message().to_owned()
    } else {
        format!("{} -> {}", old.message(), new.message())
    };

    let old_pos: HashMap<&str, usize> = old
        .fields()
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name(), i))
        .collect();
    let new_pos: HashMap<&str, usize> = new
        .fields()
        .iter()
        .enumerate()
        .map(|(i, f)| (f.name(), i))
        .collect();

    let mut items = Vec::new();

    for field in new.fields() {
        if !old_pos.contains_key(field.name()) {
            items.push(DiffItem::added(field));
        }
    }

    for field in old.fields() {
        if !new_pos.contains_key(field.name()) {
            items.push(DiffItem::removed(field));
        }
    }

    for (ni, field) in new.fields().iter().enumerate() {
        let Some(&oi) = old_pos.get(field.name()) else {
            continue;
        };
        let previous = &old.fields()[oi];
        if previous.field_type() != field.field_type() {
            items.push(DiffItem::changed(previous, field));
        }
        if oi != ni {
            items.push(DiffItem::reordered(field.name(), oi, ni));
        }
    }

    items.sort_by(|a, b| {
        a.kind
            .cmp(&b.kind)
            .then_with(|| a.description.cmp(&b.description))
    });

    debug!(label = %message, changes = items.len(), "schema diff computed");
    SchemaDiff { message, items }
}
