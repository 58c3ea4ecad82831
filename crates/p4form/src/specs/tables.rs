//! Single-field table specs: protections, triggers and the typemap.
//!
//! Each holds one list field whose lines are whitespace-separated columns.
//! Paths may be quoted and, where the server allows it, carry a leading `-`
//! to exclude rather than include.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use super::{Spec, impl_spec, read_table, write_table};
use crate::error::{FormError, Result};
use crate::lex::{quote, tokenize};
use crate::record::FormRecord;
use crate::schema::{FieldType, SpecField, SpecSchema};

fn strip_unmap(path: String) -> (bool, String) {
    match path.strip_prefix('-') {
        Some(rest) => (true, rest.to_string()),
        None => (false, path),
    }
}

fn unmap_prefix(unmap: bool) -> &'static str {
    if unmap { "-" } else { "" }
}

// ============================================================================
// Protections
// ============================================================================

static PROTECT_SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    Arc::new(
        SpecSchema::new("protect").with_field(
            SpecField::new("Protections", FieldType::WordList)
                .with_code(501)
                .with_length(64),
        ),
    )
});

/// Whether a protection line names a user or a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    User,
    Group,
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityType::User => write!(f, "user"),
            EntityType::Group => write!(f, "group"),
        }
    }
}

/// One line of the protections table: `mode user|group name host path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtectionEntry {
    /// Access level, e.g. `write` or `=read`. Kept verbatim.
    pub mode: String,
    pub entity: EntityType,
    pub name: String,
    pub host: String,
    pub path: String,
    /// Leading `-` on the path: removes rather than grants access.
    pub unmap: bool,
}

impl FromStr for ProtectionEntry {
    type Err = FormError;

    fn from_str(line: &str) -> Result<Self> {
        let malformed = || FormError::MalformedEntry {
            kind: "protection",
            line: line.to_string(),
        };
        let [mode, entity, name, host, path] =
            <[String; 5]>::try_from(tokenize(line)?).map_err(|_| malformed())?;
        let entity = match entity.as_str() {
            "user" => EntityType::User,
            "group" => EntityType::Group,
            _ => return Err(malformed()),
        };
        let (unmap, path) = strip_unmap(path);
        Ok(Self {
            mode,
            entity,
            name,
            host,
            path,
            unmap,
        })
    }
}

impl fmt::Display for ProtectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.mode,
            self.entity,
            quote("", &self.name),
            quote("", &self.host),
            quote(unmap_prefix(self.unmap), &self.path)
        )
    }
}

/// The server protections table. Line order matters: later lines override
/// earlier ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionTable {
    record: FormRecord,
}

impl_spec!(ProtectionTable, PROTECT_SCHEMA);

impl ProtectionTable {
    pub fn new(entries: &[ProtectionEntry]) -> Self {
        let mut table = Self::empty();
        table.set_entries(entries);
        table
    }

    pub fn entries(&self) -> Result<Vec<ProtectionEntry>> {
        read_table(&self.record, "Protections")
    }

    pub fn set_entries(&mut self, entries: &[ProtectionEntry]) {
        write_table(&mut self.record, "Protections", entries);
    }
}

// ============================================================================
// Triggers
// ============================================================================

static TRIGGERS_SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    Arc::new(
        SpecSchema::new("triggers").with_field(
            SpecField::new("Triggers", FieldType::WordList)
                .with_code(551)
                .with_length(64),
        ),
    )
});

/// Server variable standing for a literal `"` inside a trigger command.
const QUOTE_VAR: &str = "%quote%";

/// One trigger definition: `name type path "command"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TriggerEntry {
    pub name: String,
    /// Event type, e.g. `change-submit` or `form-out`.
    pub trigger_type: String,
    /// Depot path or form type the trigger fires on.
    pub path: String,
    /// Command line with literal quotes. In form text each `"` is written as
    /// `%quote%`, since the command itself sits inside quotes.
    pub command: String,
}

impl FromStr for TriggerEntry {
    type Err = FormError;

    fn from_str(line: &str) -> Result<Self> {
        let mut tokens = tokenize(line)?.into_iter();
        let (Some(name), Some(trigger_type), Some(path)) =
            (tokens.next(), tokens.next(), tokens.next())
        else {
            return Err(FormError::MalformedEntry {
                kind: "trigger",
                line: line.to_string(),
            });
        };
        // An unquoted command spans the rest of the line.
        let command = tokens.collect::<Vec<_>>().join(" ").replace(QUOTE_VAR, "\"");
        if command.is_empty() {
            return Err(FormError::MalformedEntry {
                kind: "trigger",
                line: line.to_string(),
            });
        }
        Ok(Self {
            name,
            trigger_type,
            path,
            command,
        })
    }
}

impl fmt::Display for TriggerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} \"{}\"",
            self.name,
            self.trigger_type,
            quote("", &self.path),
            self.command.replace('"', QUOTE_VAR)
        )
    }
}

/// The server trigger table, in firing order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerTable {
    record: FormRecord,
}

impl_spec!(TriggerTable, TRIGGERS_SCHEMA);

impl TriggerTable {
    pub fn new(entries: &[TriggerEntry]) -> Self {
        let mut table = Self::empty();
        table.set_entries(entries);
        table
    }

    pub fn entries(&self) -> Result<Vec<TriggerEntry>> {
        read_table(&self.record, "Triggers")
    }

    pub fn set_entries(&mut self, entries: &[TriggerEntry]) {
        write_table(&mut self.record, "Triggers", entries);
    }
}

// ============================================================================
// TypeMap
// ============================================================================

static TYPEMAP_SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    Arc::new(
        SpecSchema::new("typemap").with_field(
            SpecField::new("TypeMap", FieldType::WordList)
                .with_code(601)
                .with_length(64),
        ),
    )
});

/// One typemap rule: `filetype path`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeMapEntry {
    /// File type with modifiers, e.g. `binary+l`.
    pub file_type: String,
    pub path: String,
    pub unmap: bool,
}

impl FromStr for TypeMapEntry {
    type Err = FormError;

    fn from_str(line: &str) -> Result<Self> {
        let [file_type, path] =
            <[String; 2]>::try_from(tokenize(line)?).map_err(|_| FormError::MalformedEntry {
                kind: "typemap",
                line: line.to_string(),
            })?;
        let (unmap, path) = strip_unmap(path);
        Ok(Self {
            file_type,
            path,
            unmap,
        })
    }
}

impl fmt::Display for TypeMapEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}",
            self.file_type,
            quote(unmap_prefix(self.unmap), &self.path)
        )
    }
}

/// Rules assigning file types by path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeMap {
    record: FormRecord,
}

impl_spec!(TypeMap, TYPEMAP_SCHEMA);

impl TypeMap {
    pub fn new(entries: &[TypeMapEntry]) -> Self {
        let mut map = Self::empty();
        map.set_entries(entries);
        map
    }

    pub fn entries(&self) -> Result<Vec<TypeMapEntry>> {
        read_table(&self.record, "TypeMap")
    }

    pub fn set_entries(&mut self, entries: &[TypeMapEntry]) {
        write_table(&mut self.record, "TypeMap", entries);
    }
}
