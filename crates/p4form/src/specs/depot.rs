use std::fmt;
use std::sync::{Arc, LazyLock};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{Spec, format_date, impl_spec, parse_date};
use crate::record::FormRecord;
use crate::schema::{FieldAccess, FieldType, SpecField, SpecSchema};

static SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    Arc::new(
        SpecSchema::new("depot")
            .with_field(
                SpecField::new("Depot", FieldType::Word)
                    .with_code(251)
                    .with_length(32)
                    .with_access(FieldAccess::Key),
            )
            .with_field(SpecField::new("Owner", FieldType::Word).with_code(252))
            .with_field(
                SpecField::new("Date", FieldType::Date)
                    .with_code(253)
                    .with_access(FieldAccess::Always),
            )
            .with_field(SpecField::new("Description", FieldType::Text).with_code(254))
            .with_field(
                SpecField::new("Type", FieldType::Word)
                    .with_code(255)
                    .with_access(FieldAccess::Required)
                    .with_values([
                        "local", "remote", "spec", "stream", "archive", "unload", "tangent",
                        "graph", "extension",
                    ])
                    .with_preset("local"),
            )
            .with_field(SpecField::new("Address", FieldType::Word).with_code(256))
            .with_field(SpecField::new("Suffix", FieldType::Word).with_code(258))
            .with_field(SpecField::new("StreamDepth", FieldType::Line).with_code(262))
            .with_field(SpecField::new("Map", FieldType::Line).with_code(257))
            .with_field(SpecField::new("SpecMap", FieldType::WordList).with_code(259)),
    )
});

/// Storage class of a depot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DepotType {
    Local,
    Remote,
    Spec,
    Stream,
    Archive,
    Unload,
    Tangent,
    Graph,
    Extension,
    /// Any type this crate does not know, kept verbatim.
    Other(String),
}

impl From<&str> for DepotType {
    fn from(s: &str) -> Self {
        match s {
            "local" => DepotType::Local,
            "remote" => DepotType::Remote,
            "spec" => DepotType::Spec,
            "stream" => DepotType::Stream,
            "archive" => DepotType::Archive,
            "unload" => DepotType::Unload,
            "tangent" => DepotType::Tangent,
            "graph" => DepotType::Graph,
            "extension" => DepotType::Extension,
            other => DepotType::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DepotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepotType::Local => write!(f, "local"),
            DepotType::Remote => write!(f, "remote"),
            DepotType::Spec => write!(f, "spec"),
            DepotType::Stream => write!(f, "stream"),
            DepotType::Archive => write!(f, "archive"),
            DepotType::Unload => write!(f, "unload"),
            DepotType::Tangent => write!(f, "tangent"),
            DepotType::Graph => write!(f, "graph"),
            DepotType::Extension => write!(f, "extension"),
            DepotType::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A depot definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Depot {
    record: FormRecord,
}

impl_spec!(Depot, SCHEMA);

impl Depot {
    pub fn new(id: impl Into<String>, depot_type: DepotType) -> Self {
        Self::empty().with_id(id).with_depot_type(depot_type)
    }

    pub fn id(&self) -> String {
        self.record.get("Depot")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.record.set("Depot", id);
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    pub fn owner(&self) -> String {
        self.record.get("Owner")
    }

    pub fn set_owner(&mut self, owner: impl Into<String>) {
        self.record.set("Owner", owner);
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.set_owner(owner);
        self
    }

    pub fn modified(&self) -> Option<NaiveDateTime> {
        parse_date(&self.record.get("Date"))
    }

    pub fn set_modified(&mut self, modified: NaiveDateTime) {
        self.record.set("Date", format_date(&modified));
    }

    pub fn with_modified(mut self, modified: NaiveDateTime) -> Self {
        self.set_modified(modified);
        self
    }

    pub fn description(&self) -> String {
        self.record.get("Description")
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.record.set("Description", description);
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.set_description(description);
        self
    }

    /// `None` when the `Type` field is absent or empty.
    pub fn depot_type(&self) -> Option<DepotType> {
        let raw = self.record.get("Type");
        (!raw.is_empty()).then(|| DepotType::from(raw.as_str()))
    }

    pub fn set_depot_type(&mut self, depot_type: DepotType) {
        self.record.set("Type", depot_type.to_string());
    }

    pub fn with_depot_type(mut self, depot_type: DepotType) -> Self {
        self.set_depot_type(depot_type);
        self
    }

    /// Server address of a remote depot.
    pub fn address(&self) -> String {
        self.record.get("Address")
    }

    pub fn set_address(&mut self, address: impl Into<String>) {
        self.record.set("Address", address);
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.set_address(address);
        self
    }

    /// File suffix of a spec depot.
    pub fn suffix(&self) -> String {
        self.record.get("Suffix")
    }

    pub fn set_suffix(&mut self, suffix: impl Into<String>) {
        self.record.set("Suffix", suffix);
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.set_suffix(suffix);
        self
    }

    pub fn stream_depth(&self) -> String {
        self.record.get("StreamDepth")
    }

    pub fn set_stream_depth(&mut self, depth: impl Into<String>) {
        self.record.set("StreamDepth", depth);
    }

    pub fn with_stream_depth(mut self, depth: impl Into<String>) -> Self {
        self.set_stream_depth(depth);
        self
    }

    pub fn map(&self) -> String {
        self.record.get("Map")
    }

    pub fn set_map(&mut self, map: impl Into<String>) {
        self.record.set("Map", map);
    }

    pub fn with_map(mut self, map: impl Into<String>) -> Self {
        self.set_map(map);
        self
    }

    /// Paths a spec depot records, in order.
    pub fn spec_map(&self) -> Vec<String> {
        self.record.get_list("SpecMap")
    }

    pub fn set_spec_map<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.set_list("SpecMap", paths);
    }

    pub fn with_spec_map<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_spec_map(paths);
        self
    }
}
