//! The generic form engine: an ordered field/value record with its
//! parse and serialize rules.
//!
//! Form text looks like this:
//!
//! ```text
//! # A Perforce Branch Specification.
//!
//! Branch:	release-1.0
//!
//! Description:
//! 	Created by alex.
//!
//! View:
//! 	//depot/main/... //depot/rel1/...
//! ```
//!
//! A field header starts at column 0 with `Name:`. Anything after the colon,
//! plus the indented lines that follow, belongs to that field until the next
//! header.

use std::fmt;
use std::ops::Index;
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{debug, warn};

use crate::error::{FormError, Result};
use crate::format::FormatOptions;
use crate::schema::SpecSchema;

/// The value held by one field of a [`FormRecord`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// Single-line value written on the header line.
    Scalar(String),
    /// Multi-line text block, one entry per line.
    Text(Vec<String>),
    /// Repeating field. `None` marks an index that was never supplied.
    List(Vec<Option<String>>),
}

/// Largest `NameN` index accepted from tagged output.
const MAX_LIST_INDEX: usize = 1 << 16;

static EMPTY: FieldValue = FieldValue::Scalar(String::new());

impl FieldValue {
    /// True for values written as indented continuation lines.
    pub fn is_multi_line(&self) -> bool {
        !matches!(self, FieldValue::Scalar(_))
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Scalar(s) => s.is_empty(),
            FieldValue::Text(lines) => lines.is_empty(),
            FieldValue::List(items) => items.iter().all(Option::is_none),
        }
    }

    /// The value as one string; multi-line values are joined with `\n`.
    pub fn as_string(&self) -> String {
        match self {
            FieldValue::Scalar(s) => s.clone(),
            FieldValue::Text(lines) => lines.join("\n"),
            FieldValue::List(_) => self.lines().join("\n"),
        }
    }

    /// The value as lines. List gaps are skipped.
    pub fn lines(&self) -> Vec<String> {
        match self {
            FieldValue::Scalar(s) if s.is_empty() => Vec::new(),
            FieldValue::Scalar(s) => vec![s.clone()],
            FieldValue::Text(lines) => lines.clone(),
            FieldValue::List(items) => items.iter().flatten().cloned().collect(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value)
    }
}

/// Ordered mapping from field name to [`FieldValue`].
///
/// Fields keep the order in which they were first seen. Names are
/// case-sensitive. Reading an absent field yields an empty value rather than
/// an error.
///
/// An optional [`SpecSchema`] decides which fields are lists or text blocks;
/// fields it does not declare are kept as opaque values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRecord {
    header: Vec<String>,
    fields: Vec<(String, FieldValue)>,
    schema: Option<Arc<SpecSchema>>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_schema(schema: Arc<SpecSchema>) -> Self {
        Self {
            schema: Some(schema),
            ..Self::default()
        }
    }

    /// Parse form text with no schema.
    ///
    /// Returns [`FormError::NoFields`] when the text holds no field header.
    pub fn from_form_text(text: &str) -> Result<Self> {
        let mut record = Self::new();
        if record.parse(text) {
            Ok(record)
        } else {
            Err(FormError::NoFields)
        }
    }

    pub fn schema(&self) -> Option<&Arc<SpecSchema>> {
        self.schema.as_ref()
    }

    /// Comment lines preceding the first field, `#` included.
    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn set_header<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.header = lines.into_iter().map(Into::into).collect();
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in serialization order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.position(name).map(|i| &self.fields[i].1)
    }

    /// The field as a single string, or `""` when absent.
    pub fn get(&self, name: &str) -> String {
        self.value(name).map(FieldValue::as_string).unwrap_or_default()
    }

    /// The field as lines, or an empty list when absent.
    pub fn get_list(&self, name: &str) -> Vec<String> {
        self.value(name).map(FieldValue::lines).unwrap_or_default()
    }

    /// Set a field from a string.
    ///
    /// Declared list fields take one item per line, declared text fields (and
    /// any value containing a newline) become text blocks, everything else a
    /// scalar. Values are stored verbatim.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        let value = if self.is_list_field(name) {
            FieldValue::List(
                value
                    .lines()
                    .filter(|l| !l.trim().is_empty())
                    .map(|l| Some(l.to_string()))
                    .collect(),
            )
        } else if self.is_multi_line_field(name) || value.contains('\n') {
            FieldValue::Text(split_text(&value))
        } else {
            FieldValue::Scalar(value)
        };
        self.set_value(name, value);
    }

    pub fn set_text<I, S>(&mut self, name: &str, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        self.set_value(name, FieldValue::Text(lines));
    }

    pub fn set_list<I, S>(&mut self, name: &str, items: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let items = items.into_iter().map(|s| Some(s.into())).collect();
        self.set_value(name, FieldValue::List(items));
    }

    /// Replace a field's value, keeping its position; new fields go last.
    pub fn set_value(&mut self, name: &str, value: FieldValue) {
        match self.position(name) {
            Some(i) => self.fields[i].1 = value,
            None => self.fields.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.position(name).map(|i| self.fields.remove(i).1)
    }

    /// Ingest a flat tagged-output mapping.
    ///
    /// Keys of the form `NameN`, where `Name` is a list field declared in the
    /// schema, fill position `N` of that list. Positions are numeric, so
    /// arrival order does not matter and `Name10` sorts after `Name9`; indices
    /// never supplied stay as gaps. Every other key is set as with
    /// [`FormRecord::set`].
    ///
    /// ```
    /// use std::sync::Arc;
    /// use p4form::v1::{FieldType, FormRecord, SpecField, SpecSchema};
    ///
    /// let schema = SpecSchema::new("films").with_field(SpecField::new("Movie", FieldType::WordList));
    /// let mut record = FormRecord::with_schema(Arc::new(schema));
    /// record.set_values([("Movie1", "Goldfinger"), ("Movie0", "Dr. No")]);
    /// assert_eq!(record.get_list("Movie"), vec!["Dr. No", "Goldfinger"]);
    /// ```
    pub fn set_values<I, K, V>(&mut self, tagged: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut count = 0usize;
        for (key, value) in tagged {
            let key = key.as_ref();
            let slot = self
                .schema
                .as_ref()
                .and_then(|s| s.list_slot(key))
                .map(|(field, index)| (field.name.clone(), index));
            match slot {
                Some((_, index)) if index > MAX_LIST_INDEX => {
                    warn!(key, "list index out of range, skipping");
                    continue;
                }
                Some((name, index)) => self.set_list_item(&name, index, value.into()),
                None => self.set(key, value),
            }
            count += 1;
        }
        debug!(keys = count, fields = self.fields.len(), "ingested tagged output");
    }

    fn set_list_item(&mut self, name: &str, index: usize, value: String) {
        let i = match self.position(name) {
            Some(i) => i,
            None => {
                self.fields
                    .push((name.to_string(), FieldValue::List(Vec::new())));
                self.fields.len() - 1
            }
        };
        let slot = &mut self.fields[i].1;
        if !matches!(slot, FieldValue::List(_)) {
            let existing = slot.lines().into_iter().map(Some).collect();
            *slot = FieldValue::List(existing);
        }
        if let FieldValue::List(items) = slot {
            if items.len() <= index {
                items.resize(index + 1, None);
            }
            items[index] = Some(value);
        }
    }

    /// Replace the record's contents with the fields in `text`.
    ///
    /// Returns `false` if no field header was found; the record is then left
    /// empty. Never panics on malformed input.
    pub fn parse(&mut self, text: &str) -> bool {
        self.header.clear();
        self.fields.clear();

        let mut current: Option<PendingField> = None;
        for line in text.lines() {
            let line = line.strip_suffix('\r').unwrap_or(line);

            if line.starts_with('#') {
                if current.is_none() && self.fields.is_empty() {
                    self.header.push(line.to_string());
                }
                continue;
            }

            if let Some(rest) = line.strip_prefix('\t') {
                match current.as_mut() {
                    Some(field) => field.push_line(rest),
                    None => warn!(line, "continuation line before any field header"),
                }
                continue;
            }

            if line.trim().is_empty() {
                if let Some(field) = current.as_mut() {
                    field.push_blank();
                }
                continue;
            }

            if line.starts_with(' ') {
                match current.as_mut() {
                    Some(field) => field.push_line(line.trim_start()),
                    None => warn!(line, "continuation line before any field header"),
                }
                continue;
            }

            match split_header(line) {
                Some((name, rest)) => {
                    if let Some(field) = current.take() {
                        self.finish(field);
                    }
                    current = Some(PendingField::new(name, rest));
                }
                None => match current.as_mut() {
                    Some(field) => field.push_line(line),
                    None => warn!(line, "skipping text outside any field"),
                },
            }
        }
        if let Some(field) = current.take() {
            self.finish(field);
        }

        debug!(
            fields = self.fields.len(),
            header_lines = self.header.len(),
            "parsed form text"
        );
        if self.fields.is_empty() {
            self.header.clear();
            return false;
        }
        true
    }

    fn finish(&mut self, field: PendingField) {
        let PendingField {
            name, inline, lines, ..
        } = field;
        let mut all: Vec<String> = inline.into_iter().chain(lines).collect();

        let value = if self.is_list_field(&name) {
            let items = all
                .iter()
                .map(|l| l.trim())
                .filter(|l| !l.is_empty())
                .map(|l| Some(l.to_string()));
            match self.remove_list(&name) {
                Some(mut existing) => {
                    existing.extend(items);
                    FieldValue::List(existing)
                }
                None => FieldValue::List(items.collect()),
            }
        } else if all.len() > 1 || self.is_multi_line_field(&name) {
            FieldValue::Text(all)
        } else {
            FieldValue::Scalar(all.pop().unwrap_or_default())
        };
        self.set_value(&name, value);
    }

    /// Take a list field's items out, leaving the field in place.
    fn remove_list(&mut self, name: &str) -> Option<Vec<Option<String>>> {
        let i = self.position(name)?;
        match &mut self.fields[i].1 {
            FieldValue::List(items) => Some(std::mem::take(items)),
            _ => None,
        }
    }

    /// Emit form text with the given options.
    pub fn to_form_text_with(&self, options: &FormatOptions) -> String {
        let eol = options.line_ending.as_str();
        let indent = options.indent.as_str();
        let mut out = String::new();

        for line in &self.header {
            out.push_str(line);
            out.push_str(eol);
        }
        if !self.header.is_empty() {
            out.push_str(eol);
        }

        for (name, value) in &self.fields {
            out.push_str(name);
            out.push(':');
            match value {
                FieldValue::Scalar(s) => {
                    if !s.is_empty() {
                        out.push('\t');
                        out.push_str(s);
                    }
                    out.push_str(eol);
                }
                FieldValue::Text(lines) => {
                    out.push_str(eol);
                    for line in lines {
                        out.push_str(indent);
                        out.push_str(line);
                        out.push_str(eol);
                    }
                }
                FieldValue::List(items) => {
                    out.push_str(eol);
                    for item in items.iter().flatten() {
                        out.push_str(indent);
                        out.push_str(item);
                        out.push_str(eol);
                    }
                }
            }
            out.push_str(eol);
        }

        out
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    fn is_list_field(&self, name: &str) -> bool {
        self.schema.as_ref().is_some_and(|s| s.is_list(name))
    }

    fn is_multi_line_field(&self, name: &str) -> bool {
        self.schema.as_ref().is_some_and(|s| s.is_multi_line(name))
    }
}

impl fmt::Display for FormRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_form_text_with(&FormatOptions::default()))
    }
}

impl Index<&str> for FormRecord {
    type Output = FieldValue;

    /// Absent fields index to an empty scalar.
    fn index(&self, name: &str) -> &FieldValue {
        self.value(name).unwrap_or(&EMPTY)
    }
}

/// Serializes as an ordered object: scalars and text as strings, lists as
/// arrays with `null` for gaps.
impl Serialize for FormRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            match value {
                FieldValue::Scalar(s) => map.serialize_entry(name, s)?,
                FieldValue::Text(lines) => map.serialize_entry(name, &lines.join("\n"))?,
                FieldValue::List(items) => map.serialize_entry(name, items)?,
            }
        }
        map.end()
    }
}

struct PendingField {
    name: String,
    inline: Option<String>,
    lines: Vec<String>,
    blanks: usize,
}

impl PendingField {
    fn new(name: &str, rest: &str) -> Self {
        Self {
            name: name.to_string(),
            inline: (!rest.is_empty()).then(|| rest.to_string()),
            lines: Vec::new(),
            blanks: 0,
        }
    }

    fn push_line(&mut self, line: &str) {
        for _ in 0..self.blanks {
            self.lines.push(String::new());
        }
        self.blanks = 0;
        self.lines.push(line.to_string());
    }

    // Blank lines only count once the block has content (an inline value or
    // a continuation line); trailing ones are dropped when the next header
    // arrives.
    fn push_blank(&mut self) {
        if self.inline.is_some() || !self.lines.is_empty() {
            self.blanks += 1;
        }
    }
}

/// Split `Name: rest` at column 0. Names are runs of ASCII alphanumerics,
/// `_`, `-` and `.`.
///
/// The value starts after the single tab the serializer writes; without one,
/// leading whitespace is skipped. Anything else, including trailing
/// whitespace, is kept verbatim.
fn split_header(line: &str) -> Option<(&str, &str)> {
    let (name, rest) = line.split_once(':')?;
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    let value = rest.strip_prefix('\t').unwrap_or_else(|| rest.trim_start());
    valid.then_some((name, value))
}

fn split_text(value: &str) -> Vec<String> {
    value
        .trim_end_matches(['\r', '\n'])
        .lines()
        .map(|l| l.strip_suffix('\r').unwrap_or(l).to_string())
        .collect()
}
