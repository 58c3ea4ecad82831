//! Static descriptions of the fields a spec kind recognizes.
//!
//! A [`SpecSchema`] is plain data: the parse/serialize engine in
//! [`FormRecord`](crate::record::FormRecord) consults it to decide whether a
//! field is a single value, a multi-line text block, or a repeating list,
//! and which `NameN` tagged keys belong to a list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{FormError, Result};
use crate::record::FormRecord;

/// Data type of a spec field, as named in a server `Fields:` definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Word,
    Date,
    Select,
    Line,
    Text,
    Bulk,
    #[serde(rename = "wlist")]
    WordList,
    #[serde(rename = "llist")]
    LineList,
}

impl FieldType {
    /// Repeating fields: one value per continuation line, `NameN` in tagged output.
    pub fn is_list(self) -> bool {
        matches!(self, FieldType::WordList | FieldType::LineList)
    }

    /// Free-form text blocks that span several lines.
    pub fn is_multi_line(self) -> bool {
        matches!(self, FieldType::Text | FieldType::Bulk)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Word => "word",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Line => "line",
            FieldType::Text => "text",
            FieldType::Bulk => "bulk",
            FieldType::WordList => "wlist",
            FieldType::LineList => "llist",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "word" => Ok(FieldType::Word),
            "date" => Ok(FieldType::Date),
            "select" => Ok(FieldType::Select),
            "line" => Ok(FieldType::Line),
            "text" => Ok(FieldType::Text),
            "bulk" => Ok(FieldType::Bulk),
            "wlist" => Ok(FieldType::WordList),
            "llist" => Ok(FieldType::LineList),
            other => Err(FormError::InvalidFieldDefinition(other.to_string())),
        }
    }
}

/// Whether a field must be supplied, and who may change it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldAccess {
    #[default]
    Optional,
    Default,
    Required,
    /// Set once by the server, read-only afterwards.
    Once,
    /// Always maintained by the server.
    Always,
    /// Identifies the spec.
    Key,
}

impl FieldAccess {
    pub fn as_str(self) -> &'static str {
        match self {
            FieldAccess::Optional => "optional",
            FieldAccess::Default => "default",
            FieldAccess::Required => "required",
            FieldAccess::Once => "once",
            FieldAccess::Always => "always",
            FieldAccess::Key => "key",
        }
    }
}

impl fmt::Display for FieldAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldAccess {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "optional" => Ok(FieldAccess::Optional),
            "default" => Ok(FieldAccess::Default),
            "required" => Ok(FieldAccess::Required),
            "once" => Ok(FieldAccess::Once),
            "always" => Ok(FieldAccess::Always),
            "key" => Ok(FieldAccess::Key),
            other => Err(FormError::InvalidFieldDefinition(other.to_string())),
        }
    }
}

/// One recognized field of a spec kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecField {
    /// Numeric field code from the server definition, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
    pub name: String,
    pub data_type: FieldType,
    /// Advisory width from the server definition.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    #[serde(default)]
    pub access: FieldAccess,
    /// Allowed values of a `select` field.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub values: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

impl SpecField {
    pub fn new(name: impl Into<String>, data_type: FieldType) -> Self {
        Self {
            code: None,
            name: name.into(),
            data_type,
            length: None,
            access: FieldAccess::Optional,
            values: Vec::new(),
            preset: None,
        }
    }

    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    pub fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_access(mut self, access: FieldAccess) -> Self {
        self.access = access;
        self
    }

    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_preset(mut self, preset: impl Into<String>) -> Self {
        self.preset = Some(preset.into());
        self
    }

    pub fn is_list(&self) -> bool {
        self.data_type.is_list()
    }

    pub fn is_multi_line(&self) -> bool {
        self.data_type.is_multi_line()
    }

    /// Parse a server field definition: `code name type length access`.
    ///
    /// ```
    /// use p4form::v1::{FieldAccess, FieldType, SpecField};
    ///
    /// let field = SpecField::parse_definition("102 Status select 10 required").unwrap();
    /// assert_eq!(field.code, Some(102));
    /// assert_eq!(field.name, "Status");
    /// assert_eq!(field.data_type, FieldType::Select);
    /// assert_eq!(field.access, FieldAccess::Required);
    /// ```
    pub fn parse_definition(line: &str) -> Result<Self> {
        let invalid = || FormError::InvalidFieldDefinition(line.to_string());
        let words: Vec<&str> = line.split_whitespace().collect();
        let [code, name, data_type, rest @ ..] = words.as_slice() else {
            return Err(invalid());
        };
        let code: u32 = code.parse().map_err(|_| invalid())?;
        let data_type: FieldType = data_type.parse().map_err(|_| invalid())?;

        let mut field = SpecField::new(*name, data_type).with_code(code);
        if let Some(length) = rest.first() {
            field.length = Some(length.parse().map_err(|_| invalid())?);
        }
        if let Some(access) = rest.get(1) {
            field.access = access.parse().map_err(|_| invalid())?;
        }
        Ok(field)
    }

    /// Inverse of [`SpecField::parse_definition`].
    pub fn to_definition(&self) -> String {
        format!(
            "{} {} {} {} {}",
            self.code.unwrap_or(0),
            self.name,
            self.data_type,
            self.length.unwrap_or(0),
            self.access
        )
    }
}

/// The set of recognized fields for one kind of spec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecSchema {
    kind: String,
    fields: Vec<SpecField>,
}

impl SpecSchema {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field definition. A later definition with the same name replaces
    /// the earlier one in place.
    pub fn with_field(mut self, field: SpecField) -> Self {
        self.push(field);
        self
    }

    pub fn push(&mut self, field: SpecField) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn fields(&self) -> &[SpecField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&SpecField> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_list(&self, name: &str) -> bool {
        self.field(name).is_some_and(SpecField::is_list)
    }

    pub fn is_multi_line(&self, name: &str) -> bool {
        self.field(name).is_some_and(SpecField::is_multi_line)
    }

    /// The field marked `key`, falling back to the first declared field.
    pub fn key_field(&self) -> Option<&SpecField> {
        self.fields
            .iter()
            .find(|f| f.access == FieldAccess::Key)
            .or_else(|| self.fields.first())
    }

    /// Resolve a tagged-output key such as `Users12` to its list field and
    /// index.
    ///
    /// Only bases declared as list fields qualify, so a declared scalar
    /// whose name happens to end in digits is never split.
    pub fn list_slot(&self, key: &str) -> Option<(&SpecField, usize)> {
        if self.field(key).is_some() {
            return None;
        }
        let base = key.trim_end_matches(|c: char| c.is_ascii_digit());
        if base.is_empty() || base.len() == key.len() {
            return None;
        }
        let field = self.field(base).filter(|f| f.is_list())?;
        let index = key[base.len()..].parse().ok()?;
        Some((field, index))
    }

    /// Build a schema from a server spec form (the output of `spec -o`).
    ///
    /// Reads `Fields` definitions, then applies `Values` (`Name a/b/c`) and
    /// `Presets` (`Name value`) to the matching fields.
    pub fn from_spec_form(kind: impl Into<String>, form: &FormRecord) -> Result<Self> {
        let mut schema = SpecSchema::new(kind);
        for line in form.get_list("Fields") {
            schema.push(SpecField::parse_definition(&line)?);
        }

        for line in form.get_list("Values") {
            if let Some((name, values)) = split_name_value(&line)
                && let Some(field) = schema.fields.iter_mut().find(|f| f.name == name)
            {
                field.values = values.split('/').map(str::to_string).collect();
            }
        }
        for line in form.get_list("Presets") {
            if let Some((name, preset)) = split_name_value(&line)
                && let Some(field) = schema.fields.iter_mut().find(|f| f.name == name)
            {
                field.preset = Some(preset.to_string());
            }
        }

        Ok(schema)
    }
}

fn split_name_value(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    let (name, rest) = line.split_once(char::is_whitespace)?;
    Some((name, rest.trim()))
}
