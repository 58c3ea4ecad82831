//! Typed projections over [`FormRecord`] for the well-known spec kinds.
//!
//! Each wrapper owns nothing but its backing record. Getters read through
//! the record on every call and setters write straight into it, so the text
//! form and the typed view can never disagree.

mod branch;
mod depot;
mod group;
mod info;
mod job;
mod tables;

pub use branch::BranchSpec;
pub use depot::{Depot, DepotType};
pub use group::{Group, Limit};
pub use info::{ClientMetadata, ServerMetaData, ServerVersion};
pub use job::Job;
pub use tables::{
    EntityType, ProtectionEntry, ProtectionTable, TriggerEntry, TriggerTable, TypeMap,
    TypeMapEntry,
};

use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::error::{FormError, Result};
use crate::format::FormatOptions;
use crate::record::FormRecord;
use crate::schema::SpecSchema;

/// Format of dates in form text.
pub const DATE_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// A spec kind with a known schema, viewed through a [`FormRecord`].
pub trait Spec: Sized {
    /// Field layout of this kind.
    fn schema() -> Arc<SpecSchema>;

    fn from_record(record: FormRecord) -> Self;

    fn record(&self) -> &FormRecord;

    fn record_mut(&mut self) -> &mut FormRecord;

    fn into_record(self) -> FormRecord;

    /// An instance with no fields set.
    fn empty() -> Self {
        Self::from_record(FormRecord::with_schema(Self::schema()))
    }

    /// Replace the contents with parsed form text. Returns `false` when the
    /// text holds no fields.
    fn parse(&mut self, text: &str) -> bool {
        self.record_mut().parse(text)
    }

    fn from_form_text(text: &str) -> Result<Self> {
        let mut spec = Self::empty();
        if spec.parse(text) {
            Ok(spec)
        } else {
            Err(FormError::NoFields)
        }
    }

    /// Build from a flat tagged-output mapping (`Name0`, `Name1`, ... for lists).
    fn from_tagged<I, K, V>(tagged: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut spec = Self::empty();
        spec.set_tagged(tagged);
        spec
    }

    fn set_tagged<I, K, V>(&mut self, tagged: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        self.record_mut().set_values(tagged);
    }

    fn to_form_text(&self) -> String {
        self.record().to_string()
    }

    fn to_form_text_with(&self, options: &FormatOptions) -> String {
        self.record().to_form_text_with(options)
    }
}

/// Implements [`Spec`], `Default` and `Display` for a `{ record: FormRecord }`
/// wrapper whose schema lives in the given static.
macro_rules! impl_spec {
    ($ty:ident, $schema:ident) => {
        impl $crate::specs::Spec for $ty {
            fn schema() -> ::std::sync::Arc<$crate::schema::SpecSchema> {
                ::std::sync::Arc::clone(&*$schema)
            }

            fn from_record(record: $crate::record::FormRecord) -> Self {
                Self { record }
            }

            fn record(&self) -> &$crate::record::FormRecord {
                &self.record
            }

            fn record_mut(&mut self) -> &mut $crate::record::FormRecord {
                &mut self.record
            }

            fn into_record(self) -> $crate::record::FormRecord {
                self.record
            }
        }

        impl Default for $ty {
            fn default() -> Self {
                <Self as $crate::specs::Spec>::empty()
            }
        }

        impl ::std::fmt::Display for $ty {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.record, f)
            }
        }
    };
}
pub(crate) use impl_spec;

/// Read a date as written in form text (`2024/01/15 10:22:33` or
/// `2024/01/15`) or tagged output (Unix seconds).
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.bytes().all(|b| b.is_ascii_digit()) {
        let secs: i64 = raw.parse().ok()?;
        return DateTime::from_timestamp(secs, 0).map(|dt| dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, DATE_FORMAT) {
        return Some(dt);
    }
    NaiveDate::parse_from_str(raw, "%Y/%m/%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn format_date(date: &NaiveDateTime) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse every line of a list field into table entries.
pub(crate) fn read_table<T>(record: &FormRecord, field: &str) -> Result<Vec<T>>
where
    T: FromStr<Err = FormError>,
{
    let entries = record
        .get_list(field)
        .iter()
        .map(|line| line.parse())
        .collect::<Result<Vec<T>>>()?;
    debug!(field, entries = entries.len(), "read table");
    Ok(entries)
}

pub(crate) fn write_table<T: ToString>(record: &mut FormRecord, field: &str, entries: &[T]) {
    record.set_list(field, entries.iter().map(ToString::to_string));
}
