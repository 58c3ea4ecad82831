use std::sync::{Arc, LazyLock};

use chrono::NaiveDateTime;

use super::{Spec, format_date, impl_spec, parse_date};
use crate::record::{FieldValue, FormRecord};
use crate::schema::{FieldAccess, FieldType, SpecField, SpecSchema};

static SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    Arc::new(
        SpecSchema::new("job")
            .with_field(
                SpecField::new("Job", FieldType::Word)
                    .with_code(101)
                    .with_length(32)
                    .with_access(FieldAccess::Required)
                    .with_preset("new"),
            )
            .with_field(
                SpecField::new("Status", FieldType::Select)
                    .with_code(102)
                    .with_length(10)
                    .with_access(FieldAccess::Required)
                    .with_values(["open", "suspended", "closed"])
                    .with_preset("open"),
            )
            .with_field(
                SpecField::new("User", FieldType::Word)
                    .with_code(103)
                    .with_length(32)
                    .with_access(FieldAccess::Required)
                    .with_preset("$user"),
            )
            .with_field(
                SpecField::new("Date", FieldType::Date)
                    .with_code(104)
                    .with_length(20)
                    .with_access(FieldAccess::Always)
                    .with_preset("$now"),
            )
            .with_field(
                SpecField::new("Description", FieldType::Text)
                    .with_code(105)
                    .with_length(0)
                    .with_access(FieldAccess::Required)
                    .with_preset("$blank"),
            ),
    )
});

/// A job (defect or task record).
///
/// Jobs carry the server's jobspec fields. The standard ones have typed
/// accessors; site-defined ones are reached through [`Job::field`] and
/// [`Job::set_field`], and a customised jobspec can be bound with
/// [`Job::with_schema`] so its text and list fields parse correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    record: FormRecord,
}

impl_spec!(Job, SCHEMA);

impl Job {
    pub fn new(id: impl Into<String>) -> Self {
        Self::empty().with_id(id)
    }

    /// An empty job bound to a site-specific jobspec.
    pub fn with_schema(schema: Arc<SpecSchema>) -> Self {
        Self::from_record(FormRecord::with_schema(schema))
    }

    pub fn id(&self) -> String {
        self.record.get("Job")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.record.set("Job", id);
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    pub fn status(&self) -> String {
        self.record.get("Status")
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.record.set("Status", status);
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.set_status(status);
        self
    }

    pub fn user(&self) -> String {
        self.record.get("User")
    }

    pub fn set_user(&mut self, user: impl Into<String>) {
        self.record.set("User", user);
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.set_user(user);
        self
    }

    pub fn date(&self) -> Option<NaiveDateTime> {
        parse_date(&self.record.get("Date"))
    }

    pub fn set_date(&mut self, date: NaiveDateTime) {
        self.record.set("Date", format_date(&date));
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.set_date(date);
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

    /// Any jobspec field by name; `""` when absent.
    pub fn field(&self, name: &str) -> String {
        self.record.get(name)
    }

    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        self.record.set(name, value);
    }

    pub fn with_field(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_field(name, value);
        self
    }

    /// Every field in order, standard and site-defined alike.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.record.iter()
    }
}
