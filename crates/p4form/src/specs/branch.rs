use std::sync::{Arc, LazyLock};

use chrono::NaiveDateTime;

use super::{Spec, format_date, impl_spec, parse_date};
use crate::error::Result;
use crate::record::FormRecord;
use crate::schema::{FieldAccess, FieldType, SpecField, SpecSchema};
use crate::view::ViewMap;

static SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    Arc::new(
        SpecSchema::new("branch")
            .with_field(
                SpecField::new("Branch", FieldType::Word)
                    .with_code(301)
                    .with_length(32)
                    .with_access(FieldAccess::Key),
            )
            .with_field(
                SpecField::new("Update", FieldType::Date)
                    .with_code(302)
                    .with_length(20)
                    .with_access(FieldAccess::Always),
            )
            .with_field(
                SpecField::new("Access", FieldType::Date)
                    .with_code(303)
                    .with_length(20)
                    .with_access(FieldAccess::Always),
            )
            .with_field(
                SpecField::new("Owner", FieldType::Word)
                    .with_code(304)
                    .with_length(32),
            )
            .with_field(
                SpecField::new("Description", FieldType::Text)
                    .with_code(305)
                    .with_length(128),
            )
            .with_field(
                SpecField::new("Options", FieldType::Line)
                    .with_code(306)
                    .with_length(32)
                    .with_values(["unlocked", "locked"])
                    .with_preset("unlocked"),
            )
            .with_field(
                SpecField::new("View", FieldType::WordList)
                    .with_code(311)
                    .with_length(64),
            ),
    )
});

/// A branch mapping between two sets of depot paths.
///
/// ```
/// use p4form::v1::{BranchSpec, MapType, Spec};
///
/// let text = "Branch:\trel1\n\nOwner:\talex\n\nOptions:\tlocked\n\n\
///             View:\n\t//depot/main/... //depot/rel1/...\n\t-//depot/main/tmp/... //depot/rel1/tmp/...\n";
/// let branch = BranchSpec::from_form_text(text).unwrap();
/// assert_eq!(branch.id(), "rel1");
/// assert!(branch.locked());
///
/// let view = branch.view().unwrap();
/// assert_eq!(view.len(), 2);
/// assert_eq!(view[1].map_type, MapType::Exclude);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchSpec {
    record: FormRecord,
}

impl_spec!(BranchSpec, SCHEMA);

impl BranchSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self::empty().with_id(id)
    }

    pub fn id(&self) -> String {
        self.record.get("Branch")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.record.set("Branch", id);
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

    /// Last modification time; `None` when absent or unparseable.
    pub fn updated(&self) -> Option<NaiveDateTime> {
        parse_date(&self.record.get("Update"))
    }

    pub fn set_updated(&mut self, updated: NaiveDateTime) {
        self.record.set("Update", format_date(&updated));
    }

    pub fn with_updated(mut self, updated: NaiveDateTime) -> Self {
        self.set_updated(updated);
        self
    }

    pub fn accessed(&self) -> Option<NaiveDateTime> {
        parse_date(&self.record.get("Access"))
    }

    pub fn set_accessed(&mut self, accessed: NaiveDateTime) {
        self.record.set("Access", format_date(&accessed));
    }

    pub fn with_accessed(mut self, accessed: NaiveDateTime) -> Self {
        self.set_accessed(accessed);
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

    /// Raw `Options` line.
    pub fn options(&self) -> String {
        self.record.get("Options")
    }

    pub fn locked(&self) -> bool {
        self.options().split_whitespace().any(|w| w == "locked")
    }

    pub fn set_locked(&mut self, locked: bool) {
        let value = if locked { "locked" } else { "unlocked" };
        self.record.set("Options", value);
    }

    pub fn with_locked(mut self, locked: bool) -> Self {
        self.set_locked(locked);
        self
    }

    pub fn view(&self) -> Result<ViewMap> {
        ViewMap::from_lines(self.record.get_list("View"))
    }

    pub fn set_view(&mut self, view: &ViewMap) {
        self.record.set_list("View", view.lines());
    }

    pub fn with_view(mut self, view: &ViewMap) -> Self {
        self.set_view(view);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormError;
    use crate::record::FieldValue;
    use crate::view::{MapType, ViewEntry};

    const TEXT: &str = "# A Perforce Branch Specification.\n\
                        \n\
                        Branch:\tbranch1\n\
                        \n\
                        Update:\t2013/03/01 14:05:09\n\
                        \n\
                        Access:\t2013/03/02 08:00:00\n\
                        \n\
                        Owner:\tadmin\n\
                        \n\
                        Description:\n\
                        \tCreated by admin.\n\
                        \n\
                        Options:\tunlocked\n\
                        \n\
                        View:\n\
                        \t//depot/main/... //depot/rel1/...\n\
                        \t-//usr/... //user/usr/...\n\
                        \t+//spec/... //user/spec/...\n\
                        \t\"-//usr space/...\" \"//user_win-user/usr space/...\"\n\
                        \n";

    #[test]
    fn test_empty_defaults() {
        let branch = BranchSpec::default();
        assert_eq!(branch.id(), "");
        assert_eq!(branch.owner(), "");
        assert_eq!(branch.description(), "");
        assert!(branch.updated().is_none());
        assert!(branch.accessed().is_none());
        assert!(!branch.locked());
        assert!(branch.view().unwrap().is_empty());
        assert!(branch.record().is_empty());
    }

    #[test]
    fn test_parse_reads_typed_fields() {
        let mut branch = BranchSpec::default();
        assert!(branch.parse(TEXT));
        assert_eq!(branch.id(), "branch1");
        assert_eq!(branch.owner(), "admin");
        assert_eq!(branch.description(), "Created by admin.");
        assert_eq!(format_date(&branch.updated().unwrap()), "2013/03/01 14:05:09");
        assert_eq!(format_date(&branch.accessed().unwrap()), "2013/03/02 08:00:00");
        assert!(!branch.locked());

        let view = branch.view().unwrap();
        assert_eq!(view.len(), 4);
        assert_eq!(view[1], ViewEntry::exclude("//usr/...", "//user/usr/..."));
        assert_eq!(view[2].map_type, MapType::Overlay);
        assert_eq!(view[3].right, "//user_win-user/usr space/...");
    }

    #[test]
    fn test_parse_failure_reports_false() {
        let mut branch = BranchSpec::default();
        assert!(!branch.parse("nothing to see here"));
        assert_eq!(
            BranchSpec::from_form_text("").unwrap_err(),
            FormError::NoFields
        );
    }

    #[test]
    fn test_roundtrip() {
        let first = BranchSpec::from_form_text(TEXT).unwrap();
        let second = BranchSpec::from_form_text(&first.to_string()).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.view().unwrap(), second.view().unwrap());
    }

    #[test]
    fn test_quoted_view_line_requoted_in_output() {
        let branch = BranchSpec::from_form_text(TEXT).unwrap();
        assert!(
            branch
                .to_string()
                .contains("\t\"-//usr space/...\" \"//user_win-user/usr space/...\"\n")
        );
    }

    #[test]
    fn test_builder_writes_through() {
        let updated = parse_date("2024/05/06 07:08:09").unwrap();
        let mut view = ViewMap::new();
        view.push(ViewEntry::include("//depot/a/...", "//depot/b/..."));
        let branch = BranchSpec::new("b")
            .with_owner("alex")
            .with_updated(updated)
            .with_accessed(updated)
            .with_description("first\nsecond")
            .with_locked(true)
            .with_view(&view);

        assert_eq!(branch.record().get("Branch"), "b");
        assert_eq!(branch.record().get("Update"), "2024/05/06 07:08:09");
        assert_eq!(branch.record().get("Options"), "locked");
        assert_eq!(
            branch.record()["Description"],
            FieldValue::Text(vec!["first".into(), "second".into()])
        );
        assert_eq!(branch.view().unwrap(), view);

        let text = branch.to_string();
        assert!(text.starts_with("Branch:\tb\n\nOwner:\talex\n\n"));
        assert!(text.contains("View:\n\t//depot/a/... //depot/b/...\n\n"));
    }

    #[test]
    fn test_special_characters_accepted() {
        let mut branch = BranchSpec::default();
        branch.set_id("#/@");
        assert_eq!(branch.id(), "#/@");
    }

    #[test]
    fn test_set_locked_toggles() {
        let mut branch = BranchSpec::from_form_text(TEXT).unwrap();
        branch.set_locked(true);
        assert!(branch.locked());
        branch.set_locked(false);
        assert!(!branch.locked());
        assert_eq!(branch.options(), "unlocked");
    }

    #[test]
    fn test_malformed_view_line_is_reported() {
        let text = "Branch:\tb\n\nView:\n\t//only/one/side/...\n";
        let branch = BranchSpec::from_form_text(text).unwrap();
        assert!(matches!(
            branch.view(),
            Err(FormError::MalformedViewLine { tokens: 1, .. })
        ));
    }

    #[test]
    fn test_from_tagged() {
        let branch = BranchSpec::from_tagged([
            ("Branch", "tagged"),
            ("Owner", "bob"),
            ("Update", "1362146709"),
            ("View1", "-//b/... //c/..."),
            ("View0", "//a/... //c/..."),
        ]);
        assert_eq!(branch.id(), "tagged");
        assert_eq!(format_date(&branch.updated().unwrap()), "2013/03/01 14:05:09");
        let view = branch.view().unwrap();
        assert_eq!(view[0].left, "//a/...");
        assert_eq!(view[1].map_type, MapType::Exclude);
    }
}
