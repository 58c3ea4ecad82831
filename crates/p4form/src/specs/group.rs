use std::fmt;
use std::sync::{Arc, LazyLock};

use serde::{Deserialize, Serialize};

use super::{Spec, impl_spec};
use crate::record::FormRecord;
use crate::schema::{FieldAccess, FieldType, SpecField, SpecSchema};

static SCHEMA: LazyLock<Arc<SpecSchema>> = LazyLock::new(|| {
    let limit = |name: &str, code: u32| {
        SpecField::new(name, FieldType::Word)
            .with_code(code)
            .with_length(12)
            .with_preset("unset")
    };
    Arc::new(
        SpecSchema::new("group")
            .with_field(
                SpecField::new("Group", FieldType::Word)
                    .with_code(401)
                    .with_length(32)
                    .with_access(FieldAccess::Key),
            )
            .with_field(limit("MaxResults", 402))
            .with_field(limit("MaxScanRows", 403))
            .with_field(limit("MaxLockTime", 407))
            .with_field(limit("MaxOpenFiles", 413))
            .with_field(limit("Timeout", 406))
            .with_field(limit("PasswordTimeout", 409))
            .with_field(SpecField::new("Subgroups", FieldType::WordList).with_code(404))
            .with_field(SpecField::new("Owners", FieldType::WordList).with_code(408))
            .with_field(SpecField::new("Users", FieldType::WordList).with_code(405)),
    )
});

/// A group resource limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Limit {
    /// No value set for this group; other groups or defaults apply.
    #[default]
    Unset,
    Unlimited,
    Value(u64),
}

impl Limit {
    /// Read a limit as the server writes it. Anything that is not
    /// `unlimited` or a number reads as [`Limit::Unset`].
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "unlimited" => Limit::Unlimited,
            other => other.parse().map(Limit::Value).unwrap_or(Limit::Unset),
        }
    }
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Limit::Unset => write!(f, "unset"),
            Limit::Unlimited => write!(f, "unlimited"),
            Limit::Value(v) => write!(f, "{}", v),
        }
    }
}

/// A user group with its resource limits and membership lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    record: FormRecord,
}

impl_spec!(Group, SCHEMA);

impl Group {
    pub fn new(id: impl Into<String>) -> Self {
        Self::empty().with_id(id)
    }

    pub fn id(&self) -> String {
        self.record.get("Group")
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.record.set("Group", id);
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.set_id(id);
        self
    }

    fn limit(&self, field: &str) -> Limit {
        Limit::parse(&self.record.get(field))
    }

    fn set_limit(&mut self, field: &str, limit: Limit) {
        self.record.set(field, limit.to_string());
    }

    pub fn max_results(&self) -> Limit {
        self.limit("MaxResults")
    }

    pub fn set_max_results(&mut self, limit: Limit) {
        self.set_limit("MaxResults", limit);
    }

    pub fn with_max_results(mut self, limit: Limit) -> Self {
        self.set_max_results(limit);
        self
    }

    pub fn max_scan_rows(&self) -> Limit {
        self.limit("MaxScanRows")
    }

    pub fn set_max_scan_rows(&mut self, limit: Limit) {
        self.set_limit("MaxScanRows", limit);
    }

    pub fn with_max_scan_rows(mut self, limit: Limit) -> Self {
        self.set_max_scan_rows(limit);
        self
    }

    /// Milliseconds.
    pub fn max_lock_time(&self) -> Limit {
        self.limit("MaxLockTime")
    }

    pub fn set_max_lock_time(&mut self, limit: Limit) {
        self.set_limit("MaxLockTime", limit);
    }

    pub fn with_max_lock_time(mut self, limit: Limit) -> Self {
        self.set_max_lock_time(limit);
        self
    }

    pub fn max_open_files(&self) -> Limit {
        self.limit("MaxOpenFiles")
    }

    pub fn set_max_open_files(&mut self, limit: Limit) {
        self.set_limit("MaxOpenFiles", limit);
    }

    pub fn with_max_open_files(mut self, limit: Limit) -> Self {
        self.set_max_open_files(limit);
        self
    }

    /// Ticket lifetime in seconds.
    pub fn timeout(&self) -> Limit {
        self.limit("Timeout")
    }

    pub fn set_timeout(&mut self, limit: Limit) {
        self.set_limit("Timeout", limit);
    }

    pub fn with_timeout(mut self, limit: Limit) -> Self {
        self.set_timeout(limit);
        self
    }

    pub fn password_timeout(&self) -> Limit {
        self.limit("PasswordTimeout")
    }

    pub fn set_password_timeout(&mut self, limit: Limit) {
        self.set_limit("PasswordTimeout", limit);
    }

    pub fn with_password_timeout(mut self, limit: Limit) -> Self {
        self.set_password_timeout(limit);
        self
    }

    pub fn subgroups(&self) -> Vec<String> {
        self.record.get_list("Subgroups")
    }

    pub fn set_subgroups<I, S>(&mut self, groups: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.set_list("Subgroups", groups);
    }

    pub fn with_subgroups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_subgroups(groups);
        self
    }

    pub fn owners(&self) -> Vec<String> {
        self.record.get_list("Owners")
    }

    pub fn set_owners<I, S>(&mut self, owners: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.set_list("Owners", owners);
    }

    pub fn with_owners<I, S>(mut self, owners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_owners(owners);
        self
    }

    pub fn users(&self) -> Vec<String> {
        self.record.get_list("Users")
    }

    pub fn set_users<I, S>(&mut self, users: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.record.set_list("Users", users);
    }

    pub fn with_users<I, S>(mut self, users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set_users(users);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "Group:\teveryone\n\n\
                        MaxResults:\t9999\n\n\
                        MaxScanRows:\tunlimited\n\n\
                        MaxLockTime:\tunset\n\n\
                        MaxOpenFiles:\t200\n\n\
                        Timeout:\t43200\n\n\
                        PasswordTimeout:\tunset\n\n\
                        Subgroups:\n\tadmins\n\n\
                        Owners:\n\talex\n\n\
                        Users:\n\talex\n\tbob\n\tcarol\n\n";

    #[test]
    fn test_parse_limits_and_lists() {
        let group = Group::from_form_text(TEXT).unwrap();
        assert_eq!(group.id(), "everyone");
        assert_eq!(group.max_results(), Limit::Value(9999));
        assert_eq!(group.max_scan_rows(), Limit::Unlimited);
        assert_eq!(group.max_lock_time(), Limit::Unset);
        assert_eq!(group.max_open_files(), Limit::Value(200));
        assert_eq!(group.timeout(), Limit::Value(43200));
        assert_eq!(group.password_timeout(), Limit::Unset);
        assert_eq!(group.subgroups(), vec!["admins"]);
        assert_eq!(group.owners(), vec!["alex"]);
        assert_eq!(group.users(), vec!["alex", "bob", "carol"]);
    }

    #[test]
    fn test_empty_defaults() {
        let group = Group::default();
        assert_eq!(group.id(), "");
        assert_eq!(group.max_results(), Limit::Unset);
        assert!(group.users().is_empty());
        assert!(group.owners().is_empty());
        assert!(group.subgroups().is_empty());
    }

    #[test]
    fn test_roundtrip() {
        let first = Group::from_form_text(TEXT).unwrap();
        let second = Group::from_form_text(&first.to_string()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_builder() {
        let group = Group::new("devs")
            .with_max_results(Limit::Value(50_000))
            .with_timeout(Limit::Unlimited)
            .with_users(["alex", "bob"])
            .with_owners(["alex"]);
        assert_eq!(group.record().get("MaxResults"), "50000");
        assert_eq!(group.record().get("Timeout"), "unlimited");
        assert_eq!(
            group.to_string(),
            "Group:\tdevs\n\nMaxResults:\t50000\n\nTimeout:\tunlimited\n\n\
             Users:\n\talex\n\tbob\n\nOwners:\n\talex\n\n"
        );
    }

    #[test]
    fn test_from_tagged_users() {
        let group = Group::from_tagged([
            ("Group", "g"),
            ("Users2", "carol"),
            ("Users0", "alex"),
            ("Users1", "bob"),
            ("MaxResults", "unlimited"),
        ]);
        assert_eq!(group.users(), vec!["alex", "bob", "carol"]);
        assert_eq!(group.max_results(), Limit::Unlimited);
    }

    #[test]
    fn test_limit_parse_lenient() {
        assert_eq!(Limit::parse(" 12 "), Limit::Value(12));
        assert_eq!(Limit::parse("unset"), Limit::Unset);
        assert_eq!(Limit::parse(""), Limit::Unset);
        assert_eq!(Limit::parse("-1"), Limit::Unset);
        assert_eq!(Limit::Value(7).to_string(), "7");
    }
}
