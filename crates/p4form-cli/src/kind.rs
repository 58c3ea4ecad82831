use anyhow::{Result, bail};
use clap::ValueEnum;
use p4form::v1::{
    BranchSpec, ClientMetadata, Depot, FormRecord, Group, Job, ProtectionTable, ServerMetaData,
    Spec, SpecSchema, TriggerTable, TypeMap,
};
use std::sync::Arc;
use tracing::debug;

/// Which schema to parse a form with.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormKind {
    /// No schema: unknown fields only
    #[default]
    Generic,
    Branch,
    Depot,
    Group,
    Job,
    Protect,
    Triggers,
    Typemap,
    /// Server fields of `info` output
    Server,
    /// Client fields of `info` output
    Client,
}

impl FormKind {
    pub fn schema(self) -> Option<Arc<SpecSchema>> {
        match self {
            FormKind::Generic => None,
            FormKind::Branch => Some(BranchSpec::schema()),
            FormKind::Depot => Some(Depot::schema()),
            FormKind::Group => Some(Group::schema()),
            FormKind::Job => Some(Job::schema()),
            FormKind::Protect => Some(ProtectionTable::schema()),
            FormKind::Triggers => Some(TriggerTable::schema()),
            FormKind::Typemap => Some(TypeMap::schema()),
            FormKind::Server => Some(ServerMetaData::schema()),
            FormKind::Client => Some(ClientMetadata::schema()),
        }
    }

    /// Spec kind name reported by `validate`.
    pub fn label(self) -> String {
        self.schema()
            .map(|s| s.kind().to_string())
            .unwrap_or_else(|| "form".to_string())
    }

    pub fn new_record(self) -> FormRecord {
        match self.schema() {
            Some(schema) => FormRecord::with_schema(schema),
            None => FormRecord::new(),
        }
    }

    /// Parse form text with this kind's schema.
    pub fn parse(self, content: &str) -> Result<FormRecord> {
        let mut record = self.new_record();
        if !record.parse(content) {
            bail!("No form fields found");
        }
        debug!(kind = ?self, fields = record.len(), "parsed input form");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generic_has_no_schema() {
        assert!(FormKind::Generic.schema().is_none());
        assert_eq!(FormKind::Generic.label(), "form");
    }

    #[test]
    fn test_every_typed_kind_has_schema() {
        for kind in FormKind::value_variants() {
            if *kind != FormKind::Generic {
                assert!(kind.schema().is_some(), "{:?}", kind);
                assert_ne!(kind.label(), "form");
            }
        }
    }

    #[test]
    fn test_parse_uses_schema() {
        let record = FormKind::Group
            .parse("Group:\tg\n\nUsers:\n\tonly\n")
            .unwrap();
        assert!(matches!(
            record["Users"],
            p4form::v1::FieldValue::List(_)
        ));
        let generic = FormKind::Generic
            .parse("Group:\tg\n\nUsers:\n\tonly\n")
            .unwrap();
        assert!(matches!(
            generic["Users"],
            p4form::v1::FieldValue::Scalar(_)
        ));
    }

    #[test]
    fn test_parse_empty_fails() {
        assert!(FormKind::Branch.parse("").is_err());
    }
}
