use crate::input::read_input;
use crate::kind::FormKind;
use anyhow::{Context, Result, bail};
use p4form::v1::{
    FieldAccess, FieldType, FormRecord, ProtectionTable, Spec, TriggerTable, TypeMap, ViewMap,
};
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, kind: FormKind) -> Result<()> {
    let content = read_input(input.as_ref())?;
    let summary = validate_content(&content, kind)?;
    println!("{}", summary);
    Ok(())
}

fn validate_content(content: &str, kind: FormKind) -> Result<String> {
    let record = kind.parse(content)?;
    check_schema_fields(&record)?;

    match kind {
        FormKind::Protect => {
            ProtectionTable::from_record(record.clone())
                .entries()
                .context("Invalid Protections line")?;
        }
        FormKind::Triggers => {
            TriggerTable::from_record(record.clone())
                .entries()
                .context("Invalid Triggers line")?;
        }
        FormKind::Typemap => {
            TypeMap::from_record(record.clone())
                .entries()
                .context("Invalid TypeMap line")?;
        }
        _ => {
            if let Some(view) = record.value("View") {
                ViewMap::from_lines(view.lines()).context("Invalid View line")?;
            }
        }
    }

    Ok(format!("Valid: {} ({} fields)", kind.label(), record.len()))
}

/// Key and required fields must be present; select fields must hold one of
/// their declared values.
fn check_schema_fields(record: &FormRecord) -> Result<()> {
    let Some(schema) = record.schema() else {
        return Ok(());
    };
    for field in schema.fields() {
        let present = record.value(&field.name).is_some_and(|v| !v.is_empty());
        if matches!(field.access, FieldAccess::Key | FieldAccess::Required) && !present {
            bail!("Missing required field {}", field.name);
        }
        if field.data_type == FieldType::Select && present && !field.values.is_empty() {
            let value = record.get(&field.name);
            if !field.values.iter().any(|v| *v == value) {
                bail!(
                    "{} must be one of {}, got {:?}",
                    field.name,
                    field.values.join("/"),
                    value
                );
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validate_branch() {
        let text = "Branch:\trel1\n\nView:\n\t//a/... //b/...\n\t-//a/tmp/... //b/tmp/...\n";
        let summary = validate_content(text, FormKind::Branch).unwrap();
        assert_eq!(summary, "Valid: branch (2 fields)");
    }

    #[test]
    fn test_validate_generic() {
        let summary = validate_content("Anything:\tgoes\n", FormKind::Generic).unwrap();
        assert_eq!(summary, "Valid: form (1 fields)");
    }

    #[test]
    fn test_validate_bad_view() {
        let err = validate_content("Branch:\tb\n\nView:\n\t//a/... //b/... //c/...\n", FormKind::Branch)
            .unwrap_err();
        assert!(err.to_string().contains("View"));
    }

    #[test]
    fn test_validate_missing_key() {
        let err = validate_content("Owner:\talex\n", FormKind::Branch).unwrap_err();
        assert!(err.to_string().contains("Branch"));
    }

    const JOB_TAIL: &str = "User:\talex\n\nDescription:\n\tFix the build\n";

    #[test]
    fn test_validate_select_value() {
        let ok = format!("Job:\tjob000001\n\nStatus:\topen\n\n{}", JOB_TAIL);
        assert!(validate_content(&ok, FormKind::Job).is_ok());
        let bad = format!("Job:\tjob000001\n\nStatus:\tpending\n\n{}", JOB_TAIL);
        let err = validate_content(&bad, FormKind::Job).unwrap_err();
        assert!(err.to_string().contains("open/suspended/closed"));
    }

    #[test]
    fn test_validate_job_requires_description() {
        let text = "Job:\tjob000001\n\nStatus:\topen\n\nUser:\talex\n";
        let err = validate_content(text, FormKind::Job).unwrap_err();
        assert_eq!(err.to_string(), "Missing required field Description");
    }

    #[test]
    fn test_validate_protections() {
        let ok = "Protections:\n\tsuper user alex * //...\n\twrite group devs * -//secret/...\n";
        assert_eq!(
            validate_content(ok, FormKind::Protect).unwrap(),
            "Valid: protect (1 fields)"
        );
        let bad = "Protections:\n\tsuper user alex\n";
        assert!(validate_content(bad, FormKind::Protect).is_err());
    }

    #[test]
    fn test_validate_empty_input() {
        assert!(validate_content("", FormKind::Generic).is_err());
    }

    #[test]
    fn test_run_reads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "Group:\tdevs\n\nUsers:\n\talex\n").unwrap();
        f.flush().unwrap();
        assert!(run(Some(f.path().to_path_buf()), FormKind::Group).is_ok());
    }
}
