use crate::input::read_input;
use crate::kind::FormKind;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, kind: FormKind, pretty: bool) -> Result<()> {
    let content = read_input(input.as_ref())?;
    let record = kind.parse(&content)?;
    println!("{}", to_json(&record, pretty)?);
    Ok(())
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .context("Failed to serialize JSON")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_json_keeps_field_order() {
        let record = FormKind::Generic
            .parse("Zeta:\tlast\n\nAlpha:\tfirst\n")
            .unwrap();
        let json = to_json(&record, false).unwrap();
        assert_eq!(json, r#"{"Zeta":"last","Alpha":"first"}"#);
    }

    #[test]
    fn test_list_fields_become_arrays() {
        let record = FormKind::Group
            .parse("Group:\tdevs\n\nUsers:\n\talex\n\tbob\n")
            .unwrap();
        let json = to_json(&record, false).unwrap();
        assert_eq!(json, r#"{"Group":"devs","Users":["alex","bob"]}"#);
    }

    #[test]
    fn test_pretty_output_is_multi_line() {
        let record = FormKind::Generic.parse("A:\t1\n").unwrap();
        assert!(to_json(&record, true).unwrap().contains('\n'));
    }
}
