use crate::cmd_json::to_json;
use crate::input::read_input;
use crate::kind::FormKind;
use anyhow::{Context, Result, bail};
use p4form::v1::ViewMap;
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, field: &str, pretty: bool) -> Result<()> {
    let content = read_input(input.as_ref())?;
    let view = extract_view(&content, field)?;
    println!("{}", to_json(&view, pretty)?);
    Ok(())
}

/// Parse `field` of any form as a view map.
fn extract_view(content: &str, field: &str) -> Result<ViewMap> {
    let record = FormKind::Generic.parse(content)?;
    let Some(value) = record.value(field) else {
        bail!("Form has no {} field", field);
    };
    ViewMap::from_lines(value.lines()).with_context(|| format!("Invalid mapping in {}", field))
}

#[cfg(test)]
mod tests {
    use super::*;
    use p4form::v1::MapType;

    const CLIENT: &str = "Client:\tws\n\nRoot:\t/home/alex/ws\n\nView:\n\t//depot/main/... //ws/...\n\t-//depot/main/tmp/... //ws/tmp/...\n\t+//depot/extra/... //ws/...\n";

    #[test]
    fn test_extract_default_view() {
        let view = extract_view(CLIENT, "View").unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view[0].map_type, MapType::Include);
        assert_eq!(view[1].map_type, MapType::Exclude);
        assert_eq!(view[1].left, "//depot/main/tmp/...");
        assert_eq!(view[2].map_type, MapType::Overlay);
    }

    #[test]
    fn test_extract_other_field() {
        let view = extract_view("Stream:\t//s/main\n\nRemapped:\n\ta/... b/...\n", "Remapped").unwrap();
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].right, "b/...");
    }

    #[test]
    fn test_missing_field_fails() {
        let err = extract_view(CLIENT, "Mapping").unwrap_err();
        assert!(err.to_string().contains("Mapping"));
    }

    #[test]
    fn test_malformed_line_fails() {
        assert!(extract_view("View:\n\t//only/one/side\n", "View").is_err());
    }

    #[test]
    fn test_view_json_shape() {
        let view = extract_view("View:\n\t-//a/... //b/...\n", "View").unwrap();
        assert_eq!(
            to_json(&view, false).unwrap(),
            r#"[{"type":"exclude","left":"//a/...","right":"//b/..."}]"#
        );
    }
}
