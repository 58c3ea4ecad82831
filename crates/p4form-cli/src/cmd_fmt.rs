use crate::input::read_input;
use crate::kind::FormKind;
use anyhow::{Result, bail};
use p4form::v1::FormatOptions;
use similar::TextDiff;
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, kind: FormKind, crlf: bool, check: bool) -> Result<()> {
    let content = read_input(input.as_ref())?;
    let formatted = format_content(&content, kind, crlf)?;

    if check {
        if let Some(diff) = compute_diff(&content, &formatted) {
            print!("{}", diff);
            bail!("Form is not in canonical layout");
        }
        return Ok(());
    }

    print!("{}", formatted);
    Ok(())
}

fn format_content(content: &str, kind: FormKind, crlf: bool) -> Result<String> {
    let record = kind.parse(content)?;
    let options = if crlf {
        FormatOptions::crlf()
    } else {
        FormatOptions::default()
    };
    Ok(record.to_form_text_with(&options))
}

fn compute_diff(old: &str, new: &str) -> Option<String> {
    let diff = TextDiff::from_lines(old, new);
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header("input", "canonical")
        .to_string();
    if unified.is_empty() {
        None
    } else {
        Some(unified)
    }
}
