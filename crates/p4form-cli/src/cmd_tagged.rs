use crate::input::read_input;
use crate::kind::FormKind;
use anyhow::{Context, Result, bail};
use p4form::v1::FormRecord;
use serde_json::Value;
use std::path::PathBuf;

pub fn run(input: Option<PathBuf>, kind: FormKind) -> Result<()> {
    let content = read_input(input.as_ref())?;
    let record = ingest(&content, kind)?;
    print!("{}", record);
    Ok(())
}

/// Build a record from a flat JSON object of tagged key/value pairs.
/// Key order is kept, so unknown fields appear in input order.
fn ingest(content: &str, kind: FormKind) -> Result<FormRecord> {
    let value: Value = serde_json::from_str(content).context("Failed to parse tagged JSON")?;
    let Value::Object(map) = value else {
        bail!("Tagged input must be a JSON object");
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        let text = match value {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => continue,
            Value::Array(_) | Value::Object(_) => {
                bail!("Tagged value for {} must be a scalar", key)
            }
        };
        pairs.push((key, text));
    }

    let mut record = kind.new_record();
    record.set_values(pairs);
    if record.is_empty() {
        bail!("Tagged input has no fields");
    }
    Ok(record)
}
