use std::path::Path;

use crewkit_core::api::{CliError, DefinitionError, Inputs};

/// Splits `KEY=VALUE`; the value may itself contain `=`.
pub fn parse_key_value(raw: &str) -> Result<(String, String), CliError> {
    let (k, v) = raw.split_once('=').ok_or_else(|| {
        CliError::Config(format!("invalid input '{raw}' (expected KEY=VALUE)"))
    })?;
    let key = k.trim();
    if key.is_empty() {
        return Err(CliError::Config(format!("invalid input '{raw}' (empty key)")));
    }
    Ok((key.to_string(), v.to_string()))
}

/// Layers run-time inputs over manifest defaults: files first, then literal values.
pub fn merge_inputs(
    defaults: &Inputs,
    inputs: &[String],
    input_files: &[String],
) -> Result<Inputs, CliError> {
    let mut merged = defaults.clone();

    for raw in input_files {
        let (key, path) = parse_key_value(raw)?;
        let path = Path::new(path.trim());
        let content =
            std::fs::read_to_string(path).map_err(|e| DefinitionError::from_io(path, e))?;
        merged.insert(key, content);
    }

    for raw in inputs {
        let (key, value) = parse_key_value(raw)?;
        merged.insert(key, value);
    }

    Ok(merged)
}
