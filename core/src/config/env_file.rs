use std::path::Path;

/// Parses a `.env` style secrets file into ordered key/value pairs.
///
/// Blank lines and `#` comments are skipped. Values may be wrapped in single or
/// double quotes, in which case `\n`, `\t`, `\\` and quote escapes are honoured.
pub fn parse_env_file(path: &Path) -> anyhow::Result<Vec<(String, String)>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read env file {}: {e}", path.display()))?;
    parse_env_str(&content)
}

/// Malformed lines are logged and skipped so one bad entry cannot block every command.
pub(crate) fn parse_env_str(content: &str) -> anyhow::Result<Vec<(String, String)>> {
    let mut out = Vec::new();

    for (idx, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match parse_env_line(line, idx + 1) {
            Ok(pair) => out.push(pair),
            Err(e) => tracing::warn!(error = %e, "skipping env file line"),
        }
    }

    Ok(out)
}

fn parse_env_line(line: &str, line_no: usize) -> anyhow::Result<(String, String)> {
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (k, v) = line.split_once('=').ok_or_else(|| {
        anyhow::anyhow!("invalid env line at {} (expected KEY=VALUE)", line_no)
    })?;
    let key = k.trim();
    if key.is_empty() {
        anyhow::bail!("invalid env line at {} (empty key)", line_no);
    }
    let value = parse_env_value(v.trim(), line_no)?;
    Ok((key.to_string(), value))
}

fn parse_env_value(value: &str, line_no: usize) -> anyhow::Result<String> {
    let quoted = value.len() >= 2
        && ((value.starts_with('"') && value.ends_with('"'))
            || (value.starts_with('\'') && value.ends_with('\'')));
    if quoted {
        return unescape_env_value(&value[1..value.len() - 1], line_no);
    }
    Ok(value.to_string())
}

fn unescape_env_value(value: &str, line_no: usize) -> anyhow::Result<String> {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        let Some(next) = chars.next() else {
            anyhow::bail!("invalid escape at line {} (trailing backslash)", line_no);
        };
        match next {
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            other => out.push(other),
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_quoted_and_commented_lines() {
        let input = "# secrets\nOPENAI_API_KEY=sk-test\n\nexport CREWKIT_MODEL=\"llama3\"\nGREETING='a\\tb'\n";
        let pairs = parse_env_str(input).unwrap();
        assert_eq!(
            pairs,
            vec![
                ("OPENAI_API_KEY".to_string(), "sk-test".to_string()),
                ("CREWKIT_MODEL".to_string(), "llama3".to_string()),
                ("GREETING".to_string(), "a\tb".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let pairs = parse_env_str("JUSTAKEY\n=nokey\nK=\"abc\\\"\nOPENAI_API_KEY=sk-test\n").unwrap();
        assert_eq!(
            pairs,
            vec![("OPENAI_API_KEY".to_string(), "sk-test".to_string())]
        );
    }

    #[test]
    fn line_errors_carry_line_number() {
        let err = parse_env_line("JUSTAKEY", 3).unwrap_err();
        assert!(err.to_string().contains("line at 3"));
        assert!(parse_env_line("K=\"abc\\\"", 1).is_err());
    }
}
