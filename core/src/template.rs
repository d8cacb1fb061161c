//! `{name}` placeholder discovery and substitution.
//!
//! Task descriptions reference run-time inputs as `{code_changes}` or
//! `{user_query}`. Substitution is lenient: a token with no matching input is left
//! in place verbatim and reported back to the caller.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

/// Run-time input mapping; ordered so prompts and logs are deterministic.
pub type Inputs = BTreeMap<String, String>;

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid placeholder regex"))
}

/// Names of all placeholders in `text`, deduplicated and sorted.
pub fn placeholders(text: &str) -> BTreeSet<String> {
    placeholder_re()
        .captures_iter(text)
        .map(|c| c[1].to_string())
        .collect()
}

pub fn has_placeholder(text: &str, name: &str) -> bool {
    text.contains(&format!("{{{name}}}"))
}

/// Result of interpolating one text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    /// Placeholders left untouched because no input supplied them.
    pub unresolved: BTreeSet<String>,
}

/// Replaces every `{name}` found in `inputs`; unknown names pass through literally.
///
/// Substitution is single-pass, so braces inside an input value are never expanded.
pub fn interpolate(text: &str, inputs: &Inputs) -> Rendered {
    let mut unresolved = BTreeSet::new();
    let text = placeholder_re()
        .replace_all(text, |caps: &regex::Captures<'_>| match inputs.get(&caps[1]) {
            Some(value) => value.clone(),
            None => {
                unresolved.insert(caps[1].to_string());
                caps[0].to_string()
            }
        })
        .into_owned();
    Rendered { text, unresolved }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(pairs: &[(&str, &str)]) -> Inputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn finds_placeholders() {
        let found = placeholders("Review {code_changes} then {code_changes} and {user_query}.");
        assert_eq!(
            found.into_iter().collect::<Vec<_>>(),
            vec!["code_changes".to_string(), "user_query".to_string()]
        );
    }

    #[test]
    fn ignores_json_braces() {
        let text = "A JSON object:\n{\n  \"critical_issues\": [],\n  \"reasoning\": string\n}";
        assert!(placeholders(text).is_empty());
    }

    #[test]
    fn substitutes_known_inputs() {
        let rendered = interpolate("Query: {user_query}", &inputs(&[("user_query", "AI in 2025")]));
        assert_eq!(rendered.text, "Query: AI in 2025");
        assert!(rendered.unresolved.is_empty());
    }

    #[test]
    fn unresolved_tokens_pass_through() {
        let rendered = interpolate("Diff:\n{code_changes}", &Inputs::new());
        assert_eq!(rendered.text, "Diff:\n{code_changes}");
        assert!(rendered.unresolved.contains("code_changes"));
    }

    #[test]
    fn values_are_not_reexpanded() {
        let rendered = interpolate(
            "{a}",
            &inputs(&[("a", "{b}"), ("b", "should not appear")]),
        );
        assert_eq!(rendered.text, "{b}");
    }

    #[test]
    fn has_placeholder_matches_exact_token() {
        assert!(has_placeholder("x {code_changes} y", "code_changes"));
        assert!(!has_placeholder("x code_changes y", "code_changes"));
    }
}
