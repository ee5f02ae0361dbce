//! `{{ name }}` placeholder substitution.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: undefined variable '{name}'")]
pub struct UndefinedVariable {
    pub name: String,
    /// One-based line number.
    pub line: usize,
}

fn variable_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*([^\s}]+)\s*\}\}").expect("Invalid variable regex"))
}

/// Replaces every `{{ name }}` in `text` with its binding.
///
/// An unbound name is left in place with a warning, or fails the whole call
/// when `strict` is set.
pub fn substitute(
    text: &str,
    variables: &BTreeMap<String, String>,
    strict: bool,
) -> Result<String, UndefinedVariable> {
    let mut lines = Vec::new();
    for (i, line) in text.lines().enumerate() {
        lines.push(substitute_line(line, i + 1, variables, strict)?);
    }
    Ok(lines.join("\n"))
}

fn substitute_line(
    line: &str,
    number: usize,
    variables: &BTreeMap<String, String>,
    strict: bool,
) -> Result<String, UndefinedVariable> {
    let mut out = String::with_capacity(line.len());
    let mut last = 0;
    for caps in variable_re().captures_iter(line) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&line[last..whole.start()]);
        last = whole.end();

        let name = &caps[1];
        if let Some(value) = variables.get(name) {
            out.push_str(value);
            continue;
        }

        let err = UndefinedVariable {
            name: name.to_string(),
            line: number,
        };
        if strict {
            return Err(err);
        }
        log::warn!(
            "{err}\n\n{line}\n{}{}\n",
            " ".repeat(whole.start()),
            "~".repeat(whole.as_str().chars().count())
        );
        out.push_str(whole.as_str());
    }
    out.push_str(&line[last..]);
    Ok(out)
}
