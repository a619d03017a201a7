//! Parser for rules files.
//!
//! A rules file declares one prompt rule per line:
//!
//! ```text
//! # answer the framework CLI's overwrite confirmations
//! on "? Overwrite" reply "n"
//! on "? Proceed" reply "y"    # earlier rules win
//! ```
//!
//! The top-level entry points are [`parse_str`] and [`parse_file`].

use crate::rule::{Rule, RuleSet};
use anyhow::{Context as _, Result, anyhow};
use std::path::Path;

/// Parse a rules file from a string slice.
///
/// Lines that are empty or start with `#` are ignored. Inline comments are
/// stripped while preserving `#` characters inside quoted strings. Rules are
/// returned in file order, which is also their precedence order.
///
/// # Errors
///
/// Returns an error if any line is not of the form
/// `on "<token>" reply "<response>"`, with the offending line number.
///
/// # Example
///
/// ```
/// use unattend::parse_str;
///
/// let rules = parse_str("on \"? Overwrite\" reply \"n\"\n").unwrap();
/// assert_eq!(rules.len(), 1);
/// ```
pub fn parse_str(content: &str) -> Result<RuleSet> {
    let mut rules = RuleSet::new();
    for (line_num, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = strip_inline_comment(line);
        let rule = parse_line(line)
            .with_context(|| format!("Failed to parse line {}: {}", line_num + 1, line))?;
        rules.push(rule);
    }
    Ok(rules)
}

/// Parse a rules file from a path.
///
/// Reads the entire file into memory and delegates to [`parse_str`].
pub fn parse_file(path: impl AsRef<Path>) -> Result<RuleSet> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read rules file: {}", path.display()))?;
    parse_str(&content)
}

/// Parse one `on "<token>" reply "<response>"` line.
fn parse_line(line: &str) -> Result<Rule> {
    let rest = line
        .strip_prefix("on")
        .ok_or_else(|| anyhow!("Expected line to start with 'on'"))?
        .trim_start();

    let (token, rest) = take_quoted(rest)?;
    let rest = rest
        .trim_start()
        .strip_prefix("reply")
        .ok_or_else(|| anyhow!("Expected 'reply' after the prompt token"))?
        .trim_start();

    let (response, rest) = take_quoted(rest)?;
    if !rest.trim().is_empty() {
        return Err(anyhow!("Unexpected trailing content: {}", rest.trim()));
    }

    Ok(Rule::new(token, response))
}

/// Consume a leading double-quoted string, returning it unescaped along with
/// the remainder of the line. Respects backslash escapes.
fn take_quoted(s: &str) -> Result<(String, &str)> {
    if !s.starts_with('"') {
        return Err(anyhow!("Expected quoted string"));
    }

    let mut escaped = false;
    let mut end_idx = None;
    for (i, ch) in s.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == '"' {
            end_idx = Some(i);
            break;
        }
    }

    let end_idx = end_idx.ok_or_else(|| anyhow!("Unclosed quote"))?;
    Ok((unescape(&s[1..end_idx]), &s[end_idx + 1..]))
}

/// Process `\n`, `\t`, `\"`, and `\\` escapes in a single pass, so an
/// escaped backslash can never feed a later escape (`\\n` is a backslash
/// followed by `n`, not a newline).
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            // Unknown escapes and a trailing backslash pass through.
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Strip inline comments from a line, preserving `#` inside quoted strings.
fn strip_inline_comment(line: &str) -> &str {
    let mut in_quotes = false;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        if ch == '\\' {
            escaped = true;
            continue;
        }
        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }
        if ch == '#' && !in_quotes {
            return line[..i].trim();
        }
    }
    line
}
