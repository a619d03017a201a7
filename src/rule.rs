//! Prompt rules: (token, response) pairs matched against lines of child output.

use crate::respond::Responder;
use anyhow::Result;
use async_trait::async_trait;

/// A single prompt rule.
///
/// `token` is a literal that must appear at the start of a line of child
/// output (case- and position-sensitive). When it does, `response` is written
/// to the child's stdin followed by a newline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub token: String,
    pub response: String,
}

impl Rule {
    /// Create a rule answering lines that begin with `token`.
    pub fn new(token: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            response: response.into(),
        }
    }

    /// Whether `line` begins with this rule's token.
    fn matches(&self, line: &str) -> bool {
        line.starts_with(&self.token)
    }
}

/// An ordered list of rules evaluated first-match-wins.
///
/// Lines of the scan window are checked in arrival order; for each line the
/// rules are tried in insertion order. The first (line, rule) hit produces
/// the answer, so at most one response is emitted per scan.
#[derive(Debug, Default, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Earlier rules take precedence.
    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    fn find_response(&self, output: &str) -> Option<&str> {
        for line in output.lines() {
            for rule in &self.rules {
                if rule.matches(line) {
                    return Some(&rule.response);
                }
            }
        }
        None
    }
}

impl IntoIterator for RuleSet {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[async_trait(?Send)]
impl Responder for RuleSet {
    async fn respond(&mut self, output: &str) -> Result<Option<String>> {
        Ok(self.find_response(output).map(str::to_owned))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overwrite_rules() -> RuleSet {
        [Rule::new("? Overwrite", "n")].into_iter().collect()
    }

    #[test]
    fn test_match_at_line_start() {
        let rules = overwrite_rules();
        assert_eq!(
            rules.find_response("? Overwrite ee-test-app? (y/N)\n"),
            Some("n")
        );
    }

    #[test]
    fn test_match_on_later_line() {
        let rules = overwrite_rules();
        let out = "installing addon\n? Overwrite config.js? (y/N)\n";
        assert_eq!(rules.find_response(out), Some("n"));
    }

    #[test]
    fn test_token_mid_line_does_not_match() {
        let rules = overwrite_rules();
        assert_eq!(rules.find_response("asked: ? Overwrite foo\n"), None);
    }

    #[test]
    fn test_partial_token_does_not_match() {
        let rules = overwrite_rules();
        assert_eq!(rules.find_response("? Ove"), None);
    }

    #[test]
    fn test_case_sensitive() {
        let rules = overwrite_rules();
        assert_eq!(rules.find_response("? overwrite foo\n"), None);
    }

    #[test]
    fn test_partial_trailing_line_can_match() {
        // The matcher runs on every chunk, not only at newline boundaries,
        // so a fully-arrived prompt with no trailing newline still matches.
        let rules = overwrite_rules();
        assert_eq!(rules.find_response("? Overwrite foo? (y/N) "), Some("n"));
    }

    #[test]
    fn test_first_rule_wins() {
        let rules: RuleSet = [
            Rule::new("? Overwrite", "n"),
            Rule::new("?", "y"),
        ]
        .into_iter()
        .collect();
        assert_eq!(rules.find_response("? Overwrite foo\n"), Some("n"));
        assert_eq!(rules.find_response("? Proceed?\n"), Some("y"));
    }

    #[test]
    fn test_empty_ruleset_never_matches() {
        let rules = RuleSet::new();
        assert_eq!(rules.find_response("? Overwrite foo\n"), None);
    }

    #[tokio::test]
    async fn test_responder_impl() {
        let mut rules = overwrite_rules();
        let answer = rules.respond("? Overwrite foo\n").await.unwrap();
        assert_eq!(answer.as_deref(), Some("n"));
        assert_eq!(rules.respond("nothing here\n").await.unwrap(), None);
    }
}
