//! Compiled baseline rules and the single-rule matcher.

use std::collections::HashSet;

use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// A rule pattern that failed to compile.
#[derive(Debug, Error)]
#[error("invalid pattern '{pattern}': {source}")]
pub struct PatternError {
    /// Pattern text exactly as written in the baseline.
    pub pattern: String,
    #[source]
    pub source: regex::Error,
}

/// How a rule pattern is applied to a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `^` is prepended to the pattern and binds to line starts.
    LineAnchored,
    /// Pattern's own `^`/`$` bind to line boundaries.
    MultiLine,
    /// `.` also matches newlines so patterns can span lines.
    DotAll,
}

/// One compiled rule. The literal pattern text is the rule's identity.
#[derive(Debug, Clone)]
pub struct Rule {
    id: String,
    regex: Regex,
}

impl Rule {
    /// Compile `pattern` for the given mode.
    pub fn compile(pattern: &str, mode: MatchMode) -> Result<Self, PatternError> {
        let source = match mode {
            MatchMode::LineAnchored => format!("^(?:{pattern})"),
            MatchMode::MultiLine | MatchMode::DotAll => pattern.to_string(),
        };
        let regex = RegexBuilder::new(&source)
            .multi_line(matches!(mode, MatchMode::LineAnchored | MatchMode::MultiLine))
            .dot_matches_new_line(mode == MatchMode::DotAll)
            .build()
            .map_err(|source| PatternError {
                pattern: pattern.to_string(),
                source,
            })?;
        Ok(Self {
            id: pattern.to_string(),
            regex,
        })
    }

    /// Literal pattern text used for display and report keys.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// True when the rule matches anywhere in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// Ordered, de-duplicated list of rules sharing one match mode.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Compile every pattern, keeping first-occurrence order. Repeated
    /// patterns collapse into one rule.
    pub fn compile<'a, I>(patterns: I, mode: MatchMode) -> Result<Self, PatternError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut seen = HashSet::new();
        let mut rules = Vec::new();
        for pattern in patterns {
            if !seen.insert(pattern) {
                continue;
            }
            rules.push(Rule::compile(pattern, mode)?);
        }
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True when any rule in the set matches `text`.
    pub fn any_match(&self, text: &str) -> bool {
        self.rules.iter().any(|rule| rule.matches(text))
    }
}

#[cfg(test)]
mod tests {
    use super::{MatchMode, Rule, RuleSet};

    #[test]
    fn line_anchored_rule_binds_to_line_start() {
        let rule = Rule::compile("hostname", MatchMode::LineAnchored).expect("compile");
        assert!(rule.matches("version 15.2\nhostname R1\n"));
        assert!(!rule.matches("version 15.2\n description hostname R1\n"));
    }

    #[test]
    fn line_anchored_rule_anchors_every_alternative() {
        let rule = Rule::compile("aaa new-model|service password-encryption", MatchMode::LineAnchored)
            .expect("compile");
        assert!(!rule.matches(" no service password-encryption\n"));
        assert!(rule.matches("service password-encryption\n"));
    }

    #[test]
    fn multi_line_rule_honours_own_anchors() {
        let rule = Rule::compile("^ no shutdown$", MatchMode::MultiLine).expect("compile");
        assert!(rule.matches("interface Gi0/1\n no shutdown\n"));
        assert!(!rule.matches("interface Gi0/1\n no shutdown vlan 5\n"));
    }

    #[test]
    fn dot_all_rule_spans_lines() {
        let rule = Rule::compile("Vlan10.*active", MatchMode::DotAll).expect("compile");
        assert!(rule.matches("Vlan10\n  status: active\n"));

        let single = Rule::compile("Vlan10.*active", MatchMode::MultiLine).expect("compile");
        assert!(!single.matches("Vlan10\n  status: active\n"));
    }

    #[test]
    fn invalid_pattern_reports_literal_text() {
        let err = Rule::compile("ip route (", MatchMode::MultiLine).expect_err("must fail");
        assert_eq!(err.pattern, "ip route (");
        assert!(err.to_string().contains("ip route ("));
    }

    #[test]
    fn look_around_is_rejected() {
        assert!(Rule::compile("(?!no )shutdown", MatchMode::MultiLine).is_err());
    }

    #[test]
    fn duplicate_patterns_collapse_in_order() {
        let set = RuleSet::compile(
            ["b", "a", "b", "c", "a"],
            MatchMode::MultiLine,
        )
        .expect("compile");
        let ids: Vec<&str> = set.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }
}
