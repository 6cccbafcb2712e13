//! Literal scrub and ordered pattern replacement
//!
//! A paragraph is a candidate when its trimmed text contains one of the
//! example literals or a `YYYY年M月D日` date. Candidates are run through the
//! replacement rules in order, each rule seeing the previous one's output.

use crate::config::{CleanerConfig, RuleConfig};
use crate::error::{Result, TemplateError};
use regex::{NoExpand, Regex};
use std::sync::LazyLock;

static RE_EVENT_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}年\d{1,2}月\d{1,2}日").expect("valid date regex"));

/// A compiled `(pattern, replacement)` pair
#[derive(Debug, Clone)]
pub struct ReplacementRule {
    pattern: Regex,
    replacement: String,
}

impl ReplacementRule {
    /// Compile a rule
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` if the pattern is not a valid regex.
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self> {
        let compiled = Regex::new(pattern).map_err(|source| TemplateError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.into(),
        })
    }

    /// Pattern source
    #[inline]
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replacement text
    #[inline]
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match; the replacement is taken literally
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(self.replacement.as_str()))
            .into_owned()
    }
}

impl TryFrom<&RuleConfig> for ReplacementRule {
    type Error = TemplateError;

    fn try_from(rule: &RuleConfig) -> Result<Self> {
        Self::new(&rule.pattern, rule.replacement.clone())
    }
}

/// Example literals plus ordered rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    literals: Vec<String>,
    rules: Vec<ReplacementRule>,
}

impl RuleSet {
    /// Compile the literals and rules of a configuration
    ///
    /// # Errors
    ///
    /// Returns `InvalidPattern` for the first rule that fails to compile.
    pub fn from_config(config: &CleanerConfig) -> Result<Self> {
        let rules = config
            .rules
            .iter()
            .map(ReplacementRule::try_from)
            .collect::<Result<Vec<_>>>()?;
        let literals = config
            .literals
            .iter()
            .filter(|literal| !literal.is_empty())
            .cloned()
            .collect();
        Ok(Self { literals, rules })
    }

    /// Rules in application order
    #[inline]
    #[must_use]
    pub fn rules(&self) -> &[ReplacementRule] {
        &self.rules
    }

    /// Whether a paragraph should go through pattern replacement
    #[must_use]
    pub fn is_candidate(&self, text: &str) -> bool {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.literals
            .iter()
            .any(|literal| trimmed.contains(literal.as_str()))
            || RE_EVENT_DATE.is_match(trimmed)
    }

    /// Run every rule in order over `text`
    #[must_use]
    pub fn apply(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |current, rule| rule.apply(&current))
    }
}
