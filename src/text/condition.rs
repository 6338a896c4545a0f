//! Step conditions (`when:` blocks)

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Condition as written in YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionConfig {
    /// Text to look for
    pub pattern: String,

    /// Treat `pattern` as a regular expression
    #[serde(default)]
    pub use_regex: bool,

    /// Run the step when the pattern does NOT match
    #[serde(default)]
    pub negate: bool,

    /// What the pattern is matched against
    #[serde(default)]
    pub on: ConditionTarget,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionTarget {
    Source,
    #[default]
    Destination,
}

/// Pattern for matching text (not serializable due to Regex)
#[derive(Debug, Clone)]
pub enum ConditionPattern {
    /// Simple string contains match
    Simple(String),
    /// Regular expression match
    Regex(Regex),
}

impl ConditionPattern {
    /// Build a pattern, compiling it when `use_regex` is set
    pub fn new(pattern: &str, use_regex: bool) -> Result<Self> {
        if use_regex {
            let regex = Regex::new(pattern).with_context(|| format!("Invalid regex '{}'", pattern))?;
            Ok(ConditionPattern::Regex(regex))
        } else {
            Ok(ConditionPattern::Simple(pattern.to_string()))
        }
    }

    pub fn matches(&self, text: &str) -> bool {
        match self {
            ConditionPattern::Simple(pattern) => text.contains(pattern.as_str()),
            ConditionPattern::Regex(regex) => regex.is_match(text),
        }
    }

    /// Get the pattern as written
    pub fn display(&self) -> &str {
        match self {
            ConditionPattern::Simple(pattern) => pattern,
            ConditionPattern::Regex(regex) => regex.as_str(),
        }
    }
}

/// Compiled condition deciding whether a step runs
#[derive(Debug, Clone)]
pub struct Condition {
    pub pattern: ConditionPattern,
    pub negate: bool,
    pub on: ConditionTarget,
}

impl Condition {
    pub fn from_config(config: &ConditionConfig) -> Result<Self> {
        Ok(Self {
            pattern: ConditionPattern::new(&config.pattern, config.use_regex)?,
            negate: config.negate,
            on: config.on,
        })
    }

    /// An absent destination never matches
    pub fn holds(&self, source: &str, destination: Option<&str>) -> bool {
        let text = match self.on {
            ConditionTarget::Source => Some(source),
            ConditionTarget::Destination => destination,
        };
        let matched = text.is_some_and(|text| self.pattern.matches(text));
        matched != self.negate
    }
}
