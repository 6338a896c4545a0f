//! Text operations and the steps that run them

use crate::core::{step::TransformAction, typed::{TypedMultiStep, TypedStep}};
use crate::text::context::TextContext;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single text operation, tagged by `op` in YAML
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum TextOp {
    /// Append a rendered template to the destination
    Append { value: String },
    /// Prepend a rendered template to the destination
    Prepend { value: String },
    /// Replace the destination with a rendered template
    Set { value: String },
    /// Replace the destination with the source text
    Source,
    /// Replace every match of `pattern` with `with`
    Replace {
        pattern: String,
        #[serde(default)]
        with: String,
        #[serde(default)]
        use_regex: bool,
    },
    /// One destination per non-empty part
    Split { separator: String },
    /// One destination per rendered template
    Variants { templates: Vec<String> },
    /// Produce no destination
    Stop,
    Upper,
    Lower,
    Trim,
}

impl TextOp {
    /// Whether this operation can produce more (or fewer) than one destination
    pub fn is_multi(&self) -> bool {
        matches!(self, TextOp::Split { .. } | TextOp::Variants { .. })
    }

    /// Name used in logs when the step has none
    pub fn kind(&self) -> &'static str {
        match self {
            TextOp::Append { .. } => "append",
            TextOp::Prepend { .. } => "prepend",
            TextOp::Set { .. } => "set",
            TextOp::Source => "source",
            TextOp::Replace { .. } => "replace",
            TextOp::Split { .. } => "split",
            TextOp::Variants { .. } => "variants",
            TextOp::Stop => "stop",
            TextOp::Upper => "upper",
            TextOp::Lower => "lower",
            TextOp::Trim => "trim",
        }
    }
}

/// Single-result text step
#[derive(Debug, Clone)]
pub struct TextStep {
    name: String,
    op: TextOp,
    regex: Option<Regex>,
    action: TransformAction,
}

impl TextStep {
    pub fn new(name: impl Into<String>, op: TextOp, action: TransformAction) -> Result<Self> {
        let regex = match &op {
            TextOp::Replace { pattern, use_regex: true, .. } => {
                Some(Regex::new(pattern).with_context(|| format!("Invalid regex '{}'", pattern))?)
            }
            _ => None,
        };

        Ok(Self {
            name: name.into(),
            op,
            regex,
            action,
        })
    }

    pub fn op(&self) -> &TextOp {
        &self.op
    }
}

impl TypedStep<String, String, TextContext> for TextStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_transform(&self, _: &String, _: Option<&String>, _: &TextContext) -> TransformAction {
        self.action
    }

    fn apply(&self, source: &String, destination: Option<String>, context: &TextContext) -> Option<String> {
        let render = |template: &str| context.render(template, source, destination.as_deref());

        match &self.op {
            TextOp::Append { value } => {
                let suffix = render(value);
                Some(destination.unwrap_or_default() + &suffix)
            }
            TextOp::Prepend { value } => {
                let prefix = render(value);
                Some(prefix + destination.as_deref().unwrap_or_default())
            }
            TextOp::Set { value } => Some(render(value)),
            TextOp::Source => Some(source.clone()),
            TextOp::Replace { pattern, with, .. } => destination.map(|text| match &self.regex {
                Some(regex) => regex.replace_all(&text, with.as_str()).into_owned(),
                None => text.replace(pattern.as_str(), with),
            }),
            TextOp::Stop => None,
            TextOp::Upper => destination.map(|text| text.to_uppercase()),
            TextOp::Lower => destination.map(|text| text.to_lowercase()),
            TextOp::Trim => destination.map(|text| text.trim().to_string()),
            TextOp::Split { .. } | TextOp::Variants { .. } => destination,
        }
    }
}

/// Multi-result text step (`split`, `variants`)
#[derive(Debug, Clone)]
pub struct TextMultiStep {
    name: String,
    op: TextOp,
    action: TransformAction,
}

impl TextMultiStep {
    pub fn new(name: impl Into<String>, op: TextOp, action: TransformAction) -> Self {
        Self {
            name: name.into(),
            op,
            action,
        }
    }

    pub fn op(&self) -> &TextOp {
        &self.op
    }
}

impl TypedMultiStep<String, String, TextContext> for TextMultiStep {
    fn name(&self) -> &str {
        &self.name
    }

    fn can_transform(&self, _: &String, _: Option<&String>, _: &TextContext) -> TransformAction {
        self.action
    }

    fn apply_multi(&self, source: &String, destination: Option<String>, context: &TextContext) -> Vec<Option<String>> {
        match &self.op {
            TextOp::Split { separator } => destination
                .iter()
                .flat_map(|text| text.split(separator.as_str()))
                .filter(|part| !part.is_empty())
                .map(|part| Some(part.to_string()))
                .collect(),
            TextOp::Variants { templates } => templates
                .iter()
                .map(|template| Some(context.render(template, source, destination.as_deref())))
                .collect(),
            _ => vec![destination],
        }
    }
}
