//! Text pipeline context - variables available to templates

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Context shared by every step of a text pipeline run.
///
/// Templates refer to variables as `{{ name }}`. Besides user variables,
/// steps can use `{{ source }}` (the run's input) and `{{ value }}` (the
/// destination the step received).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextContext {
    /// User-defined variables
    pub variables: BTreeMap<String, String>,
}

impl TextContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables<I>(variables: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            variables: variables.into_iter().collect(),
        }
    }

    pub fn set_variable(&mut self, key: String, value: String) {
        self.variables.insert(key, value);
    }

    pub fn get_variable(&self, key: &str) -> Option<&String> {
        self.variables.get(key)
    }

    /// Render a template using only user variables
    pub fn render_variables(&self, template: &str) -> String {
        substitute(template, self.variables.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Render a template for a step working on `value` for `source`
    pub fn render(&self, template: &str, source: &str, value: Option<&str>) -> String {
        let builtins = [("source", source), ("value", value.unwrap_or_default())];
        let rendered = substitute(template, builtins);
        self.render_variables(&rendered)
    }
}

/// Replace `{{ key }}` and `{{key}}` placeholders
fn substitute<'a, I>(template: &str, variables: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut rendered = template.to_string();
    for (key, value) in variables {
        rendered = rendered
            .replace(&format!("{{{{ {} }}}}", key), value)
            .replace(&format!("{{{{{}}}}}", key), value);
    }
    rendered
}
