//! Text pipeline configuration from YAML

use crate::core::{
    config::EngineSettings,
    error::PipelineError,
    pipeline::Pipeline,
    step::{ConditionalStep, Step, TransformAction},
    typed::{Typed, TypedMulti},
};
use crate::text::{
    condition::{Condition, ConditionConfig},
    context::TextContext,
    ops::{TextMultiStep, TextOp, TextStep},
};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

/// A text pipeline as built from its YAML description
pub type TextPipeline = Pipeline<String, String, TextContext>;

/// Top-level text pipeline configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextPipelineConfig {
    /// Pipeline name
    #[serde(default)]
    pub name: Option<String>,

    /// Engine knobs (auto-creation, isolation default)
    #[serde(default)]
    pub settings: EngineSettings,

    /// Template every run starts from, rendered with the variables
    #[serde(default)]
    pub initial_value: Option<String>,

    /// Variables available to every template
    #[serde(default)]
    pub variables: BTreeMap<String, String>,

    /// Pipeline steps, in execution order
    pub steps: Vec<StepConfig>,
}

/// Step configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepConfig {
    /// Optional unique step name
    #[serde(default)]
    pub name: Option<String>,

    #[serde(flatten)]
    pub op: TextOp,

    /// Report this step's results as a separate branch
    #[serde(default)]
    pub isolated: bool,

    /// Let an isolated step work on the destination it is handed
    #[serde(default)]
    pub keep_initial_destination: Option<bool>,

    /// Only run the step when this condition holds
    #[serde(default)]
    pub when: Option<ConditionConfig>,

    /// What to do with the destination before the operation runs
    #[serde(default)]
    pub action: TransformAction,
}

impl StepConfig {
    /// Name used in logs and errors
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_else(|| self.op.kind())
    }
}

impl TextPipelineConfig {
    /// Load text pipeline configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_yaml(&content)
    }

    /// Parse text pipeline configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: TextPipelineConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the text pipeline configuration
    pub fn validate(&self) -> Result<()> {
        let mut seen_names = HashSet::new();

        for (index, step) in self.steps.iter().enumerate() {
            if let Some(name) = &step.name {
                if name.trim().is_empty() {
                    bail!(PipelineError::Config(format!("Step {} has an empty name", index)));
                }
                if !seen_names.insert(name) {
                    bail!(PipelineError::Config(format!("Duplicate step name: {}", name)));
                }
            }

            let label = step.display_name();
            match &step.op {
                TextOp::Split { separator } if separator.is_empty() => {
                    bail!(PipelineError::Config(format!(
                        "Step '{}' splits on an empty separator",
                        label
                    )));
                }
                TextOp::Variants { templates } if templates.is_empty() => {
                    bail!(PipelineError::Config(format!(
                        "Step '{}' needs at least one variant template",
                        label
                    )));
                }
                TextOp::Replace { .. } => {
                    TextStep::new(label, step.op.clone(), step.action)
                        .with_context(|| format!("Step '{}' has an invalid replace pattern", label))?;
                }
                _ => {}
            }

            if let Some(when) = &step.when {
                if step.op.is_multi() {
                    bail!(PipelineError::Config(format!(
                        "Step '{}' is multi-result and cannot carry a 'when' condition",
                        label
                    )));
                }
                Condition::from_config(when)
                    .with_context(|| format!("Step '{}' has an invalid condition", label))?;
            }

            if step.keep_initial_destination.is_some() && !step.isolated {
                bail!(PipelineError::Config(format!(
                    "Step '{}' sets keep_initial_destination but is not isolated",
                    label
                )));
            }
        }

        Ok(())
    }

    /// Build the run context, with `overrides` taking precedence over file variables
    pub fn context<I>(&self, overrides: I) -> TextContext
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut context = TextContext::with_variables(self.variables.clone());
        for (key, value) in overrides {
            context.set_variable(key, value);
        }
        context
    }

    /// Convert config to an engine pipeline
    pub fn to_pipeline(&self) -> Result<TextPipeline> {
        let configuration = self.settings.into();
        let mut pipeline = TextPipeline::with_configuration(configuration);

        if let Some(template) = &self.initial_value {
            let template = template.clone();
            pipeline.set_initial_destination(move |ctx: &TextContext| Some(ctx.render_variables(&template)));
        }

        for step in &self.steps {
            let built = build_step(step)?;
            debug!("Built step '{}' (isolated: {})", step.display_name(), step.isolated);
            if step.isolated {
                pipeline.add_isolated_step(built, step.keep_initial_destination);
            } else {
                pipeline.add_step(built);
            }
        }

        Ok(pipeline)
    }
}

fn build_step(config: &StepConfig) -> Result<Box<dyn Step<String, String, TextContext>>> {
    let name = config.display_name().to_string();

    if config.op.is_multi() {
        let step: TypedMulti<_, String, String, TextContext> =
            TypedMulti::new(TextMultiStep::new(name, config.op.clone(), config.action));
        return Ok(Box::new(step));
    }

    let step: Typed<_, String, String, TextContext> =
        Typed::new(TextStep::new(name, config.op.clone(), config.action)?);
    match &config.when {
        Some(when) => {
            let condition = Condition::from_config(when)?;
            let predicate = move |source: &String, destination: Option<&String>, _: &TextContext| {
                condition.holds(source, destination.map(String::as_str))
            };
            Ok(Box::new(ConditionalStep::wrapping(predicate, Box::new(step))))
        }
        None => Ok(Box::new(step)),
    }
}
