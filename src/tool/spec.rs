//! Declarative tool metadata registered alongside an implementation version.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use super::annotation::{flag_shape, Annotation, FlagShape, ScalarType};
use crate::error::{BoxError, VcError};

/// Help text shown for a flag without a declared description.
pub const NO_HELP: &str = "_";

/// One declared parameter of a tool signature.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamSpec {
    pub name: String,
    pub annotation: Option<Annotation>,
    pub default: Option<Value>,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
        }
    }

    pub fn typed(name: impl Into<String>, annotation: impl Into<Annotation>) -> Self {
        Self::new(name).annotated(annotation)
    }

    pub fn annotated(mut self, annotation: impl Into<Annotation>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }
}

type RoutineFn = dyn Fn(Value, &Map<String, Value>) -> Result<(), BoxError> + Send + Sync;

/// Post-processing for a tool's result, fed by CLI-only output parameters.
#[derive(Clone)]
pub struct ResultRoutine {
    routine: Arc<RoutineFn>,
    params: Vec<String>,
}

impl ResultRoutine {
    pub fn new<F, I, S>(params: I, routine: F) -> Self
    where
        F: Fn(Value, &Map<String, Value>) -> Result<(), BoxError> + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            routine: Arc::new(routine),
            params: params.into_iter().map(Into::into).collect(),
        }
    }

    /// Names of the output-destination parameters.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn apply(&self, result: Value, output_args: &Map<String, Value>) -> Result<(), BoxError> {
        (self.routine)(result, output_args)
    }
}

impl fmt::Debug for ResultRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultRoutine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Which call a parsed flag feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagRole {
    Business,
    Output,
}

/// A parameter after override precedence has been applied.
#[derive(Debug, Clone, PartialEq)]
pub struct FlagSpec {
    pub name: String,
    pub role: FlagRole,
    pub shape: FlagShape,
    pub required: bool,
    pub default: Option<Value>,
    pub help: String,
}

/// CLI metadata of one tool version.
#[derive(Debug, Clone, Default)]
pub struct ToolSpec {
    pub params: Vec<ParamSpec>,
    pub description: Option<String>,
    pub helps: BTreeMap<String, String>,
    pub types: BTreeMap<String, ScalarType>,
    pub defaults: BTreeMap<String, Value>,
    pub result_routine: Option<ResultRoutine>,
}

impl ToolSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn help(mut self, param: impl Into<String>, text: impl Into<String>) -> Self {
        self.helps.insert(param.into(), text.into());
        self
    }

    pub fn type_override(mut self, param: impl Into<String>, value_type: ScalarType) -> Self {
        self.types.insert(param.into(), value_type);
        self
    }

    pub fn default_override(mut self, param: impl Into<String>, value: impl Into<Value>) -> Self {
        self.defaults.insert(param.into(), value.into());
        self
    }

    pub fn result_routine(mut self, routine: ResultRoutine) -> Self {
        self.result_routine = Some(routine);
        self
    }

    fn help_for(&self, name: &str) -> String {
        self.helps
            .get(name)
            .cloned()
            .unwrap_or_else(|| NO_HELP.to_string())
    }

    /// Flags for the signature parameters.
    pub fn business_flags(&self, tool: &str) -> Result<Vec<FlagSpec>, VcError> {
        self.params
            .iter()
            .map(|param| {
                let default = self
                    .defaults
                    .get(&param.name)
                    .or(param.default.as_ref())
                    .cloned();
                let shape = flag_shape(
                    tool,
                    &param.name,
                    self.types.get(&param.name).copied(),
                    param.annotation.as_ref(),
                )?;
                Ok(FlagSpec {
                    name: param.name.clone(),
                    role: FlagRole::Business,
                    shape,
                    required: default.is_none(),
                    default,
                    help: self.help_for(&param.name),
                })
            })
            .collect()
    }

    /// Flags for the result routine's output parameters. Each needs an
    /// explicit type override.
    pub fn output_flags(&self, tool: &str) -> Result<Vec<FlagSpec>, VcError> {
        let Some(routine) = &self.result_routine else {
            return Ok(Vec::new());
        };
        routine
            .params()
            .iter()
            .map(|name| {
                let value_type = self.types.get(name).copied().ok_or_else(|| {
                    VcError::MissingTypeForOutputParameter {
                        tool: tool.to_string(),
                        param: name.clone(),
                    }
                })?;
                let default = self.defaults.get(name).cloned();
                Ok(FlagSpec {
                    name: name.clone(),
                    role: FlagRole::Output,
                    shape: FlagShape::single(value_type),
                    required: default.is_none(),
                    default,
                    help: self.help_for(name),
                })
            })
            .collect()
    }

    /// All flags of the tool's subcommand, business flags first.
    pub fn flags(&self, tool: &str) -> Result<Vec<FlagSpec>, VcError> {
        let mut flags = self.business_flags(tool)?;
        flags.extend(self.output_flags(tool)?);
        for (i, flag) in flags.iter().enumerate() {
            if flag.name == "help" || flags[..i].iter().any(|f| f.name == flag.name) {
                return Err(VcError::DuplicateFlag {
                    tool: tool.to_string(),
                    flag: flag.name.clone(),
                });
            }
        }
        Ok(flags)
    }

    pub fn param_names(&self) -> Vec<&str> {
        self.params.iter().map(|p| p.name.as_str()).collect()
    }
}
