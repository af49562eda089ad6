// Copyright 2024-2026 simplevc Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command line grammar generation from tool metadata.
//!
//! One subcommand per tool that resolves at the module's active version.
//! Each declared parameter becomes a `-<name>` flag (registered as a clap
//! long option; the invoker rewrites the single-dash spelling).

use std::collections::BTreeMap;

use clap::{Arg, Command};
use serde_json::Value;
use tracing::warn;

use crate::error::VcError;
use crate::registry::VersionedModule;
use crate::tool::{FlagSpec, ResultRoutine, ScalarType};
use crate::version::VersionKey;

/// An exposed subcommand.
#[derive(Debug, Clone)]
pub struct SurfaceTool {
    pub name: String,
    pub version: VersionKey,
    pub flags: Vec<FlagSpec>,
    pub result_routine: Option<ResultRoutine>,
}

/// The generated grammar plus what each subcommand dispatches to.
#[derive(Debug, Clone)]
pub struct CliSurface {
    command: Command,
    tools: BTreeMap<String, SurfaceTool>,
}

impl CliSurface {
    pub fn command(&self) -> &Command {
        &self.command
    }

    pub fn tool(&self, name: &str) -> Option<&SurfaceTool> {
        self.tools.get(name)
    }

    pub fn subcommand_names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }

    /// Rendered top-level help.
    pub fn help_text(&self) -> String {
        self.command.clone().render_help().to_string()
    }

    pub(crate) fn into_parts(self) -> (Command, BTreeMap<String, SurfaceTool>) {
        (self.command, self.tools)
    }
}

/// Build the grammar for `module` at its active version.
///
/// Tools without an applicable version are left out. Annotation and output
/// parameter problems abort the build.
pub fn build_surface(module: &VersionedModule) -> Result<CliSurface, VcError> {
    let active = module.version();
    let about = module
        .display_version()
        .map(|v| format!("version-{v}"))
        .unwrap_or_default();
    let mut command = Command::new(module.name().to_string())
        .about(about)
        .subcommand_required(false);
    let mut tools = BTreeMap::new();

    for (name, version, spec) in module.tools_at(&active) {
        let flags = spec.flags(&name)?;
        if !module.has_implementation_at(&name, &active) {
            warn!(tool = %name, %version, %active, "tool has no implementation at the active version");
        }

        let mut sub = Command::new(name.clone())
            .about(format!("version-{version}"))
            .args_override_self(true);
        if let Some(description) = &spec.description {
            sub = sub.before_help(description.clone());
        }
        for flag in &flags {
            sub = sub.arg(flag_arg(flag));
        }
        command = command.subcommand(sub);

        tools.insert(
            name.clone(),
            SurfaceTool {
                name,
                version,
                flags,
                result_routine: spec.result_routine.clone(),
            },
        );
    }

    Ok(CliSurface { command, tools })
}

fn flag_arg(flag: &FlagSpec) -> Arg {
    let value_type = flag.shape.value_type;
    let mut arg = Arg::new(flag.name.clone())
        .long(flag.name.clone())
        .value_name(flag.name.to_uppercase())
        .help(help_line(flag))
        .required(flag.required)
        .value_parser(move |raw: &str| value_type.parse_value(raw));
    if matches!(value_type, ScalarType::Int | ScalarType::Float) {
        arg = arg.allow_negative_numbers(true);
    }
    if flag.shape.multiple {
        arg = arg.num_args(0..);
    }
    arg
}

fn help_line(flag: &FlagSpec) -> String {
    match &flag.default {
        Some(default) => format!("{} (default: {})", flag.help, display_value(default)),
        None => flag.help.clone(),
    }
}

/// Render a value the way it is typed on a command line.
pub(crate) fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(display_value).collect();
            format!("[{}]", parts.join(", "))
        }
        other => other.to_string(),
    }
}
