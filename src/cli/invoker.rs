// Copyright 2024-2026 simplevc Contributors
// SPDX-License-Identifier: Apache-2.0

//! Parse process arguments against the generated grammar and dispatch.
//!
//! Leading `-v <version>` / `-h` tokens are consumed before the grammar is
//! built, because which tools exist depends on the active version.

use std::process::ExitCode;

use clap::error::ErrorKind;
use clap::parser::ValueSource;
use clap::ArgMatches;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::builder::{build_surface, SurfaceTool};
use crate::error::VcError;
use crate::registry::{CallArgs, VersionedModule};
use crate::tool::{FlagRole, FlagSpec};

/// What a command line run did.
#[derive(Debug, Clone, PartialEq)]
pub enum CliOutcome {
    /// Usage was printed; nothing was invoked.
    HelpShown,
    /// A tool ran; `result` is the business function's return value.
    Invoked { tool: String, result: Value },
    /// Malformed input was reported to the user; nothing was invoked.
    UsageError(String),
}

/// Run one command line against `module`.
///
/// `args` includes the program name, as `std::env::args()` does. User input
/// errors come back as [`CliOutcome::UsageError`]; configuration errors and
/// failures of the invoked tool are returned as `Err`.
pub fn run<I, S>(module: &VersionedModule, args: I) -> Result<CliOutcome, VcError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let argv: Vec<String> = args.into_iter().map(Into::into).collect();
    let program = argv.first().cloned().unwrap_or_else(|| module.name().to_string());

    let mut display_help = false;
    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "-v" => {
                let Some(version) = argv.get(i + 1) else {
                    return Ok(report_usage("argument -v: expected one argument".to_string()));
                };
                if let Err(e) = module.set_version(version) {
                    return Ok(report_usage(format!("argument -v: {e}")));
                }
                i += 2;
            }
            "-h" => {
                display_help = true;
                i += 1;
            }
            _ => break,
        }
    }
    if i == argv.len() {
        display_help = true;
    }

    let surface = build_surface(module)?;
    if display_help {
        println!("{}", surface.help_text());
        return Ok(CliOutcome::HelpShown);
    }

    let (command, tools) = surface.into_parts();
    let mut tokens = argv[i..].to_vec();
    if let Some(tool) = tools.get(&tokens[0]) {
        tokens = normalize_flags(&tokens, &tool.flags);
    }

    let matches = match command.try_get_matches_from(std::iter::once(program).chain(tokens)) {
        Ok(m) => m,
        Err(e) => {
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                    let _ = e.print();
                    Ok(CliOutcome::HelpShown)
                }
                _ => {
                    let _ = e.print();
                    Ok(CliOutcome::UsageError(e.to_string()))
                }
            };
        }
    };

    let Some((name, sub_matches)) = matches.subcommand() else {
        return Ok(CliOutcome::HelpShown);
    };
    let Some(tool) = tools.get(name) else {
        return Ok(report_usage(format!("invalid choice: '{name}'")));
    };
    invoke(module, tool, sub_matches)
}

fn invoke(module: &VersionedModule, tool: &SurfaceTool, matches: &ArgMatches) -> Result<CliOutcome, VcError> {
    let mut business = Map::new();
    let mut output = Map::new();
    for flag in &tool.flags {
        let Some(value) = parsed_value(matches, flag).or_else(|| flag.default.clone()) else {
            continue;
        };
        match flag.role {
            FlagRole::Business => business.insert(flag.name.clone(), value),
            FlagRole::Output => output.insert(flag.name.clone(), value),
        };
    }

    info!(module = module.name(), tool = %tool.name, version = %tool.version, "invoking tool");
    let result = module.call(&tool.name, CallArgs::keywords(business), None)?;
    if let Some(routine) = &tool.result_routine {
        debug!(tool = %tool.name, "routing result through result routine");
        routine
            .apply(result.clone(), &output)
            .map_err(VcError::Implementation)?;
    }
    Ok(CliOutcome::Invoked {
        tool: tool.name.clone(),
        result,
    })
}

fn parsed_value(matches: &ArgMatches, flag: &FlagSpec) -> Option<Value> {
    if matches.value_source(&flag.name) != Some(ValueSource::CommandLine) {
        return None;
    }
    if flag.shape.multiple {
        let values = matches
            .get_many::<Value>(&flag.name)
            .map(|vals| vals.cloned().collect())
            .unwrap_or_default();
        Some(Value::Array(values))
    } else {
        matches.get_one::<Value>(&flag.name).cloned()
    }
}

/// Rewrite `-name` / `-name=value` into `--name` for declared flags.
pub fn normalize_flags(tokens: &[String], flags: &[FlagSpec]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| {
            let Some(rest) = token.strip_prefix('-') else {
                return token.clone();
            };
            if rest.starts_with('-') {
                return token.clone();
            }
            let name = rest.split_once('=').map_or(rest, |(n, _)| n);
            if flags.iter().any(|f| f.name == name) {
                format!("-{token}")
            } else {
                token.clone()
            }
        })
        .collect()
}

fn report_usage(message: String) -> CliOutcome {
    eprintln!("error: {message}");
    CliOutcome::UsageError(message)
}

/// Process entry point for a module run from a shell.
pub fn main(module: &VersionedModule) -> ExitCode {
    main_from(module, std::env::args())
}

/// Like [`main`] with explicit arguments.
pub fn main_from<I, S>(module: &VersionedModule, args: I) -> ExitCode
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    match run(module, args) {
        Ok(CliOutcome::HelpShown) | Ok(CliOutcome::Invoked { .. }) => ExitCode::SUCCESS,
        Ok(CliOutcome::UsageError(_)) => ExitCode::from(2u8),
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
