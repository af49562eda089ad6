// Copyright 2024-2026 simplevc Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown manual of every tool available at a version.

use super::builder::display_value;
use crate::error::VcError;
use crate::registry::VersionedModule;
use crate::version::VersionKey;

/// Generate the tool manual at `version`, or at the module's active version.
pub fn generate_tool_manual(module: &VersionedModule, version: Option<&str>) -> Result<String, VcError> {
    let version = match version {
        Some(v) => VersionKey::parse(v)?,
        None => module.version(),
    };

    let mut lines = vec!["## All tools".to_string()];
    for (name, resolved, spec) in module.tools_at(&version) {
        let flags = spec.business_flags(&name)?;
        lines.push(format!("### {name}"));
        lines.push(format!("*version: {resolved}*"));
        lines.push(spec.description.clone().unwrap_or_default());
        lines.push("#### Parameters".to_string());
        for flag in flags {
            let optional = if flag.required { "" } else { "[optional] " };
            let default = flag
                .default
                .as_ref()
                .map(|d| format!(" [default: {}]", display_value(d)))
                .unwrap_or_default();
            lines.push(format!("- **-{}**: {optional}{}{default}", flag.name, flag.help));
        }
    }
    Ok(lines.join("\n"))
}
