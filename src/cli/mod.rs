// Copyright 2024-2026 simplevc Contributors
// SPDX-License-Identifier: Apache-2.0

//! Command line surface derived from registered tool metadata.
//!
//! ## Usage
//!
//! ```bash
//! pm                                   # list tools at today's version
//! pm -v 20200801 -h                    # list tools as of 2020-08-01
//! pm copy_file -srcfile a -dstfile b   # run a tool
//! ```
//!
//! Flags are registered as clap long options, so generated help and usage
//! text list them as `--srcfile`. Both `-srcfile` and `--srcfile` (and the
//! `=value` forms) are accepted. Numeric flags take negative values such as
//! `-n -5`.

mod builder;
mod invoker;
mod manual;

pub use builder::{build_surface, CliSurface, SurfaceTool};
pub use invoker::{main, main_from, normalize_flags, run, CliOutcome};
pub use manual::generate_tool_manual;
