//! `pm` entry point: the demo pipeline module run from a shell.
//!
//! ## Usage
//!
//! - `pm` or `pm -h` - list the tools available at the active version
//! - `pm -v 20200801 -h` - list the tools available as of 2020-08-01
//! - `pm copy_file -srcfile a.txt -dstfile b.txt` - run a tool
//! - `pm line_count -files a.txt b.txt -outfile counts.json`
//!
//! Configuration is read from `SIMPLEVC_*` environment variables; see
//! [`simplevc::config`].

use std::process::ExitCode;

use simplevc::{cli, config, pm, telemetry};

fn main() -> ExitCode {
    let config = config::load();
    if let Err(e) = telemetry::init_logging(&config.log) {
        eprintln!("Logging disabled: {}", e);
    }
    // Must precede module creation: the default version seeds the module.
    config.apply();

    let module = match pm::build() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to register pm module: {}", e);
            return ExitCode::FAILURE;
        }
    };
    cli::main(&module)
}
