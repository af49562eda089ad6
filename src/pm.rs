//! Demo pipeline module with a few dated functions and two shell tools.
//!
//! - `some_method` exists as 20200601 (three args) and 20200721 (four args).
//! - `other_method` (20200801) calls `some_method` pinned to 20200721.
//! - `copy_file` (20200701) is a tool: `pm copy_file -srcfile a -dstfile b`.
//! - `line_count` (20200801) is a tool taking a list of files whose result
//!   goes through a result routine writing to `-outfile` (`-` = stdout).

use std::io::Write;

use serde_json::{Map, Value};

use crate::error::{BoxError, VcError};
use crate::registry::{Implementation, VersionedModule};
use crate::tool::{Annotation, ParamSpec, ResultRoutine, ScalarType, ToolSpec};

/// Build the `pm` module.
pub fn build() -> Result<VersionedModule, VcError> {
    let module = VersionedModule::new("pm");

    module.register_symbol(
        "_some_method_20200601",
        Implementation::new(|args| {
            let msg = format!(
                "Call from _some_method_20200601 {} {} {}",
                args.str(0, "a")?,
                args.str(1, "b")?,
                args.str(2, "c")?
            );
            println!("{msg}");
            Ok(Value::String(msg))
        })
        .with_doc("This is the docstring for method _some_method_20200601"),
    )?;

    module.register_symbol(
        "_some_method_20200721",
        Implementation::new(|args| {
            let msg = format!(
                "Call from _some_method_20200721 {} {} {} {}",
                args.str(0, "a")?,
                args.str(1, "b")?,
                args.str(2, "c")?,
                args.str(3, "d")?
            );
            println!("{msg}");
            Ok(Value::String(msg))
        })
        .with_doc("This is the docstring for method _some_method_20200721"),
    )?;

    // Pinned: other_method always runs some_method as of 20200721.
    let this = module.downgrade();
    module.register_symbol(
        "_other_method_20200801",
        Implementation::new(move |args| {
            let module = this.upgrade().ok_or("pm module dropped")?;
            Ok(module.call("some_method", args, Some("20200721"))?)
        })
        .with_doc("This is the docstring for method _other_method_20200801"),
    )?;

    module.register_symbol(
        "_copy_file_20200701",
        Implementation::new(|args| {
            std::fs::copy(args.str(0, "srcfile")?, args.str(1, "dstfile")?)?;
            Ok(Value::Null)
        })
        .with_doc("This is the docstring for method _copy_file_20200701\n\nCopy srcfile to dstfile."),
    )?;
    module.register_tool_symbol(
        "_copy_file_20200701",
        ToolSpec::new()
            .description("File copy method")
            .param(ParamSpec::typed("srcfile", ScalarType::Str))
            .param(ParamSpec::typed("dstfile", ScalarType::Str))
            .help("srcfile", "Input source file")
            .help("dstfile", "Output source file"),
    )?;

    module.register_symbol(
        "_line_count_20200801",
        Implementation::new(|args| {
            let mut counts = Map::new();
            for file in args.list(0, "files")? {
                let path = file.as_str().ok_or("file names must be strings")?;
                let lines = std::fs::read_to_string(path)?.lines().count();
                counts.insert(path.to_string(), Value::from(lines));
            }
            Ok(Value::Object(counts))
        })
        .with_doc("Count the lines of each file."),
    )?;
    module.register_tool_symbol(
        "_line_count_20200801",
        ToolSpec::new()
            .description("Count lines per file")
            .param(ParamSpec::typed("files", Annotation::list(ScalarType::Path)))
            .help("files", "Files to count")
            .help("outfile", "Where to write the counts, - for stdout")
            .type_override("outfile", ScalarType::Path)
            .default_override("outfile", "-")
            .result_routine(ResultRoutine::new(["outfile"], write_counts)),
    )?;

    Ok(module)
}

fn write_counts(result: Value, output: &Map<String, Value>) -> Result<(), BoxError> {
    let text = serde_json::to_string_pretty(&result)?;
    match output.get("outfile").and_then(Value::as_str) {
        None | Some("-") => println!("{text}"),
        Some(path) => {
            let mut file = std::fs::File::create(path)?;
            writeln!(file, "{text}")?;
        }
    }
    Ok(())
}
