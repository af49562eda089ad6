//! Tests for command line surface generation and invocation.

use std::sync::{Arc, Mutex};

use serde_json::{Map, Value};
use simplevc::cli::{build_surface, run, CliOutcome};
use simplevc::registry::{CallArgs, VersionedModule};
use simplevc::tool::{Annotation, ParamSpec, ResultRoutine, ScalarType, ToolSpec};
use simplevc::{pm, VcError};

type CallLog = Arc<Mutex<Vec<CallArgs>>>;

/// Module with a recording copy_file tool at 20200701.
fn recording_module() -> (VersionedModule, CallLog) {
    let log: CallLog = Arc::new(Mutex::new(Vec::new()));
    let recorder = log.clone();
    let module = VersionedModule::new("rec");
    module
        .register_fn("copy_file", "20200701", "copy", move |args| {
            recorder.lock().unwrap().push(args);
            Ok(Value::Null)
        })
        .unwrap();
    module
        .register_tool(
            "copy_file",
            "20200701",
            ToolSpec::new()
                .description("File copy method")
                .param(ParamSpec::typed("srcfile", ScalarType::Str))
                .param(ParamSpec::typed("dstfile", ScalarType::Str)),
        )
        .unwrap();
    module.set_version("20200801").unwrap();
    (module, log)
}

#[test]
fn test_copy_file_copies_with_single_dash_flags() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src.txt");
    let dst = dir.path().join("dst.txt");
    std::fs::write(&src, "hello\n").unwrap();

    let module = pm::build().unwrap();
    let outcome = run(
        &module,
        [
            "pm",
            "-v",
            "20200801",
            "copy_file",
            "-srcfile",
            src.to_str().unwrap(),
            "-dstfile",
            dst.to_str().unwrap(),
        ],
    )
    .unwrap();

    assert_eq!(
        outcome,
        CliOutcome::Invoked {
            tool: "copy_file".to_string(),
            result: Value::Null
        }
    );
    assert_eq!(std::fs::read_to_string(&dst).unwrap(), "hello\n");
}

#[test]
fn test_invokes_once_with_keyword_strings() {
    let (module, log) = recording_module();
    run(&module, ["rec", "copy_file", "-srcfile", "a.txt", "--dstfile", "b.txt"]).unwrap();

    let calls = log.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].positional.is_empty());
    let mut expected = Map::new();
    expected.insert("srcfile".into(), Value::from("a.txt"));
    expected.insert("dstfile".into(), Value::from("b.txt"));
    assert_eq!(calls[0].keyword, expected);
}

#[test]
fn test_missing_required_flag_is_reported_not_invoked() {
    let (module, log) = recording_module();
    let outcome = run(&module, ["rec", "copy_file", "-srcfile", "a.txt"]).unwrap();
    assert!(matches!(outcome, CliOutcome::UsageError(_)));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_unknown_subcommand_is_reported() {
    let (module, log) = recording_module();
    let outcome = run(&module, ["rec", "move_file"]).unwrap();
    assert!(matches!(outcome, CliOutcome::UsageError(_)));
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_help_flags_do_not_invoke() {
    let (module, log) = recording_module();
    assert_eq!(run(&module, ["rec"]).unwrap(), CliOutcome::HelpShown);
    assert_eq!(run(&module, ["rec", "-h"]).unwrap(), CliOutcome::HelpShown);
    assert_eq!(run(&module, ["rec", "-h", "copy_file"]).unwrap(), CliOutcome::HelpShown);
    assert_eq!(run(&module, ["rec", "copy_file", "-h"]).unwrap(), CliOutcome::HelpShown);
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_version_flag_applies_before_grammar() {
    let (module, log) = recording_module();
    let outcome = run(&module, ["rec", "-v", "20200601", "copy_file", "-srcfile", "a", "-dstfile", "b"]).unwrap();
    assert!(matches!(outcome, CliOutcome::UsageError(_)), "tool does not exist yet");
    assert_eq!(module.version().to_string(), "20200601");
    assert!(log.lock().unwrap().is_empty());

    let surface = build_surface(&module).unwrap();
    assert!(surface.subcommand_names().is_empty());
}

#[test]
fn test_malformed_typed_value_is_reported() {
    let module = VersionedModule::new("typed");
    module.register_fn("repeat", "20200101", "", |args| Ok(Value::from(args.i64(0, "times")?))).unwrap();
    module
        .register_tool("repeat", "20200101", ToolSpec::new().param(ParamSpec::typed("times", ScalarType::Int)))
        .unwrap();
    module.set_version("20200102").unwrap();

    let bad = run(&module, ["typed", "repeat", "-times", "many"]).unwrap();
    assert!(matches!(bad, CliOutcome::UsageError(_)));

    let good = run(&module, ["typed", "repeat", "-times", "3"]).unwrap();
    assert_eq!(
        good,
        CliOutcome::Invoked {
            tool: "repeat".into(),
            result: Value::from(3)
        }
    );
}

#[test]
fn test_defaults_fill_absent_optional_flags() {
    let module = VersionedModule::new("defaults");
    module
        .register_fn("greet", "20200101", "", |args| {
            Ok(Value::from(format!("{} x{}", args.str(0, "name")?, args.i64(1, "times")?)))
        })
        .unwrap();
    module
        .register_tool(
            "greet",
            "20200101",
            ToolSpec::new()
                .param(ParamSpec::typed("name", ScalarType::Str).with_default("world"))
                .param(ParamSpec::typed("times", ScalarType::Int))
                .default_override("times", 2),
        )
        .unwrap();
    module.set_version("20200102").unwrap();

    let outcome = run(&module, ["defaults", "greet"]).unwrap();
    assert_eq!(
        outcome,
        CliOutcome::Invoked {
            tool: "greet".into(),
            result: Value::from("world x2")
        }
    );
}

#[test]
fn test_list_parameter_and_result_routine() {
    let routed: Arc<Mutex<Option<(Value, Map<String, Value>)>>> = Arc::new(Mutex::new(None));
    let sink = routed.clone();

    let module = VersionedModule::new("lists");
    module
        .register_fn("total", "20200101", "", |args| {
            let sum: i64 = args.list(0, "numbers")?.iter().filter_map(Value::as_i64).sum();
            Ok(Value::from(sum))
        })
        .unwrap();
    module
        .register_tool(
            "total",
            "20200101",
            ToolSpec::new()
                .param(ParamSpec::typed("numbers", Annotation::list(ScalarType::Int)))
                .type_override("outfile", ScalarType::Path)
                .result_routine(ResultRoutine::new(["outfile"], move |result, output| {
                    *sink.lock().unwrap() = Some((result, output.clone()));
                    Ok(())
                })),
        )
        .unwrap();
    module.set_version("20200102").unwrap();

    let outcome = run(&module, ["lists", "total", "-numbers", "1", "2", "3", "-outfile", "sum.txt"]).unwrap();
    assert_eq!(
        outcome,
        CliOutcome::Invoked {
            tool: "total".into(),
            result: Value::from(6)
        }
    );
    let (result, output) = routed.lock().unwrap().clone().unwrap();
    assert_eq!(result, Value::from(6));
    assert_eq!(output.get("outfile"), Some(&Value::from("sum.txt")));
    assert_eq!(output.len(), 1, "business args must not reach the routine");

    let empty = run(&module, ["lists", "total", "-numbers", "-outfile", "x"]).unwrap();
    assert_eq!(
        empty,
        CliOutcome::Invoked {
            tool: "total".into(),
            result: Value::from(0)
        }
    );
}

#[test]
fn test_untyped_output_parameter_fails_build() {
    let module = VersionedModule::new("broken");
    module
        .register_tool(
            "dump",
            "20200101",
            ToolSpec::new().result_routine(ResultRoutine::new(["outfile"], |_, _| Ok(()))),
        )
        .unwrap();
    module.set_version("20200102").unwrap();

    let err = run(&module, ["broken", "dump"]).unwrap_err();
    assert!(matches!(err, VcError::MissingTypeForOutputParameter { .. }));
    assert!(err.is_configuration());
}

#[test]
fn test_tool_without_implementation_fails_at_invocation() {
    let module = VersionedModule::new("orphan");
    module.register_fn("job", "20200301", "", |_| Ok(Value::Null)).unwrap();
    module.register_tool("job", "20200101", ToolSpec::new()).unwrap();
    module.set_version("20200201").unwrap();

    let surface = build_surface(&module).unwrap();
    assert_eq!(surface.subcommand_names(), ["job"]);
    let err = run(&module, ["orphan", "job"]).unwrap_err();
    assert!(matches!(err, VcError::VersionUnavailable { .. }));
}

#[test]
fn test_business_error_propagates_from_cli() {
    let module = VersionedModule::new("failing");
    module
        .register_fn("explode", "20200101", "", |_| Err("boom".into()))
        .unwrap();
    module.register_tool("explode", "20200101", ToolSpec::new()).unwrap();
    module.set_version("20200102").unwrap();

    let err = run(&module, ["failing", "explode"]).unwrap_err();
    assert!(matches!(err, VcError::Implementation(_)));
    assert_eq!(err.to_string(), "boom");
}

#[test]
fn test_pm_line_count_writes_outfile() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    let out = dir.path().join("counts.json");
    std::fs::write(&a, "1\n2\n3\n").unwrap();
    std::fs::write(&b, "only\n").unwrap();

    let module = pm::build().unwrap();
    module.set_version("20200801").unwrap();
    run(
        &module,
        [
            "pm",
            "line_count",
            "-files",
            a.to_str().unwrap(),
            b.to_str().unwrap(),
            "-outfile",
            out.to_str().unwrap(),
        ],
    )
    .unwrap();

    let written: Value = serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written[a.to_str().unwrap()], Value::from(3));
    assert_eq!(written[b.to_str().unwrap()], Value::from(1));
}

#[test]
fn test_numeric_flags_take_negative_values() {
    let module = VersionedModule::new("signed");
    module
        .register_fn("shift", "20200101", "", |args| {
            let offset: f64 = args.list(1, "xs")?.iter().filter_map(Value::as_f64).sum();
            Ok(Value::from(args.i64(0, "n")? as f64 + offset))
        })
        .unwrap();
    module
        .register_tool(
            "shift",
            "20200101",
            ToolSpec::new()
                .param(ParamSpec::typed("n", ScalarType::Int))
                .param(ParamSpec::typed("xs", Annotation::list(ScalarType::Float)).with_default(Vec::<f64>::new())),
        )
        .unwrap();
    module.set_version("20200102").unwrap();

    let scalar = run(&module, ["signed", "shift", "-n", "-5"]).unwrap();
    assert_eq!(
        scalar,
        CliOutcome::Invoked {
            tool: "shift".into(),
            result: Value::from(-5.0)
        }
    );

    let list = run(&module, ["signed", "shift", "-n", "1", "-xs", "-1.5", "2"]).unwrap();
    assert_eq!(
        list,
        CliOutcome::Invoked {
            tool: "shift".into(),
            result: Value::from(1.5)
        }
    );
}
