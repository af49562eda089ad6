//! Tests for the generated tool manual.

use simplevc::cli::generate_tool_manual;
use simplevc::registry::VersionedModule;
use simplevc::tool::{Annotation, ParamSpec, ScalarType, ToolSpec};
use simplevc::{pm, VcError};

#[test]
fn test_pm_manual_at_active_version() {
    let module = pm::build().unwrap();
    module.set_version("20200801").unwrap();
    let manual = generate_tool_manual(&module, None).unwrap();

    let expected = "\
## All tools
### copy_file
*version: 20200701*
File copy method
#### Parameters
- **-srcfile**: Input source file
- **-dstfile**: Output source file
### line_count
*version: 20200801*
Count lines per file
#### Parameters
- **-files**: Files to count";
    assert_eq!(manual, expected);
}

#[test]
fn test_manual_at_explicit_version_skips_future_tools() {
    let module = pm::build().unwrap();
    module.set_version("20200801").unwrap();
    let manual = generate_tool_manual(&module, Some("20200715")).unwrap();
    assert!(manual.contains("### copy_file"));
    assert!(!manual.contains("line_count"));

    let early = generate_tool_manual(&module, Some("20200101")).unwrap();
    assert_eq!(early, "## All tools");
}

#[test]
fn test_manual_marks_optional_with_default() {
    let module = VersionedModule::new("m");
    module
        .register_tool(
            "resize",
            "20200101",
            ToolSpec::new()
                .param(ParamSpec::typed("width", ScalarType::Int).with_default(640))
                .param(ParamSpec::new("label"))
                .help("width", "Target width"),
        )
        .unwrap();
    let manual = generate_tool_manual(&module, Some("20200102")).unwrap();
    assert!(manual.contains("- **-width**: [optional] Target width [default: 640]"));
    assert!(manual.contains("- **-label**: _"));
    assert!(manual.contains("\n\n#### Parameters"), "missing description renders as an empty line");
}

#[test]
fn test_manual_rejects_unsupported_annotation() {
    let module = VersionedModule::new("m");
    module
        .register_tool(
            "tally",
            "20200101",
            ToolSpec::new().param(ParamSpec::typed("counts", Annotation::generic("set", vec![ScalarType::Int.into()]))),
        )
        .unwrap();
    let err = generate_tool_manual(&module, Some("20200102")).unwrap_err();
    assert!(matches!(err, VcError::UnsupportedAnnotationShape { .. }));
}

#[test]
fn test_manual_rejects_malformed_version() {
    let module = VersionedModule::new("m");
    assert!(matches!(
        generate_tool_manual(&module, Some("yesterday")),
        Err(VcError::MalformedVersion { .. })
    ));
}
