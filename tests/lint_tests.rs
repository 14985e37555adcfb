//! Linter tests over parsed sources.

use pb::lint::{lint, lint_file, Linter, Problem, Rule};
use pb::{Error, ParseError};
use pretty_assertions::assert_eq;

fn testdata(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("testdata")
        .join(name)
}

fn texts(problems: &[Problem]) -> Vec<&str> {
    problems.iter().map(|p| p.text.as_str()).collect()
}

#[test]
fn test_bad_enum_name() {
    let src = b"syntax = \"proto3\";\nenum bad_name { X = 0; }";
    let problems = lint("bad.proto", src).unwrap();
    assert_eq!(
        problems,
        vec![Problem {
            position: 19,
            text: "enum names should be CamelCase; bad_name".into(),
            confidence: 0.9,
            category: "naming",
        }]
    );
}

#[test]
fn test_bad_enum_fields() {
    let src = b"syntax = \"proto3\";\nenum bad_name { x = 0; Y = 1; zZ = 2; }";
    let problems = lint("bad.proto", src).unwrap();
    assert_eq!(
        texts(&problems),
        vec![
            "enum names should be CamelCase; bad_name",
            "enum field names should be ALL_CAPS; x",
            "enum field names should be ALL_CAPS; zZ",
        ]
    );
    // enum field problems point at the field, not the enum
    assert_eq!(problems[1].position, 35);
}

#[test]
fn test_clean_file_has_no_problems() {
    assert_eq!(lint_file(testdata("addressbook.proto")).unwrap(), vec![]);
}

#[test]
fn test_sloppy_file() {
    let problems = lint_file(testdata("sloppy.proto")).unwrap();
    assert_eq!(
        texts(&problems),
        vec![
            "enum names should be CamelCase; corpus",
            "enum field names should be ALL_CAPS; universal",
            "message names should be CamelCase; search_request",
            "field names should be lower_snake_case; Query",
            "service names should be CamelCase; searchService",
            "rpc names should be CamelCase; do_search",
        ]
    );
}

#[test]
fn test_nested_declarations_are_checked() {
    let src = br#"syntax = "proto3";
message Outer {
  message inner { string BadName = 1; }
  enum kind { a = 0; }
}"#;
    let problems = Linter::new().lint("nested.proto", src).unwrap();
    assert_eq!(
        texts(&problems),
        vec![
            "enum names should be CamelCase; kind",
            "enum field names should be ALL_CAPS; a",
            "message names should be CamelCase; inner",
            "field names should be lower_snake_case; BadName",
        ]
    );
}

#[test]
fn test_selected_rules_only() {
    let linter = Linter::new().with_rules(&[Rule::RpcNames, Rule::EnumFieldNames]);
    let problems = linter
        .lint("sloppy.proto", &std::fs::read(testdata("sloppy.proto")).unwrap())
        .unwrap();
    assert_eq!(
        texts(&problems),
        vec![
            "enum field names should be ALL_CAPS; universal",
            "rpc names should be CamelCase; do_search",
        ]
    );
}

#[test]
fn test_parse_failure_is_an_error() {
    let err = lint("broken.proto", b"message M {}").unwrap_err();
    assert_eq!(err.offset(), 0);
    assert!(matches!(err.root(), ParseError::MissingPreamble { .. }));
    assert!(err.to_string().starts_with("broken.proto: "));
}

#[test]
fn test_missing_file_is_io_error() {
    let err = lint_file(testdata("nope.proto")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}

#[test]
fn test_deep_nesting_is_an_error() {
    let depth = pb::parser::grammar::MAX_NESTING + 1;
    let src = format!(
        "syntax = \"proto3\";\n{}{}",
        "message A {".repeat(depth),
        "}".repeat(depth)
    );
    let err = lint("deep.proto", src.as_bytes()).unwrap_err();
    assert!(matches!(err.root(), ParseError::NestingTooDeep { .. }));
}
