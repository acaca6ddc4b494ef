use super::*;
use clap::Parser;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

const MODEL: &str = r#"{
    "modules": [{ "name": "Core" }],
    "rootType": "Object",
    "types": [
        { "name": "Object", "kind": "class", "module": "Core" },
        { "name": "Int32", "kind": "struct", "module": "Core" },
        { "name": "Void", "kind": "struct", "module": "Core" },
        {
            "name": "Base",
            "kind": "class",
            "module": "Core",
            "bases": ["Object"],
            "members": [
                { "name": "Foo", "kind": "field", "returnType": "Int32" },
                { "name": "Guard", "kind": "field", "accessibility": "protected", "returnType": "Int32" },
                { "name": "Run", "kind": "method", "returnType": "Void", "parameters": [{ "type": "Int32" }] },
                { "name": "Run", "kind": "method", "returnType": "Void" },
                { "name": "Item", "kind": "property", "indexer": true, "returnType": "Int32",
                  "parameters": [{ "type": "Int32" }] }
            ]
        },
        { "name": "Inner", "kind": "class", "module": "Core", "declaringType": "Base" },
        { "name": "Derived", "kind": "class", "module": "Core", "bases": ["Base"] }
    ]
}"#;

fn project(config: Option<&str>) -> TempDir {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::write(dir.path().join("model.json"), MODEL).expect("write model");
    if let Some(config) = config {
        std::fs::write(dir.path().join("nomen.json"), config).expect("write config");
    }
    dir
}

fn run_in(dir: &Path, argv: &[&str]) -> Result<Report> {
    let mut full = vec!["nomen"];
    full.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full).expect("args should parse");
    run(&args, dir).map(|output| output.report)
}

#[test]
fn lookup_field_through_base() {
    let dir = project(None);

    let report = run_in(dir.path(), &["--model", "model.json", "Derived", "Foo"]).expect("lookup");

    assert_eq!(report.kind, "member");
    assert!(report.found);
    assert!(!report.ambiguous);
    assert_eq!(report.entries, vec!["Base.Foo: Int32".to_string()]);
    assert_eq!(report.return_type.as_deref(), Some("Int32"));
}

#[test]
fn lookup_method_group_in_invocation_position() {
    let dir = project(None);

    let report =
        run_in(dir.path(), &["-m", "model.json", "--invoke", "Derived", "Run"]).expect("lookup");

    assert_eq!(report.kind, "methodGroup");
    assert_eq!(
        report.entries,
        vec!["Base.Run(Int32): Void".to_string(), "Base.Run(): Void".to_string()]
    );
    assert!(report.return_type.is_none());
}

#[test]
fn unknown_member_is_not_found() {
    let dir = project(None);

    let report = run_in(dir.path(), &["-m", "model.json", "Derived", "Nope"]).expect("lookup");

    assert_eq!(report.kind, "unknownMember");
    assert!(!report.found);
    assert!(report.entries.is_empty());
}

#[test]
fn config_supplies_model_and_context() {
    let dir = project(Some(
        r#"{ "model": "model.json", "context": { "currentType": "Derived", "currentModule": "Core" } }"#,
    ));

    let inside = run_in(dir.path(), &["Derived", "Guard"]).expect("lookup");
    let outside = run_in(dir.path(), &["--currentType", "Object", "Derived", "Guard"])
        .expect("lookup");

    assert_eq!(inside.kind, "member");
    assert_eq!(inside.entries, vec!["Base.Guard: Int32".to_string()]);
    assert_eq!(outside.kind, "unknownMember");
}

#[test]
fn type_query_finds_nested_type() {
    let dir = project(None);

    let report =
        run_in(dir.path(), &["-m", "model.json", "-q", "type", "Base", "Inner"]).expect("lookup");

    assert_eq!(report.kind, "type");
    assert_eq!(report.entries, vec!["Base.Inner".to_string()]);
}

#[test]
fn list_queries() {
    let dir = project(None);

    let indexers =
        run_in(dir.path(), &["-m", "model.json", "-q", "indexers", "Derived"]).expect("indexers");
    let members =
        run_in(dir.path(), &["-m", "model.json", "-q", "members", "Derived"]).expect("members");

    assert_eq!(indexers.kind, "indexers");
    assert_eq!(indexers.entries, vec!["Base.Item[Int32]: Int32".to_string()]);
    assert_eq!(members.kind, "members");
    assert!(members.entries.contains(&"Base.Foo: Int32".to_string()));
    assert!(!members.entries.contains(&"Base.Guard: Int32".to_string()));
}

#[test]
fn json_report_shape() {
    let dir = project(None);

    let report = run_in(dir.path(), &["-m", "model.json", "-a", "0", "Derived", "Foo"])
        .expect("lookup");
    let json: Value = serde_json::to_value(&report).expect("serialize");

    assert_eq!(json["query"], "lookup");
    assert_eq!(json["receiver"], "Derived");
    assert_eq!(json["name"], "Foo");
    assert_eq!(json["kind"], "member");
    assert_eq!(json["found"], true);
    assert_eq!(json["returnType"], "Int32");
}

#[test]
fn errors_name_the_problem() {
    let dir = project(None);

    let missing_name = run_in(dir.path(), &["-m", "model.json", "Derived"])
        .expect_err("lookup without a name");
    let missing_receiver = run_in(dir.path(), &["-m", "model.json", "Nowhere", "Foo"])
        .expect_err("unknown receiver");
    let missing_root = run_in(dir.path(), &["-m", "model.json", "--rootType", "Nope", "Base", "Foo"])
        .expect_err("unknown root");
    let missing_model = run_in(dir.path(), &["-m", "absent.json", "Base", "Foo"])
        .expect_err("missing model file");

    assert!(missing_name.to_string().contains("a name is required"));
    assert!(missing_receiver.to_string().contains("unknown receiver type `Nowhere`"));
    assert!(missing_root.to_string().contains("unknown root type `Nope`"));
    assert!(missing_model.to_string().contains("failed to read model"));
}
