use std::io::Write;
use std::path::Path;

use super::hierarchy_loader::{LoadError, load_hierarchy};

fn manifest_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn loads_and_finalizes() {
    let file = manifest_file(
        r#"[
            {"name": "number"},
            {"name": "int", "parents": ["number"]},
            {"name": "list", "params": [{"name": "t", "variance": "covariant"}]}
        ]"#,
    );

    let hierarchy = load_hierarchy(file.path()).unwrap();

    assert!(hierarchy.is_finalized());
    assert_eq!(hierarchy.len(), 3);
    assert!(hierarchy.type_def("int").unwrap().has_parent(hierarchy.def_id("number").unwrap()));
}

#[test]
fn missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.json");

    let err = load_hierarchy(&path).unwrap_err();

    assert!(matches!(err, LoadError::Read { .. }));
    assert!(err.to_string().starts_with("failed to read '"));
}

#[test]
fn malformed_json() {
    let file = manifest_file(r#"[{"name": "number""#);

    let err = load_hierarchy(file.path()).unwrap_err();

    assert!(matches!(err, LoadError::Manifest { .. }));
    assert!(err.to_string().starts_with("invalid manifest '"));
}

#[test]
fn unknown_parent() {
    let file = manifest_file(r#"[{"name": "int", "parents": ["number"]}]"#);

    let err = load_hierarchy(file.path()).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"incompatible type: `number` is not a registered type");
}

#[test]
fn duplicate_declaration() {
    let file = manifest_file(r#"[{"name": "int"}, {"name": "int"}]"#);

    let err = load_hierarchy(file.path()).unwrap_err();

    insta::assert_snapshot!(err.to_string(), @"type `int` is already defined");
}

#[test]
fn unparsable_parent() {
    let file = manifest_file(r#"[{"name": "number"}, {"name": "int", "parents": ["number["]}]"#);

    let err = load_hierarchy(file.path()).unwrap_err();

    assert!(matches!(err, LoadError::Hierarchy(nominal_lib::Error::ParseError(_))));
}

#[test]
fn directory_is_not_a_manifest() {
    let dir = tempfile::tempdir().unwrap();

    let err = load_hierarchy(Path::new(dir.path())).unwrap_err();

    assert!(matches!(err, LoadError::Read { .. }));
}
