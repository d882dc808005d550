use crate::{ParamDef, Variance, parse_manifest};

const SAMPLE_JSON: &str = r#"[
    {
        "name": "collection",
        "params": [{"name": "A", "variance": "covariant"}]
    },
    {
        "name": "list",
        "params": [{"name": "A", "variance": "covariant"}],
        "parents": ["collection[A]"]
    },
    {
        "name": "consumer",
        "params": [{"name": "A", "variance": "contravariant"}]
    },
    {
        "name": "cell",
        "params": [{"name": "A"}]
    },
    {
        "name": "int"
    }
]"#;

#[test]
fn parse_manifest_declarations() {
    let decls = parse_manifest(SAMPLE_JSON).unwrap();

    assert_eq!(decls.len(), 5);
    assert_eq!(decls[1].name, "list");
    assert_eq!(decls[1].parents, vec!["collection[A]".to_string()]);
    assert_eq!(decls[2].params, vec![ParamDef::contravariant("A")]);
}

#[test]
fn missing_fields_default() {
    let decls = parse_manifest(SAMPLE_JSON).unwrap();

    let int = &decls[4];
    assert!(int.params.is_empty());
    assert!(int.parents.is_empty());
}

#[test]
fn variance_defaults_to_invariant() {
    let decls = parse_manifest(SAMPLE_JSON).unwrap();

    assert_eq!(decls[3].params[0].variance, Variance::Invariant);
}

#[test]
fn unknown_variance_is_rejected() {
    let json = r#"[{"name": "box", "params": [{"name": "A", "variance": "sideways"}]}]"#;

    assert!(parse_manifest(json).is_err());
}

#[test]
fn manifest_must_be_an_array() {
    assert!(parse_manifest(r#"{"name": "int"}"#).is_err());
}
