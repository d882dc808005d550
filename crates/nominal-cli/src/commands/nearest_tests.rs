use nominal_core::TypeInstance;
use nominal_lib::hierarchy::Direction;
use nominal_lib::{TypeHierarchy, parse_type};

use super::nearest::format_results;

const MANIFEST: &str = r#"[
    {"name": "number"},
    {"name": "int", "parents": ["number"]},
    {"name": "float", "parents": ["number"]},
    {"name": "collection", "params": [{"name": "t", "variance": "covariant"}]},
    {"name": "list", "params": [{"name": "t", "variance": "covariant"}], "parents": ["collection[t]"]},
    {"name": "set", "params": [{"name": "t", "variance": "covariant"}], "parents": ["collection[t]"]}
]"#;

fn hierarchy() -> TypeHierarchy {
    let decls = nominal_core::parse_manifest(MANIFEST).unwrap();
    TypeHierarchy::from_manifest(&decls).unwrap()
}

fn query(direction: Direction, types: &[&str]) -> Vec<TypeInstance> {
    let operands: Vec<_> = types.iter().map(|t| parse_type(t).unwrap()).collect();
    hierarchy().nearest_common(&operands, direction).unwrap()
}

#[test]
fn text_lines() {
    let results = query(Direction::Ancestors, &["list[int]", "set[float]"]);

    let output = format_results(&results, false).unwrap();

    insta::assert_snapshot!(output, @"collection[number]");
}

#[test]
fn text_multiple_results() {
    let results = vec![parse_type("int").unwrap(), parse_type("t <: number").unwrap()];

    let output = format_results(&results, false).unwrap();

    insta::assert_snapshot!(output, @r"
    int
    t <: number
    ");
}

#[test]
fn text_empty() {
    let results = query(Direction::Descendants, &["int", "float"]);

    assert!(results.is_empty());
    assert_eq!(format_results(&results, false).unwrap(), "");
}

#[test]
fn json_instances() {
    let results = query(Direction::Ancestors, &["list[int]", "list[float]"]);

    let output = format_results(&results, true).unwrap();

    insta::assert_snapshot!(output, @r#"
    [
      {
        "kind": "explicit",
        "name": "list",
        "params": [
          {
            "kind": "explicit",
            "name": "number"
          }
        ]
      }
    ]
    "#);
}
