use indoc::indoc;
use nominal_core::{ParamDef, TypeInstance, parse_manifest};

use super::TypeHierarchy;
use crate::Error;
use crate::test_utils::ty;

fn scenario_a() -> TypeHierarchy {
    let mut hierarchy = TypeHierarchy::expect_plain(&["base", "mid", "leaf"], &[("leaf", "mid"), ("mid", "base")]);
    hierarchy.finalize();
    hierarchy
}

// ========== Lifecycle ==========

#[test]
fn queries_require_finalize() {
    let hierarchy = TypeHierarchy::expect_plain(&["base", "leaf"], &[("leaf", "base")]);

    assert_eq!(
        hierarchy.nearest_common_ancestors(&[ty("leaf"), ty("base")]),
        Err(Error::NotFinalized)
    );
    assert_eq!(
        hierarchy.nearest_common_descendants(&[ty("leaf"), ty("base")]),
        Err(Error::NotFinalized)
    );
    assert!(hierarchy.expect_fulfills("leaf", "base"));
    assert!(!hierarchy.expect_fulfills("base", "leaf"));
}

#[test]
fn finalized_hierarchy_rejects_mutation() {
    let mut hierarchy = scenario_a();

    assert_eq!(
        hierarchy.add_type_def("other", vec![]),
        Err(Error::AlreadyFinalized)
    );
    assert_eq!(
        hierarchy.add_parent("base", ty("leaf")),
        Err(Error::AlreadyFinalized)
    );
}

#[test]
fn finalize_twice_is_a_no_op() {
    let mut hierarchy = scenario_a();
    hierarchy.finalize();

    assert!(hierarchy.is_finalized());
    assert_eq!(hierarchy.expect_nca(&["leaf", "base"]), "base");
}

#[test]
fn empty_and_single_operand() {
    let hierarchy = scenario_a();

    assert_eq!(hierarchy.nearest_common_ancestors(&[]), Ok(vec![]));
    assert_eq!(hierarchy.expect_nca(&["mid"]), "mid");
    assert_eq!(hierarchy.expect_ncd(&["mid"]), "mid");
    assert_eq!(hierarchy.expect_nca(&["t"]), "t");
}

#[test]
fn single_raw_operand_is_normalized() {
    let hierarchy = TypeHierarchy::expect_collections();

    assert_eq!(hierarchy.expect_nca(&["list"]), "list[_]");
    assert_eq!(hierarchy.expect_ncd(&["pair"]), "pair[_, _]");
    assert_eq!(hierarchy.expect_nca(&["list[int]"]), "list[int]");
}

#[test]
fn finalized_hierarchy_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<TypeHierarchy>();
}

// ========== Declaration errors ==========

#[test]
fn duplicate_type_def() {
    let mut hierarchy = TypeHierarchy::new();
    hierarchy.add_type_def("int", vec![]).unwrap();

    let err = hierarchy.add_type_def("int", vec![]).unwrap_err();
    insta::assert_snapshot!(err, @"type `int` is already defined");
}

#[test]
fn duplicate_param_names() {
    let mut hierarchy = TypeHierarchy::new();
    let params = vec![ParamDef::covariant("t"), ParamDef::invariant("t")];

    let err = hierarchy.add_type_def("pair", params).unwrap_err();
    insta::assert_snapshot!(err, @"type `pair` declares parameter `t` more than once");
    assert!(hierarchy.is_empty());
}

#[test]
fn parent_of_undefined_type() {
    let mut hierarchy = TypeHierarchy::expect_plain(&["base"], &[]);

    let err = hierarchy.add_parent("leaf", ty("base")).unwrap_err();
    assert_eq!(err, Error::UndefinedType("leaf".into()));
}

#[test]
fn unregistered_parent() {
    let mut hierarchy = TypeHierarchy::expect_plain(&["leaf"], &[]);

    let err = hierarchy.add_parent("leaf", ty("base")).unwrap_err();
    insta::assert_snapshot!(err, @"incompatible type: `base` is not a registered type");
}

#[test]
fn generic_parent() {
    let mut hierarchy = TypeHierarchy::expect_plain(&["leaf"], &[]);

    let err = hierarchy.add_parent("leaf", ty("t")).unwrap_err();
    insta::assert_snapshot!(err, @"incompatible type: parent of `leaf` must be an explicit type, found `t`");
}

#[test]
fn parent_with_wrong_arity() {
    let mut hierarchy = TypeHierarchy::new();
    hierarchy
        .add_type_def("collection", vec![ParamDef::covariant("t")])
        .unwrap();
    hierarchy
        .add_type_def("list", vec![ParamDef::covariant("t")])
        .unwrap();

    let err = hierarchy
        .add_parent("list", ty("collection[t, t]"))
        .unwrap_err();
    insta::assert_snapshot!(err, @"incompatible type: `collection[t, t]` has 2 parameters but `collection` declares 1");
}

#[test]
fn parent_with_foreign_generic() {
    let mut hierarchy = TypeHierarchy::new();
    hierarchy
        .add_type_def("collection", vec![ParamDef::covariant("t")])
        .unwrap();
    hierarchy
        .add_type_def("list", vec![ParamDef::covariant("t")])
        .unwrap();

    let err = hierarchy.add_parent("list", ty("collection[u]")).unwrap_err();
    insta::assert_snapshot!(err, @"incompatible type: `u` is not a parameter of `list`");

    let err = hierarchy
        .add_parent("list", ty("collection[t <: list]"))
        .unwrap_err();
    insta::assert_snapshot!(err, @"incompatible type: parent of `list` cannot contain the bounded generic `t <: list[_]`");
}

#[test]
fn cyclic_parent() {
    let mut hierarchy = TypeHierarchy::expect_plain(&["base", "mid", "leaf"], &[("leaf", "mid"), ("mid", "base")]);

    let err = hierarchy.add_parent("base", ty("leaf")).unwrap_err();
    insta::assert_snapshot!(err, @"`leaf` cannot be a parent of `base`: `base` is already one of its ancestors");

    let err = hierarchy.add_parent("mid", ty("mid")).unwrap_err();
    assert_eq!(
        err,
        Error::CyclicParent {
            child: "mid".into(),
            parent: "mid".into()
        }
    );
}

#[test]
fn conflicting_parent_instantiation() {
    let mut hierarchy = TypeHierarchy::new();
    hierarchy.add_type_def("int", vec![]).unwrap();
    hierarchy
        .add_type_def("collection", vec![ParamDef::invariant("t")])
        .unwrap();
    hierarchy
        .add_type_def("list", vec![ParamDef::invariant("t")])
        .unwrap();
    hierarchy.add_parent("list", ty("collection[t]")).unwrap();

    let err = hierarchy
        .add_parent("list", ty("collection[int]"))
        .unwrap_err();
    insta::assert_snapshot!(err, @"type `list` already inherits `collection[t]` and cannot also inherit `collection[int]`");
}

#[test]
fn conflicting_inherited_instantiation() {
    let mut hierarchy = TypeHierarchy::new();
    hierarchy.add_type_def("int", vec![]).unwrap();
    for name in ["collection", "left", "right", "both"] {
        hierarchy
            .add_type_def(name, vec![ParamDef::covariant("t")])
            .unwrap();
    }
    hierarchy.add_parent("left", ty("collection[t]")).unwrap();
    hierarchy.add_parent("right", ty("collection[int]")).unwrap();
    hierarchy.add_parent("both", ty("left[t]")).unwrap();

    let err = hierarchy.add_parent("both", ty("right[t]")).unwrap_err();
    insta::assert_snapshot!(err, @"type `both` already inherits `collection[t]` and cannot also inherit `collection[int]`");

    let both = hierarchy.type_def("both").unwrap();
    let right = hierarchy.def_id("right").unwrap();
    assert!(!both.has_parent(right));
    assert!(!both.has_ancestor(right));
}

#[test]
fn raw_parent_merges_with_inherited_instantiation() {
    let mut hierarchy = TypeHierarchy::new();
    for name in ["collection", "list", "olist", "ring"] {
        hierarchy
            .add_type_def(name, vec![ParamDef::covariant("t")])
            .unwrap();
    }
    hierarchy.add_parent("list", ty("collection[t]")).unwrap();
    hierarchy.add_parent("olist", ty("list[t]")).unwrap();

    hierarchy.add_parent("olist", ty("collection")).unwrap();

    let collection = hierarchy.def_id("collection").unwrap();
    let olist = hierarchy.type_def("olist").unwrap();
    insta::assert_snapshot!(olist.parent_instance(collection).unwrap(), @"collection[t]");
    insta::assert_snapshot!(olist.ancestor_instance(collection).unwrap(), @"collection[t]");

    hierarchy.add_parent("ring", ty("collection")).unwrap();
    hierarchy.add_parent("ring", ty("collection[t]")).unwrap();

    let ring = hierarchy.type_def("ring").unwrap();
    assert_eq!(ring.parents().count(), 1);
    insta::assert_snapshot!(ring.parent_instance(collection).unwrap(), @"collection[t]");
    insta::assert_snapshot!(ring.ancestor_instance(collection).unwrap(), @"collection[t]");
}

// ========== Compatibility ==========

#[test]
fn compatibility() {
    let hierarchy = TypeHierarchy::expect_collections();
    let check = |source: &str| hierarchy.type_is_compatible(&ty(source));

    assert!(check("int"));
    assert!(check("list[int]"));
    assert!(check("list"));
    assert!(check("t"));
    assert!(check("int <: t <: number"));
    assert!(check("t <: list[number]"));

    assert!(!check("foo"));
    assert!(!check("list[foo]"));
    assert!(!check("list[int, int]"));
    assert!(!check("int[int]"));
    assert!(!check("t <: foo"));
    assert!(!check("number <: t <: int"));
    assert!(!check("float <: t <: int"));
}

#[test]
fn invalid_operand_is_rejected() {
    let hierarchy = TypeHierarchy::expect_collections();

    let err = hierarchy
        .nearest_common_descendants(&[ty("int"), ty("float <: t <: int")])
        .unwrap_err();
    insta::assert_snapshot!(err, @"incompatible type: lower bound `float` of `float <: t <: int` does not fulfill upper bound `int`");

    let err = hierarchy
        .nearest_common_ancestors(&[ty("int"), ty("bogus")])
        .unwrap_err();
    insta::assert_snapshot!(err, @"incompatible type: `bogus` is not a registered type");
}

#[test]
fn ancestor_query_ignores_bound_range() {
    let hierarchy = TypeHierarchy::expect_collections();
    let operands = [ty("number <: t <: int"), ty("int")];

    assert_eq!(hierarchy.expect_nca(&["number <: t <: int", "int"]), "number");
    assert_eq!(hierarchy.expect_nca(&["list[number <: t <: int]", "list[int]"]), "list[number]");

    let err = hierarchy.nearest_common_descendants(&operands).unwrap_err();
    insta::assert_snapshot!(err, @"incompatible type: lower bound `number` of `number <: t <: int` does not fulfill upper bound `int`");
}

#[test]
fn nested_bound_range_is_checked() {
    let hierarchy = TypeHierarchy::expect_collections();

    assert!(!hierarchy.type_is_compatible(&ty("list[float <: t <: int]")));
    assert!(!hierarchy.type_is_compatible(&ty("t <: list[float <: u <: int]")));
    assert!(hierarchy.type_is_compatible(&ty("t <: list[int <: u <: number]")));
}

// ========== Subtyping ==========

#[test]
fn scenario_chain() {
    let hierarchy = scenario_a();

    assert_eq!(hierarchy.expect_nca(&["leaf", "base"]), "base");
    assert_eq!(hierarchy.expect_ncd(&["leaf", "base"]), "leaf");
    assert_eq!(hierarchy.expect_nca(&["leaf", "mid", "base"]), "base");
    assert!(hierarchy.expect_fulfills("leaf", "base"));
    assert!(hierarchy.expect_fulfills("leaf", "mid"));
    assert!(!hierarchy.expect_fulfills("base", "leaf"));
}

#[test]
fn fulfills_matches_ancestor_membership() {
    let hierarchy = TypeHierarchy::expect_plain(
        &["gp", "pa", "pb", "c", "x", "lone"],
        &[("pa", "gp"), ("pb", "gp"), ("c", "pa"), ("c", "pb"), ("x", "pa")],
    );

    for a in hierarchy.type_defs() {
        for b in hierarchy.type_defs() {
            let fulfills = hierarchy.type_fulfills_type(
                &TypeInstance::named(a.name()),
                &TypeInstance::named(b.name()),
            );
            assert_eq!(fulfills, a.has_ancestor(b.id()), "{} <: {}", a.name(), b.name());
        }
    }
}

#[test]
fn fulfills_parameterized() {
    let hierarchy = TypeHierarchy::expect_collections();

    assert!(hierarchy.expect_fulfills("list[int]", "collection[number]"));
    assert!(hierarchy.expect_fulfills("listset[int]", "set[int]"));
    assert!(hierarchy.expect_fulfills("list", "collection"));
    assert!(!hierarchy.expect_fulfills("list[number]", "collection[int]"));
    assert!(!hierarchy.expect_fulfills("collection[int]", "list[int]"));
}

#[test]
fn fulfills_respects_variance() {
    let hierarchy = TypeHierarchy::expect_collections();

    assert!(hierarchy.expect_fulfills("consumer[number]", "consumer[int]"));
    assert!(!hierarchy.expect_fulfills("consumer[int]", "consumer[number]"));
    assert!(hierarchy.expect_fulfills("cell[int]", "cell[int]"));
    assert!(!hierarchy.expect_fulfills("cell[int]", "cell[number]"));
    assert!(hierarchy.expect_fulfills("cell[int]", "cell[t]"));
}

#[test]
fn fulfills_through_reordered_params() {
    let hierarchy = TypeHierarchy::expect_collections();

    assert!(hierarchy.expect_fulfills("flipped[int, float]", "pair[float, int]"));
    assert!(!hierarchy.expect_fulfills("flipped[int, float]", "pair[int, float]"));
}

#[test]
fn fulfills_with_generics() {
    let hierarchy = TypeHierarchy::expect_collections();

    assert!(hierarchy.expect_fulfills("int", "t"));
    assert!(hierarchy.expect_fulfills("int", "t <: number"));
    assert!(!hierarchy.expect_fulfills("float", "t <: int"));
    assert!(hierarchy.expect_fulfills("number", "t >: int"));
    assert!(!hierarchy.expect_fulfills("int", "t >: number"));

    assert!(hierarchy.expect_fulfills("t", "int"));
    assert!(hierarchy.expect_fulfills("t >: int", "number"));
    assert!(hierarchy.expect_fulfills("t <: number", "int"));
    assert!(!hierarchy.expect_fulfills("t <: int", "float"));
}

#[test]
fn fulfills_unregistered_is_false() {
    let hierarchy = TypeHierarchy::expect_collections();

    assert!(!hierarchy.expect_fulfills("bogus", "number"));
    assert!(!hierarchy.expect_fulfills("int", "bogus"));
}

// ========== Manifest ==========

#[test]
fn manifest_builds_finalized_hierarchy() {
    let hierarchy = TypeHierarchy::expect_collections();

    assert!(hierarchy.is_finalized());
    assert_eq!(hierarchy.len(), 11);
    assert!(hierarchy.expect_fulfills("int", "number"));
}

#[test]
fn manifest_parent_declared_later() {
    let hierarchy = TypeHierarchy::expect_manifest(indoc! {r#"
        [
          { "name": "int", "parents": ["number"] },
          { "name": "number" }
        ]
    "#});

    assert!(hierarchy.expect_fulfills("int", "number"));
}

#[test]
fn manifest_with_bad_parent_expression() {
    let decls = parse_manifest(indoc! {r#"
        [
          { "name": "int", "parents": ["1number"] }
        ]
    "#})
    .unwrap();

    let err = TypeHierarchy::from_manifest(&decls).unwrap_err();
    insta::assert_snapshot!(err, @"invalid type expression `1number`: unexpected characters `1`");
}

#[test]
fn manifest_with_duplicate_type() {
    let decls = parse_manifest(indoc! {r#"
        [
          { "name": "int" },
          { "name": "int" }
        ]
    "#})
    .unwrap();

    assert_eq!(
        TypeHierarchy::from_manifest(&decls).unwrap_err(),
        Error::DuplicateTypeDef("int".into())
    );
}
