//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Required arguments are enforced by clap
//! 2. Params extraction: correct fields are extracted from ArgMatches
//! 3. nca/ncd share one params type and differ only by direction

use std::path::PathBuf;

use nominal_lib::hierarchy::Direction;

use super::*;
use crate::cli::commands::{
    dump_command, fulfills_command, nca_command, ncd_command, parse_command,
};

#[test]
fn parse_collects_every_expression() {
    let m = parse_command()
        .try_get_matches_from(["parse", "list[int]", "t <: number", "--json"])
        .unwrap();
    let params = ParseParams::from_matches(&m);

    assert_eq!(params.types, ["list[int]", "t <: number"]);
    assert!(params.json);
}

#[test]
fn parse_requires_an_expression() {
    let result = parse_command().try_get_matches_from(["parse"]);

    assert!(result.is_err());
}

#[test]
fn fulfills_extracts_both_types() {
    let m = fulfills_command()
        .try_get_matches_from(["fulfills", "-H", "types.json", "list[int]", "collection[number]"])
        .unwrap();
    let params = FulfillsParams::from_matches(&m);

    assert_eq!(params.hierarchy, PathBuf::from("types.json"));
    assert_eq!(params.provided, "list[int]");
    assert_eq!(params.expected, "collection[number]");
}

#[test]
fn fulfills_rejects_missing_expected() {
    let result = fulfills_command().try_get_matches_from(["fulfills", "-H", "types.json", "int"]);

    assert!(result.is_err());
}

#[test]
fn hierarchy_is_required() {
    let result = nca_command().try_get_matches_from(["nca", "int", "float"]);

    assert!(result.is_err());
}

#[test]
fn hierarchy_accepts_stdin_marker() {
    let m = ncd_command()
        .try_get_matches_from(["ncd", "--hierarchy", "-", "int"])
        .unwrap();
    let params = NearestParams::from_matches(&m, Direction::Descendants);

    assert_eq!(params.hierarchy, PathBuf::from("-"));
}

#[test]
fn nca_and_ncd_share_params() {
    let args = ["-H", "types.json", "list[int]", "set[float]"];

    let nca = nca_command()
        .try_get_matches_from(std::iter::once("nca").chain(args))
        .unwrap();
    let ncd = ncd_command()
        .try_get_matches_from(std::iter::once("ncd").chain(args))
        .unwrap();
    let nca = NearestParams::from_matches(&nca, Direction::Ancestors);
    let ncd = NearestParams::from_matches(&ncd, Direction::Descendants);

    assert_eq!(nca.types, ncd.types);
    assert_eq!(nca.hierarchy, ncd.hierarchy);
    assert!(!nca.json);
    assert_eq!(nca.direction, Direction::Ancestors);
    assert_eq!(ncd.direction, Direction::Descendants);
}

#[test]
fn dump_json_flag() {
    let m = dump_command()
        .try_get_matches_from(["dump", "-H", "types.json", "--json"])
        .unwrap();
    let params = DumpParams::from_matches(&m);

    assert_eq!(params.hierarchy, PathBuf::from("types.json"));
    assert!(params.json);
}

#[test]
fn dump_takes_no_types() {
    let result = dump_command().try_get_matches_from(["dump", "-H", "types.json", "int"]);

    assert!(result.is_err());
}

#[test]
fn subcommand_is_required() {
    let result = build_cli().try_get_matches_from(["nominal"]);

    assert!(result.is_err());
}
