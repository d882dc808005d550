//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Hierarchy manifest (-H/--hierarchy).
pub fn hierarchy_arg() -> Arg {
    Arg::new("hierarchy")
        .short('H')
        .long("hierarchy")
        .value_name("MANIFEST")
        .value_parser(value_parser!(PathBuf))
        .required(true)
        .help("JSON manifest declaring the types (`-` reads stdin)")
}

/// One or more type expressions (positional).
pub fn types_arg() -> Arg {
    Arg::new("types")
        .value_name("TYPE")
        .num_args(1..)
        .required(true)
        .help("Type expressions, e.g. 'list[int]' or 't <: number'")
}

/// Provided type for a subtyping check (positional).
pub fn provided_arg() -> Arg {
    Arg::new("provided")
        .value_name("TYPE")
        .required(true)
        .help("Type being provided")
}

/// Expected type for a subtyping check (positional).
pub fn expected_arg() -> Arg {
    Arg::new("expected")
        .value_name("EXPECTED")
        .required(true)
        .help("Type expected at the use site")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print results as JSON")
}
