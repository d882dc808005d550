//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("nominal")
        .about("Subtyping and nearest common ancestor/descendant queries over a type hierarchy")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(parse_command())
        .subcommand(fulfills_command())
        .subcommand(nca_command())
        .subcommand(ncd_command())
        .subcommand(dump_command())
}

/// Parse type expressions without a hierarchy.
pub fn parse_command() -> Command {
    Command::new("parse")
        .about("Parse type expressions and print them back")
        .after_help(
            r#"EXAMPLES:
  nominal parse 'list[int]'
  nominal parse 'int <: t <: number' --json"#,
        )
        .arg(types_arg())
        .arg(json_arg())
}

/// Check whether one type can be used where another is expected.
pub fn fulfills_command() -> Command {
    Command::new("fulfills")
        .about("Check whether TYPE can be used where EXPECTED is expected")
        .after_help(
            r#"Prints `true` or `false`; exits with status 1 on `false`.

EXAMPLES:
  nominal fulfills -H types.json 'list[int]' 'collection[number]'"#,
        )
        .arg(hierarchy_arg())
        .arg(provided_arg())
        .arg(expected_arg())
}

/// Nearest common ancestors.
pub fn nca_command() -> Command {
    Command::new("nca")
        .about("Print the nearest common ancestors of the given types")
        .after_help(
            r#"EXAMPLES:
  nominal nca -H types.json 'list[int]' 'set[float]'"#,
        )
        .arg(hierarchy_arg())
        .arg(types_arg())
        .arg(json_arg())
}

/// Nearest common descendants.
pub fn ncd_command() -> Command {
    Command::new("ncd")
        .about("Print the nearest common descendants of the given types")
        .after_help(
            r#"EXAMPLES:
  nominal ncd -H types.json 'list[int]' 'set[int]'"#,
        )
        .arg(hierarchy_arg())
        .arg(types_arg())
        .arg(json_arg())
}

/// Show every declared type with its parents and ancestors.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show every declared type with its parents and ancestors")
        .arg(hierarchy_arg())
        .arg(json_arg())
}
