//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! This module contains:
//! - `*Params` structs that mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors
//! - `Into<*Args>` impls to bridge dispatch → command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use nominal_lib::hierarchy::Direction;

use crate::commands::dump::DumpArgs;
use crate::commands::fulfills::FulfillsArgs;
use crate::commands::nearest::NearestArgs;
use crate::commands::parse::ParseArgs;

pub struct ParseParams {
    pub types: Vec<String>,
    pub json: bool,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            types: get_types(m),
            json: m.get_flag("json"),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        Self {
            types: p.types,
            json: p.json,
        }
    }
}

pub struct FulfillsParams {
    pub hierarchy: PathBuf,
    pub provided: String,
    pub expected: String,
}

impl FulfillsParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            hierarchy: get_hierarchy(m),
            provided: m.get_one::<String>("provided").cloned().unwrap_or_default(),
            expected: m.get_one::<String>("expected").cloned().unwrap_or_default(),
        }
    }
}

impl From<FulfillsParams> for FulfillsArgs {
    fn from(p: FulfillsParams) -> Self {
        Self {
            hierarchy: p.hierarchy,
            provided: p.provided,
            expected: p.expected,
        }
    }
}

/// Shared by `nca` and `ncd`; the subcommand picks the direction.
pub struct NearestParams {
    pub hierarchy: PathBuf,
    pub types: Vec<String>,
    pub json: bool,
    pub direction: Direction,
}

impl NearestParams {
    pub fn from_matches(m: &ArgMatches, direction: Direction) -> Self {
        Self {
            hierarchy: get_hierarchy(m),
            types: get_types(m),
            json: m.get_flag("json"),
            direction,
        }
    }
}

impl From<NearestParams> for NearestArgs {
    fn from(p: NearestParams) -> Self {
        Self {
            hierarchy: p.hierarchy,
            types: p.types,
            json: p.json,
            direction: p.direction,
        }
    }
}

pub struct DumpParams {
    pub hierarchy: PathBuf,
    pub json: bool,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            hierarchy: get_hierarchy(m),
            json: m.get_flag("json"),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            hierarchy: p.hierarchy,
            json: p.json,
        }
    }
}

fn get_hierarchy(m: &ArgMatches) -> PathBuf {
    m.get_one::<PathBuf>("hierarchy").cloned().unwrap_or_default()
}

fn get_types(m: &ArgMatches) -> Vec<String> {
    m.get_many::<String>("types")
        .map(|values| values.cloned().collect())
        .unwrap_or_default()
}
