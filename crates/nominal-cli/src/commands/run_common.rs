//! Shared logic for commands that load a hierarchy or parse type expressions.

use std::path::Path;

use nominal_core::TypeInstance;
use nominal_lib::{Error, TypeHierarchy, parse_type};

use super::hierarchy_loader::load_hierarchy;

/// Load and finalize the manifest, or exit with the error.
pub fn load_or_exit(path: &Path) -> TypeHierarchy {
    match load_hierarchy(path) {
        Ok(hierarchy) => hierarchy,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Parse one type expression, or print its diagnostics and exit.
pub fn parse_or_exit(text: &str) -> TypeInstance {
    match parse_type(text) {
        Ok(instance) => instance,
        Err(Error::ParseError(e)) => {
            eprint!("{}", e.render(Some("expr")));
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

pub fn parse_all_or_exit(texts: &[String]) -> Vec<TypeInstance> {
    texts.iter().map(|text| parse_or_exit(text)).collect()
}
