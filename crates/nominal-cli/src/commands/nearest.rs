use std::fmt::Write;
use std::path::PathBuf;

use nominal_core::TypeInstance;
use nominal_lib::hierarchy::Direction;

use super::run_common::{load_or_exit, parse_all_or_exit};

pub struct NearestArgs {
    pub hierarchy: PathBuf,
    pub types: Vec<String>,
    pub json: bool,
    pub direction: Direction,
}

pub fn run(args: NearestArgs) {
    let hierarchy = load_or_exit(&args.hierarchy);
    let operands = parse_all_or_exit(&args.types);

    let results = match hierarchy.nearest_common(&operands, args.direction) {
        Ok(results) => results,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    match format_results(&results, args.json) {
        Ok(output) => print!("{output}"),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}

/// One result per line, or a JSON array of instances.
pub fn format_results(results: &[TypeInstance], json: bool) -> Result<String, serde_json::Error> {
    if json {
        let mut output = serde_json::to_string_pretty(results)?;
        output.push('\n');
        return Ok(output);
    }

    let mut output = String::new();
    for instance in results {
        let _ = writeln!(output, "{instance}");
    }
    Ok(output)
}
