use std::path::PathBuf;

use super::run_common::{load_or_exit, parse_or_exit};

pub struct FulfillsArgs {
    pub hierarchy: PathBuf,
    pub provided: String,
    pub expected: String,
}

pub fn run(args: FulfillsArgs) {
    let hierarchy = load_or_exit(&args.hierarchy);
    let provided = parse_or_exit(&args.provided);
    let expected = parse_or_exit(&args.expected);

    let fulfills = hierarchy.type_fulfills_type(&provided, &expected);
    tracing::debug!(%provided, %expected, fulfills, "subtype check");
    println!("{fulfills}");

    if !fulfills {
        std::process::exit(1);
    }
}
