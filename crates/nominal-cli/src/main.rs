mod cli;
mod commands;
mod logging;

use cli::{DumpParams, FulfillsParams, NearestParams, ParseParams, build_cli};
use nominal_lib::hierarchy::Direction;

fn main() {
    logging::init_tracing();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("parse", m)) => {
            let params = ParseParams::from_matches(m);
            commands::parse::run(params.into());
        }
        Some(("fulfills", m)) => {
            let params = FulfillsParams::from_matches(m);
            commands::fulfills::run(params.into());
        }
        Some(("nca", m)) => {
            let params = NearestParams::from_matches(m, Direction::Ancestors);
            commands::nearest::run(params.into());
        }
        Some(("ncd", m)) => {
            let params = NearestParams::from_matches(m, Direction::Descendants);
            commands::nearest::run(params.into());
        }
        Some(("dump", m)) => {
            let params = DumpParams::from_matches(m);
            commands::dump::run(params.into());
        }
        _ => unreachable!("clap should have caught this"),
    }
}
