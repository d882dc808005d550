use nominal_core::TypeInstance;
use nominal_lib::{Error, parse_type};

pub struct ParseArgs {
    pub types: Vec<String>,
    pub json: bool,
}

/// Parses every expression before printing so a bad one reports all diagnostics.
pub fn run(args: ParseArgs) {
    let mut parsed: Vec<TypeInstance> = Vec::with_capacity(args.types.len());
    let mut failed = false;

    for text in &args.types {
        match parse_type(text) {
            Ok(instance) => parsed.push(instance),
            Err(Error::ParseError(e)) => {
                eprint!("{}", e.render(Some("expr")));
                failed = true;
            }
            Err(e) => {
                eprintln!("error: {}", e);
                failed = true;
            }
        }
    }

    if failed {
        std::process::exit(1);
    }

    if args.json {
        match serde_json::to_string_pretty(&parsed) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    for instance in &parsed {
        println!("{instance}");
    }
}
