//! Tracing setup for the CLI.
//!
//! The subscriber is only installed when `NOMINAL_LOG` (or `RUST_LOG`) is set:
//!
//! ```bash
//! NOMINAL_LOG=debug nominal nca -H types.json 'list[int]' 'set[int]'
//! NOMINAL_LOG="nominal_lib::hierarchy=trace" nominal dump -H types.json
//! ```
//!
//! Output goes to stderr so it never mixes with query results on stdout.

use tracing_subscriber::EnvFilter;

/// Build an `EnvFilter` from `NOMINAL_LOG`, falling back to `RUST_LOG`.
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("NOMINAL_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Install the global fmt subscriber. Does nothing when no log variable is set.
pub fn init_tracing() {
    let has_nominal_log = std::env::var("NOMINAL_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_nominal_log && !has_rust_log {
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(build_filter())
        .with_writer(std::io::stderr)
        .init();
}
