//! tsh CLI entry point.
//!
//! Usage:
//!   tsh          # Interactive shell with prompt
//!   tsh -p       # No prompt (for driving the shell through a pipe)
//!   tsh -v       # Verbose diagnostics on stderr
//!   tsh -h       # Usage

use std::env;
use std::process::ExitCode;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use tsh_repl::{StartupFlags, USAGE};

fn main() -> ExitCode {
    let flags = match StartupFlags::parse(env::args().skip(1)) {
        Ok(flags) => flags,
        Err(unknown) => {
            eprintln!("Unknown option: {unknown}");
            println!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    if flags.help {
        println!("{USAGE}");
        return ExitCode::FAILURE;
    }

    if flags.version {
        println!(
            "tsh {} ({} {})",
            env!("CARGO_PKG_VERSION"),
            env!("TSH_GIT_HASH"),
            env!("TSH_BUILD_DATE")
        );
        return ExitCode::SUCCESS;
    }

    init_tracing(flags.verbose);

    match tsh_repl::run(flags.config()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr; stdout belongs to the shell protocol.
/// `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose { "tsh_kernel=debug,tsh_repl=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
