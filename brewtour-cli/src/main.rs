//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use brewtour_cli::CliError;

fn main() {
    env_logger::init();
    match brewtour_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("brewtour: {err}");
            std::process::exit(1);
        }
    }
}
