use std::process::ExitCode;

use calamity::cli::{progress::print_fatal, run_cli};

fn main() -> ExitCode {
    match run_cli() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_fatal(&format!("{e:#}"));
            ExitCode::FAILURE
        }
    }
}
