//! Provides the main entry point to the program.
use human_panic::setup_panic;
use powerplan::cli::run_cli;

fn main() {
    setup_panic!();

    if let Err(err) = run_cli() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
