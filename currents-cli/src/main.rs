//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = currents_cli::run() {
        eprintln!("currents: {err}");
        std::process::exit(1);
    }
}
