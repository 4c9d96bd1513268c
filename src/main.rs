use clap::Parser;
use lvsignal::cli::{run, Cli};

fn main() -> std::process::ExitCode {
    run(Cli::parse())
}
