use std::process::ExitCode;

use clap::Parser;

use precifix::cli::{check, run, CheckCommand, Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run::execute(&args),
        Commands::Check(CheckCommand::Config(args)) => check::execute_config(&args),
    }
}
