//! Handler for the `check` command group.

use std::process::ExitCode;

use crate::cli::{output, ConfigPathArg};
use crate::config::Config;

/// Validate a configuration file without running a batch.
pub fn execute_config(args: &ConfigPathArg) -> ExitCode {
    output::section(&format!("Checking configuration: {}", args.config.display()));

    match Config::load(&args.config) {
        Ok(config) => {
            output::success("configuration file is valid");
            output::key_value("precision digits", config.solver.precision_digits);
            output::key_value("truncation scale", config.solver.scale);
            output::key_value("max iterations", config.solver.max_iterations);
            output::key_value("step margin", config.solver.step_margin);
            output::key_value(
                "batch jobs",
                if config.batch.jobs == 0 {
                    "auto".to_string()
                } else {
                    config.batch.jobs.to_string()
                },
            );
            output::key_value("log level", &config.logging.level);
            ExitCode::SUCCESS
        }
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::from(2)
        }
    }
}
