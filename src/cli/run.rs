//! Handler for the `run` command.

use std::process::ExitCode;

use tabled::{Table, Tabled};
use tracing::info;

use crate::app::{App, RunPlan, RunReport};
use crate::cli::{output, RunArgs};
use crate::config::Config;

/// Execute the run command. The exit code distinguishes "ran and found
/// breaks" (1) from "did not run" (2).
pub fn execute(args: &RunArgs) -> ExitCode {
    // Load and merge configuration
    let mut config = match Config::load_or_default(&args.config) {
        Ok(config) => config,
        Err(e) => {
            output::error(&e.to_string());
            return ExitCode::from(2);
        }
    };

    // Apply CLI overrides
    if let Some(scale) = args.scale {
        config.solver.scale = scale;
    }
    if let Some(precision_digits) = args.precision_digits {
        config.solver.precision_digits = precision_digits;
    }
    if let Some(max_iterations) = args.max_iterations {
        config.solver.max_iterations = max_iterations;
    }
    if let Some(jobs) = args.jobs {
        config.batch.jobs = jobs;
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }
    if args.json_logs {
        config.logging.format = "json".to_string();
    }
    if let Err(e) = config.validate() {
        output::error(&e.to_string());
        return ExitCode::from(2);
    }

    config.init_logging();
    info!("precifix starting");

    let plan = RunPlan {
        base: args.base.clone(),
        secondary: args.secondary.clone(),
        targets: args.target.clone(),
        output: args.output.clone(),
    };

    output::header(env!("CARGO_PKG_VERSION"));
    let pb = output::spinner("Solving adjustment batch");
    match App::run(&config, &plan) {
        Ok(report) => {
            output::spinner_success(
                &pb,
                &format!(
                    "{} rows across {} portfolios",
                    report.rows(),
                    report.portfolios.len()
                ),
            );
            print_summary(&report);

            let breaks = report.breaks();
            if breaks > 0 {
                output::warning(&format!(
                    "{breaks} unresolved breaks flagged for manual review in {}",
                    args.output.display()
                ));
                ExitCode::from(1)
            } else {
                output::success(&format!(
                    "all rows resolved, audit report at {}",
                    args.output.display()
                ));
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            output::spinner_fail(&pb, "batch failed");
            output::error(&e.to_string());
            ExitCode::from(2)
        }
    }
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Portfolio")]
    portfolio: String,
    #[tabled(rename = "Rows")]
    rows: usize,
    #[tabled(rename = "Resolved")]
    resolved: usize,
    #[tabled(rename = "Breaks")]
    breaks: usize,
    #[tabled(rename = "Skipped")]
    skipped: u32,
}

fn print_summary(report: &RunReport) {
    let rows: Vec<SummaryRow> = report
        .portfolios
        .iter()
        .map(|portfolio| SummaryRow {
            portfolio: portfolio.name.clone(),
            rows: portfolio.outcomes.len(),
            resolved: portfolio.resolved(),
            breaks: portfolio.breaks(),
            skipped: portfolio.skipped,
        })
        .collect();

    output::section("Summary");
    output::lines(&Table::new(rows).to_string());
    println!();
}
