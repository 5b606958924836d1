//! App orchestration module.
//!
//! Wires the readers, the batch runner and the report writer into one run:
//! load base positions (plus the optional secondary book), solve every
//! target portfolio, write the audit report, and hand back counts for the
//! caller's exit-status decision.

use std::path::PathBuf;

use tracing::{info, warn};

use crate::adapter::inbound::table;
use crate::adapter::outbound::report;
use crate::application::batch::{BaseBook, BatchRunner, PortfolioOutcome};
use crate::application::solver::AdjustmentSolver;
use crate::config::Config;
use crate::error::Result;

/// File paths for one run.
#[derive(Debug, Clone)]
pub struct RunPlan {
    /// Base positions (current portfolio).
    pub base: PathBuf,
    /// Optional secondary positions (e.g. depositary receipts), consulted
    /// when the primary book has no entry.
    pub secondary: Option<PathBuf>,
    /// Target portfolio files, one portfolio each.
    pub targets: Vec<PathBuf>,
    /// Audit report destination.
    pub output: PathBuf,
}

/// Everything a run produced, for summary rendering and the exit status.
#[derive(Debug)]
pub struct RunReport {
    pub portfolios: Vec<PortfolioOutcome>,
}

impl RunReport {
    /// Asset rows across all portfolios.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.portfolios.iter().map(|p| p.outcomes.len()).sum()
    }

    /// Rows with a certified adjustment.
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.portfolios.iter().map(PortfolioOutcome::resolved).sum()
    }

    /// Unresolved rows needing manual review.
    #[must_use]
    pub fn breaks(&self) -> usize {
        self.portfolios.iter().map(PortfolioOutcome::breaks).sum()
    }

    /// Malformed input rows skipped by the readers.
    #[must_use]
    pub fn skipped(&self) -> u32 {
        self.portfolios.iter().map(|p| p.skipped).sum()
    }
}

/// Main application struct.
pub struct App;

impl App {
    /// Execute one batch run.
    ///
    /// Per-asset failures land in the report as unresolved breaks; only
    /// unreadable files and an unwritable report are errors here.
    pub fn run(config: &Config, plan: &RunPlan) -> Result<RunReport> {
        let positions = table::read_positions(&plan.base)?;
        info!(
            path = %plan.base.display(),
            records = positions.lookup.len(),
            skipped = positions.skipped,
            "base positions loaded"
        );

        let mut book = BaseBook::new(positions.lookup);
        if let Some(secondary) = &plan.secondary {
            if secondary.exists() {
                let table = table::read_positions(secondary)?;
                info!(
                    path = %secondary.display(),
                    records = table.lookup.len(),
                    "secondary positions loaded"
                );
                book = book.with_secondary(table.lookup);
            } else {
                warn!(
                    path = %secondary.display(),
                    "secondary positions file not found, skipping"
                );
            }
        }
        if book.is_empty() {
            warn!("no base positions loaded; every target row will be a missing-base break");
        }

        let solver = AdjustmentSolver::new(config.solver_config(), config.precision_context());
        let runner = BatchRunner::new(&solver, config.solver.scale, config.batch.jobs);

        let mut portfolios = Vec::with_capacity(plan.targets.len());
        for target in &plan.targets {
            let table = table::read_targets(target)?;
            let name = portfolio_name(target);
            info!(
                portfolio = %name,
                rows = table.rows.len(),
                skipped = table.skipped,
                "solving portfolio"
            );
            let outcomes = runner.run(&book, &table.rows);
            portfolios.push(PortfolioOutcome {
                name,
                outcomes,
                skipped: table.skipped,
            });
        }

        report::write_report(&plan.output, &portfolios)?;

        Ok(RunReport { portfolios })
    }
}

fn portfolio_name(path: &std::path::Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
