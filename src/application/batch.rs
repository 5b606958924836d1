//! Batch orchestration over independent per-asset solves.
//!
//! Every `(request -> result)` pair is pure and shares nothing with its
//! neighbors, so a batch over hundreds of assets is an embarrassingly
//! parallel map: the runner chunks the rows across scoped worker threads
//! with no locking and no cross-asset ordering. One asset's failure is
//! recorded on that asset's outcome and never stalls the rest.

use std::collections::HashMap;
use std::fmt;

use tracing::debug;

use crate::application::solver::AdjustmentSolver;
use crate::domain::{AdjustmentRequest, AdjustmentResult, Quantity};
use crate::error::SolveError;

/// Which position book supplied an asset's base quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseSource {
    Primary,
    Secondary,
}

impl fmt::Display for BaseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primary => f.write_str("primary"),
            Self::Secondary => f.write_str("secondary"),
        }
    }
}

/// Base-position lookup with an optional secondary book (e.g. depositary
/// receipts) consulted when the primary has no entry for a code.
#[derive(Debug, Default)]
pub struct BaseBook {
    primary: HashMap<String, Quantity>,
    secondary: HashMap<String, Quantity>,
}

impl BaseBook {
    #[must_use]
    pub fn new(primary: HashMap<String, Quantity>) -> Self {
        Self {
            primary,
            secondary: HashMap::new(),
        }
    }

    /// Attach the secondary fallback book.
    #[must_use]
    pub fn with_secondary(mut self, secondary: HashMap<String, Quantity>) -> Self {
        self.secondary = secondary;
        self
    }

    /// Number of entries across both books.
    #[must_use]
    pub fn len(&self) -> usize {
        self.primary.len() + self.secondary.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.primary.is_empty() && self.secondary.is_empty()
    }

    /// Find a base quantity, primary book first.
    #[must_use]
    pub fn lookup(&self, code: &str) -> Option<(&Quantity, BaseSource)> {
        self.primary
            .get(code)
            .map(|q| (q, BaseSource::Primary))
            .or_else(|| self.secondary.get(code).map(|q| (q, BaseSource::Secondary)))
    }
}

/// One asset row from a target portfolio.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetRow {
    /// Asset code (ticker).
    pub code: String,
    /// Theoretical quantity expected after adjustment and truncation.
    pub theoretical: Quantity,
    /// Per-row truncation scale override, when the file carries one.
    pub scale: Option<u32>,
}

/// Terminal state of one asset's solve.
#[derive(Debug, Clone, PartialEq)]
pub enum OutcomeStatus {
    /// Certified result: the adjustment reproduces the theoretical quantity.
    Resolved(AdjustmentResult),
    /// Neither position book knows this code.
    MissingBase,
    /// The solve failed; the error says how.
    Failed(SolveError),
}

/// Per-asset outcome, one per target row.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetOutcome {
    pub code: String,
    pub base: Option<Quantity>,
    pub source: Option<BaseSource>,
    pub theoretical: Quantity,
    pub status: OutcomeStatus,
}

impl AssetOutcome {
    /// True when the asset carries a certified adjustment.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self.status, OutcomeStatus::Resolved(_))
    }
}

/// All outcomes for one target portfolio file.
#[derive(Debug)]
pub struct PortfolioOutcome {
    /// Portfolio name (target file stem).
    pub name: String,
    pub outcomes: Vec<AssetOutcome>,
    /// Malformed rows skipped by the reader.
    pub skipped: u32,
}

impl PortfolioOutcome {
    #[must_use]
    pub fn resolved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_resolved()).count()
    }

    /// Unresolved rows: anything that is not a certified adjustment.
    #[must_use]
    pub fn breaks(&self) -> usize {
        self.outcomes.len() - self.resolved()
    }
}

/// Runs the per-asset solves for a batch.
pub struct BatchRunner<'a> {
    solver: &'a AdjustmentSolver,
    default_scale: u32,
    jobs: usize,
}

impl<'a> BatchRunner<'a> {
    /// Create a runner. `jobs == 0` selects one worker per available CPU.
    #[must_use]
    pub fn new(solver: &'a AdjustmentSolver, default_scale: u32, jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self {
            solver,
            default_scale,
            jobs,
        }
    }

    /// Solve every row, preserving input order in the output.
    #[must_use]
    pub fn run(&self, book: &BaseBook, rows: &[TargetRow]) -> Vec<AssetOutcome> {
        if self.jobs <= 1 || rows.len() <= 1 {
            return rows.iter().map(|row| self.solve_row(book, row)).collect();
        }

        let chunk_size = rows.len().div_ceil(self.jobs);
        debug!(
            rows = rows.len(),
            jobs = self.jobs,
            chunk_size,
            "running batch across worker threads"
        );

        std::thread::scope(|scope| {
            let handles: Vec<_> = rows
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk
                            .iter()
                            .map(|row| self.solve_row(book, row))
                            .collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .flat_map(|handle| handle.join().expect("batch worker panicked"))
                .collect()
        })
    }

    fn solve_row(&self, book: &BaseBook, row: &TargetRow) -> AssetOutcome {
        let scale = row.scale.unwrap_or(self.default_scale);

        let Some((base, source)) = book.lookup(&row.code) else {
            return AssetOutcome {
                code: row.code.clone(),
                base: None,
                source: None,
                theoretical: row.theoretical.clone(),
                status: OutcomeStatus::MissingBase,
            };
        };

        let status = AdjustmentRequest::try_new(base.clone(), row.theoretical.clone(), scale)
            .map_err(SolveError::from)
            .and_then(|request| self.solver.solve(&request))
            .map_or_else(OutcomeStatus::Failed, OutcomeStatus::Resolved);

        AssetOutcome {
            code: row.code.clone(),
            base: Some(base.clone()),
            source: Some(source),
            theoretical: row.theoretical.clone(),
            status,
        }
    }
}
