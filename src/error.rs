use std::path::PathBuf;

use thiserror::Error;

use crate::domain::error::DomainError;
use crate::domain::Quantity;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Per-asset solve failures. Attached to the asset's outcome row; a batch
/// never aborts because one asset failed, and there are no retries (the
/// computation is deterministic).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolveError {
    /// The request violated a domain invariant before any search ran.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] DomainError),

    /// The search exhausted its iteration bound without satisfying the
    /// truncation equality. Final and reportable, never approximated.
    #[error("target not reachable within {iterations} search steps")]
    UnreachableTarget { iterations: u32 },

    /// The reverse validator disagreed with the search result. An
    /// internal-consistency fault; always surfaced, never suppressed.
    #[error("validation mismatch: recomputed {actual}, expected {expected}")]
    ValidationMismatch { expected: Quantity, actual: Quantity },
}

/// Failures while reading a tabular input file.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} contains no data rows")]
    Empty { path: PathBuf },

    #[error("{path} has no usable code/quantity columns")]
    NoColumns { path: PathBuf },
}

/// Failures while writing the audit report.
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Solve(#[from] SolveError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Report(#[from] ReportError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
