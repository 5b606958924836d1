//! Audit report writer.
//!
//! One CSV across every portfolio in the run, one row per asset, with the
//! solver's certificate fields spelled out so a reviewer can re-check any
//! row by hand. Resolved rows and unresolved breaks share the file; the
//! `status` column is what separates them for manual handling.

use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::info;

use crate::application::batch::{AssetOutcome, OutcomeStatus, PortfolioOutcome};
use crate::error::{ReportError, SolveError};

const HEADERS: [&str; 10] = [
    "portfolio",
    "ticker",
    "base_qty",
    "source",
    "target_qty",
    "adjustment_pct",
    "adjusted_raw",
    "adjusted_truncated",
    "iterations",
    "status",
];

/// Write the audit report for a whole run.
pub fn write_report(path: &Path, portfolios: &[PortfolioOutcome]) -> Result<(), ReportError> {
    let write_err = |source| ReportError::Write {
        path: PathBuf::from(path),
        source,
    };

    let mut writer = Writer::from_path(path).map_err(write_err)?;
    writer.write_record(HEADERS).map_err(write_err)?;
    for portfolio in portfolios {
        for outcome in &portfolio.outcomes {
            writer
                .write_record(record(&portfolio.name, outcome))
                .map_err(write_err)?;
        }
    }
    writer.flush().map_err(|e| write_err(e.into()))?;

    let rows: usize = portfolios.iter().map(|p| p.outcomes.len()).sum();
    info!(path = %path.display(), rows, "audit report written");
    Ok(())
}

fn record(portfolio: &str, outcome: &AssetOutcome) -> Vec<String> {
    let base = outcome
        .base
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    let source = outcome
        .source
        .map(|s| s.to_string())
        .unwrap_or_default();

    let (pct, raw, truncated, iterations, status) = match &outcome.status {
        OutcomeStatus::Resolved(result) => (
            result.percentage.to_string(),
            result.adjusted_raw.to_string(),
            result.adjusted_truncated.to_string(),
            result.iterations.to_string(),
            "ok".to_string(),
        ),
        OutcomeStatus::MissingBase => (
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            "missing base".to_string(),
        ),
        OutcomeStatus::Failed(error) => {
            let status = match error {
                SolveError::InvalidRequest(domain) => format!("invalid: {domain}"),
                SolveError::UnreachableTarget { .. } => "unreachable".to_string(),
                SolveError::ValidationMismatch { .. } => "validation mismatch".to_string(),
            };
            let iterations = match error {
                SolveError::UnreachableTarget { iterations } => iterations.to_string(),
                _ => String::new(),
            };
            (String::new(), String::new(), String::new(), iterations, status)
        }
    };

    vec![
        portfolio.to_string(),
        outcome.code.clone(),
        base,
        source,
        outcome.theoretical.to_string(),
        pct,
        raw,
        truncated,
        iterations,
        status,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::batch::BaseSource;
    use crate::domain::{AdjustmentResult, Numeric};

    fn num(text: &str) -> Numeric {
        text.parse().expect("valid decimal literal")
    }

    fn resolved_outcome() -> AssetOutcome {
        AssetOutcome {
            code: "AAA3".to_string(),
            base: Some(num("1000.00")),
            source: Some(BaseSource::Primary),
            theoretical: num("1000.01"),
            status: OutcomeStatus::Resolved(AdjustmentResult {
                percentage: num("0.00001"),
                adjusted_raw: num("1000.01"),
                adjusted_truncated: num("1000.01"),
                matches: true,
                iterations: 0,
            }),
        }
    }

    #[test]
    fn writes_resolved_and_break_rows() {
        let portfolios = vec![PortfolioOutcome {
            name: "fund-a".to_string(),
            outcomes: vec![
                resolved_outcome(),
                AssetOutcome {
                    code: "GONE".to_string(),
                    base: None,
                    source: None,
                    theoretical: num("7"),
                    status: OutcomeStatus::MissingBase,
                },
            ],
            skipped: 0,
        }];

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.csv");
        write_report(&path, &portfolios).expect("writable");

        let contents = std::fs::read_to_string(&path).expect("readable");
        let mut lines = contents.lines();
        assert!(lines.next().expect("header").starts_with("portfolio,ticker"));
        assert_eq!(
            lines.next().expect("row"),
            "fund-a,AAA3,1000.00,primary,1000.01,0.00001,1000.01,1000.01,0,ok"
        );
        assert_eq!(lines.next().expect("row"), "fund-a,GONE,,,7,,,,,missing base");
    }

    #[test]
    fn unreachable_rows_carry_their_iteration_count() {
        let portfolios = vec![PortfolioOutcome {
            name: "fund-b".to_string(),
            outcomes: vec![AssetOutcome {
                code: "CCC5".to_string(),
                base: Some(num("1")),
                source: Some(BaseSource::Primary),
                theoretical: num("1.005"),
                status: OutcomeStatus::Failed(SolveError::UnreachableTarget { iterations: 100 }),
            }],
            skipped: 0,
        }];

        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("report.csv");
        write_report(&path, &portfolios).expect("writable");

        let contents = std::fs::read_to_string(&path).expect("readable");
        assert!(contents.contains("CCC5,1,primary,1.005,,,,100,unreachable"));
    }
}
