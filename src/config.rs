//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file; every section has defaults, so
//! running without a file is equivalent to an empty one. CLI flags override
//! individual fields after loading.

use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::application::solver::SolverConfig;
use crate::domain::{PrecisionContext, MIN_PRECISION_DIGITS};
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub solver: SolverSettings,
    pub batch: BatchSettings,
    pub logging: LoggingConfig,
}

/// Settings for the adjustment search.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Significant digits carried by the arithmetic context.
    pub precision_digits: u32,
    /// Decimal places kept by the truncating downstream system. Target
    /// files may override this per row.
    pub scale: u32,
    /// Search bound: stepped candidates tried before a target is declared
    /// unreachable.
    pub max_iterations: u32,
    /// Extra fractional digits of the candidate lattice beyond the scale.
    pub step_margin: u32,
}

impl Default for SolverSettings {
    fn default() -> Self {
        let solver = SolverConfig::default();
        Self {
            precision_digits: MIN_PRECISION_DIGITS,
            scale: 0,
            max_iterations: solver.max_iterations,
            step_margin: solver.step_margin,
        }
    }
}

/// Settings for batch execution.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Worker threads; 0 means one per available CPU.
    pub jobs: usize,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "pretty".into(),
        }
    }
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if it exists, otherwise fall back to defaults. Lets the
    /// tool run with no config file at all.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Re-check invariants after CLI overrides have been applied.
    pub fn validate(&self) -> Result<()> {
        if self.solver.precision_digits < MIN_PRECISION_DIGITS {
            return Err(ConfigError::InvalidValue {
                field: "solver.precision_digits",
                reason: format!("must be at least {MIN_PRECISION_DIGITS}"),
            }
            .into());
        }
        if self.solver.max_iterations == 0 {
            return Err(ConfigError::InvalidValue {
                field: "solver.max_iterations",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.solver.step_margin == 0 {
            return Err(ConfigError::InvalidValue {
                field: "solver.step_margin",
                reason: "the candidate lattice must be finer than the truncation unit".into(),
            }
            .into());
        }
        if self.solver.step_margin > 32 {
            return Err(ConfigError::InvalidValue {
                field: "solver.step_margin",
                reason: "must be at most 32".into(),
            }
            .into());
        }
        if self.solver.scale > 64 {
            return Err(ConfigError::InvalidValue {
                field: "solver.scale",
                reason: "exceeds any supported downstream precision".into(),
            }
            .into());
        }
        Ok(())
    }

    /// Solver configuration derived from these settings.
    #[must_use]
    pub fn solver_config(&self) -> SolverConfig {
        SolverConfig {
            max_iterations: self.solver.max_iterations,
            step_margin: self.solver.step_margin,
        }
    }

    /// Arithmetic context derived from these settings.
    #[must_use]
    pub fn precision_context(&self) -> PrecisionContext {
        PrecisionContext::new(self.solver.precision_digits)
    }

    /// Initialize the tracing subscriber with the configured settings.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}
