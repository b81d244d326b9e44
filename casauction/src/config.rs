//! Application configuration management.
//!
//! Settings are layered with a clear precedence order: default values, then an
//! optional TOML file, then environment variables. Command-line flags are
//! applied on top by the caller.

use crate::CliError;
use cas_solver::{PolicyKind, SolverConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// The settings of a clearing run
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
pub struct AppConfig {
    /// Annealer configuration (seed, schedule, proposal size, etc.)
    #[serde(default)]
    pub solver: SolverConfig,

    /// The winner-selection rule
    #[serde(default)]
    pub policy: PolicyKind,
}

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Environment variables (highest priority)
    /// 2. The given config file
    /// 3. Default values (lowest priority)
    ///
    /// Environment variables are mapped using the pattern:
    /// `CAS_<SECTION>__<KEY>` maps to `<section>.<key>`
    ///
    /// # Examples
    ///
    /// ```bash
    /// # Run longer with a different seed
    /// export CAS_SOLVER__SWEEP_COUNT=1000
    /// export CAS_SOLVER__RANDOM_SEED=7
    ///
    /// # Charge winners the second price
    /// export CAS_POLICY=vickrey
    /// ```
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut config = config::Config::builder();

        // Start with default values
        config = config.add_source(config::Config::try_from(&Self::default())?);

        // Layer on config file if it is specified and exists
        if let Some(path) = path {
            if path.exists() {
                config = config.add_source(config::File::from(path))
            } else {
                return Err(CliError::MissingConfig(path.to_path_buf()))?;
            }
        }

        // Override with environment variables
        // This maps CAS_SOLVER__SWEEP_COUNT to solver.sweep_count
        config = config.add_source(
            config::Environment::with_prefix("CAS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let built_config = config.build()?;
        built_config.try_deserialize().map_err(Into::into)
    }
}
