use crate::{ConfigError, ExpKind};

/// How the activation vector is initialised before the first sweep.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum InitialState {
    /// Each bid starts active with probability one half
    #[default]
    Random,
    /// Every bid starts inactive
    Empty,
}

/// Settings for a single clearing round.
///
/// # Examples
///
/// ```
/// use cas_solver::SolverConfig;
///
/// let config = SolverConfig {
///     random_seed: 7,
///     sweep_count: 500,
///     ..Default::default()
/// };
/// assert_eq!(config.max_flips, 3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig {
    /// The seed for every random decision of the round
    #[cfg_attr(feature = "serde", serde(default = "default_random_seed"))]
    pub random_seed: u64,

    /// The number of sweeps; each sweep proposes one move per bid
    #[cfg_attr(feature = "serde", serde(default = "default_sweep_count"))]
    pub sweep_count: usize,

    /// The maximum number of bits toggled by a single proposal
    #[cfg_attr(feature = "serde", serde(default = "default_max_flips"))]
    pub max_flips: u64,

    /// The inverse temperature of the first sweep
    #[cfg_attr(feature = "serde", serde(default = "default_beta_start"))]
    pub beta_start: f64,

    /// The inverse temperature reached after the last sweep
    #[cfg_attr(feature = "serde", serde(default = "default_beta_end"))]
    pub beta_end: f64,

    /// How the search starts
    #[cfg_attr(feature = "serde", serde(default))]
    pub initial_state: InitialState,

    /// Which exponential the acceptance test uses
    #[cfg_attr(feature = "serde", serde(default))]
    pub exponential: ExpKind,
}

fn default_random_seed() -> u64 {
    42
}

fn default_sweep_count() -> usize {
    100
}

fn default_max_flips() -> u64 {
    3
}

fn default_beta_start() -> f64 {
    0.01
}

fn default_beta_end() -> f64 {
    1.0
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            random_seed: default_random_seed(),
            sweep_count: default_sweep_count(),
            max_flips: default_max_flips(),
            beta_start: default_beta_start(),
            beta_end: default_beta_end(),
            initial_state: InitialState::default(),
            exponential: ExpKind::default(),
        }
    }
}

impl SolverConfig {
    /// Check that the settings describe a runnable schedule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_flips == 0 {
            return Err(ConfigError::ZeroFlips);
        }
        if !self.beta_start.is_finite() || !self.beta_end.is_finite() {
            return Err(ConfigError::NonFiniteBeta {
                start: self.beta_start,
                end: self.beta_end,
            });
        }
        Ok(())
    }

    /// The per-sweep increment of beta for a linear schedule.
    pub fn beta_step(&self) -> f64 {
        if self.sweep_count == 0 {
            0.0
        } else {
            (self.beta_end - self.beta_start) / self.sweep_count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_flips_is_rejected() {
        let config = SolverConfig {
            max_flips: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroFlips));
    }

    #[test]
    fn infinite_beta_is_rejected() {
        let config = SolverConfig {
            beta_end: f64::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteBeta { .. })
        ));
    }

    #[test]
    fn linear_schedule_step() {
        let config = SolverConfig {
            sweep_count: 10,
            beta_start: 0.0,
            beta_end: 2.0,
            ..Default::default()
        };
        assert_eq!(config.beta_step(), 0.2);

        let config = SolverConfig {
            sweep_count: 0,
            ..Default::default()
        };
        assert_eq!(config.beta_step(), 0.0);
    }
}
