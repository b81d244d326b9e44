use crate::{
    AnnealError, AuctionSnapshot, ConfigError, CouplingGraph, Exponential, InitialState,
    LaggedFibonacci, SolverConfig,
};
use std::ops::ControlFlow;
use tracing::{Level, event};

/// Progress after one completed sweep, as passed to the observer of
/// [`Annealer::anneal_with`].
#[derive(Clone, Debug, PartialEq)]
pub struct SweepReport {
    /// The zero-based index of the sweep that just finished
    pub sweep: usize,
    /// The inverse temperature used during the sweep
    pub beta: f64,
    /// The total benefit of the current activation vector
    pub current_value: f64,
    /// The best total benefit seen so far
    pub best_value: f64,
    /// The number of rejected proposals so far
    pub rejections: u64,
}

/// The summary of a completed (or cancelled) anneal.
#[derive(Clone, Debug, PartialEq)]
pub struct AnnealReport {
    /// The best total benefit found
    pub best_value: f64,
    /// The number of sweeps actually run
    pub sweeps: usize,
    /// The number of rejected proposals
    pub rejections: u64,
    /// Whether the observer stopped the run early
    pub cancelled: bool,
}

/// Simulated annealing over the activation vector of a [`CouplingGraph`].
///
/// Each sweep proposes one move per bid. A move toggles between one and
/// `max_flips` randomly chosen bits; it is kept with probability
/// `min(1, exp(-beta·(prev - new)))`, so a move that raises the total benefit
/// is always kept. Beta grows linearly from `beta_start` to `beta_end` over the
/// configured sweeps.
///
/// The result of a run is the best activation vector *visited*, not the one
/// the search ends on.
pub struct Annealer<E: Exponential = Box<dyn Exponential>> {
    config: SolverConfig,
    rng: LaggedFibonacci,
    exp: E,
    graph: Option<CouplingGraph>,
    active: Vec<bool>,
    best_active: Vec<bool>,
    best_value: f64,
    rejections: u64,
}

impl Annealer {
    /// Create an annealer using the exponential selected by the configuration.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        let exp = config.exponential.build();
        Self::with_exponential(config, exp)
    }
}

impl<E: Exponential> Annealer<E> {
    /// Create an annealer with an explicit exponential implementation.
    pub fn with_exponential(config: SolverConfig, exp: E) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            rng: LaggedFibonacci::new(config.random_seed),
            config,
            exp,
            graph: None,
            active: Vec::new(),
            best_active: Vec::new(),
            best_value: 0.0,
            rejections: 0,
        })
    }

    /// The current settings
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Set the seed used by the next anneal
    pub fn set_random_seed(&mut self, seed: u64) {
        self.config.random_seed = seed;
    }

    /// Set the number of sweeps of the next anneal
    pub fn set_sweep_count(&mut self, sweeps: usize) {
        self.config.sweep_count = sweeps;
    }

    /// Set the maximum number of bits toggled per proposal (checked when annealing)
    pub fn set_max_flips(&mut self, max_flips: u64) {
        self.config.max_flips = max_flips;
    }

    /// Set the initial inverse temperature
    pub fn set_beta_start(&mut self, beta: f64) {
        self.config.beta_start = beta;
    }

    /// Set the final inverse temperature
    pub fn set_beta_end(&mut self, beta: f64) {
        self.config.beta_end = beta;
    }

    /// The seed used by the next anneal
    pub fn random_seed(&self) -> u64 {
        self.config.random_seed
    }

    /// The number of sweeps of the next anneal
    pub fn sweep_count(&self) -> usize {
        self.config.sweep_count
    }

    /// The maximum number of bits toggled per proposal
    pub fn max_flips(&self) -> u64 {
        self.config.max_flips
    }

    /// The initial inverse temperature
    pub fn beta_start(&self) -> f64 {
        self.config.beta_start
    }

    /// The final inverse temperature
    pub fn beta_end(&self) -> f64 {
        self.config.beta_end
    }

    /// Rebuild the coupling graph from a snapshot, discarding any previous search state.
    pub fn build_graph(&mut self, snapshot: &AuctionSnapshot) -> &CouplingGraph {
        let n = snapshot.bid_count();
        self.active = vec![false; n];
        self.best_active = vec![false; n];
        self.best_value = 0.0;
        self.rejections = 0;
        self.graph.insert(CouplingGraph::build(snapshot))
    }

    /// The graph of the current snapshot, if one has been built
    pub fn graph(&self) -> Option<&CouplingGraph> {
        self.graph.as_ref()
    }

    /// The total benefit of an activation vector, recomputed from scratch.
    pub fn total_benefit(&self, active: &[bool]) -> Result<f64, AnnealError> {
        self.graph
            .as_ref()
            .ok_or(AnnealError::GraphNotBuilt)?
            .total_benefit(active)
    }

    /// The activation vector the last search ended on
    pub fn active(&self) -> &[bool] {
        &self.active
    }

    /// The best activation vector found by the last search
    pub fn best_active(&self) -> &[bool] {
        &self.best_active
    }

    /// The total benefit of [`Annealer::best_active`]
    pub fn best_value(&self) -> f64 {
        self.best_value
    }

    /// The number of proposals rejected by the last search
    pub fn rejections(&self) -> u64 {
        self.rejections
    }

    /// Run the configured number of sweeps.
    pub fn anneal(&mut self) -> Result<AnnealReport, AnnealError> {
        self.anneal_with(|_| ControlFlow::Continue(()))
    }

    /// Run the configured number of sweeps, reporting to `observer` after each.
    ///
    /// Returning [`ControlFlow::Break`] from the observer stops the search at
    /// that sweep boundary. Everything up to that point is identical to an
    /// uninterrupted run with the same seed.
    pub fn anneal_with(
        &mut self,
        mut observer: impl FnMut(&SweepReport) -> ControlFlow<()>,
    ) -> Result<AnnealReport, AnnealError> {
        self.config.validate()?;

        let Self {
            config,
            rng,
            exp,
            graph,
            active,
            best_active,
            best_value,
            rejections,
        } = self;

        let graph = graph.as_ref().ok_or(AnnealError::GraphNotBuilt)?;
        let n = graph.len();

        rng.seed(config.random_seed);
        *active = match config.initial_state {
            InitialState::Random => (0..n).map(|_| rng.next_word() >> 63 == 1).collect(),
            InitialState::Empty => vec![false; n],
        };
        let mut reward = graph.benefit(active);
        *best_active = active.clone();
        *best_value = reward;
        *rejections = 0;

        let mut report = AnnealReport {
            best_value: *best_value,
            sweeps: 0,
            rejections: 0,
            cancelled: false,
        };

        if n == 0 {
            return Ok(report);
        }

        let beta_step = config.beta_step();
        let mut beta = config.beta_start;
        let mut flipped = Vec::with_capacity(config.max_flips.min(n as u64) as usize);

        for sweep in 0..config.sweep_count {
            exp.set_coefficient(-beta);

            for _ in 0..n {
                let prev_reward = reward;
                flipped.clear();

                let flips = 1 + rng.next_word() % config.max_flips;
                for _ in 0..flips {
                    let k = (rng.next_word() % n as u64) as usize;
                    reward += graph.flip_delta(active, k);
                    active[k] = !active[k];
                    flipped.push(k);
                }

                if reward > *best_value {
                    best_active.copy_from_slice(active);
                    *best_value = reward;
                }

                let threshold = exp.eval(prev_reward - reward);
                if rng.next_double() >= threshold {
                    for &k in flipped.iter().rev() {
                        active[k] = !active[k];
                    }
                    reward = prev_reward;
                    *rejections += 1;
                }
            }

            // Keep the running total from drifting away from the exact sum
            reward = graph.benefit(active);

            report.sweeps = sweep + 1;
            let progress = SweepReport {
                sweep,
                beta,
                current_value: reward,
                best_value: *best_value,
                rejections: *rejections,
            };
            event!(
                Level::DEBUG,
                sweep,
                beta,
                current = reward,
                best = *best_value,
                "sweep complete"
            );

            beta += beta_step;

            if observer(&progress).is_break() {
                event!(Level::WARN, sweeps = report.sweeps, "anneal cancelled");
                report.cancelled = true;
                break;
            }
        }

        report.best_value = *best_value;
        report.rejections = *rejections;
        Ok(report)
    }
}
