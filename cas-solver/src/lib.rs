/**
 * The source of randomness for proposals and acceptance tests.
 */
mod rng;
pub use rng::*;

/**
 * Strategies for evaluating the Metropolis acceptance probability.
 */
mod exp;
pub use exp::*;

/**
 * The error types returned by each stage of a clearing round.
 */
mod error;
pub use error::*;

/**
 * The tunable parameters of the annealer.
 */
mod config;
pub use config::*;

/**
 * A validated, index-resolved copy of the items and bids of a round.
 */
mod snapshot;
pub use snapshot::*;

/**
 * The local fields and pairwise couplings derived from a snapshot.
 */
mod graph;
pub use graph::*;

/**
 * The simulated annealing search over activation vectors.
 */
mod anneal;
pub use anneal::*;

/**
 * The rules that turn an activation vector into item awards.
 */
pub mod policy;
pub use policy::{Award, PolicyKind, WinnerSelectionPolicy};

/**
 * The end-to-end driver: snapshot, anneal, select winners, apply.
 */
mod clearing;
pub use clearing::*;

/// Serializable wrappers for running a clearing round from files
#[cfg(feature = "io")]
pub mod io;

// We use non-std collections here for their ordering semantics and performance
pub(crate) use cas_core::models::{Map, Set};
