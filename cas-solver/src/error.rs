use cas_core::models::{BidId, ItemId};
use thiserror::Error;

/// The ways in which the items and bids of a round can be inconsistent.
///
/// These are detected while the snapshot is taken, before any graph is built.
#[derive(Debug, Error, PartialEq)]
pub enum SnapshotError {
    /// Two items share an identifier
    #[error("item {0} appears more than once")]
    DuplicateItem(ItemId),
    /// Two bids share an identifier
    #[error("bid {0} appears more than once")]
    DuplicateBid(BidId),
    /// A bid covers an item that is not part of the round
    #[error("bid {bid} references unknown item {item}")]
    UnknownItem {
        /// The offending bid
        bid: BidId,
        /// The missing item
        item: ItemId,
    },
    /// A bid excludes a bid that is not part of the round
    #[error("bid {bid} excludes unknown bid {excluded}")]
    UnknownExclusion {
        /// The offending bid
        bid: BidId,
        /// The missing bid
        excluded: BidId,
    },
    /// A bid price is NaN or infinite
    #[error("bid {0} has a non-finite price")]
    BidPrice(BidId),
    /// An item reserve price is NaN or infinite
    #[error("item {0} has a non-finite minimum price")]
    ItemPrice(ItemId),
}

/// Solver settings that cannot be run.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// At least one bit must be flipped per proposal
    #[error("max_flips must be at least 1")]
    ZeroFlips,
    /// The annealing schedule must be finite
    #[error("beta_start and beta_end must be finite (got {start} and {end})")]
    NonFiniteBeta {
        /// The configured initial inverse temperature
        start: f64,
        /// The configured final inverse temperature
        end: f64,
    },
}

/// Usage errors of the annealer.
#[derive(Debug, Error, PartialEq)]
pub enum AnnealError {
    /// No coupling graph has been built for the current snapshot
    #[error("the coupling graph has not been built")]
    GraphNotBuilt,
    /// An activation vector does not have one entry per bid
    #[error("expected {expected} activations, found {found}")]
    LengthMismatch {
        /// The number of bids in the graph
        expected: usize,
        /// The length of the provided vector
        found: usize,
    },
    /// The settings are unusable
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Failures while turning the best activation vector into awards.
#[derive(Debug, Error, PartialEq)]
pub enum WinnerError {
    /// The activation vector does not have one entry per bid
    #[error("expected {expected} activations, found {found}")]
    LengthMismatch {
        /// The number of bids in the snapshot
        expected: usize,
        /// The length of the provided vector
        found: usize,
    },
}

/// Anything that can stop a clearing round.
///
/// A round that returns one of these has not modified any item.
#[derive(Debug, Error, PartialEq)]
pub enum ClearingError {
    /// The input is inconsistent
    #[error("invalid auction: {0}")]
    Snapshot(#[from] SnapshotError),
    /// The settings are unusable
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The optimizer was misused
    #[error("annealing failed: {0}")]
    Anneal(#[from] AnnealError),
    /// The best state could not be turned into awards
    #[error("winner selection failed: {0}")]
    Winner(#[from] WinnerError),
}
