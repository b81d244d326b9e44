#![warn(missing_docs)]
//! Core data types for combinatorial auction clearing.
//!
//! The clearing engine in `cas-solver` consumes a finite, ordered list of
//! [`Item`](models::Item)s and [`Bid`](models::Bid)s and writes the winner and
//! sell price back onto each item. Creating items and placing bids is the job
//! of whatever bookkeeping layer hosts the auction; this crate only fixes the
//! shape of the data passed across that boundary.

/// Domain models for a single clearing round.
///
/// These are plain data structures. Validation against one another (unknown
/// item references, dangling exclusions) happens when the solver takes its
/// snapshot, not here.
pub mod models;
