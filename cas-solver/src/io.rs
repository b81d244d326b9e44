use crate::{
    AuctionSnapshot, Clearing, ClearingError, CouplingGraph, Map, SnapshotError,
    policy::{Award, WinnerSelectionPolicy},
};
use cas_core::models::{Bid, BidId, Item};
use serde::{Deserialize, Serialize};

/// a representation of a single clearing round
#[derive(Clone, Debug, Serialize, Deserialize)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
pub struct Auction {
    /// the items on offer
    pub items: Vec<Item>,
    /// the bids placed on them
    #[serde(default)]
    pub bids: Vec<Bid>,
}

/// a representation of the result of a clearing round
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Outcome {
    /// the total benefit of the accepted bids
    pub best_value: f64,
    /// whether each bid was accepted
    pub active: Map<BidId, bool>,
    /// the items, with their winners and statistics filled in
    pub items: Vec<Item>,
    /// the individual item sales
    pub awards: Vec<Award>,
    /// the number of rejected proposals
    pub rejections: u64,
    /// the number of sweeps run
    pub sweeps: usize,
}

/// the coupling model of a round, for inspection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GraphDump {
    /// the bids, in row order
    pub bids: Vec<BidId>,
    /// the local field of each bid
    pub local_fields: Vec<f64>,
    /// the coupling matrix, one row per bid
    pub couplings: Vec<Vec<f64>>,
    /// the coupling assigned to mutually exclusive pairs
    pub penalty: f64,
}

impl Auction {
    /// clear the auction
    pub fn clear<P: WinnerSelectionPolicy>(
        self,
        clearing: &Clearing<P>,
    ) -> Result<Outcome, ClearingError> {
        let Self { mut items, bids } = self;
        let outcome = clearing.clear(&mut items, &bids)?;

        Ok(Outcome {
            best_value: outcome.best_value,
            active: outcome.active,
            items,
            awards: outcome.awards,
            rejections: outcome.rejections,
            sweeps: outcome.sweeps,
        })
    }

    /// build the coupling model without annealing
    pub fn graph(&self) -> Result<GraphDump, SnapshotError> {
        let snapshot = AuctionSnapshot::new(&self.items, &self.bids)?;
        let graph = CouplingGraph::build(&snapshot);

        Ok(GraphDump {
            bids: snapshot.bids().iter().map(|bid| bid.id).collect(),
            local_fields: graph.local_fields().to_vec(),
            couplings: graph.couplings().to_rows(),
            penalty: graph.penalty(),
        })
    }
}
