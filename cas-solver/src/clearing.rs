use crate::{
    Annealer, AuctionSnapshot, ClearingError, ConfigError, Map, PolicyKind, SolverConfig,
    SweepReport,
    policy::{Award, WinnerSelectionPolicy, apply_awards},
};
use cas_core::models::{Bid, BidId, Item};
use std::ops::ControlFlow;
use tracing::{Level, event, span};

/// The result of one clearing round.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClearingOutcome {
    /// The total benefit of the accepted bids
    pub best_value: f64,
    /// Whether each bid was accepted, in the order the bids were given
    pub active: Map<BidId, bool>,
    /// The item sales implied by the accepted bids
    pub awards: Vec<Award>,
    /// The number of rejected proposals
    pub rejections: u64,
    /// The number of sweeps actually run
    pub sweeps: usize,
    /// Whether the observer stopped the search early
    pub cancelled: bool,
}

/// Runs complete clearing rounds: snapshot, build, anneal, select and apply.
///
/// The only caller-visible mutation, writing the bid statistics and the
/// awards onto the items, happens after everything that can fail has
/// succeeded.
#[derive(Clone, Debug)]
pub struct Clearing<P = PolicyKind> {
    config: SolverConfig,
    policy: P,
}

impl<P: WinnerSelectionPolicy> Clearing<P> {
    /// Create a driver with the given settings and winner-selection rule.
    pub fn new(config: SolverConfig, policy: P) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, policy })
    }

    /// The annealer settings used for every round
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// The winner-selection rule
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Clear one round, awarding items to the accepted bids.
    pub fn clear(
        &self,
        items: &mut [Item],
        bids: &[Bid],
    ) -> Result<ClearingOutcome, ClearingError> {
        self.clear_with(items, bids, |_| ControlFlow::Continue(()))
    }

    /// Clear one round, reporting progress after every sweep.
    ///
    /// A cancelled search still selects winners from the best state found so
    /// far.
    pub fn clear_with(
        &self,
        items: &mut [Item],
        bids: &[Bid],
        observer: impl FnMut(&SweepReport) -> ControlFlow<()>,
    ) -> Result<ClearingOutcome, ClearingError> {
        let span = span!(
            Level::INFO,
            "clearing round",
            items = items.len(),
            bids = bids.len()
        );
        let _guard = span.enter();

        let snapshot = AuctionSnapshot::new(items.iter(), bids)?;

        let mut annealer = Annealer::new(self.config.clone())?;
        let graph = annealer.build_graph(&snapshot);
        event!(
            Level::INFO,
            bids = snapshot.bid_count(),
            items = snapshot.item_count(),
            penalty = graph.penalty(),
            "built coupling graph"
        );

        let report = annealer.anneal_with(observer)?;
        event!(
            Level::INFO,
            best = report.best_value,
            rejections = report.rejections,
            sweeps = report.sweeps,
            "annealing finished"
        );

        let best = annealer.best_active();
        let violated = snapshot
            .exclusions()
            .filter(|&(i, j)| best[i] && best[j])
            .count();
        if violated > 0 {
            event!(
                Level::WARN,
                pairs = violated,
                "best state accepts mutually exclusive bids"
            );
        }

        let awards = self.policy.select(&snapshot, best)?;

        let active = snapshot
            .bids()
            .iter()
            .zip(best.iter())
            .map(|(bid, on)| (bid.id, *on))
            .collect::<Map<_, _>>();

        apply_awards(items, &snapshot, &awards);

        Ok(ClearingOutcome {
            best_value: report.best_value,
            active,
            awards,
            rejections: report.rejections,
            sweeps: report.sweeps,
            cancelled: report.cancelled,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{SnapshotError, WinnerError};
    use cas_core::models::{AgentId, ItemId};

    fn items() -> Vec<Item> {
        vec![
            Item::new(ItemId::new(1), AgentId::new(9), 2.0),
            Item::new(ItemId::new(2), AgentId::new(9), 2.0),
        ]
    }

    #[test]
    fn invalid_input_leaves_items_untouched() {
        let mut items = items();
        let before = items.clone();
        let bids = vec![Bid::new(BidId::new(1), [ItemId::new(3)], 5.0, AgentId::new(1))];

        let clearing = Clearing::new(SolverConfig::default(), PolicyKind::default()).unwrap();
        assert_eq!(
            clearing.clear(&mut items, &bids),
            Err(ClearingError::Snapshot(SnapshotError::UnknownItem {
                bid: BidId::new(1),
                item: ItemId::new(3),
            }))
        );
        assert_eq!(items, before);
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let config = SolverConfig {
            max_flips: 0,
            ..Default::default()
        };
        assert_eq!(
            Clearing::new(config, PolicyKind::Vickrey).err(),
            Some(ConfigError::ZeroFlips)
        );
    }

    // Selects from a vector of the wrong length
    struct Truncating;

    impl WinnerSelectionPolicy for Truncating {
        fn select(
            &self,
            snapshot: &AuctionSnapshot,
            active: &[bool],
        ) -> Result<Vec<Award>, WinnerError> {
            crate::policy::Combinatorial.select(snapshot, &active[1..])
        }
    }

    #[test]
    fn selection_failure_leaves_items_untouched() {
        let mut items = items();
        let before = items.clone();
        let bids = vec![
            Bid::new(BidId::new(1), [ItemId::new(1)], 5.0, AgentId::new(1)),
            Bid::new(BidId::new(2), [ItemId::new(1)], 6.0, AgentId::new(2)),
        ];

        let clearing = Clearing::new(SolverConfig::default(), Truncating).unwrap();
        let result = clearing.clear(&mut items, &bids);
        assert_eq!(
            result,
            Err(ClearingError::Winner(WinnerError::LengthMismatch {
                expected: 2,
                found: 1
            }))
        );
        assert_eq!(items, before);
    }

    #[test]
    fn outcome_lists_every_bid() {
        let mut items = items();
        let bids = vec![
            Bid::new(BidId::new(7), [ItemId::new(1)], 5.0, AgentId::new(1)),
            Bid::new(BidId::new(3), [ItemId::new(2)], 1.0, AgentId::new(1)),
        ];

        let clearing = Clearing::new(SolverConfig::default(), PolicyKind::Combinatorial).unwrap();
        let outcome = clearing.clear(&mut items, &bids).unwrap();

        // Bid 3 is below its reserve, so accepting it only loses benefit
        let active = outcome.active.iter().collect::<Vec<_>>();
        assert_eq!(active, vec![(&BidId::new(7), &true), (&BidId::new(3), &false)]);
        assert_eq!(outcome.best_value, 3.0);
        assert_eq!(items[0].winner, Some(BidId::new(7)));
        assert_eq!(items[0].bid_count, 1);
        assert!(!items[1].is_sold());
        assert_eq!(items[1].max_bid, 1.0);
    }
}
