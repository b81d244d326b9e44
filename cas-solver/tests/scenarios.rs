use approx::assert_abs_diff_eq;
use cas_core::models::{AgentId, Bid, BidId, Item, ItemId};
use cas_solver::{
    Annealer, AuctionSnapshot, Clearing, Exponential, PolicyKind, SolverConfig,
    policy::{Combinatorial, WinnerSelectionPolicy, apply_awards},
};
use rstest::*;
use rstest_reuse::{self, *};

use all_exponentials::all_exponentials;

// Snapshot, anneal and award in one go, returning the annealer for inspection
fn run<E: Exponential>(
    exp: E,
    config: SolverConfig,
    items: &mut [Item],
    bids: &[Bid],
) -> Annealer<E> {
    let snapshot = AuctionSnapshot::new(items.iter(), bids).unwrap();
    let mut annealer = Annealer::with_exponential(config, exp).unwrap();
    annealer.build_graph(&snapshot);
    annealer.anneal().unwrap();

    let awards = Combinatorial
        .select(&snapshot, annealer.best_active())
        .unwrap();
    apply_awards(items, &snapshot, &awards);
    annealer
}

#[fixture]
fn config() -> SolverConfig {
    SolverConfig::default()
}

#[apply(all_exponentials)]
fn single_bid_single_item(exp: impl Exponential, config: SolverConfig) {
    let mut items = vec![Item::new(ItemId::new(0), AgentId::new(1), 10.0)];
    let bids = vec![Bid::new(
        BidId::new(5),
        [ItemId::new(0)],
        50.0,
        AgentId::new(2),
    )];

    let annealer = run(exp, config, &mut items, &bids);

    let graph = annealer.graph().unwrap();
    assert_eq!(graph.local_fields(), &[40.0]);
    assert_eq!(graph.couplings().to_rows(), vec![vec![0.0]]);
    assert_eq!(annealer.best_active(), &[true]);
    assert_abs_diff_eq!(annealer.best_value(), 40.0);

    assert_eq!(items[0].winner, Some(BidId::new(5)));
    assert_eq!(items[0].sell_price, 50.0);
}

#[apply(all_exponentials)]
fn two_exclusive_bids_on_disjoint_items(exp: impl Exponential, config: SolverConfig) {
    let mut items = vec![
        Item::new(ItemId::new(0), AgentId::new(1), 0.0),
        Item::new(ItemId::new(1), AgentId::new(1), 0.0),
    ];
    let bids = vec![
        Bid::new(BidId::new(0), [ItemId::new(0)], 10.0, AgentId::new(2)),
        Bid::new(BidId::new(1), [ItemId::new(1)], 10.0, AgentId::new(3))
            .excluding([BidId::new(0)]),
    ];

    let annealer = run(exp, config, &mut items, &bids);

    let graph = annealer.graph().unwrap();
    assert_eq!(graph.penalty(), 20.0);
    assert_eq!(graph.couplings().get(0, 1), -20.0);
    assert_eq!(graph.couplings().get(1, 0), -20.0);

    assert_abs_diff_eq!(annealer.best_value(), 10.0);
    assert_eq!(annealer.best_active().iter().filter(|on| **on).count(), 1);
    assert_eq!(items.iter().filter(|item| item.is_sold()).count(), 1);

    // Both active is strictly worse than either one alone
    assert!(annealer.total_benefit(&[true, true]).unwrap() < 10.0);
}

#[apply(all_exponentials)]
fn zero_bids(exp: impl Exponential, config: SolverConfig) {
    let mut items = vec![Item::new(ItemId::new(0), AgentId::new(1), 3.0)];
    let before = items.clone();

    let annealer = run(exp, config, &mut items, &[]);

    let graph = annealer.graph().unwrap();
    assert!(graph.is_empty());
    assert!(graph.local_fields().is_empty());
    assert!(annealer.best_active().is_empty());
    assert_eq!(annealer.best_value(), 0.0);
    assert_eq!(items, before);
}

#[apply(all_exponentials)]
fn group_exclusion_keeps_one_bid_per_bidder(exp: impl Exponential, config: SolverConfig) {
    let mut items = (0..3)
        .map(|id| Item::new(ItemId::new(id), AgentId::new(0), 1.0))
        .collect::<Vec<_>>();
    let bidder = AgentId::new(7);
    let bids = vec![
        Bid::new(BidId::new(0), [ItemId::new(0)], 4.0, bidder).exclusive(),
        Bid::new(BidId::new(1), [ItemId::new(1)], 6.0, bidder).exclusive(),
        Bid::new(BidId::new(2), [ItemId::new(2)], 5.0, bidder).exclusive(),
    ];

    let annealer = run(exp, config, &mut items, &bids);

    assert_eq!(annealer.best_active(), &[false, true, false]);
    assert_abs_diff_eq!(annealer.best_value(), 5.0);
    assert_eq!(items[1].winner, Some(BidId::new(1)));
    assert_eq!(items[1].agent_bid_count.get(&bidder), Some(&1));
}

#[apply(all_exponentials)]
fn overlapping_bids_are_not_both_accepted(exp: impl Exponential, config: SolverConfig) {
    let mut items = vec![
        Item::new(ItemId::new(0), AgentId::new(0), 1.0),
        Item::new(ItemId::new(1), AgentId::new(0), 1.0),
    ];
    let bids = vec![
        Bid::new(BidId::new(0), [ItemId::new(0), ItemId::new(1)], 10.0, AgentId::new(1)),
        Bid::new(BidId::new(1), [ItemId::new(1)], 4.0, AgentId::new(2)),
    ];

    let annealer = run(exp, config, &mut items, &bids);

    assert_eq!(annealer.best_active(), &[true, false]);
    assert_abs_diff_eq!(annealer.best_value(), 8.0);
    assert_eq!(items[0].winner, Some(BidId::new(0)));
    assert_eq!(items[1].winner, Some(BidId::new(0)));
    assert_eq!(items[1].bid_count, 2);
    assert_eq!(items[1].max_bid, 10.0);
}

#[test]
fn exclusive_pair_is_never_the_best_state() {
    let items = vec![
        Item::new(ItemId::new(0), AgentId::new(1), 0.0),
        Item::new(ItemId::new(1), AgentId::new(1), 0.0),
    ];
    let bids = vec![
        Bid::new(BidId::new(0), [ItemId::new(0)], 10.0, AgentId::new(2)),
        Bid::new(BidId::new(1), [ItemId::new(1)], 10.0, AgentId::new(3))
            .excluding([BidId::new(0)]),
    ];
    let snapshot = AuctionSnapshot::new(&items, &bids).unwrap();

    for seed in (0..64).map(|k| k * 7919 + 1) {
        let config = SolverConfig {
            random_seed: seed,
            sweep_count: 1000,
            ..Default::default()
        };
        let mut annealer = Annealer::new(config).unwrap();
        annealer.build_graph(&snapshot);
        annealer.anneal().unwrap();

        assert_ne!(annealer.best_active(), &[true, true], "seed {seed}");
        assert_abs_diff_eq!(annealer.best_value(), 10.0);
    }
}

// Zero-price bids on one item never improve on the random start, so the best
// state can keep both of them
#[rstest]
fn zero_price_overlap_still_clears(
    #[values(PolicyKind::Combinatorial, PolicyKind::FirstPrice, PolicyKind::Vickrey)]
    policy: PolicyKind,
) {
    let bids = vec![
        Bid::new(BidId::new(1), [ItemId::new(0)], 0.0, AgentId::new(1)),
        Bid::new(BidId::new(2), [ItemId::new(0)], 0.0, AgentId::new(2)),
    ];

    for seed in 0..20 {
        let mut items = vec![Item::new(ItemId::new(0), AgentId::new(9), 0.0)];
        let config = SolverConfig {
            random_seed: seed,
            ..Default::default()
        };
        let clearing = Clearing::new(config, policy).unwrap();
        let outcome = clearing.clear(&mut items, &bids).unwrap();

        let accepted = outcome.active.values().filter(|on| **on).count();
        assert!(outcome.awards.len() <= 1, "seed {seed}");
        assert_eq!(items[0].is_sold(), accepted > 0, "seed {seed}");
        if accepted == 2 {
            // The earlier bid keeps the item
            assert_eq!(items[0].winner, Some(BidId::new(1)), "seed {seed}");
        }
    }
}

#[test]
fn zero_sweeps_with_overlapping_start_still_clears() {
    let bids = vec![
        Bid::new(
            BidId::new(1),
            [ItemId::new(0), ItemId::new(1)],
            8.0,
            AgentId::new(1),
        ),
        Bid::new(BidId::new(2), [ItemId::new(1)], 5.0, AgentId::new(2)),
    ];

    let mut both = 0;
    for seed in 0..64 {
        let mut items = vec![
            Item::new(ItemId::new(0), AgentId::new(9), 1.0),
            Item::new(ItemId::new(1), AgentId::new(9), 1.0),
        ];
        let config = SolverConfig {
            random_seed: seed,
            sweep_count: 0,
            ..Default::default()
        };
        let clearing = Clearing::new(config, PolicyKind::Combinatorial).unwrap();
        let outcome = clearing.clear(&mut items, &bids).unwrap();

        if outcome.active.values().all(|on| *on) {
            both += 1;
            assert_eq!(items[0].winner, Some(BidId::new(1)));
            assert_eq!(items[1].winner, Some(BidId::new(1)));
            assert_eq!(outcome.awards.len(), 2);
        }
    }
    // Roughly a quarter of random starts activate both bids
    assert!(both > 0);
}

#[test]
fn config_round_trip() {
    let mut annealer = Annealer::new(SolverConfig::default()).unwrap();
    annealer.set_beta_start(0.5);
    annealer.set_beta_end(12.25);
    annealer.set_sweep_count(77);

    assert_eq!(annealer.beta_start(), 0.5);
    assert_eq!(annealer.beta_end(), 12.25);
    assert_eq!(annealer.sweep_count(), 77);
}

#[test]
fn config_from_json_uses_defaults() {
    let config: SolverConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, SolverConfig::default());

    let config: SolverConfig = serde_json::from_str(
        r#"{ "random_seed": 7, "sweep_count": 10, "initial_state": "empty", "exponential": "exact" }"#,
    )
    .unwrap();
    assert_eq!(config.random_seed, 7);
    assert_eq!(config.sweep_count, 10);
    assert_eq!(config.max_flips, 3);
    assert_eq!(config.initial_state, cas_solver::InitialState::Empty);
    assert_eq!(config.exponential, cas_solver::ExpKind::Exact);
}
