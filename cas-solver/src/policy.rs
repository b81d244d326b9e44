use crate::{AuctionSnapshot, WinnerError};
use cas_core::models::{BidId, Item, ItemId};

mod combinatorial;
pub use combinatorial::Combinatorial;

mod first_price;
pub use first_price::FirstPrice;

mod vickrey;
pub use vickrey::Vickrey;

/// The sale of one item to one bid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Award {
    /// The item being sold
    pub item: ItemId,
    /// The winning bid
    pub bid: BidId,
    /// The price the item clears at
    pub price: f64,
}

/// A rule for turning the best activation vector into item awards.
///
/// Selection is pure: it only reads the snapshot and returns the awards, so a
/// failing selection leaves every item untouched.
pub trait WinnerSelectionPolicy {
    /// Compute the awards implied by `active`, which has one entry per bid of
    /// the snapshot.
    fn select(
        &self,
        snapshot: &AuctionSnapshot,
        active: &[bool],
    ) -> Result<Vec<Award>, WinnerError>;
}

/// The built-in policies, chosen by name at construction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "kebab-case")
)]
pub enum PolicyKind {
    /// See [`FirstPrice`]
    FirstPrice,
    /// See [`Vickrey`]
    Vickrey,
    /// See [`Combinatorial`]
    #[default]
    Combinatorial,
}

impl WinnerSelectionPolicy for PolicyKind {
    fn select(
        &self,
        snapshot: &AuctionSnapshot,
        active: &[bool],
    ) -> Result<Vec<Award>, WinnerError> {
        match self {
            Self::FirstPrice => FirstPrice.select(snapshot, active),
            Self::Vickrey => Vickrey.select(snapshot, active),
            Self::Combinatorial => Combinatorial.select(snapshot, active),
        }
    }
}

impl<P: WinnerSelectionPolicy + ?Sized> WinnerSelectionPolicy for Box<P> {
    fn select(
        &self,
        snapshot: &AuctionSnapshot,
        active: &[bool],
    ) -> Result<Vec<Award>, WinnerError> {
        (**self).select(snapshot, active)
    }
}

/// Write the bid statistics of the snapshot and the awards onto the caller's items.
///
/// Items are matched by id; items absent from the snapshot are left alone, as
/// are the winner fields of items without an award.
pub fn apply_awards(items: &mut [Item], snapshot: &AuctionSnapshot, awards: &[Award]) {
    for item in items.iter_mut() {
        let Some(index) = snapshot.item_index(&item.id) else {
            continue;
        };
        let counted = &snapshot.items()[index];
        item.bid_count = counted.bid_count;
        item.max_bid = counted.max_bid;
        item.agent_bid_count = counted.agent_bid_count.clone();
    }

    for award in awards {
        if let Some(item) = items.iter_mut().find(|item| item.id == award.item) {
            item.award(award.bid, award.price);
        }
    }
}

fn check_length(snapshot: &AuctionSnapshot, active: &[bool]) -> Result<(), WinnerError> {
    if active.len() == snapshot.bid_count() {
        Ok(())
    } else {
        Err(WinnerError::LengthMismatch {
            expected: snapshot.bid_count(),
            found: active.len(),
        })
    }
}

// The leading bid on one item, plus the best price it beat
#[derive(Clone, Copy, Debug)]
struct Standing {
    bid: usize,
    price: f64,
    runner_up: Option<f64>,
}

// Rank the active bids that meet each item's reserve, keeping the earlier bid on ties.
fn standings(snapshot: &AuctionSnapshot, active: &[bool]) -> Vec<Option<Standing>> {
    let items = snapshot.items();
    let mut standings: Vec<Option<Standing>> = vec![None; items.len()];

    for (bid, bid_data) in snapshot.bids().iter().enumerate() {
        if !active[bid] {
            continue;
        }
        let price = bid_data.price;
        for &item in snapshot.coverage(bid) {
            if price < items[item].min_price {
                continue;
            }
            standings[item] = Some(match standings[item] {
                None => Standing {
                    bid,
                    price,
                    runner_up: None,
                },
                Some(leader) if price > leader.price => Standing {
                    bid,
                    price,
                    runner_up: Some(leader.price),
                },
                Some(leader) => Standing {
                    runner_up: Some(leader.runner_up.map_or(price, |p| p.max(price))),
                    ..leader
                },
            });
        }
    }

    standings
}
