use super::{Award, WinnerSelectionPolicy, check_length, standings};
use crate::{AuctionSnapshot, WinnerError};

/// The same winners as [`super::FirstPrice`], paying the second-highest
/// qualifying price instead of their own.
///
/// A winner without competition on an item pays the item's reserve.
#[derive(Clone, Copy, Debug, Default)]
pub struct Vickrey;

impl WinnerSelectionPolicy for Vickrey {
    fn select(
        &self,
        snapshot: &AuctionSnapshot,
        active: &[bool],
    ) -> Result<Vec<Award>, WinnerError> {
        check_length(snapshot, active)?;

        let items = snapshot.items();
        let bids = snapshot.bids();
        let awards = standings(snapshot, active)
            .into_iter()
            .enumerate()
            .filter_map(|(item, standing)| {
                standing.map(|standing| Award {
                    item: items[item].id,
                    bid: bids[standing.bid].id,
                    price: standing.runner_up.unwrap_or(items[item].min_price),
                })
            })
            .collect();

        Ok(awards)
    }
}
