use super::{Award, WinnerSelectionPolicy, check_length, standings};
use crate::{AuctionSnapshot, WinnerError};

/// Each item goes to the highest active bid that meets its reserve, which pays
/// its own price.
///
/// Ties are resolved in favour of the bid that appears first in the round.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstPrice;

impl WinnerSelectionPolicy for FirstPrice {
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
                    price: standing.price,
                })
            })
            .collect();

        Ok(awards)
    }
}
