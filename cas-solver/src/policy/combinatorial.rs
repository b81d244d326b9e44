use super::{Award, WinnerSelectionPolicy, check_length};
use crate::{AuctionSnapshot, WinnerError};
use tracing::{Level, event};

/// Every accepted bid wins every item it covers, at its own price.
///
/// An accepted bid pays its full price for each of its items; the reserve is
/// already priced into the local field, so it is not rechecked here.
///
/// Packages are all-or-nothing. Active bids are visited in bid order, and an
/// active bid that covers an item already claimed by an earlier one is
/// dropped as a whole, with a warning.
#[derive(Clone, Copy, Debug, Default)]
pub struct Combinatorial;

impl WinnerSelectionPolicy for Combinatorial {
    fn select(
        &self,
        snapshot: &AuctionSnapshot,
        active: &[bool],
    ) -> Result<Vec<Award>, WinnerError> {
        check_length(snapshot, active)?;

        let items = snapshot.items();
        let bids = snapshot.bids();
        let mut claimed: Vec<Option<usize>> = vec![None; items.len()];
        let mut awards = Vec::new();

        for (bid, _) in active.iter().enumerate().filter(|(_, on)| **on) {
            let coverage = snapshot.coverage(bid);
            if let Some((item, first)) = coverage
                .iter()
                .find_map(|&item| claimed[item].map(|first| (item, first)))
            {
                event!(
                    Level::WARN,
                    item = %items[item].id,
                    kept = %bids[first].id,
                    dropped = %bids[bid].id,
                    "active bids overlap; dropping the later bid"
                );
                continue;
            }

            for &item in coverage {
                claimed[item] = Some(bid);
                awards.push(Award {
                    item: items[item].id,
                    bid: bids[bid].id,
                    price: bids[bid].price,
                });
            }
        }

        Ok(awards)
    }
}
