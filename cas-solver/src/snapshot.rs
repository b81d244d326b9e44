use crate::{Map, Set, SnapshotError};
use cas_core::models::{AgentId, Bid, BidId, Item, ItemId};

/// An immutable, validated copy of the items and bids of one clearing round.
///
/// Taking the snapshot resolves every identifier to a dense index: bid `i` of
/// the snapshot is row `i` of the coupling matrix and entry `i` of every
/// activation vector. It also expands `exclude_all` into explicit exclusions
/// and refreshes the per-item bid statistics on its own copies of the items.
///
/// The bookkeeping layer is free to keep mutating its collections afterwards;
/// the solver only ever looks at the snapshot.
#[derive(Clone, Debug)]
pub struct AuctionSnapshot {
    items: Vec<Item>,
    bids: Vec<Bid>,
    item_index: Map<ItemId, usize>,
    bid_index: Map<BidId, usize>,
    // Sorted, deduplicated item indices per bid
    coverage: Vec<Vec<usize>>,
    // Unordered exclusion pairs, stored as (low, high)
    exclusions: Set<(usize, usize)>,
}

impl AuctionSnapshot {
    /// Validate and copy the provided items and bids.
    ///
    /// Fails, without side effects, if an identifier is duplicated, a bid
    /// references an unknown item or excludes an unknown bid, or a price is
    /// not finite.
    pub fn new<'a>(
        items: impl IntoIterator<Item = &'a Item>,
        bids: impl IntoIterator<Item = &'a Bid>,
    ) -> Result<Self, SnapshotError> {
        let mut items = items.into_iter().cloned().collect::<Vec<_>>();
        let mut bids = bids.into_iter().cloned().collect::<Vec<_>>();

        let mut item_index = Map::default();
        for (idx, item) in items.iter().enumerate() {
            if !item.min_price.is_finite() {
                return Err(SnapshotError::ItemPrice(item.id));
            }
            if item_index.insert(item.id, idx).is_some() {
                return Err(SnapshotError::DuplicateItem(item.id));
            }
        }

        let mut bid_index = Map::default();
        for (idx, bid) in bids.iter().enumerate() {
            if !bid.price.is_finite() {
                return Err(SnapshotError::BidPrice(bid.id));
            }
            if bid_index.insert(bid.id, idx).is_some() {
                return Err(SnapshotError::DuplicateBid(bid.id));
            }
        }

        let coverage = bids
            .iter()
            .map(|bid| {
                let mut covered = bid
                    .items
                    .iter()
                    .map(|item| {
                        item_index
                            .get(item)
                            .copied()
                            .ok_or(SnapshotError::UnknownItem {
                                bid: bid.id,
                                item: *item,
                            })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                covered.sort_unstable();
                covered.dedup();
                Ok(covered)
            })
            .collect::<Result<Vec<_>, SnapshotError>>()?;

        // Group exclusions have to be visible as ordinary exclusions before
        // any coupling is computed, so we expand them into the bids' lists.
        let mut by_bidder = Map::<AgentId, Vec<BidId>>::default();
        for bid in bids.iter() {
            by_bidder.entry(bid.bidder).or_default().push(bid.id);
        }
        for bid in bids.iter_mut().filter(|bid| bid.exclude_all) {
            let siblings = by_bidder.get(&bid.bidder).map(Vec::as_slice).unwrap_or(&[]);
            for sibling in siblings.iter().filter(|&&id| id != bid.id) {
                if !bid.excludes.contains(sibling) {
                    bid.excludes.push(*sibling);
                }
            }
        }

        let mut exclusions = Set::default();
        for (i, bid) in bids.iter().enumerate() {
            for excluded in bid.excludes.iter() {
                let j = *bid_index
                    .get(excluded)
                    .ok_or(SnapshotError::UnknownExclusion {
                        bid: bid.id,
                        excluded: *excluded,
                    })?;
                // A bid excluding itself is meaningless; the diagonal stays zero
                if i != j {
                    exclusions.insert((i.min(j), i.max(j)));
                }
            }
        }

        // Refresh the bookkeeping fields of our copies
        for item in items.iter_mut() {
            item.bid_count = 0;
            item.max_bid = 0.0;
            item.agent_bid_count = Map::default();
        }
        for (bid, covered) in bids.iter().zip(coverage.iter()) {
            for &idx in covered {
                let item = &mut items[idx];
                item.bid_count += 1;
                item.max_bid = item.max_bid.max(bid.price);
                *item.agent_bid_count.entry(bid.bidder).or_default() += 1;
            }
        }

        Ok(Self {
            items,
            bids,
            item_index,
            bid_index,
            coverage,
            exclusions,
        })
    }

    /// The items of the round, in their original order.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// The bids of the round, in their original order, with `exclude_all` expanded.
    pub fn bids(&self) -> &[Bid] {
        &self.bids
    }

    /// The dense index of an item
    pub fn item_index(&self, id: &ItemId) -> Option<usize> {
        self.item_index.get(id).copied()
    }

    /// The dense index of a bid
    pub fn bid_index(&self, id: &BidId) -> Option<usize> {
        self.bid_index.get(id).copied()
    }

    /// The sorted, deduplicated item indices covered by bid `bid`.
    pub fn coverage(&self, bid: usize) -> &[usize] {
        &self.coverage[bid]
    }

    /// Whether bids `i` and `j` may not be accepted together.
    pub fn are_exclusive(&self, i: usize, j: usize) -> bool {
        self.exclusions.contains(&(i.min(j), i.max(j)))
    }

    /// Every exclusive pair, as `(low, high)` bid indices.
    pub fn exclusions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.exclusions.iter().copied()
    }

    /// The number of items that bids `i` and `j` both cover.
    pub fn shared_items(&self, i: usize, j: usize) -> usize {
        // Both lists are sorted, so a merge walk suffices
        let (a, b) = (&self.coverage[i], &self.coverage[j]);
        let (mut x, mut y, mut shared) = (0, 0, 0);
        while x < a.len() && y < b.len() {
            match a[x].cmp(&b[y]) {
                std::cmp::Ordering::Less => x += 1,
                std::cmp::Ordering::Greater => y += 1,
                std::cmp::Ordering::Equal => {
                    shared += 1;
                    x += 1;
                    y += 1;
                }
            }
        }
        shared
    }

    /// The number of bids in the round
    pub fn bid_count(&self) -> usize {
        self.bids.len()
    }

    /// The number of items in the round
    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
