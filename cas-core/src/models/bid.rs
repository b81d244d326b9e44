use super::{AgentId, BidId, ItemId};

/// A package bid: a price offered for a set of items taken together.
///
/// Exclusions are symmetric in meaning: if bid A lists bid B, accepting A
/// forbids accepting B and vice versa, even though only A declared it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bid {
    /// The unique key of the bid
    pub id: BidId,
    /// The items the bid covers; duplicates are ignored
    pub items: Vec<ItemId>,
    /// The price offered for the whole package
    pub price: f64,
    /// The agent placing the bid
    pub bidder: AgentId,
    /// If set, this bid excludes every other bid by the same bidder
    #[cfg_attr(feature = "serde", serde(default))]
    pub exclude_all: bool,
    /// Bids that cannot be accepted together with this one
    #[cfg_attr(feature = "serde", serde(default))]
    pub excludes: Vec<BidId>,
}

impl Bid {
    /// Create a bid with no exclusions.
    pub fn new(
        id: BidId,
        items: impl IntoIterator<Item = ItemId>,
        price: f64,
        bidder: AgentId,
    ) -> Self {
        Self {
            id,
            items: items.into_iter().collect(),
            price,
            bidder,
            exclude_all: false,
            excludes: Vec::new(),
        }
    }

    /// Declare that this bid excludes the given bids.
    pub fn excluding(mut self, excludes: impl IntoIterator<Item = BidId>) -> Self {
        self.excludes.extend(excludes);
        self
    }

    /// Declare that this bid excludes every other bid by the same bidder.
    pub fn exclusive(mut self) -> Self {
        self.exclude_all = true;
        self
    }
}
