use super::{AgentId, BidId, ItemId, Map};

/// An item offered for sale in a clearing round.
///
/// Items are created by the host's bookkeeping layer. The clearing engine
/// reads them while building its snapshot and writes only `winner` and
/// `sell_price`, and only once the round has otherwise succeeded.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    /// The unique key of the item
    pub id: ItemId,
    /// The agent selling the item
    pub seller: AgentId,
    /// The reserve price; a bid covering this item must recoup it to be worthwhile
    pub min_price: f64,
    /// The highest price of any bid referencing this item
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_bid: f64,
    /// The price the item cleared at (zero until sold)
    #[cfg_attr(feature = "serde", serde(default))]
    pub sell_price: f64,
    /// The winning bid, or None while the item is unsold
    #[cfg_attr(feature = "serde", serde(default))]
    pub winner: Option<BidId>,
    /// The number of bids referencing this item
    #[cfg_attr(feature = "serde", serde(default))]
    pub bid_count: u64,
    /// The number of bids referencing this item, per bidder
    #[cfg_attr(feature = "serde", serde(default))]
    pub agent_bid_count: Map<AgentId, u64>,
}

impl Item {
    /// Create a fresh, unsold item with no bids recorded against it.
    pub fn new(id: ItemId, seller: AgentId, min_price: f64) -> Self {
        Self {
            id,
            seller,
            min_price,
            max_bid: 0.0,
            sell_price: 0.0,
            winner: None,
            bid_count: 0,
            agent_bid_count: Map::default(),
        }
    }

    /// Has a winner been assigned?
    pub fn is_sold(&self) -> bool {
        self.winner.is_some()
    }

    /// Record a winning bid and its clearing price.
    pub fn award(&mut self, winner: BidId, price: f64) {
        self.winner = Some(winner);
        self.sell_price = price;
    }
}
