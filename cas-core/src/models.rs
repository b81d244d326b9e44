mod bid;
mod ids;
mod item;
mod map;

pub use bid::Bid;
pub use ids::{AgentId, BidId, ItemId};
pub use item::Item;
pub use map::{Map, Set};
