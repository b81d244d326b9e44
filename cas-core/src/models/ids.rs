// Items, bids and agents are all keyed by plain integers on the host side. We
// wrap each in its own newtype so that an item id can never be passed where a
// bid id is expected.

macro_rules! id_wrapper {
    ($struct:ident, $what:literal) => {
        #[doc = concat!("The unique identifier of ", $what)]
        #[derive(Debug, Hash, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
        #[cfg_attr(feature = "schemars", derive(schemars::JsonSchema))]
        #[cfg_attr(
            feature = "serde",
            derive(serde::Serialize, serde::Deserialize),
            serde(transparent)
        )]
        #[repr(transparent)]
        pub struct $struct(u64);

        impl $struct {
            /// Wrap a raw identifier
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// The raw identifier
            pub const fn get(self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $struct {
            fn from(value: u64) -> Self {
                Self(value)
            }
        }

        impl From<$struct> for u64 {
            fn from(value: $struct) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $struct {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_wrapper!(ItemId, "an auctioned item");
id_wrapper!(BidId, "a bid");
id_wrapper!(AgentId, "a trading agent (bidder or seller)");
