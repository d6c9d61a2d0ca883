//! Strongly typed identifier wrappers.
//!
//! Entity IDs (riders, vehicles, parking, requests) are assigned by the plan
//! provider and are usually 1-based and sparse, so they are used as map keys
//! rather than `Vec` indices.  Graph IDs (`NodeId`, `EdgeId`) and `ActorId`
//! are dense and index directly into arrays via `.index()`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Sentinel meaning "no valid ID".
            pub const INVALID: $name = $name(<$inner>::MAX);

            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// A registered rider (person) from the plan.
    pub struct RiderId(u32);
}

typed_id! {
    /// A scooter.
    pub struct VehicleId(u32);
}

typed_id! {
    /// A docking location.
    pub struct ParkingId(u32);
}

typed_id! {
    /// A scheduled ride request from the plan.
    pub struct RequestId(u32);
}

typed_id! {
    /// Outcome sequence number, assigned 1, 2, 3… in the order outcomes are
    /// determined.  Realized and cancelled rides number independently.
    pub struct RideId(u32);
}

typed_id! {
    /// Slot of an in-flight ride actor in the scheduler's actor table.
    pub struct ActorId(u32);
}

typed_id! {
    /// Index of a road-network node.
    pub struct NodeId(u32);
}

typed_id! {
    /// Index of a directed road-network edge.
    pub struct EdgeId(u32);
}

impl RideId {
    /// The id for the `n`-th recorded outcome (0-based `n`).
    #[inline]
    pub fn nth(n: usize) -> RideId {
        RideId(n as u32 + 1)
    }
}
