//! Domain types for the trip planner
//!
//! Request and response shapes of the itinerary contract. The current
//! protocol (`trip-plan.v3`) lives in [`request`] and [`response`]; the
//! legacy `trip-plan.v2` shapes that shared links may still carry live in
//! [`legacy`].

use serde::{Deserialize, Serialize};

/// Declare a closed string enum.
///
/// Generates the serde renames, `Display`/`FromStr`, `as_str` and an `ALL`
/// table. The JSON Schema reads `ALL` so its `enum` lists cannot drift from
/// the Rust type.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Wire representation
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| format!("Unknown {}: {}", stringify!($name), s))
            }
        }
    };
}

pub mod legacy;
pub mod request;
pub mod response;

pub use legacy::{TripPlanAlternative, TripPlanRequestV2, TripPlanResponseV2};
pub use request::{Pace, SpotInput, SpotPriority, TransportMode, TripPlanRequest};
pub use response::{
    Feasibility, IssueType, ItemType, Severity, StructureError, TripPlan, TripPlanDay, TripPlanIssue, TripPlanItem,
    TripPlanResponse, TripPlanVariant, VariantId,
};

string_enum! {
    /// Protocol version tag carried in every response
    ///
    /// Decoding dispatches on this tag with an exhaustive `match`, so a new
    /// version must be handled everywhere before the crate builds again.
    pub enum ProtocolVersion {
        V2 => "trip-plan.v2",
        V3 => "trip-plan.v3",
    }
}

impl ProtocolVersion {
    /// Version produced by the planner today
    pub const CURRENT: Self = Self::V3;
}

string_enum! {
    /// Timezone every time of day in a plan is expressed in
    #[derive(Default)]
    pub enum Timezone {
        #[default]
        AsiaTokyo => "Asia/Tokyo",
    }
}
