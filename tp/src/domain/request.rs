//! Trip plan request - the normalized constraints submitted for planning

use serde::{Deserialize, Serialize};

string_enum! {
    /// How strongly a spot must be honored
    pub enum SpotPriority {
        /// Hard constraint: the plan must never omit this spot
        Must => "must",
        /// Soft preference: may be dropped when the trip is infeasible
        Nice => "nice",
    }
}

string_enum! {
    /// Means of transport between spots
    #[derive(Default)]
    pub enum TransportMode {
        Car => "car",
        #[default]
        Transit => "transit",
        Walk => "walk",
    }
}

string_enum! {
    /// Qualitative density hint for the itinerary
    #[derive(Default)]
    pub enum Pace {
        Relaxed => "relaxed",
        #[default]
        Normal => "normal",
        Packed => "packed",
    }
}

/// A spot the traveler wants to visit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotInput {
    pub name: String,
    pub priority: SpotPriority,
}

impl SpotInput {
    pub fn new(name: impl Into<String>, priority: SpotPriority) -> Self {
        Self {
            name: name.into(),
            priority,
        }
    }

    /// A spot the plan must include
    pub fn must(name: impl Into<String>) -> Self {
        Self::new(name, SpotPriority::Must)
    }

    /// A spot the plan may drop
    pub fn nice(name: impl Into<String>) -> Self {
        Self::new(name, SpotPriority::Nice)
    }
}

/// Normalized trip constraints
///
/// Dates are `YYYY-MM-DD` and times `HH:mm`. `end_location` and `end_time`
/// are always serialized, as `null` when absent, because the structured
/// output API needs every key present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanRequest {
    pub start_date: String,
    pub end_date: String,
    pub start_location: String,
    pub start_time: String,
    pub base_stay: String,
    pub spots: Vec<SpotInput>,
    /// Where the trip ends; `None` means back at the start location
    #[serde(default)]
    pub end_location: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    pub transport_mode: TransportMode,
    pub pace: Pace,
}

impl TripPlanRequest {
    /// Spot names in input order
    pub fn spot_names(&self) -> Vec<String> {
        self.spots.iter().map(|s| s.name.clone()).collect()
    }

    /// Spots the plan is not allowed to drop
    pub fn must_spots(&self) -> impl Iterator<Item = &SpotInput> {
        self.spots.iter().filter(|s| s.priority == SpotPriority::Must)
    }

    /// True when no explicit end location was given
    pub fn returns_to_start(&self) -> bool {
        self.end_location.as_deref().is_none_or(|l| l.trim().is_empty())
    }
}
