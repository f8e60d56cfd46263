//! Legacy `trip-plan.v2` shapes
//!
//! v2 produced a single flat plan, listed spots as bare names and carried a
//! list of free-form alternatives. These types only exist so old share links
//! can still be read; nothing produces them anymore.

use serde::{Deserialize, Serialize};

use super::{Feasibility, Pace, ProtocolVersion, Timezone, TransportMode, TripPlan, TripPlanIssue};

/// v2 request echo: spots are plain names without priority
///
/// Early v2 links predate transport mode and pace, so both fall back to
/// their defaults when missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanRequestV2 {
    pub start_date: String,
    pub end_date: String,
    pub start_location: String,
    pub start_time: String,
    pub base_stay: String,
    pub spots: Vec<String>,
    #[serde(default)]
    pub end_location: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default)]
    pub pace: Pace,
}

/// v2 alternative suggestion (no v3 counterpart)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripPlanAlternative {
    pub id: String,
    pub title: String,
    pub description: String,
    pub changes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanResponseV2 {
    pub version: ProtocolVersion,
    #[serde(default)]
    pub timezone: Timezone,
    pub request: TripPlanRequestV2,
    pub feasibility: Feasibility,
    pub plan: TripPlan,
    #[serde(default)]
    pub issues: Vec<TripPlanIssue>,
    #[serde(default)]
    pub alternatives: Vec<TripPlanAlternative>,
}
