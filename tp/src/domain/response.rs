//! Trip plan response (`trip-plan.v3`)
//!
//! The shape the model is constrained to produce and the shape that travels
//! inside share links.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{ProtocolVersion, Timezone, TripPlanRequest};

/// Maximum number of plan variants in one response
pub const MAX_VARIANTS: usize = 2;

string_enum! {
    /// Variant identifier; `A` is always the primary recommendation
    pub enum VariantId {
        A => "A",
        B => "B",
    }
}

string_enum! {
    /// Kind of timeline entry
    pub enum ItemType {
        Spot => "spot",
        Meal => "meal",
        Hotel => "hotel",
        Travel => "travel",
    }
}

string_enum! {
    /// What kind of constraint an issue is about
    pub enum IssueType {
        Time => "time",
        Distance => "distance",
        Constraint => "constraint",
        Capacity => "capacity",
    }
}

string_enum! {
    pub enum Severity {
        Critical => "critical",
        Warning => "warning",
        Info => "info",
    }
}

/// Whether every constraint could be honored
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feasibility {
    pub is_feasible: bool,
    pub summary: String,
}

/// One entry in a day's timeline
///
/// Items within a day are expected to be time-ordered and non-overlapping.
/// Nothing enforces that; it is up to the generating model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanItem {
    pub spot_id: String,
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub start_time: String,
    pub end_time: String,
    pub name: String,
    pub stay_minutes: u32,
    pub detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanDay {
    /// 1-based
    pub day_number: u32,
    pub date: String,
    pub theme: String,
    pub items: Vec<TripPlanItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlan {
    pub title: String,
    pub total_days: u32,
    pub days: Vec<TripPlanDay>,
}

/// A named candidate itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanVariant {
    pub id: VariantId,
    pub title: String,
    /// Why this trade-off was chosen
    pub rationale: String,
    pub included_spots: Vec<String>,
    pub excluded_spots: Vec<String>,
    pub plan: TripPlan,
}

/// A structured problem with the requested trip
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanIssue {
    #[serde(rename = "type")]
    pub kind: IssueType,
    pub severity: Severity,
    pub description: String,
    pub affected_spots: Vec<String>,
}

/// Generated plan result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripPlanResponse {
    pub version: ProtocolVersion,
    pub timezone: Timezone,
    /// Echo of the normalized input
    pub request: TripPlanRequest,
    pub feasibility: Feasibility,
    pub plans: Vec<TripPlanVariant>,
    pub issues: Vec<TripPlanIssue>,
}

/// Structural problems that make a decoded response untrustworthy
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("expected version {expected}, found {found}")]
    WrongVersion {
        expected: ProtocolVersion,
        found: ProtocolVersion,
    },

    #[error("response has no plans")]
    NoPlans,

    #[error("response has {0} plans, at most {max} allowed", max = MAX_VARIANTS)]
    TooManyPlans(usize),

    #[error("plan variant {0} appears more than once")]
    DuplicateVariant(VariantId),
}

impl TripPlanResponse {
    /// Primary recommendation: variant `A`, or the first variant if the
    /// model mislabeled them
    pub fn primary(&self) -> Option<&TripPlanVariant> {
        self.variant(VariantId::A).or_else(|| self.plans.first())
    }

    /// Look up a variant by id
    pub fn variant(&self, id: VariantId) -> Option<&TripPlanVariant> {
        self.plans.iter().find(|v| v.id == id)
    }

    /// Alternative trade-off, if the model offered one
    pub fn alternative(&self) -> Option<&TripPlanVariant> {
        self.variant(VariantId::B)
    }

    /// Issues with `critical` severity
    pub fn critical_issues(&self) -> impl Iterator<Item = &TripPlanIssue> {
        self.issues.iter().filter(|i| i.severity == Severity::Critical)
    }

    /// Check the invariants a current-version response must hold before it
    /// is trusted
    pub fn validate_structure(&self) -> Result<(), StructureError> {
        if self.version != ProtocolVersion::CURRENT {
            return Err(StructureError::WrongVersion {
                expected: ProtocolVersion::CURRENT,
                found: self.version,
            });
        }
        if self.plans.is_empty() {
            return Err(StructureError::NoPlans);
        }
        if self.plans.len() > MAX_VARIANTS {
            return Err(StructureError::TooManyPlans(self.plans.len()));
        }
        let mut seen = HashSet::new();
        for variant in &self.plans {
            if !seen.insert(variant.id) {
                return Err(StructureError::DuplicateVariant(variant.id));
            }
        }
        Ok(())
    }
}
