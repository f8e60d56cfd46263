//! Plan slot state and its transitions
//!
//! Transitions are plain methods so they can be tested without the actor.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{TripPlanDay, TripPlanIssue, TripPlanResponse};
use crate::form::PlanForm;

/// Request status of the plan slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Identity of one generation attempt
///
/// Issued by [`PlanState::begin`]; only the most recently issued token may
/// settle the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

impl RequestToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Whether a settle call changed the slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The token was current and the outcome was stored
    Current,
    /// A newer request (or a reset) superseded the token; outcome discarded
    Stale,
}

/// Read-only copy of the slot for rendering
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlanSnapshot {
    pub plan: Option<TripPlanResponse>,
    pub status: PlanStatus,
    pub error: Option<String>,
    pub condition: Option<PlanForm>,
}

impl PlanSnapshot {
    pub fn is_loading(&self) -> bool {
        self.status == PlanStatus::Loading
    }

    /// No plan to show and nothing in flight
    pub fn should_redirect(&self) -> bool {
        self.plan.is_none() && matches!(self.status, PlanStatus::Idle | PlanStatus::Error)
    }

    pub fn is_feasible(&self) -> Option<bool> {
        self.plan.as_ref().map(|p| p.feasibility.is_feasible)
    }

    /// Days of the primary variant, empty without a plan
    pub fn primary_days(&self) -> &[TripPlanDay] {
        self.plan
            .as_ref()
            .and_then(|p| p.primary())
            .map(|v| v.plan.days.as_slice())
            .unwrap_or_default()
    }

    pub fn issues(&self) -> &[TripPlanIssue] {
        self.plan.as_ref().map(|p| p.issues.as_slice()).unwrap_or_default()
    }
}

/// The plan slot
///
/// `plan` survives an error so a stale plan can be shown next to the error
/// message; only [`reset`](Self::reset) clears it.
#[derive(Debug, Default)]
pub struct PlanState {
    plan: Option<TripPlanResponse>,
    status: PlanStatus,
    error: Option<String>,
    condition: Option<PlanForm>,
    latest: u64,
}

impl PlanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> PlanStatus {
        self.status
    }

    /// Start a generation attempt: `loading`, error cleared, new token
    pub fn begin(&mut self) -> RequestToken {
        self.latest += 1;
        self.status = PlanStatus::Loading;
        self.error = None;
        debug!(token = self.latest, "PlanState::begin: called");
        RequestToken(self.latest)
    }

    fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest && self.status == PlanStatus::Loading
    }

    /// Settle `token` with a plan
    pub fn resolve(&mut self, token: RequestToken, plan: TripPlanResponse) -> Applied {
        if !self.is_current(token) {
            debug!(token = token.0, latest = self.latest, "PlanState::resolve: stale token");
            return Applied::Stale;
        }
        self.plan = Some(plan);
        self.status = PlanStatus::Success;
        self.error = None;
        Applied::Current
    }

    /// Settle `token` with an error message
    pub fn reject(&mut self, token: RequestToken, message: impl Into<String>) -> Applied {
        if !self.is_current(token) {
            debug!(token = token.0, latest = self.latest, "PlanState::reject: stale token");
            return Applied::Stale;
        }
        self.status = PlanStatus::Error;
        self.error = Some(message.into());
        Applied::Current
    }

    /// Back to `idle` with no plan
    ///
    /// Requests still in flight become stale. The search condition is kept.
    pub fn reset(&mut self) {
        debug!("PlanState::reset: called");
        self.latest += 1;
        self.plan = None;
        self.status = PlanStatus::Idle;
        self.error = None;
    }

    /// Store a plan that did not come from a tracked request (a shared link)
    pub fn show(&mut self, plan: TripPlanResponse) {
        self.latest += 1;
        self.plan = Some(plan);
        self.status = PlanStatus::Success;
        self.error = None;
    }

    pub fn set_condition(&mut self, condition: PlanForm) {
        self.condition = Some(condition);
    }

    pub fn clear_condition(&mut self) {
        self.condition = None;
    }

    pub fn snapshot(&self) -> PlanSnapshot {
        PlanSnapshot {
            plan: self.plan.clone(),
            status: self.status,
            error: self.error.clone(),
            condition: self.condition.clone(),
        }
    }
}
