//! Plan session: the submit flow and the plan-page guard
//!
//! Ties form validation, the generator and the store together.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::domain::TripPlanResponse;
use crate::form::{FormErrors, PlanForm};
use crate::planner::{PlanError, TripPlanner};
use crate::share;
use crate::store::{Applied, PlanStore, StoreError};

/// Why a submission produced no plan
#[derive(Debug, Error)]
pub enum SubmitError {
    /// Form rejected; nothing was sent
    #[error(transparent)]
    Invalid(#[from] FormErrors),

    #[error("Plan generation failed: {0}")]
    Generation(#[from] PlanError),

    /// A newer submission superseded this one
    #[error("Superseded by a newer request")]
    Stale,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// What the plan page should render
#[derive(Debug, Clone, PartialEq)]
pub enum PlanGuard {
    Loading,
    Redirect,
    Show(Box<TripPlanResponse>),
}

/// Header values for a plan page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub title: String,
    pub total_days: u32,
    pub start_date: String,
    pub end_date: String,
    pub start_location: String,
    pub start_time: String,
    pub base_stay: String,
    pub spot_count: usize,
    pub is_feasible: bool,
    pub feasibility_summary: String,
}

impl From<&TripPlanResponse> for PlanSummary {
    fn from(response: &TripPlanResponse) -> Self {
        let primary = response.primary();
        Self {
            title: primary.map(|v| v.plan.title.clone()).unwrap_or_default(),
            total_days: primary.map(|v| v.plan.total_days).unwrap_or_default(),
            start_date: response.request.start_date.clone(),
            end_date: response.request.end_date.clone(),
            start_location: response.request.start_location.clone(),
            start_time: response.request.start_time.clone(),
            base_stay: response.request.base_stay.clone(),
            spot_count: response.request.spots.len(),
            is_feasible: response.feasibility.is_feasible,
            feasibility_summary: response.feasibility.summary.clone(),
        }
    }
}

/// One user's planning session
#[derive(Clone)]
pub struct PlanSession {
    planner: TripPlanner,
    store: PlanStore,
}

impl PlanSession {
    pub fn new(planner: TripPlanner, store: PlanStore) -> Self {
        Self { planner, store }
    }

    pub fn store(&self) -> &PlanStore {
        &self.store
    }

    /// Validate `form`, generate a plan and settle the store
    ///
    /// An invalid form never reaches the generator. If a newer submission
    /// starts while this one is in flight, this one's outcome is dropped and
    /// `SubmitError::Stale` is returned.
    pub async fn submit(&self, form: &PlanForm) -> Result<TripPlanResponse, SubmitError> {
        debug!(spots = form.spots.len(), "submit: called");
        let request = form.validate().inspect_err(|errors| {
            debug!(%errors, "submit: form rejected");
        })?;

        self.store.set_condition(form.clone()).await?;
        let token = self.store.begin().await?;

        match self.planner.generate(&request).await {
            Ok(plan) => match self.store.resolve(token, plan.clone()).await? {
                Applied::Current => {
                    info!(token = token.value(), "submit: plan stored");
                    Ok(plan)
                }
                Applied::Stale => {
                    debug!(token = token.value(), "submit: plan superseded");
                    Err(SubmitError::Stale)
                }
            },
            Err(e) => {
                warn!(error = %e, "submit: generation failed");
                match self.store.reject(token, e.to_string()).await? {
                    Applied::Current => Err(SubmitError::Generation(e)),
                    Applied::Stale => Err(SubmitError::Stale),
                }
            }
        }
    }

    /// Decide what the plan page shows
    ///
    /// A decodable `data` parameter wins and replaces the stored plan.
    /// Undecodable data falls through to the store.
    pub async fn guard(&self, data: Option<&str>) -> Result<PlanGuard, StoreError> {
        debug!(has_data = data.is_some(), "guard: called");
        if let Some(plan) = data.and_then(share::decode) {
            self.store.show(plan.clone()).await?;
            return Ok(PlanGuard::Show(Box::new(plan)));
        }

        let snapshot = self.store.snapshot().await?;
        if snapshot.is_loading() {
            return Ok(PlanGuard::Loading);
        }
        Ok(match snapshot.plan {
            Some(plan) => PlanGuard::Show(Box::new(plan)),
            None => PlanGuard::Redirect,
        })
    }

    /// Forget the plan and the remembered form
    pub async fn start_over(&self) -> Result<(), StoreError> {
        debug!("start_over: called");
        self.store.reset().await?;
        self.store.clear_condition().await
    }
}
