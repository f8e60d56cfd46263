//! TripPlanner - structured-output plan generation

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::error::PlanError;
use super::prompt::{SYSTEM_PROMPT, user_payload};
use crate::domain::{TripPlanRequest, TripPlanResponse};
use crate::llm::{CompletionRequest, LlmClient, Message, StopReason};
use crate::schema::trip_plan_json_schema;

/// Default output token budget for one plan
pub const DEFAULT_MAX_TOKENS: u32 = 16384;

/// Generates trip plans through an injected LLM client
///
/// Sends exactly one completion per call; nothing is retried. The caller
/// owns presenting a failure and letting the user resubmit.
#[derive(Clone)]
pub struct TripPlanner {
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
}

impl TripPlanner {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    /// Override the output token budget
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Completion request for `request`, constrained by the v3 schema
    pub fn build_request(&self, request: &TripPlanRequest) -> CompletionRequest {
        CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(user_payload(request).to_string())],
            response_format: Some(trip_plan_json_schema()),
            max_tokens: self.max_tokens,
        }
    }

    /// Generate a plan for `request`
    ///
    /// `request.spots` is expected to be non-empty; form validation enforces
    /// that before a request is built.
    pub async fn generate(&self, request: &TripPlanRequest) -> Result<TripPlanResponse, PlanError> {
        debug!(
            spots = request.spots.len(),
            start = %request.start_date,
            end = %request.end_date,
            "generate: called"
        );
        let response = self.llm.complete(self.build_request(request)).await?;

        if response.stop_reason != StopReason::EndTurn {
            warn!(stop_reason = ?response.stop_reason, "generate: completion did not end normally");
        }

        let text = match response.content {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                debug!("generate: no output text");
                return Err(PlanError::NoOutput);
            }
        };

        let plan: TripPlanResponse = serde_json::from_str(&text).map_err(|source| {
            debug!(error = %source, "generate: output is not a plan");
            PlanError::Parse {
                raw: text.clone(),
                source,
            }
        })?;
        plan.validate_structure()?;

        info!(
            plans = plan.plans.len(),
            feasible = plan.feasibility.is_feasible,
            issues = plan.issues.len(),
            tokens = response.usage.total(),
            "generate: plan created"
        );
        Ok(plan)
    }
}
