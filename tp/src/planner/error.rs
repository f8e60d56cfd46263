//! Plan generation errors

use thiserror::Error;

use crate::domain::StructureError;
use crate::llm::LlmError;

/// Why a generation attempt produced no plan
///
/// There is no partial result: an attempt either yields a full response or
/// one of these.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("LLM request failed: {0}")]
    Llm(#[from] LlmError),

    #[error("LLM response has no output text")]
    NoOutput,

    #[error("Failed to parse JSON: {raw}")]
    Parse {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("LLM response violates the plan contract: {0}")]
    Contract(#[from] StructureError),
}

impl PlanError {
    /// Raw model output that failed to parse, for diagnosis
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            PlanError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
