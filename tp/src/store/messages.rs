//! Plan store messages
//!
//! Commands and responses for the actor pattern.

use thiserror::Error;
use tokio::sync::oneshot;

use super::state::{Applied, PlanSnapshot, RequestToken};
use crate::domain::TripPlanResponse;
use crate::form::PlanForm;

/// Errors from store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Channel error")]
    ChannelError,
}

/// Response from store operations
pub type StoreResponse<T> = Result<T, StoreError>;

/// Commands sent to the PlanStore actor
#[derive(Debug)]
pub enum StoreCommand {
    Begin {
        reply: oneshot::Sender<RequestToken>,
    },
    Resolve {
        token: RequestToken,
        plan: Box<TripPlanResponse>,
        reply: oneshot::Sender<Applied>,
    },
    Reject {
        token: RequestToken,
        message: String,
        reply: oneshot::Sender<Applied>,
    },
    Show {
        plan: Box<TripPlanResponse>,
        reply: oneshot::Sender<()>,
    },
    Reset {
        reply: oneshot::Sender<()>,
    },

    // Search condition
    SetCondition {
        condition: Box<PlanForm>,
        reply: oneshot::Sender<()>,
    },
    ClearCondition {
        reply: oneshot::Sender<()>,
    },

    Snapshot {
        reply: oneshot::Sender<PlanSnapshot>,
    },

    // Shutdown
    Shutdown,
}
