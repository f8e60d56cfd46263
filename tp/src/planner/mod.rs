//! Plan generation
//!
//! [`TripPlanner`] turns a [`TripPlanRequest`](crate::domain::TripPlanRequest)
//! into a [`TripPlanResponse`](crate::domain::TripPlanResponse) with one
//! structured-output completion call.

mod error;
mod generator;
mod prompt;

pub use error::PlanError;
pub use generator::TripPlanner;
pub use prompt::{SYSTEM_PROMPT, user_payload};
