//! Trip planner - AI travel itinerary generation
//!
//! Turns a trip request (dates, departure, base stay, prioritized spots) into
//! a day-by-day itinerary produced by an LLM under a strict JSON Schema, and
//! packs finished plans into URL-safe share links.
//!
//! # Modules
//!
//! - [`domain`] - `trip-plan.v3` request/response types and legacy v2 shapes
//! - [`schema`] - the strict JSON Schema handed to the model
//! - [`llm`] - LLM client trait and OpenAI Responses implementation
//! - [`planner`] - prompt construction and plan generation
//! - [`share`] - share-link codec with the v2 upgrade path
//! - [`form`] - raw form values and their validation
//! - [`store`] - the plan slot actor (idle/loading/success/error)
//! - [`session`] - submit flow and plan-page guard
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod domain;
pub mod form;
pub mod llm;
pub mod planner;
pub mod schema;
pub mod session;
pub mod share;
pub mod store;

#[cfg(test)]
mod test_fixtures;

// Re-export commonly used types
pub use config::{Config, LlmConfig, ShareConfig};
pub use domain::{ProtocolVersion, SpotInput, SpotPriority, TripPlanRequest, TripPlanResponse, TripPlanVariant};
pub use form::{FormErrors, PlanForm};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, OpenAIClient, create_client};
pub use planner::{PlanError, TripPlanner};
pub use schema::{JsonSchemaFormat, trip_plan_json_schema};
pub use session::{PlanGuard, PlanSession, PlanSummary, SubmitError};
pub use share::{ShareError, decode, encode, share_url};
pub use store::{PlanSnapshot, PlanStatus, PlanStore, StoreEvent};
