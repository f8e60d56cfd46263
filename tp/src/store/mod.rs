//! Plan store with actor pattern
//!
//! [`PlanStore`] owns the session's plan slot (current plan, request status,
//! last error, last search condition) inside a single task and serves
//! commands over channels. Handles are constructed explicitly and passed
//! around; there is no global store.

mod manager;
mod messages;
mod state;

pub use manager::{PlanStore, StoreEvent};
pub use messages::{StoreCommand, StoreError, StoreResponse};
pub use state::{Applied, PlanSnapshot, PlanState, PlanStatus, RequestToken};
