//! Trip form input
//!
//! [`PlanForm`] holds the raw values a user typed. [`PlanForm::validate`]
//! turns them into a [`TripPlanRequest`](crate::domain::TripPlanRequest) or
//! reports every offending field; a request is never built from an invalid
//! form.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Pace, SpotPriority, TransportMode};

mod validate;

pub use validate::{FieldError, FormErrors, FormField};

/// Departure time a fresh form starts with
pub const DEFAULT_DEPARTURE_TIME: &str = "09:00";

/// One row of the spot list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotField {
    pub value: String,
    pub priority: SpotPriority,
}

impl SpotField {
    pub fn new(value: impl Into<String>, priority: SpotPriority) -> Self {
        Self {
            value: value.into(),
            priority,
        }
    }

    /// Blank row appended by "add spot"
    pub fn blank() -> Self {
        Self::new("", SpotPriority::Must)
    }
}

/// Raw form values
///
/// Also the "search condition" kept in the store so a user returning to the
/// form finds it pre-filled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanForm {
    pub start_date: String,
    pub end_date: String,
    pub departure: String,
    pub departure_time: String,
    pub base_stay: String,
    pub spots: Vec<SpotField>,
    /// Blank means "return to the departure point"
    #[serde(default)]
    pub end_location: String,
    /// Blank or `HH:MM`
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub transport_mode: TransportMode,
    #[serde(default)]
    pub pace: Pace,
}

impl Default for PlanForm {
    /// Both dates today, 09:00 departure, one blank spot
    fn default() -> Self {
        let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
        Self {
            start_date: today.clone(),
            end_date: today,
            departure: String::new(),
            departure_time: DEFAULT_DEPARTURE_TIME.to_string(),
            base_stay: String::new(),
            spots: vec![SpotField::blank()],
            end_location: String::new(),
            end_time: String::new(),
            transport_mode: TransportMode::default(),
            pace: Pace::default(),
        }
    }
}

impl PlanForm {
    /// Append a blank spot row
    pub fn add_spot(&mut self) {
        debug!(count = self.spots.len(), "add_spot: called");
        self.spots.push(SpotField::blank());
    }

    /// Remove the spot row at `index`
    ///
    /// The list never shrinks below one row; returns whether a row was
    /// removed.
    pub fn remove_spot(&mut self, index: usize) -> bool {
        debug!(index, count = self.spots.len(), "remove_spot: called");
        if !self.can_remove_spot() || index >= self.spots.len() {
            return false;
        }
        self.spots.remove(index);
        true
    }

    /// Whether the remove button should be enabled
    pub fn can_remove_spot(&self) -> bool {
        self.spots.len() > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_form() {
        let form = PlanForm::default();

        assert_eq!(form.start_date, form.end_date);
        assert_eq!(form.start_date.len(), 10);
        assert_eq!(form.departure_time, "09:00");
        assert_eq!(form.spots, vec![SpotField::blank()]);
        assert_eq!(form.transport_mode, TransportMode::Transit);
        assert_eq!(form.pace, Pace::Normal);
    }

    #[test]
    fn test_spot_list_keeps_one_row() {
        let mut form = PlanForm::default();
        assert!(!form.can_remove_spot());
        assert!(!form.remove_spot(0));

        form.add_spot();
        form.spots[1].value = "国際通り".to_string();
        assert!(form.can_remove_spot());
        assert!(!form.remove_spot(5));
        assert!(form.remove_spot(0));

        assert_eq!(form.spots.len(), 1);
        assert_eq!(form.spots[0].value, "国際通り");
        assert!(!form.remove_spot(0));
    }
}
