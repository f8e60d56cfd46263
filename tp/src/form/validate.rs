//! Form validation into a trip plan request

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use super::PlanForm;
use crate::domain::{SpotInput, TripPlanRequest};
use crate::schema::{DATE_PATTERN, TIME_PATTERN};

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(DATE_PATTERN).expect("date pattern is valid"));
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(TIME_PATTERN).expect("time pattern is valid"));

/// A form field an error can be attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    StartDate,
    EndDate,
    Departure,
    DepartureTime,
    BaseStay,
    /// The spot list as a whole
    Spots,
    /// One spot row
    Spot(usize),
    EndTime,
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StartDate => write!(f, "startDate"),
            Self::EndDate => write!(f, "endDate"),
            Self::Departure => write!(f, "departure"),
            Self::DepartureTime => write!(f, "departureTime"),
            Self::BaseStay => write!(f, "baseStay"),
            Self::Spots => write!(f, "spots"),
            Self::Spot(i) => write!(f, "spots[{}]", i),
            Self::EndTime => write!(f, "endTime"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: FormField,
    pub message: String,
}

/// Every problem found in a form
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("invalid form: {}", summarize(.errors))]
pub struct FormErrors {
    pub errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl FormErrors {
    fn push(&mut self, field: FormField, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Messages attached to `field`
    pub fn for_field(&self, field: FormField) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn has(&self, field: FormField) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

fn check_date(value: &str, field: FormField, label: &str, errors: &mut FormErrors) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{} is required", label));
        return None;
    }
    if !DATE_RE.is_match(value) {
        errors.push(field, "Dates must be YYYY-MM-DD");
        return None;
    }
    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(field, format!("{} is not a calendar date", value));
            None
        }
    }
}

fn check_required(value: &str, field: FormField, label: &str, errors: &mut FormErrors) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("{} is required", label));
    }
    value.to_string()
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl PlanForm {
    /// Validate the form and build the request it describes
    pub fn validate(&self) -> Result<TripPlanRequest, FormErrors> {
        debug!(spots = self.spots.len(), "validate: called");
        let mut errors = FormErrors::default();

        let start = check_date(&self.start_date, FormField::StartDate, "Start date", &mut errors);
        let end = check_date(&self.end_date, FormField::EndDate, "End date", &mut errors);
        if let (Some(start), Some(end)) = (start, end)
            && end < start
        {
            errors.push(FormField::EndDate, "End date must be on or after the start date");
        }

        let departure = check_required(&self.departure, FormField::Departure, "Departure", &mut errors);
        let departure_time = self.departure_time.trim();
        if !TIME_RE.is_match(departure_time) {
            errors.push(FormField::DepartureTime, "Times must be HH:MM");
        }
        let base_stay = check_required(&self.base_stay, FormField::BaseStay, "Base stay", &mut errors);

        if self.spots.is_empty() {
            errors.push(FormField::Spots, "Enter at least one spot");
        }
        for (i, spot) in self.spots.iter().enumerate() {
            if spot.value.trim().is_empty() {
                errors.push(FormField::Spot(i), "Enter a spot name");
            }
        }

        let end_time = non_blank(&self.end_time);
        if let Some(t) = &end_time
            && !TIME_RE.is_match(t)
        {
            errors.push(FormField::EndTime, "Times must be HH:MM");
        }

        if !errors.is_empty() {
            debug!(count = errors.errors.len(), "validate: rejected");
            return Err(errors);
        }

        Ok(TripPlanRequest {
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
            start_location: departure,
            start_time: departure_time.to_string(),
            base_stay,
            spots: self
                .spots
                .iter()
                .map(|s| SpotInput::new(s.value.trim(), s.priority))
                .collect(),
            end_location: non_blank(&self.end_location),
            end_time,
            transport_mode: self.transport_mode,
            pace: self.pace,
        })
    }
}
