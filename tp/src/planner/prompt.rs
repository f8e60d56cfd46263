//! Prompt pieces for plan generation

use serde_json::{Value, json};

use crate::domain::TripPlanRequest;

/// System prompt for the trip planner
pub const SYSTEM_PROMPT: &str = "\
You are a travel itinerary planner for trips in Japan. \
Build a day-by-day timeline from the user's constraints and answer only with \
JSON that matches the provided schema.

Rules:
- Spots with priority \"must\" are hard constraints. Never drop them; if they \
cannot fit, keep them and report the problem in `issues` with severity \"critical\".
- Spots with priority \"nice\" may be dropped when the trip is infeasible.
- Always return plan \"A\" as the primary recommendation. When a different \
trade-off is worth showing (for example dropping \"nice\" spots), also return \
plan \"B\" and explain it in `rationale`.
- List kept spots in `includedSpots` and dropped ones in `excludedSpots`.
- Items within a day must be in time order and must not overlap. Use HH:mm \
times in the Asia/Tokyo timezone.
- Include travel legs between spots using the requested transport mode, and \
meals and the return to the base stay.
- When `endLocation` or `endTime` is null the trip ends back at the start location.
- Respect the pace: relaxed leaves slack, packed fills the day.
- Set `feasibility.isFeasible` to false when any constraint cannot be honored \
and summarize why.";

/// User message payload: the request with optional fields as explicit nulls
///
/// Blank end location/time are sent as `null` so the model sees the
/// "return to start" case the same way every time.
pub fn user_payload(request: &TripPlanRequest) -> Value {
    fn blank_to_null(value: &Option<String>) -> Value {
        match value.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => json!(v),
            _ => Value::Null,
        }
    }

    json!({
        "startDate": request.start_date,
        "endDate": request.end_date,
        "startLocation": request.start_location,
        "startTime": request.start_time,
        "baseStay": request.base_stay,
        "spots": request.spots,
        "endLocation": blank_to_null(&request.end_location),
        "endTime": blank_to_null(&request.end_time),
        "transportMode": request.transport_mode,
        "pace": request.pace,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::naha_request;

    #[test]
    fn test_user_payload_nulls_missing_end() {
        let payload = user_payload(&naha_request());

        assert!(payload["endLocation"].is_null());
        assert!(payload["endTime"].is_null());
        assert_eq!(payload["spots"][0]["name"], "首里城公園");
        assert_eq!(payload["spots"][0]["priority"], "must");
        assert_eq!(payload["transportMode"], "car");
    }

    #[test]
    fn test_user_payload_blank_end_is_null() {
        let mut request = naha_request();
        request.end_location = Some("  ".to_string());
        request.end_time = Some("18:00".to_string());

        let payload = user_payload(&request);

        assert!(payload["endLocation"].is_null());
        assert_eq!(payload["endTime"], "18:00");
    }
}
