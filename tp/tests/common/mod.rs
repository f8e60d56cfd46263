//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use tripplanner::domain::TripPlanResponse;
use tripplanner::form::{PlanForm, SpotField};
use tripplanner::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
use tripplanner::{SpotPriority, domain};

pub fn naha_request_json() -> Value {
    json!({
        "startDate": "2026-01-21",
        "endDate": "2026-01-22",
        "startLocation": "那覇空港",
        "startTime": "09:00",
        "baseStay": "オリオンホテル",
        "spots": [{ "name": "首里城公園", "priority": "must" }],
        "endLocation": null,
        "endTime": null,
        "transportMode": "car",
        "pace": "normal"
    })
}

/// A v3 plan for the Naha trip; `summary` tells plans apart
pub fn naha_plan_json(summary: &str) -> Value {
    json!({
        "version": "trip-plan.v3",
        "timezone": "Asia/Tokyo",
        "request": naha_request_json(),
        "feasibility": { "isFeasible": true, "summary": summary },
        "plans": [{
            "id": "A",
            "title": "首里城じっくりプラン",
            "rationale": "必須スポットを午前中に配置",
            "includedSpots": ["首里城公園"],
            "excludedSpots": [],
            "plan": {
                "title": "那覇・首里 1泊2日",
                "totalDays": 2,
                "days": [
                    {
                        "dayNumber": 1,
                        "date": "2026-01-21",
                        "theme": "首里城",
                        "items": [
                            {
                                "spotId": "travel-0900",
                                "type": "travel",
                                "startTime": "09:00",
                                "endTime": "09:40",
                                "name": "那覇空港 → 首里城公園",
                                "stayMinutes": 0,
                                "detail": ""
                            },
                            {
                                "spotId": "spot-0940",
                                "type": "spot",
                                "startTime": "09:40",
                                "endTime": "11:40",
                                "name": "首里城公園",
                                "stayMinutes": 120,
                                "detail": "正殿と守礼門"
                            }
                        ]
                    },
                    {
                        "dayNumber": 2,
                        "date": "2026-01-22",
                        "theme": "帰路",
                        "items": [{
                            "spotId": "travel-1000",
                            "type": "travel",
                            "startTime": "10:00",
                            "endTime": "10:30",
                            "name": "オリオンホテル → 那覇空港",
                            "stayMinutes": 0,
                            "detail": ""
                        }]
                    }
                ]
            }
        }],
        "issues": []
    })
}

pub fn naha_plan(summary: &str) -> TripPlanResponse {
    serde_json::from_value(naha_plan_json(summary)).expect("fixture is a valid plan")
}

pub fn naha_form() -> PlanForm {
    PlanForm {
        start_date: "2026-01-21".to_string(),
        end_date: "2026-01-22".to_string(),
        departure: "那覇空港".to_string(),
        departure_time: "09:00".to_string(),
        base_stay: "オリオンホテル".to_string(),
        spots: vec![SpotField::new("首里城公園", SpotPriority::Must)],
        end_location: String::new(),
        end_time: String::new(),
        transport_mode: domain::TransportMode::Car,
        pace: domain::Pace::Normal,
    }
}

/// LLM client whose calls block until the test releases them
///
/// Calls take gates in arrival order; each gate is released with the text
/// the call should return.
pub struct GatedLlmClient {
    gates: Mutex<VecDeque<oneshot::Receiver<String>>>,
    calls: AtomicUsize,
}

impl GatedLlmClient {
    pub fn new(count: usize) -> (Self, Vec<oneshot::Sender<String>>) {
        let (senders, receivers): (Vec<_>, VecDeque<_>) = (0..count).map(|_| oneshot::channel()).unzip();
        let client = Self {
            gates: Mutex::new(receivers),
            calls: AtomicUsize::new(0),
        };
        (client, senders)
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Wait until `n` calls have arrived
    pub async fn wait_for_calls(&self, n: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.call_count() < n {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .expect("calls did not arrive in time");
    }
}

#[async_trait]
impl LlmClient for GatedLlmClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let gate = self.gates.lock().expect("gate lock").pop_front();
        self.calls.fetch_add(1, Ordering::SeqCst);
        let gate = gate.ok_or_else(|| LlmError::InvalidResponse("no gate left".to_string()))?;
        let text = gate
            .await
            .map_err(|_| LlmError::InvalidResponse("gate dropped".to_string()))?;
        Ok(CompletionResponse::text(text))
    }
}
