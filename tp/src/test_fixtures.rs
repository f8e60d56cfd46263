//! Shared values for unit tests

use crate::domain::{
    Feasibility, IssueType, ItemType, Pace, ProtocolVersion, Severity, SpotInput, Timezone, TransportMode,
    TripPlan, TripPlanAlternative, TripPlanDay, TripPlanIssue, TripPlanItem, TripPlanRequest, TripPlanRequestV2,
    TripPlanResponse, TripPlanResponseV2, TripPlanVariant, VariantId,
};

pub fn naha_request() -> TripPlanRequest {
    TripPlanRequest {
        start_date: "2026-01-21".to_string(),
        end_date: "2026-01-22".to_string(),
        start_location: "那覇空港".to_string(),
        start_time: "09:00".to_string(),
        base_stay: "オリオンホテル".to_string(),
        spots: vec![SpotInput::must("首里城公園")],
        end_location: None,
        end_time: None,
        transport_mode: TransportMode::Car,
        pace: Pace::Normal,
    }
}

fn item(kind: ItemType, start: &str, end: &str, name: &str, stay_minutes: u32) -> TripPlanItem {
    TripPlanItem {
        spot_id: format!("{}-{}", kind, start.replace(':', "")),
        kind,
        start_time: start.to_string(),
        end_time: end.to_string(),
        name: name.to_string(),
        stay_minutes,
        detail: String::new(),
    }
}

pub fn naha_plan() -> TripPlan {
    TripPlan {
        title: "那覇・首里 1泊2日".to_string(),
        total_days: 2,
        days: vec![
            TripPlanDay {
                day_number: 1,
                date: "2026-01-21".to_string(),
                theme: "首里城".to_string(),
                items: vec![
                    item(ItemType::Travel, "09:00", "09:40", "那覇空港 → 首里城公園", 0),
                    item(ItemType::Spot, "09:40", "11:40", "首里城公園", 120),
                    item(ItemType::Meal, "12:00", "13:00", "昼食", 60),
                    item(ItemType::Hotel, "18:00", "18:30", "オリオンホテル", 30),
                ],
            },
            TripPlanDay {
                day_number: 2,
                date: "2026-01-22".to_string(),
                theme: "帰路".to_string(),
                items: vec![item(ItemType::Travel, "10:00", "10:30", "オリオンホテル → 那覇空港", 0)],
            },
        ],
    }
}

pub fn naha_response() -> TripPlanResponse {
    TripPlanResponse {
        version: ProtocolVersion::V3,
        timezone: Timezone::AsiaTokyo,
        request: naha_request(),
        feasibility: Feasibility {
            is_feasible: true,
            summary: "すべてのスポットを無理なく回れます".to_string(),
        },
        plans: vec![TripPlanVariant {
            id: VariantId::A,
            title: "首里城じっくりプラン".to_string(),
            rationale: "必須スポットを午前中に配置".to_string(),
            included_spots: vec!["首里城公園".to_string()],
            excluded_spots: vec![],
            plan: naha_plan(),
        }],
        issues: vec![TripPlanIssue {
            kind: IssueType::Time,
            severity: Severity::Info,
            description: "午後は自由時間です".to_string(),
            affected_spots: vec![],
        }],
    }
}

pub fn kyoto_v2_response() -> TripPlanResponseV2 {
    TripPlanResponseV2 {
        version: ProtocolVersion::V2,
        timezone: Timezone::AsiaTokyo,
        request: TripPlanRequestV2 {
            start_date: "2025-11-03".to_string(),
            end_date: "2025-11-03".to_string(),
            start_location: "京都駅".to_string(),
            start_time: "08:30".to_string(),
            base_stay: "京都ホテル".to_string(),
            spots: vec!["清水寺".to_string(), "伏見稲荷大社".to_string()],
            end_location: Some("京都駅".to_string()),
            end_time: Some("19:00".to_string()),
            transport_mode: TransportMode::Transit,
            pace: Pace::Packed,
        },
        feasibility: Feasibility {
            is_feasible: false,
            summary: "移動時間が不足しています".to_string(),
        },
        plan: TripPlan {
            title: "京都日帰り".to_string(),
            total_days: 1,
            days: vec![TripPlanDay {
                day_number: 1,
                date: "2025-11-03".to_string(),
                theme: "東山と伏見".to_string(),
                items: vec![item(ItemType::Spot, "09:00", "10:30", "清水寺", 90)],
            }],
        },
        issues: vec![TripPlanIssue {
            kind: IssueType::Distance,
            severity: Severity::Warning,
            description: "伏見稲荷までの移動に時間がかかります".to_string(),
            affected_spots: vec!["伏見稲荷大社".to_string()],
        }],
        alternatives: vec![TripPlanAlternative {
            id: "alt-1".to_string(),
            title: "伏見稲荷を外す".to_string(),
            description: "清水寺周辺に集中".to_string(),
            changes: vec!["伏見稲荷大社を削除".to_string()],
        }],
    }
}
