//! Lift legacy payloads to the current protocol version

use tracing::debug;

use crate::domain::{
    ProtocolVersion, SpotInput, TripPlanRequest, TripPlanResponse, TripPlanResponseV2, TripPlanVariant, VariantId,
};

/// Rationale given to the single variant synthesized from a v2 plan
pub const LEGACY_RATIONALE: &str = "Shared before plan variants existed; this is the original single plan.";

/// Convert a `trip-plan.v2` response into the current shape
///
/// - the flat plan becomes variant `A`, including every v2 spot and
///   excluding none
/// - bare spot names become `nice` spots; v2 had no priorities
/// - issues carry over unchanged
/// - `alternatives` has no v3 counterpart and is dropped
pub fn upgrade_v2(legacy: TripPlanResponseV2) -> TripPlanResponse {
    let TripPlanResponseV2 {
        timezone,
        request,
        feasibility,
        plan,
        issues,
        alternatives,
        ..
    } = legacy;
    debug!(
        spots = request.spots.len(),
        dropped_alternatives = alternatives.len(),
        "upgrade_v2: called"
    );

    let included_spots = request.spots.clone();
    let request = TripPlanRequest {
        start_date: request.start_date,
        end_date: request.end_date,
        start_location: request.start_location,
        start_time: request.start_time,
        base_stay: request.base_stay,
        spots: request.spots.into_iter().map(SpotInput::nice).collect(),
        end_location: request.end_location,
        end_time: request.end_time,
        transport_mode: request.transport_mode,
        pace: request.pace,
    };

    let variant = TripPlanVariant {
        id: VariantId::A,
        title: plan.title.clone(),
        rationale: LEGACY_RATIONALE.to_string(),
        included_spots,
        excluded_spots: Vec::new(),
        plan,
    };

    TripPlanResponse {
        version: ProtocolVersion::V3,
        timezone,
        request,
        feasibility,
        plans: vec![variant],
        issues,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SpotPriority;
    use crate::test_fixtures::kyoto_v2_response;

    #[test]
    fn test_upgrade_wraps_plan_as_variant_a() {
        let legacy = kyoto_v2_response();
        let upgraded = upgrade_v2(legacy.clone());

        assert_eq!(upgraded.version, ProtocolVersion::V3);
        assert_eq!(upgraded.plans.len(), 1);

        let variant = &upgraded.plans[0];
        assert_eq!(variant.id, VariantId::A);
        assert_eq!(variant.title, legacy.plan.title);
        assert_eq!(variant.rationale, LEGACY_RATIONALE);
        assert_eq!(variant.included_spots, vec!["清水寺", "伏見稲荷大社"]);
        assert!(variant.excluded_spots.is_empty());
        assert_eq!(variant.plan, legacy.plan);
        assert!(upgraded.validate_structure().is_ok());
    }

    #[test]
    fn test_upgrade_defaults_priority_to_nice() {
        let upgraded = upgrade_v2(kyoto_v2_response());

        assert_eq!(upgraded.request.spot_names(), vec!["清水寺", "伏見稲荷大社"]);
        assert!(upgraded.request.spots.iter().all(|s| s.priority == SpotPriority::Nice));
    }

    #[test]
    fn test_upgrade_keeps_request_and_issues() {
        let legacy = kyoto_v2_response();
        let upgraded = upgrade_v2(legacy.clone());

        assert_eq!(upgraded.issues, legacy.issues);
        assert_eq!(upgraded.feasibility, legacy.feasibility);
        assert_eq!(upgraded.request.end_location.as_deref(), Some("京都駅"));
        assert_eq!(upgraded.request.pace, legacy.request.pace);
    }
}
