//! Encode/decode between a plan and its URL-safe string form
//!
//! Wire format: JSON text, UTF-8, base64 with the `-`/`_` alphabet and no
//! `=` padding. Decoding accepts padded input and the standard `+`/`/`
//! alphabet as well.

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde_json::Value;
use tracing::{debug, warn};

use super::error::ShareError;
use super::upgrade::upgrade_v2;
use crate::domain::{ProtocolVersion, TripPlanResponse, TripPlanResponseV2};

const SHARE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Serialize a plan into a URL-safe string
pub fn encode(plan: &TripPlanResponse) -> Result<String, ShareError> {
    debug!(version = %plan.version, plans = plan.plans.len(), "encode: called");
    let json = serde_json::to_string(plan)?;
    Ok(SHARE_ENGINE.encode(json.as_bytes()))
}

/// Decode a shared plan, or `None` if it cannot be trusted
///
/// Never panics. Malformed base64, bad UTF-8, invalid JSON, unknown
/// versions and structural violations all mean "no shareable plan".
pub fn decode(encoded: &str) -> Option<TripPlanResponse> {
    match try_decode(encoded) {
        Ok(plan) => Some(plan),
        Err(e) => {
            warn!(error = %e, len = encoded.len(), "decode: discarding shared plan");
            None
        }
    }
}

/// Decode a shared plan, reporting why it failed
pub fn try_decode(encoded: &str) -> Result<TripPlanResponse, ShareError> {
    debug!(len = encoded.len(), "try_decode: called");
    let normalized: String = encoded
        .trim()
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();
    if normalized.is_empty() {
        return Err(ShareError::Empty);
    }

    let bytes = SHARE_ENGINE.decode(normalized.as_bytes())?;
    let text = String::from_utf8(bytes)?;
    let value: Value = serde_json::from_str(&text)?;

    let tag = value.get("version").ok_or(ShareError::MissingVersion)?;
    let version: ProtocolVersion =
        serde_json::from_value(tag.clone()).map_err(|_| ShareError::UnknownVersion(tag.to_string()))?;

    // No wildcard arm: a new protocol version must be handled here
    match version {
        ProtocolVersion::V2 => {
            debug!("try_decode: upgrading v2 payload");
            let legacy: TripPlanResponseV2 = serde_json::from_value(value)?;
            Ok(upgrade_v2(legacy))
        }
        ProtocolVersion::V3 => {
            let plan: TripPlanResponse = serde_json::from_value(value)?;
            plan.validate_structure()?;
            Ok(plan)
        }
    }
}
