//! Share URLs: building them and reading the plan back out

use tracing::debug;
use url::Url;

use super::codec::encode;
use super::error::ShareError;
use crate::config::ShareConfig;
use crate::domain::TripPlanResponse;

/// Query parameter that carries the encoded plan
pub const DATA_PARAM: &str = "data";

/// Absolute URL of the plan page with `plan` embedded
///
/// `path` is appended to whatever path `base-url` already has, so an app
/// mounted under a prefix keeps it.
pub fn share_url(config: &ShareConfig, plan: &TripPlanResponse) -> Result<String, ShareError> {
    debug!(base_url = %config.base_url, path = %config.path, "share_url: called");
    let encoded = encode(plan)?;
    let mut url = Url::parse(&config.base_url)?;
    let path = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        config.path.trim_start_matches('/')
    );
    url.set_path(&path);
    url.set_fragment(None);
    url.query_pairs_mut().clear().append_pair(DATA_PARAM, &encoded);
    Ok(url.into())
}

/// Pull the encoded plan out of a full URL, a query string or a bare value
///
/// Input is read as a query string only when it has a `?` or starts with
/// `data=`; anything else (padded base64 included) is returned trimmed,
/// as-is. Returns `None` when a URL or query string has no `data` parameter.
pub fn extract_data_param(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(url) = Url::parse(input) {
        return url
            .query_pairs()
            .find(|(k, _)| k == DATA_PARAM)
            .map(|(_, v)| v.into_owned());
    }

    let query = match input.split_once('?') {
        Some((_, query)) => query,
        None if input.starts_with(&format!("{DATA_PARAM}=")) => input,
        None => return Some(input.to_string()),
    };
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == DATA_PARAM)
        .map(|(_, v)| v.into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::share::decode;
    use crate::test_fixtures::naha_response;

    fn config(base_url: &str, path: &str) -> ShareConfig {
        ShareConfig {
            base_url: base_url.to_string(),
            path: path.to_string(),
        }
    }

    #[test]
    fn test_share_url_shape() {
        let plan = naha_response();
        let url = share_url(&config("https://trips.example.com", "/plan"), &plan).unwrap();

        assert!(url.starts_with("https://trips.example.com/plan?data="));
        let data = extract_data_param(&url).unwrap();
        assert_eq!(decode(&data), Some(plan));
    }

    #[test]
    fn test_share_url_keeps_base_path() {
        let plan = naha_response();

        let url = share_url(&config("https://host.example.com/app", "/plan"), &plan).unwrap();
        assert!(url.starts_with("https://host.example.com/app/plan?data="));

        let url = share_url(&config("https://host.example.com/app/", "plan"), &plan).unwrap();
        assert!(url.starts_with("https://host.example.com/app/plan?data="));

        let url = share_url(&config("http://localhost:3000/", "/plan"), &plan).unwrap();
        assert!(url.starts_with("http://localhost:3000/plan?data="));
    }

    #[test]
    fn test_share_url_rejects_bad_base() {
        let err = share_url(&config("not a url", "/plan"), &naha_response()).unwrap_err();
        assert!(matches!(err, ShareError::Url(_)));
    }

    #[test]
    fn test_extract_from_query_string_and_relative_path() {
        assert_eq!(extract_data_param("?data=abc&x=1").as_deref(), Some("abc"));
        assert_eq!(extract_data_param("/plan?x=1&data=abc#top").as_deref(), Some("abc"));
        assert_eq!(extract_data_param("data=a%2Db").as_deref(), Some("a-b"));
    }

    #[test]
    fn test_extract_missing_param() {
        assert_eq!(extract_data_param("https://trips.example.com/plan?x=1"), None);
        assert_eq!(extract_data_param("/plan?x=1"), None);
        assert_eq!(extract_data_param("  "), None);
    }

    #[test]
    fn test_extract_bare_value() {
        assert_eq!(extract_data_param(" eyJ2IjoxfQ ").as_deref(), Some("eyJ2IjoxfQ"));
    }

    #[test]
    fn test_extract_padded_standard_value() {
        use base64::Engine;
        use base64::engine::general_purpose::STANDARD;

        let padded = STANDARD.encode(br#"{"x":1}"#);
        assert_eq!(padded, "eyJ4IjoxfQ==");
        assert_eq!(extract_data_param(&padded).as_deref(), Some("eyJ4IjoxfQ=="));

        let plan_padded = STANDARD.encode(serde_json::to_vec(&naha_response()).unwrap());
        let extracted = extract_data_param(&plan_padded).unwrap();
        assert_eq!(decode(&extracted), Some(naha_response()));
    }
}
