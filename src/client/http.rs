//! URL and header construction for the protocol client.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use reqwest::Url;

use crate::config::ClientConfig;
use crate::error::ConfigError;

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Strip trailing slashes and parse the base URL.
pub fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "expected an absolute http(s) URL".into(),
        });
    }
    Ok(url)
}

/// Build the headers sent with every request.
///
/// Custom headers are applied first so they can never replace the
/// content type or the API key header.
pub fn default_headers(config: &ClientConfig) -> Result<HeaderMap, ConfigError> {
    let mut headers = HeaderMap::new();
    for (name, value) in config.headers() {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| ConfigError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| ConfigError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }

    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(key) = config.api_key() {
        let mut value = HeaderValue::from_str(key).map_err(|e| ConfigError::InvalidHeader {
            name: API_KEY_HEADER.to_string(),
            reason: e.to_string(),
        })?;
        value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, value);
    }
    Ok(headers)
}

/// Append percent-encoded path segments (and an optional query) to `base`.
pub fn endpoint(base: &Url, segments: &[&str], query: &[(&str, &str)]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn trailing_slashes_are_stripped() {
        let url = normalize_base_url("http://localhost:6969/").unwrap();
        let joined = endpoint(&url, &["v1", "health"], &[]);
        assert_eq!(joined.as_str(), "http://localhost:6969/v1/health");
    }

    #[test]
    fn base_path_prefix_is_preserved() {
        let url = normalize_base_url("https://gateway.example/memory//").unwrap();
        let joined = endpoint(&url, &["v1", "stats"], &[("collection", "a b")]);
        assert_eq!(
            joined.as_str(),
            "https://gateway.example/memory/v1/stats?collection=a+b"
        );
    }

    #[test]
    fn path_segments_are_encoded() {
        let url = normalize_base_url("http://localhost:6969").unwrap();
        let joined = endpoint(&url, &["v1", "memory", "team", "id/with slash"], &[]);
        assert_eq!(
            joined.as_str(),
            "http://localhost:6969/v1/memory/team/id%2Fwith%20slash"
        );
    }

    #[test]
    fn rejects_relative_or_non_http_urls() {
        assert!(normalize_base_url("localhost:6969").is_err());
        assert!(normalize_base_url("not a url").is_err());
        assert!(normalize_base_url("ftp://files.example").is_err());
    }

    #[test]
    fn api_key_and_content_type_win_over_custom_headers() {
        let config = ClientConfig::builder()
            .api_key("dm_real")
            .headers(HashMap::from([
                ("X-API-Key".to_string(), "dm_spoofed".to_string()),
                ("content-type".to_string(), "text/plain".to_string()),
                ("x-trace".to_string(), "abc".to_string()),
            ]))
            .build();

        let headers = default_headers(&config).unwrap();
        assert_eq!(headers.get(API_KEY_HEADER).unwrap(), "dm_real");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(headers.get("x-trace").unwrap(), "abc");
    }

    #[test]
    fn no_api_key_header_without_key() {
        let headers = default_headers(&ClientConfig::default()).unwrap();
        assert!(headers.get(API_KEY_HEADER).is_none());
    }

    #[test]
    fn invalid_header_name_is_reported() {
        let config = ClientConfig::builder()
            .headers(HashMap::from([("bad header".to_string(), "v".to_string())]))
            .build();
        assert!(matches!(
            default_headers(&config),
            Err(ConfigError::InvalidHeader { name, .. }) if name == "bad header"
        ));
    }
}
