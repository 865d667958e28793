// Search API client: a small blocking HTTP client that signs each request
// with OAuth1 and decodes the restaurant search response.

use crate::config::Config;
use crate::error::{ErrorFields, Result, WheelError};
use crate::oauth::Signer;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

pub const DEFAULT_RADIUS_METERS: u32 = 10_000;

/// The search API never returns more than 20 businesses per page.
pub const RESULT_LIMIT: u32 = 20;

const CATEGORY_FILTER: &str = "food,restaurants";

/// What to search for and where.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub location: String,
    pub term: String,
    pub radius_meters: u32,
}

impl SearchQuery {
    pub fn new(location: impl Into<String>, term: impl Into<String>) -> Self {
        SearchQuery {
            location: location.into(),
            term: term.into(),
            radius_meters: DEFAULT_RADIUS_METERS,
        }
    }

    pub fn with_radius(mut self, radius_meters: u32) -> Self {
        self.radius_meters = radius_meters;
        self
    }

    /// Query string parameters, before signing.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("location", self.location.clone()),
            ("term", self.term.clone()),
            ("limit", RESULT_LIMIT.to_string()),
            ("radius_filter", self.radius_meters.to_string()),
            ("category_filter", CATEGORY_FILTER.to_string()),
        ]
    }
}

/// A single restaurant from the search results.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Business {
    pub name: String,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u64,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub url: String,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Location {
    #[serde(default)]
    pub display_address: Vec<String>,
}

/// A decoded search response: either a list of businesses or the fields of
/// the API's error object.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResponse {
    Results(Vec<Business>),
    Error(ErrorFields),
}

impl SearchResponse {
    /// Decode a response body. Any body without a `businesses` field is an
    /// error payload; its `error` object (or the whole body when there is
    /// none) is flattened into key/value pairs.
    pub fn from_value(mut body: Value) -> Result<Self> {
        if let Some(businesses) = body.get_mut("businesses").map(Value::take) {
            let businesses: Vec<Business> = serde_json::from_value(businesses)?;
            return Ok(SearchResponse::Results(businesses));
        }
        let error = match body.get_mut("error").map(Value::take) {
            Some(error) => error,
            None => body,
        };
        Ok(SearchResponse::Error(error_fields(error)))
    }

    pub fn from_json(body: &str) -> Result<Self> {
        Self::from_slice(body.as_bytes())
    }

    /// Decode raw response bytes. Invalid UTF-8 is a `Json` error rather
    /// than being replaced.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        Self::from_value(serde_json::from_slice(body)?)
    }
}

fn error_fields(error: Value) -> ErrorFields {
    match error {
        Value::Object(map) => map
            .into_iter()
            .map(|(k, v)| (k, display_value(v)))
            .collect(),
        Value::Null => Vec::new(),
        other => vec![("error".to_string(), display_value(other))],
    }
}

fn display_value(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Anything that can run a restaurant search. The HTTP client is the real
/// implementation; tests substitute canned responses.
pub trait SearchBackend {
    fn search(&self, query: &SearchQuery) -> Result<SearchResponse>;
}

impl<T: SearchBackend + ?Sized> SearchBackend for &T {
    fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        (**self).search(query)
    }
}

/// Blocking client for the restaurant search endpoint.
#[derive(Debug, Clone)]
pub struct SearchClient {
    client: Client,
    base_url: Url,
    signer: Signer,
}

impl SearchClient {
    /// Build a client from the loaded configuration: endpoint, credentials
    /// and request timeout.
    pub fn from_config(config: &Config) -> Result<Self> {
        let base_url = Url::parse(&config.search_url).map_err(|e| WheelError::Config {
            message: format!("invalid search_url '{}': {e}", config.search_url),
        })?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(SearchClient {
            client,
            base_url,
            signer: Signer::new(config.credentials.clone()),
        })
    }

    /// The fully signed URL for `query`, with a fresh nonce and timestamp.
    pub fn signed_url(&self, query: &SearchQuery) -> Url {
        self.signer.sign_get(&self.base_url, &query.params())
    }
}

impl SearchBackend for SearchClient {
    fn search(&self, query: &SearchQuery) -> Result<SearchResponse> {
        let url = self.signed_url(query);
        tracing::debug!(%url, "sending search request");
        let res = self.client.get(url).send()?;
        let status = res.status();
        // Error payloads come back with non-2xx statuses; the body decides.
        let body = res.bytes()?;
        tracing::debug!(%status, body = %String::from_utf8_lossy(&body), "search response");
        SearchResponse::from_slice(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_businesses() {
        let resp = SearchResponse::from_json(
            r#"{"total": 1, "businesses": [{"name": "Taqueria", "rating": 4.0,
                "review_count": 3, "url": "http://t",
                "location": {"display_address": ["1 Main St"], "city": "X"}}]}"#,
        )
        .unwrap();
        match resp {
            SearchResponse::Results(list) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].name, "Taqueria");
                assert_eq!(list[0].location.display_address, vec!["1 Main St"]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_businesses_is_still_results() {
        let resp = SearchResponse::from_json(r#"{"businesses": []}"#).unwrap();
        assert_eq!(resp, SearchResponse::Results(vec![]));
    }

    #[test]
    fn error_object_fields_are_flattened() {
        let resp = SearchResponse::from_json(
            r#"{"error": {"id": "UNAVAILABLE_FOR_LOCATION", "text": "Nope", "field": null}}"#,
        )
        .unwrap();
        let SearchResponse::Error(fields) = resp else {
            panic!("expected error payload");
        };
        assert!(fields.contains(&("id".into(), "UNAVAILABLE_FOR_LOCATION".into())));
        assert!(fields.contains(&("text".into(), "Nope".into())));
        assert!(fields.contains(&("field".into(), "null".into())));
    }

    #[test]
    fn body_without_error_object_is_reported_whole() {
        let resp = SearchResponse::from_json(r#"{"message": "bad gateway"}"#).unwrap();
        assert_eq!(
            resp,
            SearchResponse::Error(vec![("message".into(), "bad gateway".into())])
        );
    }

    #[test]
    fn malformed_json_is_an_error() {
        assert!(matches!(
            SearchResponse::from_json("<html>"),
            Err(WheelError::Json(_))
        ));
    }

    #[test]
    fn invalid_utf8_in_body_is_an_error() {
        let mut body = br#"{"businesses": [{"name": "Caf"#.to_vec();
        body.extend_from_slice(&[0xC3, 0x28]);
        body.extend_from_slice(br#"", "url": "http://x"}]}"#);
        assert!(matches!(
            SearchResponse::from_slice(&body),
            Err(WheelError::Json(_))
        ));
    }

    #[test]
    fn utf8_bytes_decode_unchanged() {
        let body = r#"{"businesses": [{"name": "Café Ñ", "url": "http://x"}]}"#;
        let SearchResponse::Results(list) = SearchResponse::from_slice(body.as_bytes()).unwrap()
        else {
            panic!("expected results");
        };
        assert_eq!(list[0].name, "Café Ñ");
    }

    #[test]
    fn default_radius_is_ten_kilometers() {
        assert_eq!(SearchQuery::new("94110", "Thai").radius_meters, DEFAULT_RADIUS_METERS);
        assert_eq!(DEFAULT_RADIUS_METERS, 10_000);
    }

    #[test]
    fn query_params_carry_fixed_limit_and_filter() {
        let params = SearchQuery::new("Springfield", "Thai").with_radius(500).params();
        assert!(params.contains(&("limit", "20".into())));
        assert!(params.contains(&("radius_filter", "500".into())));
        assert!(params.contains(&("category_filter", "food,restaurants".into())));
        assert!(params.contains(&("term", "Thai".into())));
    }
}
