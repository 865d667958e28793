// One-legged OAuth1 request signing (RFC 5849, HMAC-SHA1).
//
// The search API authenticates every request with the consumer and access
// token credentials from the config file. There is no authorization
// handshake: each request gets a fresh nonce and timestamp, a signature is
// computed over the method, base URL and all parameters, and the result is
// appended to the query string.

use crate::config::Credentials;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// Everything except the RFC 3986 unreserved set gets escaped.
const OAUTH_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

/// Percent-encode `s` the way OAuth1 requires: UTF-8 bytes, upper-case hex,
/// only unreserved characters left as-is.
pub fn encode(s: &str) -> String {
    utf8_percent_encode(s, OAUTH_ENCODE_SET).to_string()
}

/// Signs GET requests with a consumer/token credential pair.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
}

impl Signer {
    pub fn new(credentials: Credentials) -> Self {
        Signer { credentials }
    }

    /// Sign a GET to `base` with `params`, using a fresh nonce and the
    /// current time.
    pub fn sign_get(&self, base: &Url, params: &[(&str, String)]) -> Url {
        let nonce = generate_nonce(&mut rand::thread_rng());
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.sign_get_with(base, params, &nonce, timestamp)
    }

    /// Same as [`Signer::sign_get`] with a caller-supplied nonce and
    /// timestamp.
    pub fn sign_get_with(
        &self,
        base: &Url,
        params: &[(&str, String)],
        nonce: &str,
        timestamp: u64,
    ) -> Url {
        let creds = &self.credentials;
        let mut all: Vec<(String, String)> = params
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect();
        all.extend([
            ("oauth_consumer_key".to_string(), creds.consumer_key.clone()),
            ("oauth_token".to_string(), creds.token.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]);

        let mut encoded: Vec<(String, String)> =
            all.iter().map(|(k, v)| (encode(k), encode(v))).collect();
        encoded.sort();

        let normalized = join_pairs(&encoded);
        let base_uri = base_string_uri(base);
        let signature = self.signature("GET", &base_uri, &normalized);
        tracing::debug!(%base_uri, %nonce, timestamp, "signed request");

        encoded.push(("oauth_signature".to_string(), encode(&signature)));
        let mut url = base.clone();
        url.set_query(Some(&join_pairs(&encoded)));
        url
    }

    fn signature(&self, method: &str, base_uri: &str, normalized: &str) -> String {
        let base_string = format!("{method}&{}&{}", encode(base_uri), encode(normalized));
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.token_secret)
        );
        let mut mac =
            HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
        mac.update(base_string.as_bytes());
        STANDARD.encode(mac.finalize().into_bytes())
    }
}

/// Random alphanumeric nonce for one request.
pub fn generate_nonce<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

fn join_pairs(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}

/// Scheme, host, non-default port and path; no query or fragment.
fn base_string_uri(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_ascii_lowercase();
    let mut out = format!("{}://{host}", url.scheme());
    if let Some(port) = url.port() {
        out.push_str(&format!(":{port}"));
    }
    out.push_str(url.path());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> Signer {
        Signer::new(Credentials {
            consumer_key: "ck".into(),
            consumer_secret: "cs".into(),
            token: "tok".into(),
            token_secret: "ts".into(),
        })
    }

    fn search_params() -> Vec<(&'static str, String)> {
        vec![
            ("location", "94110".into()),
            ("term", "Mexican".into()),
            ("limit", "20".into()),
            ("radius_filter", "10000".into()),
            ("category_filter", "food,restaurants".into()),
        ]
    }

    #[test]
    fn encodes_reserved_and_utf8() {
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("food,restaurants"), "food%2Crestaurants");
        assert_eq!(encode("San Francisco"), "San%20Francisco");
        assert_eq!(encode("Café"), "Caf%C3%A9");
    }

    #[test]
    fn signature_matches_known_vector() {
        let base = Url::parse("https://api.yelp.com/v2/search").unwrap();
        let url = signer().sign_get_with(&base, &search_params(), "abc123", 1_400_000_000);
        let sig = url
            .query_pairs()
            .find(|(k, _)| k == "oauth_signature")
            .map(|(_, v)| v.into_owned())
            .unwrap();
        assert_eq!(sig, "WqYrKwuVGWwpkVnzpVNYbyxacyk=");
    }

    #[test]
    fn base_uri_drops_query_and_default_port() {
        let url = Url::parse("HTTPS://API.Example.com:443/v2/search?x=1").unwrap();
        assert_eq!(base_string_uri(&url), "https://api.example.com/v2/search");
        let url = Url::parse("http://localhost:8080/search").unwrap();
        assert_eq!(base_string_uri(&url), "http://localhost:8080/search");
    }

    #[test]
    fn nonce_is_alphanumeric() {
        let nonce = generate_nonce(&mut rand::thread_rng());
        assert_eq!(nonce.len(), NONCE_LEN);
        assert!(nonce.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
