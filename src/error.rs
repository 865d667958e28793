// Error types for the library half of the crate. The binary wraps these in
// `anyhow` so `main` can attach context and report them in one place.

use thiserror::Error;

/// Key/value pairs pulled out of the search API's `error` object, kept in
/// the order they were decoded.
pub type ErrorFields = Vec<(String, String)>;

#[derive(Error, Debug)]
pub enum WheelError {
    #[error("{}", format_upstream(.fields))]
    UpstreamApi { fields: ErrorFields },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("The '{list}' list in the configuration is empty")]
    EmptyList { list: &'static str },

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, WheelError>;

/// Render the upstream error object one `key: value` pair per line.
fn format_upstream(fields: &ErrorFields) -> String {
    let mut out = String::from("The search API returned an error:");
    if fields.is_empty() {
        out.push_str(" (no details provided)");
    }
    for (key, value) in fields {
        out.push_str(&format!("\n  {key}: {value}"));
    }
    out
}
