use reqwest::StatusCode;

/// Failure of a single geocode or forecast lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("No location found for '{query}'")]
    NotFound { query: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Upstream request failed with status {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error("Malformed upstream response: {0}")]
    Malformed(String),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::NotFound { .. })
    }
}

pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
