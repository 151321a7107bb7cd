use serde::Deserialize;
use thiserror::Error;

/// Error code the row API uses when a single-object request does not match exactly one row.
pub(crate) const SINGLE_ROW_MISMATCH: &str = "PGRST116";

#[derive(Debug, Error)]
pub enum BlogClientError {
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },
    #[error("Not found")]
    NotFound,
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

/// Error body shared by the row and storage APIs. Both only agree on `message`.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ApiErrorBody {
    pub(crate) fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    /// True when the store signals that a single-row request matched nothing.
    pub(crate) fn is_no_rows(&self) -> bool {
        self.code.as_deref() == Some(SINGLE_ROW_MISMATCH)
            && self.details.as_deref().is_some_and(reports_zero_rows)
    }

    fn describe(self, fallback: String) -> String {
        self.message.or(self.error).unwrap_or(fallback)
    }
}

fn reports_zero_rows(details: &str) -> bool {
    let words: Vec<&str> = details.split_whitespace().collect();
    words
        .windows(2)
        .any(|pair| pair[0] == "0" && pair[1].trim_end_matches(',') == "rows")
}

impl BlogClientError {
    pub async fn from_http_response(resp: reqwest::Response) -> Self {
        let status = resp.status().as_u16();
        let text = resp.text().await.unwrap_or_default();
        let body = ApiErrorBody::parse(&text);

        if body.is_no_rows() {
            return BlogClientError::NotFound;
        }

        BlogClientError::Http {
            status,
            message: body.describe(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_requires_code_and_zero_count() {
        let body = ApiErrorBody::parse(
            r#"{"code":"PGRST116","details":"The result contains 0 rows","message":"Cannot coerce the result to a single JSON object"}"#,
        );
        assert!(body.is_no_rows());

        let legacy = ApiErrorBody::parse(
            r#"{"code":"PGRST116","details":"Results contain 0 rows, application/vnd.pgrst.object+json requires 1 row"}"#,
        );
        assert!(legacy.is_no_rows());
    }

    #[test]
    fn many_rows_is_not_a_missing_row() {
        let body = ApiErrorBody::parse(
            r#"{"code":"PGRST116","details":"The result contains 10 rows","message":"Cannot coerce the result to a single JSON object"}"#,
        );
        assert!(!body.is_no_rows());
    }

    #[test]
    fn non_json_body_falls_back_to_raw_text() {
        let body = ApiErrorBody::parse("gateway timeout");
        assert!(!body.is_no_rows());
        assert_eq!(body.describe("gateway timeout".into()), "gateway timeout");
    }
}
