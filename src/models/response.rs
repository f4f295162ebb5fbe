use axum::response::{Html, IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The model's answer, kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisResponse {
    pub answer: String,
}

impl AnalysisResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }

    /// Wraps the answer in a preformatted block. The answer is not escaped.
    pub fn to_html(&self) -> String {
        format!("<pre>{}</pre>", self.answer)
    }
}

impl IntoResponse for AnalysisResponse {
    fn into_response(self) -> Response {
        Html(self.to_html()).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub timestamp: DateTime<Utc>,
    pub uptime_seconds: i64,
    pub model: String,
    pub concurrency: ConcurrencyMetrics,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ConcurrencyMetrics {
    pub total_requests: u64,
    pub rejected_requests: u64,
    pub available_permits: usize,
}
