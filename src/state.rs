use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::Config;
use crate::middleware::RequestLimiter;
use crate::services::{ChatBackend, CvAnalyzer};

/// Shared application state injected into the route handlers.
#[derive(Clone)]
pub struct AppState {
    pub analyzer: Arc<CvAnalyzer>,
    pub limiter: RequestLimiter,
    pub max_file_size_mb: usize,
    pub max_file_size_bytes: usize,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: &Config, backend: Arc<dyn ChatBackend>) -> Self {
        Self {
            analyzer: Arc::new(CvAnalyzer::new(backend, config.request_timeout())),
            limiter: RequestLimiter::new(config.max_concurrent_requests),
            max_file_size_mb: config.max_file_size_mb,
            max_file_size_bytes: config.max_file_size_bytes(),
            started_at: Utc::now(),
        }
    }
}
