//! CV Analyzer Service
//!
//! Answers free-text questions about an uploaded PDF résumé by extracting its
//! text and handing it to a chat-completion model.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use state::AppState;
