use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::AppResult;
use crate::models::{AnalysisRequest, AnalysisResponse};
use crate::services::llm_client::{ChatBackend, ChatCompletionRequest, ChatMessage};

pub const MODEL: &str = "openai/gpt-4.1-mini";
pub const TEMPERATURE: f64 = 0.3;

pub const BASE_SYSTEM_PROMPT: &str = "
You are a professional CV analysis AI.

Rules:
- Only use data from the CV
- Answer in Markdown
- Be concise and clear

CV content:
";

/// Instruction block followed by the document text.
pub fn build_system_context(extracted_text: &str) -> String {
    format!("{}\n{}", BASE_SYSTEM_PROMPT, extracted_text)
}

pub fn build_completion_request(request: &AnalysisRequest) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: MODEL.to_string(),
        messages: vec![
            ChatMessage::system(build_system_context(request.text.as_str())),
            ChatMessage::user(request.question.clone()),
        ],
        temperature: TEMPERATURE,
    }
}

pub struct Prompter {
    backend: Arc<dyn ChatBackend>,
    timeout: Duration,
}

impl Prompter {
    pub fn new(backend: Arc<dyn ChatBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// One backend call, bounded by the configured timeout.
    pub async fn ask(&self, request: &AnalysisRequest) -> AppResult<AnalysisResponse> {
        let completion = build_completion_request(request);

        info!(
            model = MODEL,
            context_length = completion.messages[0].content.len(),
            question_length = request.question.len(),
            "Sending completion request"
        );

        let answer = tokio::time::timeout(self.timeout, self.backend.complete(&completion)).await??;

        Ok(AnalysisResponse::new(answer))
    }
}
