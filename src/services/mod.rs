pub mod analyzer;
pub mod llm_client;
pub mod pdf_processor;
pub mod prompter;

pub use analyzer::CvAnalyzer;
pub use llm_client::{ChatBackend, LlmError, OpenRouterClient};
pub use pdf_processor::PdfProcessor;
pub use prompter::Prompter;
