use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{AnalysisRequest, AnalysisResponse, UploadedDocument};
use crate::services::llm_client::ChatBackend;
use crate::services::pdf_processor::PdfProcessor;
use crate::services::prompter::Prompter;

/// Runs one upload through the extension gate, extraction, the length gate
/// and finally the model.
pub struct CvAnalyzer {
    processor: PdfProcessor,
    prompter: Prompter,
}

impl CvAnalyzer {
    pub fn new(backend: Arc<dyn ChatBackend>, timeout: Duration) -> Self {
        Self {
            processor: PdfProcessor::new(),
            prompter: Prompter::new(backend, timeout),
        }
    }

    pub async fn analyze(
        &self,
        document: UploadedDocument,
        question: String,
    ) -> AppResult<AnalysisResponse> {
        if !document.has_pdf_extension() {
            info!(file_name = %document.name, "Rejected upload without .pdf extension");
            return Err(AppError::UnsupportedFormat {
                file_name: document.name,
            });
        }

        let extraction = self.processor.extract_text(document.content).await?;

        info!(
            file_name = %document.name,
            pages = extraction.pages,
            text_length = extraction.text.char_count(),
            processing_time_ms = extraction.processing_time_ms,
            "Document text extracted"
        );

        if !extraction.text.is_sufficient() {
            info!(file_name = %document.name, "Extracted text below minimum length");
            return Err(AppError::ExtractionInsufficient {
                length: extraction.text.char_count(),
            });
        }

        let request = AnalysisRequest::new(extraction.text, question);
        self.prompter.ask(&request).await
    }
}
