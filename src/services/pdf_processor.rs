use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use bytes::Bytes;
use lopdf::Document;

use crate::error::{AppError, AppResult};
use crate::models::ExtractedText;

/// lopdf emits `?<Encoding> Unimplemented?` for fonts it cannot decode.
const UNDECODED_MARKER: &str = "Unimplemented?";

pub struct PdfProcessor;

#[derive(Debug)]
pub struct ExtractionResult {
    pub text: ExtractedText,
    pub pages: usize,
    pub processing_time_ms: u64,
}

impl PdfProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts the text of every page on the blocking pool.
    pub async fn extract_text(&self, content: Bytes) -> AppResult<ExtractionResult> {
        let start = Instant::now();

        tracing::info!("Starting PDF text extraction ({} bytes)", content.len());

        let (text, pages) =
            tokio::task::spawn_blocking(move || extract_pages(&content)).await??;

        Ok(ExtractionResult {
            text,
            pages,
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Concatenates page text in page order and trims the result.
///
/// Pages are decoded with pdf-extract, which follows ToUnicode maps (Type0 /
/// Identity-H fonts). If it fails on a document lopdf can parse, lopdf's own
/// per-page extraction is used instead. Either way a page that cannot be
/// decoded contributes nothing; only a document that fails to parse at all
/// is an error.
pub fn extract_pages(pdf_content: &[u8]) -> AppResult<(ExtractedText, usize)> {
    let doc = Document::load_mem(pdf_content)
        .map_err(|e| AppError::document_format(e.to_string()))?;
    let page_count = doc.get_pages().len();

    let segments = match decode_with_pdf_extract(pdf_content) {
        Ok(segments) => segments,
        Err(reason) => {
            tracing::warn!("pdf-extract failed: {}, falling back to lopdf", reason);
            decode_with_lopdf(&doc)
        }
    };

    let text: String = segments.concat();
    Ok((ExtractedText::new(text.trim()), page_count))
}

fn decode_with_pdf_extract(pdf_content: &[u8]) -> Result<Vec<String>, String> {
    // pdf-extract panics on some malformed fonts
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(pdf_content)
    }));

    match outcome {
        Ok(Ok(pages)) => Ok(pages),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("extractor panicked".to_string()),
    }
}

fn decode_with_lopdf(doc: &Document) -> Vec<String> {
    doc.get_pages()
        .keys()
        .map(|&page_number| match doc.extract_text(&[page_number]) {
            Ok(page_text) => strip_undecoded(&page_text),
            Err(e) => {
                tracing::debug!(page = page_number, error = %e, "Page yielded no text");
                String::new()
            }
        })
        .collect()
}

/// Removes lopdf's undecoded-font placeholders, keeping any text around them.
pub fn strip_undecoded(page_text: &str) -> String {
    let mut out = String::with_capacity(page_text.len());
    let mut rest = page_text;
    while let Some(end) = rest.find(UNDECODED_MARKER) {
        let head = &rest[..end];
        let start = head.rfind('?').unwrap_or(end);
        out.push_str(&head[..start]);
        rest = &rest[end + UNDECODED_MARKER.len()..];
    }
    out.push_str(rest);
    out
}

impl Default for PdfProcessor {
    fn default() -> Self {
        Self::new()
    }
}
