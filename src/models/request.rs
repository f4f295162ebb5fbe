use bytes::Bytes;

/// Minimum number of characters a document must yield to be worth analyzing.
pub const MIN_EXTRACTED_CHARS: usize = 50;

const PDF_EXTENSION: &str = ".pdf";

#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub name: String,
    pub size: usize,
    pub content: Bytes,
}

impl UploadedDocument {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        let content = content.into();
        Self {
            name: name.into(),
            size: content.len(),
            content,
        }
    }

    /// Suffix check on the declared name only; the bytes are not inspected.
    pub fn has_pdf_extension(&self) -> bool {
        self.name.ends_with(PDF_EXTENSION)
    }
}

/// Plain text of a whole document, pages concatenated in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedText(String);

impl ExtractedText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in characters, not bytes.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_sufficient(&self) -> bool {
        self.char_count() >= MIN_EXTRACTED_CHARS
    }
}

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub text: ExtractedText,
    pub question: String,
}

impl AnalysisRequest {
    pub fn new(text: ExtractedText, question: impl Into<String>) -> Self {
        Self {
            text,
            question: question.into(),
        }
    }
}
