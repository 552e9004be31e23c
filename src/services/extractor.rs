//! Converts uploaded files into plain text.
//!
//! Plain text is decoded as strict UTF-8. PDFs go through `pdf-extract`
//! one page at a time and the pages are joined with `\n`. Any other type
//! yields an empty [`ExtractedDocument`] marked [`DocumentKind::Unsupported`].

use std::panic;

use thiserror::Error;

pub const PDF_MIME: &str = "application/pdf";
pub const TEXT_MIME: &str = "text/plain";

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("Invalid UTF-8 in text file: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error("Failed to read PDF: {0}")]
    Pdf(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Pdf,
    PlainText,
    Unsupported,
}

impl DocumentKind {
    /// Classifies by declared MIME type, falling back to the file extension
    /// when the client sent no usable type.
    pub fn detect(mime_type: &str, file_name: &str) -> Self {
        let essence = mime_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            PDF_MIME => DocumentKind::Pdf,
            TEXT_MIME => DocumentKind::PlainText,
            "" | "application/octet-stream" => Self::from_extension(file_name),
            _ => DocumentKind::Unsupported,
        }
    }

    fn from_extension(file_name: &str) -> Self {
        match mime_from_extension(file_name) {
            PDF_MIME => DocumentKind::Pdf,
            TEXT_MIME => DocumentKind::PlainText,
            _ => DocumentKind::Unsupported,
        }
    }
}

pub fn mime_from_extension(file_name: &str) -> &'static str {
    let extension = match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_ascii_lowercase(),
        None => String::new(),
    };

    match extension.as_str() {
        "pdf" => PDF_MIME,
        "txt" => TEXT_MIME,
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub name: String,
    pub mime_type: String,
    pub kind: DocumentKind,
    pub text: String,
}

impl ExtractedDocument {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

pub fn extract(name: &str, mime_type: &str, bytes: &[u8]) -> Result<ExtractedDocument, ExtractionError> {
    let kind = DocumentKind::detect(mime_type, name);

    let text = match kind {
        DocumentKind::PlainText => String::from_utf8(bytes.to_vec())?,
        DocumentKind::Pdf => join_pages(extract_pdf_pages(bytes)?),
        DocumentKind::Unsupported => String::new(),
    };

    Ok(ExtractedDocument {
        name: name.to_string(),
        mime_type: mime_type.to_string(),
        kind,
        text,
    })
}

/// Extracts every file in order. A failure stays in its own slot.
pub fn extract_all(files: &[UploadedFile]) -> Vec<Result<ExtractedDocument, ExtractionError>> {
    files
        .iter()
        .map(|file| {
            let result = extract(&file.name, &file.mime_type, &file.bytes);
            if let Err(e) = &result {
                tracing::warn!(file = %file.name, error = %e, "extraction failed");
            }
            result
        })
        .collect()
}

pub fn join_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pages
        .into_iter()
        .map(|page| page.as_ref().to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// pdf-extract pads each page with the line breaks of its layout pass.
fn strip_layout_breaks(page: &str) -> &str {
    page.trim_matches(|c| c == '\n' || c == '\r')
}

fn extract_pdf_pages(bytes: &[u8]) -> Result<Vec<String>, ExtractionError> {
    // pdf-extract panics on some malformed content streams.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes)) {
        Ok(Ok(pages)) => Ok(pages.iter().map(|page| strip_layout_breaks(page).to_string()).collect()),
        Ok(Err(e)) => Err(ExtractionError::Pdf(e.to_string())),
        Err(payload) => {
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "PDF parser aborted".to_string());
            Err(ExtractionError::Pdf(message))
        }
    }
}

/// First `limit` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
