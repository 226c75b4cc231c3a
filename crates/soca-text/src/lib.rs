//! soca-text
//!
//! Best-effort plain-text extraction from uploaded submission and criteria
//! documents. Plain-text formats are decoded directly, DOCX goes through
//! `docx-rs`, PDF through `pdf-extract`.

pub mod error;

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use tracing::{info, warn};

use crate::error::TextError;

/// Document formats text can be extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    PlainText,
    Markdown,
    Json,
    Docx,
    Pdf,
}

/// Map a file extension (without the dot) to a supported format.
pub fn document_format_for_extension(ext: &str) -> Option<DocumentFormat> {
    match ext.to_lowercase().as_str() {
        "txt" => Some(DocumentFormat::PlainText),
        "md" => Some(DocumentFormat::Markdown),
        "json" => Some(DocumentFormat::Json),
        "docx" => Some(DocumentFormat::Docx),
        "pdf" => Some(DocumentFormat::Pdf),
        _ => None,
    }
}

/// An uploaded document: its original file name and raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Read a document from disk, naming it after the file.
    pub fn read(path: &Path) -> Result<Self, TextError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, bytes })
    }

    /// Lower-cased extension without the dot, empty if there is none.
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

/// Turns an uploaded document into plain text.
pub trait TextExtractor {
    /// Never fails: problems are reported inside the returned text so the
    /// batch can carry on with the next document.
    fn extract_text(&self, file: &UploadedFile) -> String;
}

/// Extraction done in-process with no external services.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalTextExtractor;

impl TextExtractor for LocalTextExtractor {
    fn extract_text(&self, file: &UploadedFile) -> String {
        extract_text(file)
    }
}

/// Extract text, folding errors into a readable message.
pub fn extract_text(file: &UploadedFile) -> String {
    match try_extract_text(file) {
        Ok(text) => {
            info!(file = %file.name, text_len = text.len(), "text extracted");
            text
        }
        Err(TextError::UnsupportedFormat(ext)) => {
            warn!(file = %file.name, ext, "unsupported file type");
            if ext.is_empty() {
                "Unsupported file type: no extension".to_string()
            } else {
                format!("Unsupported file type: .{ext}")
            }
        }
        Err(e) => {
            warn!(file = %file.name, error = %e, "text extraction failed");
            format!("Error extracting text: {e}")
        }
    }
}

/// Extract text, returning the failure as a typed error.
pub fn try_extract_text(file: &UploadedFile) -> Result<String, TextError> {
    let ext = file.extension();
    let format =
        document_format_for_extension(&ext).ok_or_else(|| TextError::UnsupportedFormat(ext))?;

    match format {
        DocumentFormat::PlainText | DocumentFormat::Markdown | DocumentFormat::Json => {
            Ok(String::from_utf8_lossy(&file.bytes).into_owned())
        }
        DocumentFormat::Docx => docx_text(&file.bytes),
        DocumentFormat::Pdf => pdf_text(&file.bytes),
    }
}

/// Page text of a PDF.
///
/// `pdf-extract` panics on some malformed documents (missing font or
/// MediaBox entries) instead of returning an error, so the panic is caught
/// here and reported like any other decoding failure.
fn pdf_text(bytes: &[u8]) -> Result<String, TextError> {
    match panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text_from_mem(bytes))) {
        Ok(result) => result.map_err(|e| TextError::Pdf(e.to_string())),
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown cause".to_string());
            Err(TextError::Pdf(format!("malformed PDF ({reason})")))
        }
    }
}

/// Paragraph text of a DOCX body, one paragraph per line. Tables and other
/// non-paragraph blocks are skipped.
fn docx_text(bytes: &[u8]) -> Result<String, TextError> {
    let docx = docx_rs::read_docx(bytes).map_err(|e| TextError::Docx(e.to_string()))?;

    let lines: Vec<String> = docx
        .document
        .children
        .iter()
        .filter_map(|child| match child {
            DocumentChild::Paragraph(p) => Some(paragraph_text(p)),
            _ => None,
        })
        .collect();

    Ok(lines.join("\n"))
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

/// Run text of paragraph children, descending into hyperlinks.
fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            _ => {}
        }
    }
}
