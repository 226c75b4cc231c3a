use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextError {
    #[error("unsupported file type: .{0}")]
    UnsupportedFormat(String),

    #[error("DOCX parsing failed: {0}")]
    Docx(String),

    #[error("PDF parsing failed: {0}")]
    Pdf(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
