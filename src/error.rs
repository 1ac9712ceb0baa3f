//! Error types for the pdf2pptx library.
//!
//! Every failure is fatal to the run: a conversion either produces a
//! complete [`crate::output::ConversionResult`] or returns one
//! [`Pdf2PptxError`]. Nothing is retried; there is no transient class of
//! failure in this domain (a page that fails to render once will fail again).
//!
//! The variants are grouped by the phase that raises them so callers (and
//! the interactive shell) can tell an unusable input apart from a full disk.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2pptx library.
#[derive(Debug, Error)]
pub enum Pdf2PptxError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF is encrypted; password-protected documents are not supported.
    #[error("PDF '{path}' is encrypted and requires a password.")]
    PasswordRequired { path: PathBuf },

    /// The rasterisation backend failed on a specific page (1-indexed).
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// The document opened fine but produced no page images.
    #[error("No page images were produced for '{path}' (the document has no renderable pages)")]
    NoPagesRendered { path: PathBuf },

    // ── Image errors ──────────────────────────────────────────────────────
    /// A rendered page could not be encoded or written to disk.
    #[error("Failed to write page image '{path}': {source}")]
    ImageWriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A page image could not be read back (dimensions or bytes).
    #[error("Failed to read page image '{path}': {detail}")]
    ImageReadFailed { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create a directory or write the output presentation.
    #[error("Failed to write output '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The presentation container could not be assembled.
    #[error("Failed to build presentation package: {0}")]
    PackageFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Place the platform library next to the pdf2pptx executable.\n\
  • Install pdfium system-wide.\n\
Pre-built libraries: https://github.com/bblanchon/pdfium-binaries/releases\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<zip::result::ZipError> for Pdf2PptxError {
    fn from(e: zip::result::ZipError) -> Self {
        Pdf2PptxError::PackageFailed(e.to_string())
    }
}

impl Pdf2PptxError {
    /// True for errors raised before any output is written.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Pdf2PptxError::FileNotFound { .. }
                | Pdf2PptxError::PermissionDenied { .. }
                | Pdf2PptxError::NotAPdf { .. }
                | Pdf2PptxError::CorruptPdf { .. }
                | Pdf2PptxError::PasswordRequired { .. }
        )
    }
}
