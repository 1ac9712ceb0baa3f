//! Result type returned by a successful conversion.

use crate::pipeline::layout::Extent;
use serde::Serialize;
use std::path::PathBuf;

/// Everything a caller needs to know about a finished run.
///
/// A value of this type always describes at least one page: a document that
/// renders to nothing is reported as [`crate::Pdf2PptxError::NoPagesRendered`]
/// instead.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionResult {
    /// The PDF that was converted.
    pub input: PathBuf,

    /// Page images in page order (`pages/page_001.jpg`, …).
    pub images: Vec<PathBuf>,

    /// The saved presentation.
    pub output: PathBuf,

    /// Pixel size of the first page image; this fixes the canvas.
    pub first_page_px: (u32, u32),

    /// Resolution used for rasterising and for sizing the canvas.
    pub dpi: u32,

    /// Slide canvas in EMU.
    pub canvas: Extent,

    pub slide_count: usize,

    /// Wall-clock time of the whole run.
    pub elapsed_ms: u64,
}

impl ConversionResult {
    /// Directory holding the page images and the presentation.
    pub fn output_dir(&self) -> Option<&std::path::Path> {
        self.output.parent()
    }
}
