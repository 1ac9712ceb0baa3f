//! PDF rasterisation: render every page to a JPEG file via pdfium.
//!
//! The pdfium dependency sits behind two small traits, [`RasterBackend`]
//! (opens a document) and [`RasterDocument`] (counts and renders pages), so
//! the rest of the pipeline can be exercised without a pdfium shared library
//! present.
//!
//! Pages are rendered at `dpi / 72` times their natural size: PDF user space
//! is defined at 72 units per inch, so that factor yields exactly `dpi`
//! pixels per physical inch.

use crate::error::Pdf2PptxError;
use crate::pipeline::encode::{self, PAGE_EXTENSION};
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// PDF user-space units per inch.
pub const PDF_POINTS_PER_INCH: f32 = 72.0;

/// Opens PDF documents for rendering.
pub trait RasterBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PptxError>;
}

/// An open document. Dropping it releases the underlying handle.
pub trait RasterDocument {
    fn page_count(&self) -> usize;

    /// Render page `index` (0-based) at `scale` × its natural size.
    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PptxError>;
}

// ── pdfium backend ───────────────────────────────────────────────────────

/// [`RasterBackend`] backed by a bound pdfium library.
pub struct PdfiumBackend {
    pdfium: Pdfium,
}

impl PdfiumBackend {
    /// Bind to pdfium, trying (in order) `PDFIUM_LIB_PATH`, the directory of
    /// the running executable, the current directory, and the system library.
    pub fn bind() -> Result<Self, Pdf2PptxError> {
        for candidate in library_candidates() {
            if !candidate.exists() {
                continue;
            }
            match Pdfium::bind_to_library(&candidate) {
                Ok(bindings) => {
                    debug!("Bound pdfium from {}", candidate.display());
                    return Ok(Self {
                        pdfium: Pdfium::new(bindings),
                    });
                }
                Err(e) => warn!("Could not bind pdfium at {}: {}", candidate.display(), e),
            }
        }

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| Pdf2PptxError::PdfiumBindingFailed(e.to_string()))?;
        debug!("Bound system pdfium library");
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }
}

impl RasterBackend for PdfiumBackend {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PptxError> {
        let document = self.pdfium.load_pdf_from_file(path, None).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                Pdf2PptxError::PasswordRequired {
                    path: path.to_path_buf(),
                }
            } else {
                Pdf2PptxError::CorruptPdf {
                    path: path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;
        Ok(Box::new(PdfiumDocument { document }))
    }
}

struct PdfiumDocument<'a> {
    document: PdfDocument<'a>,
}

impl RasterDocument for PdfiumDocument<'_> {
    fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PptxError> {
        let failed = |detail: String| Pdf2PptxError::RasterisationFailed {
            page: index + 1,
            detail,
        };

        let page_index = u16::try_from(index).map_err(|_| failed("page index overflow".into()))?;
        let page = self
            .document
            .pages()
            .get(page_index)
            .map_err(|e| failed(format!("{:?}", e)))?;

        let render_config = PdfRenderConfig::new().scale_page_by_factor(scale);
        let bitmap = page
            .render_with_config(&render_config)
            .map_err(|e| failed(format!("{:?}", e)))?;

        Ok(bitmap.as_image())
    }
}

/// Platform file name of the pdfium shared library.
fn platform_library_name() -> &'static str {
    if cfg!(target_os = "windows") {
        "pdfium.dll"
    } else if cfg!(target_os = "macos") {
        "libpdfium.dylib"
    } else {
        "libpdfium.so"
    }
}

fn library_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(p) = std::env::var_os("PDFIUM_LIB_PATH") {
        candidates.push(PathBuf::from(p));
    }
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        candidates.push(dir.join(platform_library_name()));
    }
    candidates.push(PathBuf::from(".").join(platform_library_name()));
    candidates
}

// ── Rasterisation ────────────────────────────────────────────────────────

/// File name for the 1-indexed page `index`, e.g. `page_007.jpg`.
pub fn page_file_name(index: usize) -> String {
    format!("page_{index:03}.{PAGE_EXTENSION}")
}

/// True for names produced by [`page_file_name`].
pub fn is_page_file_name(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("page_") else {
        return false;
    };
    let Some((digits, ext)) = rest.split_once('.') else {
        return false;
    };
    digits.len() >= 3 && digits.bytes().all(|b| b.is_ascii_digit()) && ext == PAGE_EXTENSION
}

/// Remove page images left in `dir` by an earlier run. Returns how many were removed.
///
/// Only files matching [`is_page_file_name`] are touched. A missing `dir` is
/// not an error.
pub fn clear_stale_pages(dir: &Path) -> Result<usize, Pdf2PptxError> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => {
            return Err(Pdf2PptxError::OutputWriteFailed {
                path: dir.to_path_buf(),
                source: e,
            })
        }
    };

    let mut removed = 0;
    for entry in entries.flatten() {
        let path = entry.path();
        let is_page = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(is_page_file_name);
        if is_page && path.is_file() {
            std::fs::remove_file(&path)
                .map_err(|e| Pdf2PptxError::OutputWriteFailed { path, source: e })?;
            removed += 1;
        }
    }

    if removed > 0 {
        debug!("Removed {} stale page image(s) from {}", removed, dir.display());
    }
    Ok(removed)
}

/// Render every page of `input` into `out_dir` as `page_NNN.jpg`.
///
/// The document is opened before `out_dir` is created, so an unreadable PDF
/// leaves the filesystem untouched. See [`render_document`] for the rest.
pub fn rasterize(
    backend: &dyn RasterBackend,
    input: &Path,
    out_dir: &Path,
    dpi: u32,
    jpeg_quality: u8,
    on_page_done: impl FnMut(usize, usize),
) -> Result<Vec<PathBuf>, Pdf2PptxError> {
    let document = backend.open(input)?;
    render_document(document.as_ref(), out_dir, dpi, jpeg_quality, on_page_done)
}

/// Render every page of an already opened `document` into `out_dir`.
///
/// `out_dir` is created if absent. After each page is written,
/// `on_page_done(page_num, total_pages)` is called with the 1-based page
/// number. Pages are processed strictly in document order and the returned
/// paths preserve that order.
///
/// Any failure aborts the whole run; no partial list is returned.
pub fn render_document(
    document: &dyn RasterDocument,
    out_dir: &Path,
    dpi: u32,
    jpeg_quality: u8,
    mut on_page_done: impl FnMut(usize, usize),
) -> Result<Vec<PathBuf>, Pdf2PptxError> {
    let total_pages = document.page_count();
    info!("PDF loaded: {} pages", total_pages);

    std::fs::create_dir_all(out_dir).map_err(|e| Pdf2PptxError::OutputWriteFailed {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    let scale = dpi as f32 / PDF_POINTS_PER_INCH;
    let mut images = Vec::with_capacity(total_pages);

    for idx in 0..total_pages {
        let page_num = idx + 1;
        let image = document.render_page(idx, scale)?;
        debug!(
            "Rendered page {} → {}x{} px",
            page_num,
            image.width(),
            image.height()
        );

        let path = out_dir.join(page_file_name(page_num));
        encode::write_jpeg(&image, &path, jpeg_quality)?;
        images.push(path);

        on_page_done(page_num, total_pages);
    }

    Ok(images)
}
