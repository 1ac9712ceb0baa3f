//! Configuration types for PDF-to-PPTX conversion.
//!
//! All conversion behaviour is controlled through [`ConversionConfig`], built
//! via its [`ConversionConfigBuilder`]. The same config can be reused for any
//! number of runs; nothing in it is mutated by a conversion.

use crate::error::Pdf2PptxError;
use crate::pipeline::render::RasterBackend;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Default rasterisation resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 200;

/// Default JPEG quality for page images.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Configuration for a PDF-to-PPTX conversion.
///
/// Built via [`ConversionConfig::builder()`] or using
/// [`ConversionConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2pptx::ConversionConfig;
///
/// let config = ConversionConfig::builder()
///     .dpi(150)
///     .output_root("/tmp/decks")
///     .open_output_folder(false)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 150);
/// ```
#[derive(Clone)]
pub struct ConversionConfig {
    /// Resolution used both to rasterise pages and to size the slide canvas.
    /// Range: 72–400. Default: 200.
    ///
    /// The canvas is `first_width_px / dpi` × `first_height_px / dpi` inches,
    /// so changing the dpi changes pixel density, never the physical size.
    pub dpi: u32,

    /// JPEG quality for the page images (1–100). Default: 95.
    pub jpeg_quality: u8,

    /// Root under which `<input_basename>/` is created.
    /// Default: the platform Downloads folder, else the home directory.
    pub output_root: PathBuf,

    /// Try to reveal the output folder in the file browser when done. Default: true.
    pub open_output_folder: bool,

    /// Delete `page_NNN` images left in `pages/` by an earlier run before
    /// rasterising. Default: true.
    pub clear_stale_pages: bool,

    /// Pre-constructed rasterisation backend. If None, pdfium is bound per run.
    pub backend: Option<Arc<dyn RasterBackend + Send + Sync>>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            dpi: DEFAULT_DPI,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            output_root: default_output_root(),
            open_output_folder: true,
            clear_stale_pages: true,
            backend: None,
        }
    }
}

impl fmt::Debug for ConversionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConversionConfig")
            .field("dpi", &self.dpi)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("output_root", &self.output_root)
            .field("open_output_folder", &self.open_output_folder)
            .field("clear_stale_pages", &self.clear_stale_pages)
            .field("backend", &self.backend.as_ref().map(|_| "<dyn RasterBackend>"))
            .finish()
    }
}

impl ConversionConfig {
    /// Create a new builder for `ConversionConfig`.
    pub fn builder() -> ConversionConfigBuilder {
        ConversionConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`ConversionConfig`].
#[derive(Debug)]
pub struct ConversionConfigBuilder {
    config: ConversionConfig,
}

impl ConversionConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 400);
        self
    }

    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality.clamp(1, 100);
        self
    }

    pub fn output_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_root = dir.into();
        self
    }

    pub fn open_output_folder(mut self, v: bool) -> Self {
        self.config.open_output_folder = v;
        self
    }

    pub fn clear_stale_pages(mut self, v: bool) -> Self {
        self.config.clear_stale_pages = v;
        self
    }

    pub fn backend(mut self, backend: Arc<dyn RasterBackend + Send + Sync>) -> Self {
        self.config.backend = Some(backend);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConversionConfig, Pdf2PptxError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 400 {
            return Err(Pdf2PptxError::InvalidConfig(format!(
                "DPI must be 72–400, got {}",
                c.dpi
            )));
        }
        if c.jpeg_quality == 0 || c.jpeg_quality > 100 {
            return Err(Pdf2PptxError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        if c.output_root.as_os_str().is_empty() {
            return Err(Pdf2PptxError::InvalidConfig(
                "Output root must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

/// The platform Downloads folder if it exists, else the home directory.
///
/// Falls back to the current directory when no home can be resolved
/// (service accounts, stripped-down containers).
pub fn default_output_root() -> PathBuf {
    if let Some(dir) = dirs::download_dir().filter(|d| d.is_dir()) {
        return dir;
    }

    let home = dirs::home_dir();
    let candidates = std::env::var_os("USERPROFILE")
        .map(PathBuf::from)
        .into_iter()
        .chain(home.clone())
        .map(|base| base.join("Downloads"));
    for candidate in candidates {
        if candidate.is_dir() {
            return candidate;
        }
    }

    home.unwrap_or_else(|| PathBuf::from("."))
}
