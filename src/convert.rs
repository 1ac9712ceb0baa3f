//! Conversion entry points.
//!
//! The pipeline itself is synchronous and strictly sequential: pages are
//! rendered one after another and slides are built in the same order, which
//! is what keeps the progress fraction a simple counter. [`convert`] runs it
//! on tokio's blocking pool so an interactive caller never stalls for the
//! length of a conversion.

use crate::config::ConversionConfig;
use crate::deck::Presentation;
use crate::error::Pdf2PptxError;
use crate::output::ConversionResult;
use crate::pipeline::layout::Extent;
use crate::pipeline::render::{PdfiumBackend, RasterBackend};
use crate::pipeline::{encode, input, render};
use crate::progress::{self, noop_log, noop_progress, LogSink, ProgressSink, Reporter};
use crate::reveal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extension of the saved presentation.
pub const PRESENTATION_EXTENSION: &str = "pptx";

/// Name of the page-image subdirectory under each output folder.
pub const PAGES_DIR: &str = "pages";

/// One conversion: the input PDF, its configuration and where to report.
///
/// Sinks default to no-ops.
#[derive(Clone)]
pub struct ConversionRequest {
    pub input: PathBuf,
    pub config: ConversionConfig,
    pub log: Arc<dyn LogSink>,
    pub progress: Arc<dyn ProgressSink>,
}

impl ConversionRequest {
    pub fn new(input: impl Into<PathBuf>, config: ConversionConfig) -> Self {
        Self {
            input: input.into(),
            config,
            log: noop_log(),
            progress: noop_progress(),
        }
    }

    pub fn with_log(mut self, log: Arc<dyn LogSink>) -> Self {
        self.log = log;
        self
    }

    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Where this request's artifacts will be written.
    pub fn layout(&self) -> OutputLayout {
        OutputLayout::new(&self.config.output_root, &self.input)
    }
}

impl std::fmt::Debug for ConversionRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionRequest")
            .field("input", &self.input)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Paths derived from an input file and an output root:
///
/// ```text
/// <output_root>/<base>/
///     pages/page_001.jpg …
///     <base>.pptx
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub base: String,
    pub root: PathBuf,
    pub pages_dir: PathBuf,
    pub presentation: PathBuf,
}

impl OutputLayout {
    pub fn new(output_root: &Path, input: &Path) -> Self {
        let base = input::base_name(input);
        let root = output_root.join(&base);
        let pages_dir = root.join(PAGES_DIR);
        let presentation = root.join(format!("{base}.{PRESENTATION_EXTENSION}"));
        Self {
            base,
            root,
            pages_dir,
            presentation,
        }
    }
}

/// Convert a PDF to a slide deck on the blocking thread pool.
///
/// # Errors
/// Everything [`convert_sync`] can return, plus
/// [`Pdf2PptxError::Internal`] if the worker panicked.
pub async fn convert(request: ConversionRequest) -> Result<ConversionResult, Pdf2PptxError> {
    tokio::task::spawn_blocking(move || convert_sync(&request))
        .await
        .map_err(|e| Pdf2PptxError::Internal(format!("conversion worker failed: {e}")))?
}

/// Convert a PDF to a slide deck on the calling thread.
///
/// Rasterises every page into `<root>/pages/`, sizes the canvas from the
/// first page at the configured dpi, adds one cover-fitted slide per page
/// and saves `<root>/<base>.pptx`.
///
/// # Errors
/// - input errors ([`Pdf2PptxError::is_input_error`]) before anything is written
/// - any rasterisation failure, aborting the run
/// - [`Pdf2PptxError::NoPagesRendered`] for a document without pages; no
///   presentation is written in that case
/// - save failures; the target is never left half-written
pub fn convert_sync(request: &ConversionRequest) -> Result<ConversionResult, Pdf2PptxError> {
    let started = Instant::now();
    let config = &request.config;
    let reporter = Reporter::new(Arc::clone(&request.log), Arc::clone(&request.progress));

    // ── Step 1: Resolve input and output layout ──────────────────────────
    let input = input::resolve_local(&request.input)?;
    let layout = OutputLayout::new(&config.output_root, &input);
    info!("Starting conversion: {}", input.display());

    // ── Step 2: Announce ─────────────────────────────────────────────────
    let display_name = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string());
    reporter.log(format!("Opening PDF: {display_name}"));
    reporter.progress(progress::SETUP);

    // ── Step 3: Rasterise ────────────────────────────────────────────────
    let bound;
    let backend: &dyn RasterBackend = match &config.backend {
        Some(backend) => backend.as_ref(),
        None => {
            bound = PdfiumBackend::bind()?;
            &bound
        }
    };

    // Nothing under the output root changes until the document has opened.
    let document = backend.open(&input)?;
    if config.clear_stale_pages {
        render::clear_stale_pages(&layout.pages_dir)?;
    }

    let render_start = Instant::now();
    let images = render::render_document(
        document.as_ref(),
        &layout.pages_dir,
        config.dpi,
        config.jpeg_quality,
        |done, total| {
            reporter.log(format!("Rendered page {done}/{total}"));
            reporter.progress(progress::RASTERISE.at(done, total));
        },
    )?;
    drop(document);
    info!(
        "Rendered {} pages in {}ms",
        images.len(),
        render_start.elapsed().as_millis()
    );

    // ── Step 4: Refuse empty documents ───────────────────────────────────
    let Some(first) = images.first() else {
        return Err(Pdf2PptxError::NoPagesRendered { path: input });
    };

    // ── Steps 5–6: Canvas from the first page ────────────────────────────
    let first_page_px = encode::image_dimensions(first)?;
    let canvas = Extent::from_pixels(first_page_px.0, first_page_px.1, config.dpi);
    debug!(
        "Canvas {:.2} x {:.2} in from {}x{} px at {} dpi",
        canvas.width_inches(),
        canvas.height_inches(),
        first_page_px.0,
        first_page_px.1,
        config.dpi
    );

    let mut deck = Presentation::new(canvas);
    deck.set_title(layout.base.clone());

    // ── Step 7: One cover-fitted slide per page ──────────────────────────
    reporter.log("Adding slides...");
    let total = images.len();
    for (i, image) in images.iter().enumerate() {
        let (w, h) = if i == 0 {
            first_page_px
        } else {
            encode::image_dimensions(image)?
        };
        let slide = deck.add_picture_slide(image.clone(), Extent::from_pixels(w, h, config.dpi))?;
        debug!("Slide {} placement {:?}", i + 1, slide.placement());

        reporter.log(format!("Slide {}/{} created", i + 1, total));
        reporter.progress(progress::SLIDES.at(i + 1, total));
    }

    // ── Step 8: Save ─────────────────────────────────────────────────────
    reporter.log("Saving presentation...");
    deck.save(&layout.presentation)?;
    reporter.progress(progress::SAVED);

    // ── Step 9: Done ─────────────────────────────────────────────────────
    let elapsed = started.elapsed();
    reporter.log(format!(
        "Finished in {:.1}s. File: {}",
        elapsed.as_secs_f64(),
        layout.presentation.display()
    ));
    reporter.progress(progress::DONE);
    info!(
        "Conversion complete: {} slides, {}ms total",
        deck.slide_count(),
        elapsed.as_millis()
    );

    // ── Step 10: Reveal (best effort) ────────────────────────────────────
    if config.open_output_folder {
        match reveal::reveal_in_file_browser(&layout.root) {
            Ok(()) => reporter.log(format!("Opened folder: {}", layout.root.display())),
            Err(e) => {
                warn!("Could not open {}: {}", layout.root.display(), e);
                reporter.log(format!("Could not open folder: {e}"));
            }
        }
    }

    Ok(ConversionResult {
        input,
        slide_count: deck.slide_count(),
        images,
        output: layout.presentation,
        first_page_px,
        dpi: config.dpi,
        canvas,
        elapsed_ms: elapsed.as_millis() as u64,
    })
}
