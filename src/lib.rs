//! # pdf2pptx
//!
//! Turn a PDF into a slide deck: every page becomes a JPEG, and every JPEG
//! becomes one full-bleed slide.
//!
//! The deck's canvas is sized from the first page, `width_px / dpi` by
//! `height_px / dpi` inches, so a deck made from an A4 scan has A4 slides.
//! Every later page is scaled to *cover* that canvas and centred; pages with
//! a different aspect ratio are cropped evenly, never letterboxed.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    check the path is a readable PDF
//!  ├─ 2. Render   rasterise pages via pdfium at dpi / 72   (progress 0.02 → 0.50)
//!  ├─ 3. Encode   RGB JPEG, pages/page_NNN.jpg
//!  ├─ 4. Layout   canvas from page 1, cover-fit each page  (progress 0.50 → 0.90)
//!  ├─ 5. Deck     write <base>.pptx atomically             (progress 0.95)
//!  └─ 6. Reveal   open the output folder, best effort      (progress 1.00)
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2pptx::{convert, ConversionConfig, ConversionRequest};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ConversionConfig::builder()
//!         .dpi(200)
//!         .output_root("/tmp/decks")
//!         .build()?;
//!     let request = ConversionRequest::new("report.pdf", config)
//!         .with_log(Arc::new(|line: &str| println!("{line}")));
//!     let result = convert(request).await?;
//!     println!("{} slides → {}", result.slide_count, result.output.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2pptx` and `make-icon` binaries (clap + anyhow + tracing-subscriber + indicatif + dialoguer) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf2pptx = { version = "0.1", default-features = false }
//! ```
//!
//! ## PDFium
//!
//! Rendering needs the pdfium shared library at runtime. It is looked up in
//! `PDFIUM_LIB_PATH`, next to the executable, in the working directory and
//! finally on the system library path. Tests and embedders can bypass it
//! entirely with [`ConversionConfigBuilder::backend`].

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod deck;
pub mod error;
pub mod icon;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod reveal;
pub mod shell;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{default_output_root, ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync, ConversionRequest, OutputLayout};
pub use deck::Presentation;
pub use error::Pdf2PptxError;
pub use output::ConversionResult;
pub use pipeline::layout::{Extent, Placement};
pub use pipeline::render::{PdfiumBackend, RasterBackend, RasterDocument};
pub use progress::{LogSink, ProgressSink};
pub use shell::{ShellEvent, ShellState, Worker};
