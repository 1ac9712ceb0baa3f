//! Pipeline stages for PDF-to-PPTX conversion.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ layout ──▶ deck
//! (path)    (pdfium)   (JPEG)     (EMU)      (PPTX)
//! ```
//!
//! 1. [`input`]: check the user-supplied path is a readable PDF
//! 2. [`render`]: rasterise every page in order at `dpi / 72` scale
//! 3. [`encode`]: flatten to RGB and write `page_NNN.jpg`
//! 4. [`layout`]: canvas size from the first page, cover-fit per picture
//!
//! The presentation container itself lives in [`crate::deck`].

pub mod encode;
pub mod input;
pub mod layout;
pub mod render;
