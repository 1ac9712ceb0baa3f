//! Multi-resolution `.ico` generation for the application icon.
//!
//! Unrelated to the conversion pipeline: a one-shot transform from a single
//! raster image (typically a PNG with transparency) to an ICO bundle.

use crate::error::Pdf2PptxError;
use image::codecs::ico::{IcoEncoder, IcoFrame};
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, RgbaImage};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Edge lengths written into the bundle, smallest first.
pub const ICON_SIZES: [u32; 7] = [16, 24, 32, 48, 64, 128, 256];

/// What [`make_icon`] wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconReport {
    pub output: PathBuf,
    pub sizes: Vec<u32>,
}

/// `input` with its extension replaced by `.ico`.
pub fn default_icon_path(input: &Path) -> PathBuf {
    input.with_extension("ico")
}

/// Centre `img` on a transparent square canvas. Square images are returned as is.
pub fn pad_to_square(img: RgbaImage) -> RgbaImage {
    let (w, h) = img.dimensions();
    if w == h {
        return img;
    }
    let side = w.max(h);
    let mut canvas = RgbaImage::new(side, side);
    imageops::replace(
        &mut canvas,
        &img,
        i64::from((side - w) / 2),
        i64::from((side - h) / 2),
    );
    canvas
}

/// Sizes from [`ICON_SIZES`] that do not exceed `side`; never upscales.
/// A source smaller than 16 px yields a single frame at its own size.
pub fn sizes_for(side: u32) -> Vec<u32> {
    let sizes: Vec<u32> = ICON_SIZES.iter().copied().filter(|&s| s <= side).collect();
    if sizes.is_empty() {
        vec![side.max(1)]
    } else {
        sizes
    }
}

/// Read `input`, pad it to a square and write an ICO to `output` (or next
/// to the input when `None`), creating parent directories.
pub fn make_icon(input: &Path, output: Option<&Path>) -> Result<IconReport, Pdf2PptxError> {
    if !input.is_file() {
        return Err(Pdf2PptxError::FileNotFound {
            path: input.to_path_buf(),
        });
    }
    let output = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_icon_path(input));

    let source = image::open(input)
        .map_err(|e| Pdf2PptxError::ImageReadFailed {
            path: input.to_path_buf(),
            detail: e.to_string(),
        })?
        .to_rgba8();
    let square = pad_to_square(source);
    let sizes = sizes_for(square.width());

    let mut frames = Vec::with_capacity(sizes.len());
    for &size in &sizes {
        let scaled = if size == square.width() {
            square.clone()
        } else {
            imageops::resize(&square, size, size, FilterType::Lanczos3)
        };
        let frame = IcoFrame::as_png(scaled.as_raw(), size, size, ExtendedColorType::Rgba8)
            .map_err(|e| Pdf2PptxError::ImageWriteFailed {
                path: output.clone(),
                source: e,
            })?;
        frames.push(frame);
    }

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Pdf2PptxError::OutputWriteFailed {
            path: output.clone(),
            source: e,
        })?;
    }
    let file = File::create(&output).map_err(|e| Pdf2PptxError::OutputWriteFailed {
        path: output.clone(),
        source: e,
    })?;
    let mut writer = BufWriter::new(file);
    IcoEncoder::new(&mut writer)
        .encode_images(&frames)
        .map_err(|e| Pdf2PptxError::ImageWriteFailed {
            path: output.clone(),
            source: e,
        })?;
    writer.flush().map_err(|e| Pdf2PptxError::OutputWriteFailed {
        path: output.clone(),
        source: e,
    })?;

    debug!("Wrote {} icon frame(s) to {}", sizes.len(), output.display());
    Ok(IconReport { output, sizes })
}
