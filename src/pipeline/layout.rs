//! Slide geometry in English Metric Units.
//!
//! Office Open XML measures everything in EMU: 914 400 per inch, so every
//! common physical unit (inch, cm, point) maps to an integer. The canvas is
//! derived from the first page's pixels at the run's dpi; each picture is
//! then scaled to *cover* that canvas (no letterboxing) and centred, so any
//! overflow on the long axis is cropped evenly on both sides.

use serde::Serialize;

/// EMU per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// A width/height pair in EMU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Extent {
    pub cx: i64,
    pub cy: i64,
}

impl Extent {
    /// Physical size of `width_px` × `height_px` at `dpi`.
    pub fn from_pixels(width_px: u32, height_px: u32, dpi: u32) -> Self {
        Self {
            cx: px_to_emu(width_px, dpi),
            cy: px_to_emu(height_px, dpi),
        }
    }

    pub fn width_inches(&self) -> f64 {
        self.cx as f64 / EMU_PER_INCH as f64
    }

    pub fn height_inches(&self) -> f64 {
        self.cy as f64 / EMU_PER_INCH as f64
    }
}

/// `px / dpi` inches expressed in EMU, rounded to the nearest unit.
pub fn px_to_emu(px: u32, dpi: u32) -> i64 {
    let dpi = dpi.max(1) as f64;
    (px as f64 * EMU_PER_INCH as f64 / dpi).round() as i64
}

/// Offset and size of a picture on the slide, in EMU.
///
/// `left`/`top` are negative when the picture overflows the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub left: i64,
    pub top: i64,
    pub size: Extent,
}

impl Placement {
    /// Scale `image` by `max(W / w, H / h)` and centre it on `canvas`.
    pub fn cover(canvas: Extent, image: Extent) -> Self {
        if image.cx <= 0 || image.cy <= 0 {
            return Self {
                left: 0,
                top: 0,
                size: canvas,
            };
        }

        let scale = f64::max(
            canvas.cx as f64 / image.cx as f64,
            canvas.cy as f64 / image.cy as f64,
        );
        // Never let rounding leave a sliver of canvas uncovered.
        let size = Extent {
            cx: ((image.cx as f64 * scale).round() as i64).max(canvas.cx),
            cy: ((image.cy as f64 * scale).round() as i64).max(canvas.cy),
        };

        Self {
            left: (canvas.cx - size.cx) / 2,
            top: (canvas.cy - size.cy) / 2,
            size,
        }
    }
}
