//! Minimal PresentationML (PPTX) writer for full-bleed picture decks.
//!
//! The deck is a fixed-size canvas plus one slide per picture; every slide
//! uses the same blank layout and carries a single `p:pic` whose placement
//! was computed by [`Placement::cover`]. Picture bytes are not held in
//! memory: each slide remembers the image path and the bytes are streamed
//! into the package when it is saved.

mod package;
mod templates;

use crate::error::Pdf2PptxError;
use crate::pipeline::layout::{Extent, Placement};
use std::path::{Path, PathBuf};

/// Image formats a picture slide can embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Jpeg,
    Png,
}

impl MediaKind {
    /// Guess from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(MediaKind::Jpeg),
            "png" => Some(MediaKind::Png),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            MediaKind::Jpeg => "jpeg",
            MediaKind::Png => "png",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            MediaKind::Jpeg => "image/jpeg",
            MediaKind::Png => "image/png",
        }
    }
}

/// One slide holding one picture.
#[derive(Debug, Clone)]
pub struct Slide {
    image: PathBuf,
    kind: MediaKind,
    placement: Placement,
}

impl Slide {
    pub fn image(&self) -> &Path {
        &self.image
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }
}

/// An in-memory deck: canvas size plus ordered picture slides.
#[derive(Debug, Clone)]
pub struct Presentation {
    canvas: Extent,
    title: String,
    slides: Vec<Slide>,
}

impl Presentation {
    /// An empty deck whose every slide is `canvas` in size.
    pub fn new(canvas: Extent) -> Self {
        Self {
            canvas,
            title: String::new(),
            slides: Vec::new(),
        }
    }

    /// Set the document title stored in the package properties.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn canvas(&self) -> Extent {
        self.canvas
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    /// Append a slide showing `image`, cover-fitted and centred on the canvas.
    ///
    /// `native` is the picture's own physical size; only its aspect ratio
    /// affects the result.
    pub fn add_picture_slide(
        &mut self,
        image: impl Into<PathBuf>,
        native: Extent,
    ) -> Result<&Slide, Pdf2PptxError> {
        let image = image.into();
        let kind = MediaKind::from_path(&image).ok_or_else(|| Pdf2PptxError::ImageReadFailed {
            path: image.clone(),
            detail: "unsupported picture format (expected .jpg, .jpeg or .png)".into(),
        })?;

        self.slides.push(Slide {
            image,
            kind,
            placement: Placement::cover(self.canvas, native),
        });
        Ok(&self.slides[self.slides.len() - 1])
    }

    /// Write the deck to `path` atomically, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<(), Pdf2PptxError> {
        package::save(self, path)
    }

    /// Write the deck as a PPTX package into `writer`.
    pub fn write_to<W: std::io::Write + std::io::Seek>(&self, writer: W) -> Result<W, Pdf2PptxError> {
        package::write_package(self, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_kind_from_extension() {
        assert_eq!(MediaKind::from_path(Path::new("a/page_001.jpg")), Some(MediaKind::Jpeg));
        assert_eq!(MediaKind::from_path(Path::new("A.JPEG")), Some(MediaKind::Jpeg));
        assert_eq!(MediaKind::from_path(Path::new("x.png")), Some(MediaKind::Png));
        assert_eq!(MediaKind::from_path(Path::new("x.gif")), None);
        assert_eq!(MediaKind::from_path(Path::new("noext")), None);
    }

    #[test]
    fn slides_keep_insertion_order_and_cover_the_canvas() {
        let canvas = Extent { cx: 400, cy: 500 };
        let mut pres = Presentation::new(canvas);
        pres.add_picture_slide("p1.jpg", canvas).unwrap();
        pres.add_picture_slide("p2.jpg", Extent { cx: 1000, cy: 500 }).unwrap();

        assert_eq!(pres.slide_count(), 2);
        assert_eq!(pres.slides()[0].image(), Path::new("p1.jpg"));
        assert_eq!(pres.slides()[1].image(), Path::new("p2.jpg"));
        let p = pres.slides()[1].placement();
        assert!(p.size.cx >= canvas.cx && p.size.cy >= canvas.cy);
        assert_eq!(p.left, -300);
    }

    #[test]
    fn unsupported_picture_is_rejected() {
        let mut pres = Presentation::new(Extent { cx: 1, cy: 1 });
        let r = pres.add_picture_slide("page.tiff", Extent { cx: 1, cy: 1 });
        assert!(matches!(r, Err(Pdf2PptxError::ImageReadFailed { .. })));
        assert_eq!(pres.slide_count(), 0);
    }
}
