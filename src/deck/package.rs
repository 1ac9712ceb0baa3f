//! Serialise a [`Presentation`] into an OPC zip package.

use super::templates::{self, Rel};
use super::{MediaKind, Presentation};
use crate::error::Pdf2PptxError;
use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, Write};
use std::path::Path;
use tracing::{debug, warn};
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

/// Relationship ids below this one are taken by the master, theme and
/// property parts in `presentation.xml.rels`.
const FIRST_SLIDE_REL: usize = 6;

/// Write every part of `pres` into `writer` and return the finished writer.
pub(crate) fn write_package<W: Write + Seek>(
    pres: &Presentation,
    writer: W,
) -> Result<W, Pdf2PptxError> {
    let canvas = pres.canvas();
    if canvas.cx < templates::MIN_SLIDE_EDGE
        || canvas.cy < templates::MIN_SLIDE_EDGE
        || canvas.cx > templates::MAX_SLIDE_EDGE
        || canvas.cy > templates::MAX_SLIDE_EDGE
    {
        warn!(
            cx = canvas.cx,
            cy = canvas.cy,
            "Slide size is outside the range PowerPoint accepts; some viewers may reject the deck"
        );
    }

    let mut zip = ZipWriter::new(writer);

    let slide_count = pres.slide_count();
    let mut media_defaults: Vec<(&str, &str)> = Vec::new();
    for kind in pres.slides().iter().map(|s| s.kind) {
        let entry = (kind.extension(), kind.content_type());
        if !media_defaults.contains(&entry) {
            media_defaults.push(entry);
        }
    }
    if media_defaults.is_empty() {
        media_defaults.push((MediaKind::Jpeg.extension(), MediaKind::Jpeg.content_type()));
    }

    put(&mut zip, "[Content_Types].xml", &templates::content_types_xml(slide_count, &media_defaults))?;
    put(&mut zip, "_rels/.rels", &templates::package_rels_xml())?;
    put(&mut zip, "docProps/core.xml", &templates::core_props_xml(pres.title()))?;
    put(&mut zip, "docProps/app.xml", &templates::app_props_xml(slide_count))?;

    put(
        &mut zip,
        "ppt/presentation.xml",
        &templates::presentation_xml(canvas, slide_count, FIRST_SLIDE_REL),
    )?;
    put(&mut zip, "ppt/_rels/presentation.xml.rels", &presentation_rels(slide_count))?;

    put(&mut zip, "ppt/slideMasters/slideMaster1.xml", &templates::slide_master_xml())?;
    put(
        &mut zip,
        "ppt/slideMasters/_rels/slideMaster1.xml.rels",
        &templates::relationships_xml(&[
            rel(1, templates::REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
            rel(2, templates::REL_THEME, "../theme/theme1.xml"),
        ]),
    )?;
    put(&mut zip, "ppt/slideLayouts/slideLayout1.xml", &templates::blank_layout_xml())?;
    put(
        &mut zip,
        "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
        &templates::relationships_xml(&[rel(
            1,
            templates::REL_SLIDE_MASTER,
            "../slideMasters/slideMaster1.xml",
        )]),
    )?;
    put(&mut zip, "ppt/theme/theme1.xml", &templates::theme_xml())?;
    put(&mut zip, "ppt/presProps.xml", &templates::pres_props_xml())?;
    put(&mut zip, "ppt/viewProps.xml", &templates::view_props_xml())?;
    put(&mut zip, "ppt/tableStyles.xml", &templates::table_styles_xml())?;

    for (i, slide) in pres.slides().iter().enumerate() {
        let n = i + 1;
        let media_name = format!("image{}.{}", n, slide.kind.extension());
        let descr = slide
            .image
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_default();

        put(
            &mut zip,
            &format!("ppt/slides/slide{n}.xml"),
            &templates::picture_slide_xml(n, &descr, "rId2", slide.placement),
        )?;
        put(
            &mut zip,
            &format!("ppt/slides/_rels/slide{n}.xml.rels"),
            &templates::relationships_xml(&[
                rel(1, templates::REL_SLIDE_LAYOUT, "../slideLayouts/slideLayout1.xml"),
                rel(2, templates::REL_IMAGE, &format!("../media/{media_name}")),
            ]),
        )?;

        let file = File::open(&slide.image).map_err(|e| Pdf2PptxError::ImageReadFailed {
            path: slide.image.clone(),
            detail: e.to_string(),
        })?;
        // JPEG and PNG are already compressed.
        zip.start_file(
            format!("ppt/media/{media_name}"),
            SimpleFileOptions::default().compression_method(CompressionMethod::Stored),
        )?;
        std::io::copy(&mut BufReader::new(file), &mut zip).map_err(|e| {
            Pdf2PptxError::PackageFailed(format!(
                "copying {} into the package: {e}",
                slide.image.display()
            ))
        })?;
        debug!(slide = n, image = %slide.image.display(), "Packaged slide");
    }

    Ok(zip.finish()?)
}

/// Save `pres` to `path` through a temporary file in the same directory, so
/// a failed save never leaves a truncated deck behind.
pub(crate) fn save(pres: &Presentation, path: &Path) -> Result<(), Pdf2PptxError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => std::path::PathBuf::from("."),
    };
    let write_failed = |source: std::io::Error| Pdf2PptxError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(&parent).map_err(write_failed)?;
    let tmp = tempfile::NamedTempFile::new_in(&parent).map_err(write_failed)?;

    let writer = write_package(pres, BufWriter::new(tmp))?;
    let tmp = writer
        .into_inner()
        .map_err(|e| write_failed(e.into_error()))?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;

    debug!(path = %path.display(), slides = pres.slide_count(), "Saved presentation");
    Ok(())
}

fn put<W: Write + Seek>(
    zip: &mut ZipWriter<W>,
    name: &str,
    contents: &str,
) -> Result<(), Pdf2PptxError> {
    zip.start_file(
        name,
        SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
    )?;
    zip.write_all(contents.as_bytes())
        .map_err(|e| Pdf2PptxError::PackageFailed(format!("writing {name}: {e}")))
}

fn rel<'a>(n: usize, kind: &'a str, target: &str) -> Rel<'a> {
    Rel {
        id: format!("rId{n}"),
        kind,
        target: target.to_string(),
    }
}

fn presentation_rels(slide_count: usize) -> String {
    let mut rels = vec![
        rel(1, templates::REL_SLIDE_MASTER, "slideMasters/slideMaster1.xml"),
        rel(2, templates::REL_THEME, "theme/theme1.xml"),
        rel(3, templates::REL_PRES_PROPS, "presProps.xml"),
        rel(4, templates::REL_VIEW_PROPS, "viewProps.xml"),
        rel(5, templates::REL_TABLE_STYLES, "tableStyles.xml"),
    ];
    for i in 0..slide_count {
        rels.push(rel(
            FIRST_SLIDE_REL + i,
            templates::REL_SLIDE,
            &format!("slides/slide{}.xml", i + 1),
        ));
    }
    templates::relationships_xml(&rels)
}
