//! End-to-end integration tests for pdf2pptx.
//!
//! Most tests drive the full pipeline through a fake rasterisation backend
//! that produces solid-colour pages, so they need neither pdfium nor real
//! PDFs. The tests at the bottom use the real pdfium backend on files in
//! `./test_cases/`; they are gated behind the `E2E_ENABLED` environment
//! variable so they do not run in CI unless explicitly requested.
//!
//! Run with:
//!   E2E_ENABLED=1 PDFIUM_LIB_PATH=. cargo test --test e2e -- --nocapture

use image::{DynamicImage, Rgb, RgbImage};
use pdf2pptx::{
    convert, convert_sync, ConversionConfig, ConversionRequest, Extent, PdfiumBackend,
    Pdf2PptxError, RasterBackend, RasterDocument,
};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────────

/// A "PDF" whose pages are given in PDF points; rendering scales them like
/// pdfium would.
struct FakePdf {
    pages: Vec<(f32, f32)>,
    fail_at: Option<usize>,
}

impl FakePdf {
    /// `n` pages that render to `w`x`h` px at `dpi`.
    fn uniform(n: usize, w: u32, h: u32, dpi: u32) -> Self {
        let pts = |px: u32| px as f32 * 72.0 / dpi as f32;
        Self {
            pages: vec![(pts(w), pts(h)); n],
            fail_at: None,
        }
    }
}

struct FakeDoc<'a>(&'a FakePdf);

impl RasterBackend for FakePdf {
    fn open<'a>(&'a self, _path: &Path) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PptxError> {
        Ok(Box::new(FakeDoc(self)))
    }
}

impl RasterDocument for FakeDoc<'_> {
    fn page_count(&self) -> usize {
        self.0.pages.len()
    }

    fn render_page(&self, index: usize, scale: f32) -> Result<DynamicImage, Pdf2PptxError> {
        if self.0.fail_at == Some(index) {
            return Err(Pdf2PptxError::RasterisationFailed {
                page: index + 1,
                detail: "synthetic failure".into(),
            });
        }
        let (w, h) = self.0.pages[index];
        let shade = (index * 40 % 256) as u8;
        Ok(DynamicImage::ImageRgb8(RgbImage::from_pixel(
            (w * scale).round() as u32,
            (h * scale).round() as u32,
            Rgb([shade, 90, 160]),
        )))
    }
}

fn write_pdf(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"%PDF-1.7\n1 0 obj\n<<>>\nendobj\n%%EOF\n").unwrap();
    path
}

fn config_with(out: &Path, backend: FakePdf) -> ConversionConfig {
    ConversionConfig::builder()
        .output_root(out)
        .open_output_folder(false)
        .backend(Arc::new(backend))
        .build()
        .expect("valid config")
}

type Recorded<T> = Arc<Mutex<Vec<T>>>;

fn recording_request(
    input: &Path,
    config: ConversionConfig,
) -> (ConversionRequest, Recorded<String>, Recorded<f64>) {
    let lines: Recorded<String> = Arc::default();
    let values: Recorded<f64> = Arc::default();
    let (l, v) = (Arc::clone(&lines), Arc::clone(&values));
    let request = ConversionRequest::new(input, config)
        .with_log(Arc::new(move |line: &str| l.lock().unwrap().push(line.to_string())))
        .with_progress(Arc::new(move |value: f64| v.lock().unwrap().push(value)));
    (request, lines, values)
}

fn read_part(pptx: &Path, name: &str) -> String {
    let file = std::fs::File::open(pptx).unwrap();
    let mut zip = zip::ZipArchive::new(file).unwrap();
    let mut s = String::new();
    zip.by_name(name)
        .unwrap_or_else(|_| panic!("{name} missing from {}", pptx.display()))
        .read_to_string(&mut s)
        .unwrap();
    s
}

fn slide_parts(pptx: &Path) -> Vec<String> {
    let file = std::fs::File::open(pptx).unwrap();
    let zip = zip::ZipArchive::new(file).unwrap();
    let mut names: Vec<String> = zip
        .file_names()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .map(str::to_string)
        .collect();
    names.sort();
    names
}

/// Integer value of `attr="…"` in the first `<tag …>` element of `xml`.
fn attr(xml: &str, tag: &str, attr: &str) -> i64 {
    let start = xml.find(&format!("<{tag} ")).unwrap_or_else(|| panic!("no <{tag}>"));
    let elem = &xml[start..start + xml[start..].find('>').unwrap()];
    let key = format!("{attr}=\"");
    let v = &elem[elem.find(&key).unwrap() + key.len()..];
    v[..v.find('"').unwrap()].parse().unwrap()
}

/// The `<p:pic>` element of a slide, where the picture's own transform lives.
fn picture(slide: &str) -> &str {
    let start = slide.find("<p:pic>").expect("slide has a picture");
    let end = slide[start..].find("</p:pic>").expect("picture is closed") + start;
    &slide[start..end]
}

fn page_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ── Full pipeline with a fake backend ────────────────────────────────────────

#[test]
fn report_pdf_becomes_three_four_by_five_inch_slides() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "report.pdf");

    let config = config_with(out.path(), FakePdf::uniform(3, 800, 1000, 200));
    let result = convert_sync(&ConversionRequest::new(&input, config)).expect("conversion");

    let root = out.path().join("report");
    assert_eq!(
        result.images,
        vec![
            root.join("pages/page_001.jpg"),
            root.join("pages/page_002.jpg"),
            root.join("pages/page_003.jpg"),
        ]
    );
    assert_eq!(result.output, root.join("report.pptx"));
    assert_eq!(result.first_page_px, (800, 1000));
    assert_eq!(result.dpi, 200);
    assert_eq!(result.slide_count, 3);
    assert_eq!(result.canvas, Extent { cx: 4 * 914_400, cy: 5 * 914_400 });
    assert!((result.canvas.width_inches() - 4.0).abs() < 1e-9);
    assert!((result.canvas.height_inches() - 5.0).abs() < 1e-9);

    for image in &result.images {
        assert_eq!(image::image_dimensions(image).unwrap(), (800, 1000));
    }

    let pres = read_part(&result.output, "ppt/presentation.xml");
    assert_eq!(attr(&pres, "p:sldSz", "cx"), 3_657_600);
    assert_eq!(attr(&pres, "p:sldSz", "cy"), 4_572_000);

    assert_eq!(
        slide_parts(&result.output),
        ["ppt/slides/slide1.xml", "ppt/slides/slide2.xml", "ppt/slides/slide3.xml"]
    );
    for n in 1..=3 {
        let slide = read_part(&result.output, &format!("ppt/slides/slide{n}.xml"));
        let pic = picture(&slide);
        assert_eq!(attr(pic, "a:off", "x"), 0);
        assert_eq!(attr(pic, "a:off", "y"), 0);
        assert_eq!(attr(pic, "a:ext", "cx"), 3_657_600);
        assert_eq!(attr(pic, "a:ext", "cy"), 4_572_000);
        assert!(pic.contains(&format!("descr=\"page_{n:03}.jpg\"")));
    }
}

#[test]
fn odd_sized_pages_cover_the_first_page_canvas() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "mixed.pdf");

    // Portrait first page fixes the canvas; a landscape page follows.
    let backend = FakePdf {
        pages: vec![(288.0, 360.0), (720.0, 360.0)],
        fail_at: None,
    };
    let result = convert_sync(&ConversionRequest::new(&input, config_with(out.path(), backend)))
        .expect("conversion");

    let (w, h) = (result.canvas.cx, result.canvas.cy);
    let slide = read_part(&result.output, "ppt/slides/slide2.xml");
    let pic = picture(&slide);
    let (x, y) = (attr(pic, "a:off", "x"), attr(pic, "a:off", "y"));
    let (cx, cy) = (attr(pic, "a:ext", "cx"), attr(pic, "a:ext", "cy"));

    assert!(cx >= w && cy >= h, "picture {cx}x{cy} must cover {w}x{h}");
    assert_eq!(cy, h);
    assert!((x - (w - cx) / 2).abs() <= 1);
    assert_eq!(y, 0);
    assert!(x < 0);
}

#[test]
fn progress_is_monotonic_and_ends_at_one() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "report.pdf");

    let config = config_with(out.path(), FakePdf::uniform(4, 100, 120, 200));
    let (request, lines, values) = recording_request(&input, config);
    convert_sync(&request).expect("conversion");

    let values = values.lock().unwrap().clone();
    assert_eq!(values.first().copied(), Some(0.02));
    assert_eq!(values.last().copied(), Some(1.0));
    assert!(values.iter().all(|v| (0.0..=1.0).contains(v)), "{values:?}");
    assert!(values.windows(2).all(|w| w[0] <= w[1]), "{values:?}");
    assert!(values.iter().any(|v| (v - 0.5).abs() < 1e-9));
    assert!(values.iter().any(|v| (v - 0.9).abs() < 1e-9));
    assert!(values.iter().any(|v| (v - 0.95).abs() < 1e-9));

    let lines = lines.lock().unwrap().clone();
    assert_eq!(lines[0], "Opening PDF: report.pdf");
    assert!(lines.contains(&"Rendered page 4/4".to_string()));
    assert!(lines.contains(&"Adding slides...".to_string()));
    assert!(lines.contains(&"Slide 1/4 created".to_string()));
    assert!(lines.contains(&"Saving presentation...".to_string()));
    let finished = lines.iter().find(|l| l.starts_with("Finished in ")).unwrap();
    assert!(finished.ends_with("report.pptx"), "{finished}");
}

#[test]
fn empty_pdf_fails_without_writing_a_deck() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "blank.pdf");

    let backend = FakePdf {
        pages: vec![],
        fail_at: None,
    };
    let err = convert_sync(&ConversionRequest::new(&input, config_with(out.path(), backend)))
        .unwrap_err();

    assert!(matches!(err, Pdf2PptxError::NoPagesRendered { .. }), "{err}");
    assert!(err.to_string().contains("no renderable pages"));
    assert!(!out.path().join("blank").join("blank.pptx").exists());
}

#[test]
fn render_failure_aborts_the_run() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "broken.pdf");

    let mut backend = FakePdf::uniform(3, 100, 100, 200);
    backend.fail_at = Some(1);
    let (request, _lines, values) = recording_request(&input, config_with(out.path(), backend));
    let err = convert_sync(&request).unwrap_err();

    assert!(matches!(err, Pdf2PptxError::RasterisationFailed { page: 2, .. }), "{err}");
    assert!(!out.path().join("broken").join("broken.pptx").exists());
    assert!(values.lock().unwrap().iter().all(|v| *v < 0.5));
}

#[test]
fn shorter_rerun_leaves_no_stale_pages() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "report.pdf");

    let first = convert_sync(&ConversionRequest::new(
        &input,
        config_with(out.path(), FakePdf::uniform(5, 80, 100, 200)),
    ))
    .unwrap();
    let second = convert_sync(&ConversionRequest::new(
        &input,
        config_with(out.path(), FakePdf::uniform(3, 80, 100, 200)),
    ))
    .unwrap();

    assert_eq!(first.output, second.output);
    assert_eq!(second.slide_count, 3);
    assert_eq!(
        page_files(&out.path().join("report/pages")),
        ["page_001.jpg", "page_002.jpg", "page_003.jpg"]
    );
    assert_eq!(slide_parts(&second.output).len(), 3);
}

#[test]
fn keep_stale_pages_leaves_unrelated_files_and_old_pages() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "report.pdf");

    let pages = out.path().join("report/pages");
    std::fs::create_dir_all(&pages).unwrap();
    std::fs::write(pages.join("page_009.jpg"), b"old").unwrap();
    std::fs::write(pages.join("notes.txt"), b"mine").unwrap();

    let config = ConversionConfig::builder()
        .output_root(out.path())
        .open_output_folder(false)
        .clear_stale_pages(false)
        .backend(Arc::new(FakePdf::uniform(1, 80, 100, 200)))
        .build()
        .unwrap();
    convert_sync(&ConversionRequest::new(&input, config)).unwrap();

    assert_eq!(
        page_files(&pages),
        ["notes.txt", "page_001.jpg", "page_009.jpg"]
    );
}

#[test]
fn non_pdf_input_is_rejected_before_any_output() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = input_dir.path().join("photo.pdf");
    std::fs::write(&input, b"\x89PNG\r\n\x1a\n").unwrap();

    let (request, lines, values) =
        recording_request(&input, config_with(out.path(), FakePdf::uniform(1, 10, 10, 72)));
    let err = convert_sync(&request).unwrap_err();

    assert!(matches!(err, Pdf2PptxError::NotAPdf { .. }), "{err}");
    assert!(err.is_input_error());
    assert!(!out.path().join("photo").exists());
    assert!(lines.lock().unwrap().is_empty());
    assert!(values.lock().unwrap().is_empty());
}

/// Passes the magic-byte check but cannot be opened.
struct DamagedPdf;

impl RasterBackend for DamagedPdf {
    fn open<'a>(&'a self, path: &Path) -> Result<Box<dyn RasterDocument + 'a>, Pdf2PptxError> {
        Err(Pdf2PptxError::CorruptPdf {
            path: path.to_path_buf(),
            detail: "xref table missing".into(),
        })
    }
}

#[test]
fn unopenable_pdf_keeps_previous_pages() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "report.pdf");

    let pages = out.path().join("report/pages");
    std::fs::create_dir_all(&pages).unwrap();
    std::fs::write(pages.join("page_001.jpg"), b"previous run").unwrap();

    let config = ConversionConfig::builder()
        .output_root(out.path())
        .open_output_folder(false)
        .backend(Arc::new(DamagedPdf))
        .build()
        .unwrap();
    let err = convert_sync(&ConversionRequest::new(&input, config)).unwrap_err();

    assert!(matches!(err, Pdf2PptxError::CorruptPdf { .. }), "{err}");
    assert!(err.is_input_error());
    assert_eq!(page_files(&pages), ["page_001.jpg"]);
    assert!(!out.path().join("report/report.pptx").exists());
}

#[test]
fn unopenable_pdf_creates_no_output_tree() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "fresh.pdf");

    let config = ConversionConfig::builder()
        .output_root(out.path())
        .open_output_folder(false)
        .backend(Arc::new(DamagedPdf))
        .build()
        .unwrap();
    let err = convert_sync(&ConversionRequest::new(&input, config)).unwrap_err();

    assert!(err.is_input_error());
    assert!(!out.path().join("fresh").exists());
}

#[tokio::test]
async fn async_convert_runs_off_the_caller_thread() {
    let input_dir = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let input = write_pdf(input_dir.path(), "async.pdf");

    let config = config_with(out.path(), FakePdf::uniform(2, 160, 90, 100));
    let result = convert(ConversionRequest::new(&input, config))
        .await
        .expect("conversion");

    assert_eq!(result.slide_count, 2);
    assert_eq!(result.canvas, Extent::from_pixels(160, 90, 100));
    assert!(result.output.is_file());

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["slide_count"], 2);
}

// ── Real pdfium (gated) ──────────────────────────────────────────────────────

fn test_cases_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_cases")
}

/// Skip this test if E2E_ENABLED is not set *or* no PDF file at `path`.
macro_rules! e2e_skip_unless_ready {
    ($path:expr) => {{
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run e2e tests");
            return;
        }
        let p: PathBuf = $path;
        if !p.exists() {
            println!("SKIP — test file not found: {}", p.display());
            return;
        }
        p
    }};
}

#[test]
fn pdfium_converts_sample_document() {
    let path = e2e_skip_unless_ready!(test_cases_dir().join("sample.pdf"));
    let out = tempfile::tempdir().unwrap();

    PdfiumBackend::bind().expect("pdfium should be loadable");
    // No backend: the pipeline binds pdfium itself.
    let config = ConversionConfig::builder()
        .output_root(out.path())
        .open_output_folder(false)
        .build()
        .unwrap();

    let result = convert_sync(&ConversionRequest::new(&path, config)).expect("conversion");
    assert!(result.slide_count >= 1);
    assert_eq!(result.images.len(), result.slide_count);
    assert_eq!(slide_parts(&result.output).len(), result.slide_count);
    println!(
        "{} slides, canvas {:.2} x {:.2} in",
        result.slide_count,
        result.canvas.width_inches(),
        result.canvas.height_inches()
    );
}

#[test]
fn pdfium_rejects_garbage_after_magic() {
    if std::env::var("E2E_ENABLED").is_err() {
        println!("SKIP");
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("fake.pdf");
    std::fs::write(&input, b"%PDF-garbage").unwrap();

    let config = ConversionConfig::builder()
        .output_root(dir.path())
        .open_output_folder(false)
        .build()
        .unwrap();
    let err = convert_sync(&ConversionRequest::new(&input, config)).unwrap_err();
    assert!(matches!(err, Pdf2PptxError::CorruptPdf { .. }), "{err}");
}
