//! Fixed XML parts and small generators for the PPTX package.
//!
//! Only the parts PowerPoint, LibreOffice and Keynote require to open a
//! deck are emitted: one slide master, one blank layout, one theme, and
//! the presentation/view/table-style property parts.

use crate::pipeline::layout::{Extent, Placement};
use std::fmt::Write as _;

pub const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";

const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub const REL_OFFICE_DOCUMENT: &str = "officeDocument";
pub const REL_SLIDE_MASTER: &str = "slideMaster";
pub const REL_SLIDE_LAYOUT: &str = "slideLayout";
pub const REL_SLIDE: &str = "slide";
pub const REL_THEME: &str = "theme";
pub const REL_IMAGE: &str = "image";
pub const REL_PRES_PROPS: &str = "presProps";
pub const REL_VIEW_PROPS: &str = "viewProps";
pub const REL_TABLE_STYLES: &str = "tableStyles";
pub const REL_EXTENDED_PROPS: &str = "extended-properties";
const REL_CORE_PROPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// Smallest and largest slide edge PowerPoint accepts, in EMU.
pub const MIN_SLIDE_EDGE: i64 = 914_400;
pub const MAX_SLIDE_EDGE: i64 = 51_206_400;

/// Escape text for use inside XML attributes and element content.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if (c as u32) < 0x20 && !matches!(c, '\t' | '\n' | '\r') => {}
            c => out.push(c),
        }
    }
    out
}

// ── Relationships ────────────────────────────────────────────────────────

/// One `<Relationship>` entry. `kind` is the last segment of the type URI
/// (e.g. `"slide"`), except for core properties which use their full URI.
pub struct Rel<'a> {
    pub id: String,
    pub kind: &'a str,
    pub target: String,
}

pub fn relationships_xml(rels: &[Rel<'_>]) -> String {
    let mut xml = String::with_capacity(256 + rels.len() * 160);
    xml.push_str(XML_DECL);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for rel in rels {
        let ty = if rel.kind.starts_with("http") {
            rel.kind.to_string()
        } else {
            format!("{REL_BASE}/{}", rel.kind)
        };
        let _ = write!(
            xml,
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            rel.id,
            ty,
            escape_xml(&rel.target)
        );
    }
    xml.push_str("</Relationships>");
    xml
}

pub fn package_rels_xml() -> String {
    relationships_xml(&[
        Rel {
            id: "rId1".into(),
            kind: REL_OFFICE_DOCUMENT,
            target: "ppt/presentation.xml".into(),
        },
        Rel {
            id: "rId2".into(),
            kind: REL_CORE_PROPS,
            target: "docProps/core.xml".into(),
        },
        Rel {
            id: "rId3".into(),
            kind: REL_EXTENDED_PROPS,
            target: "docProps/app.xml".into(),
        },
    ])
}

// ── Content types ────────────────────────────────────────────────────────

pub fn content_types_xml(slide_count: usize, media_defaults: &[(&str, &str)]) -> String {
    const PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";
    let mut xml = String::with_capacity(2048 + slide_count * 160);
    xml.push_str(XML_DECL);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    for (ext, content_type) in media_defaults {
        let _ = write!(xml, r#"<Default Extension="{ext}" ContentType="{content_type}"/>"#);
    }

    let overrides = [
        ("/ppt/presentation.xml", format!("{PML}.presentation.main+xml")),
        ("/ppt/slideMasters/slideMaster1.xml", format!("{PML}.slideMaster+xml")),
        ("/ppt/slideLayouts/slideLayout1.xml", format!("{PML}.slideLayout+xml")),
        ("/ppt/presProps.xml", format!("{PML}.presProps+xml")),
        ("/ppt/viewProps.xml", format!("{PML}.viewProps+xml")),
        ("/ppt/tableStyles.xml", format!("{PML}.tableStyles+xml")),
        ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml".to_string()),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml".to_string()),
        ("/docProps/app.xml", "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string()),
    ];
    for (part, content_type) in &overrides {
        let _ = write!(xml, r#"<Override PartName="{part}" ContentType="{content_type}"/>"#);
    }
    for n in 1..=slide_count {
        let _ = write!(
            xml,
            r#"<Override PartName="/ppt/slides/slide{n}.xml" ContentType="{PML}.slide+xml"/>"#
        );
    }
    xml.push_str("</Types>");
    xml
}

// ── Document properties ──────────────────────────────────────────────────

pub fn core_props_xml(title: &str) -> String {
    format!(
        concat!(
            r#"{decl}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" "#,
            r#"xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" "#,
            r#"xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#,
            r#"<dc:title>{title}</dc:title><dc:creator>pdf2pptx</dc:creator><cp:lastModifiedBy>pdf2pptx</cp:lastModifiedBy>"#,
            r#"<cp:revision>1</cp:revision></cp:coreProperties>"#
        ),
        decl = XML_DECL,
        title = escape_xml(title)
    )
}

pub fn app_props_xml(slide_count: usize) -> String {
    format!(
        concat!(
            r#"{decl}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" "#,
            r#"xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#,
            r#"<Application>pdf2pptx</Application><PresentationFormat>Custom</PresentationFormat>"#,
            r#"<Slides>{slides}</Slides><Notes>0</Notes><HiddenSlides>0</HiddenSlides>"#,
            r#"<AppVersion>{version}</AppVersion></Properties>"#
        ),
        decl = XML_DECL,
        slides = slide_count,
        version = app_version()
    )
}

/// `AppVersion` must look like `XX.YYYY`.
fn app_version() -> String {
    let major: u32 = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap_or(0);
    let minor: u32 = env!("CARGO_PKG_VERSION_MINOR").parse().unwrap_or(0);
    format!("{:02}.{:04}", major, minor)
}

// ── Presentation part ────────────────────────────────────────────────────

/// `ppt/presentation.xml`. Slide `n` (1-based) uses relationship
/// `rId{first_slide_rel + n - 1}`.
pub fn presentation_xml(canvas: Extent, slide_count: usize, first_slide_rel: usize) -> String {
    let mut xml = String::with_capacity(1024 + slide_count * 48);
    xml.push_str(XML_DECL);
    let _ = write!(
        xml,
        r#"<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1">"#
    );
    xml.push_str(r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst>"#);
    if slide_count > 0 {
        xml.push_str("<p:sldIdLst>");
        for i in 0..slide_count {
            let _ = write!(
                xml,
                r#"<p:sldId id="{}" r:id="rId{}"/>"#,
                256 + i,
                first_slide_rel + i
            );
        }
        xml.push_str("</p:sldIdLst>");
    }
    let _ = write!(xml, r#"<p:sldSz cx="{}" cy="{}"/>"#, canvas.cx, canvas.cy);
    xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
    xml.push_str("<p:defaultTextStyle/>");
    xml.push_str("</p:presentation>");
    xml
}

// ── Slides ───────────────────────────────────────────────────────────────

const GROUP_SHAPE_PROPS: &str = concat!(
    r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#,
    r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/>"#,
    r#"<a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#
);

/// A slide whose only shape is the picture behind relationship `image_rel`.
pub fn picture_slide_xml(index: usize, descr: &str, image_rel: &str, placement: Placement) -> String {
    let mut xml = String::with_capacity(1024);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}">"#);
    xml.push_str("<p:cSld><p:spTree>");
    xml.push_str(GROUP_SHAPE_PROPS);

    xml.push_str("<p:pic><p:nvPicPr>");
    let _ = write!(
        xml,
        r#"<p:cNvPr id="2" name="Picture {}" descr="{}"/>"#,
        index,
        escape_xml(descr)
    );
    xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);
    let _ = write!(
        xml,
        r#"<p:blipFill><a:blip r:embed="{image_rel}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>"#
    );
    xml.push_str("<p:spPr><a:xfrm>");
    let _ = write!(
        xml,
        r#"<a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/>"#,
        placement.left, placement.top, placement.size.cx, placement.size.cy
    );
    xml.push_str(r#"</a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#);

    xml.push_str("</p:spTree></p:cSld>");
    xml.push_str("<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>");
    xml.push_str("</p:sld>");
    xml
}

// ── Master, layout, theme ────────────────────────────────────────────────

pub fn slide_master_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<p:sldMaster xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            r#"<p:cSld><p:bg><p:bgRef idx="1001"><a:schemeClr val="bg1"/></p:bgRef></p:bg><p:spTree>{grp}</p:spTree></p:cSld>"#,
            r#"<p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" "#,
            r#"accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>"#,
            r#"<p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst>"#,
            r#"<p:txStyles><p:titleStyle/><p:bodyStyle/><p:otherStyle/></p:txStyles>"#,
            r#"</p:sldMaster>"#
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        grp = GROUP_SHAPE_PROPS
    )
}

pub fn blank_layout_xml() -> String {
    format!(
        concat!(
            "{decl}",
            r#"<p:sldLayout xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}" type="blank" preserve="1">"#,
            r#"<p:cSld name="Blank"><p:spTree>{grp}</p:spTree></p:cSld>"#,
            r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#,
            r#"</p:sldLayout>"#
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P,
        grp = GROUP_SHAPE_PROPS
    )
}

pub fn theme_xml() -> String {
    let mut xml = String::with_capacity(4096);
    xml.push_str(XML_DECL);
    let _ = write!(xml, r#"<a:theme xmlns:a="{NS_A}" name="Office Theme"><a:themeElements>"#);

    xml.push_str(r#"<a:clrScheme name="Office">"#);
    xml.push_str(r#"<a:dk1><a:sysClr val="windowText" lastClr="000000"/></a:dk1>"#);
    xml.push_str(r#"<a:lt1><a:sysClr val="window" lastClr="FFFFFF"/></a:lt1>"#);
    for (name, rgb) in [
        ("dk2", "1F497D"),
        ("lt2", "EEECE1"),
        ("accent1", "4F81BD"),
        ("accent2", "C0504D"),
        ("accent3", "9BBB59"),
        ("accent4", "8064A2"),
        ("accent5", "4BACC6"),
        ("accent6", "F79646"),
        ("hlink", "0000FF"),
        ("folHlink", "800080"),
    ] {
        let _ = write!(xml, r#"<a:{name}><a:srgbClr val="{rgb}"/></a:{name}>"#);
    }
    xml.push_str("</a:clrScheme>");

    xml.push_str(r#"<a:fontScheme name="Office">"#);
    for kind in ["majorFont", "minorFont"] {
        let _ = write!(
            xml,
            r#"<a:{kind}><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:{kind}>"#
        );
    }
    xml.push_str("</a:fontScheme>");

    xml.push_str(r#"<a:fmtScheme name="Office">"#);
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let _ = write!(xml, "<a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst>");
    xml.push_str("<a:lnStyleLst>");
    for w in [9525, 25400, 38100] {
        let _ = write!(
            xml,
            r#"<a:ln w="{w}" cap="flat" cmpd="sng" algn="ctr">{solid}<a:prstDash val="solid"/></a:ln>"#
        );
    }
    xml.push_str("</a:lnStyleLst>");
    xml.push_str("<a:effectStyleLst>");
    for _ in 0..3 {
        xml.push_str("<a:effectStyle><a:effectLst/></a:effectStyle>");
    }
    xml.push_str("</a:effectStyleLst>");
    let _ = write!(xml, "<a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst>");
    xml.push_str("</a:fmtScheme>");

    xml.push_str("</a:themeElements><a:objectDefaults/><a:extraClrSchemeLst/></a:theme>");
    xml
}

pub fn pres_props_xml() -> String {
    format!(
        r#"{XML_DECL}<p:presentationPr xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"/>"#
    )
}

pub fn view_props_xml() -> String {
    format!(
        concat!(
            r#"{decl}<p:viewPr xmlns:a="{a}" xmlns:r="{r}" xmlns:p="{p}">"#,
            r#"<p:normalViewPr><p:restoredLeft sz="15620"/><p:restoredTop sz="94660"/></p:normalViewPr>"#,
            r#"<p:gridSpacing cx="76200" cy="76200"/></p:viewPr>"#
        ),
        decl = XML_DECL,
        a = NS_A,
        r = NS_R,
        p = NS_P
    )
}

pub fn table_styles_xml() -> String {
    format!(
        r#"{XML_DECL}<a:tblStyleLst xmlns:a="{NS_A}" def="{{5C22544A-7EE6-4342-B048-85BDC9FD1C3A}}"/>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_handles_markup_and_control_chars() {
        assert_eq!(escape_xml(r#"a<b>&"c"'"#), "a&lt;b&gt;&amp;&quot;c&quot;&apos;");
        assert_eq!(escape_xml("x\u{1}y"), "xy");
    }

    #[test]
    fn presentation_lists_every_slide_with_its_rel() {
        let xml = presentation_xml(Extent { cx: 3657600, cy: 4572000 }, 3, 6);
        assert!(xml.contains(r#"<p:sldSz cx="3657600" cy="4572000"/>"#));
        assert!(xml.contains(r#"<p:sldId id="256" r:id="rId6"/>"#));
        assert!(xml.contains(r#"<p:sldId id="258" r:id="rId8"/>"#));
        assert!(!xml.contains(r#"r:id="rId9""#));
    }

    #[test]
    fn empty_presentation_has_no_slide_list() {
        let xml = presentation_xml(Extent { cx: 914400, cy: 914400 }, 0, 6);
        assert!(!xml.contains("sldIdLst"));
    }

    #[test]
    fn picture_slide_carries_placement() {
        let placement = Placement {
            left: -150,
            top: 0,
            size: Extent { cx: 700, cy: 500 },
        };
        let xml = picture_slide_xml(1, "page_001.jpg", "rId2", placement);
        assert!(xml.contains(r#"<a:off x="-150" y="0"/>"#));
        assert!(xml.contains(r#"<a:ext cx="700" cy="500"/>"#));
        assert!(xml.contains(r#"r:embed="rId2""#));
        assert!(xml.contains(r#"descr="page_001.jpg""#));
    }

    #[test]
    fn content_types_override_each_slide() {
        let xml = content_types_xml(2, &[("jpeg", "image/jpeg")]);
        assert!(xml.contains(r#"PartName="/ppt/slides/slide1.xml""#));
        assert!(xml.contains(r#"PartName="/ppt/slides/slide2.xml""#));
        assert!(!xml.contains("slide3.xml"));
        assert!(xml.contains(r#"<Default Extension="jpeg" ContentType="image/jpeg"/>"#));
    }

    #[test]
    fn relationships_expand_short_kinds() {
        let xml = relationships_xml(&[Rel {
            id: "rId1".into(),
            kind: REL_SLIDE,
            target: "slides/slide1.xml".into(),
        }]);
        assert!(xml.contains(
            r#"Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide""#
        ));
    }

    #[test]
    fn app_version_has_office_shape() {
        let v = app_version();
        let (major, minor) = v.split_once('.').unwrap();
        assert_eq!(major.len(), 2);
        assert_eq!(minor.len(), 4);
    }
}
