//! Integration tests for the serialized PDF.
//!
//! These tests cover:
//! - Minimal documents and the xref table
//! - Embedded font object graphs
//! - Annotations, headers/footers and the Info dictionary
//! - Compression and determinism

mod common;

use std::io::Read;

use chrono::{TimeZone, Utc};
use pdf_scribe::layout::{ParagraphOptions, TextRun};
use pdf_scribe::writer::{HFAlignment, HeaderFooter, ResourceKind};
use pdf_scribe::{Document, DocumentConfig, Error, Margins, PageSize};

/// Byte offsets listed in the xref table, indexed by object id.
fn xref_offsets(pdf: &[u8]) -> Vec<usize> {
    let text = String::from_utf8_lossy(pdf);
    let tail = text.rfind("startxref").expect("startxref present");
    let start: usize = text[tail + 9..]
        .split_whitespace()
        .next()
        .and_then(|n| n.parse().ok())
        .expect("startxref offset");
    assert!(text[start..].starts_with("xref\n"));

    let mut lines = text[start..].lines().skip(1);
    let header = lines.next().unwrap();
    let count: usize = header.split_whitespace().nth(1).unwrap().parse().unwrap();
    lines
        .take(count)
        .map(|line| line[..10].parse().unwrap())
        .collect()
}

/// Every object resolves at its recorded offset.
fn assert_xref_consistent(pdf: &[u8]) {
    let offsets = xref_offsets(pdf);
    assert!(offsets.len() > 1);
    for (id, &offset) in offsets.iter().enumerate().skip(1) {
        let expected = format!("{} 0 obj", id);
        assert!(
            pdf[offset..].starts_with(expected.as_bytes()),
            "object {} not found at offset {}",
            id,
            offset
        );
    }
}

fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// A document nobody drew on is still a valid single-page PDF.
#[test]
fn test_empty_document_is_minimal_pdf() {
    common::init_logging();
    let pdf = Document::new(DocumentConfig::default()).unwrap().output().unwrap();
    let text = String::from_utf8_lossy(&pdf);

    assert!(text.starts_with("%PDF-1.7\n"));
    assert_eq!(count(&text, "/Type /Page>>"), 1);
    assert_eq!(count(&text, "/Type /Pages"), 1);
    assert_eq!(count(&text, "/Type /Catalog"), 1);
    assert!(text.contains("/Count 1"));
    assert!(!text.contains("/Font"));
    assert_xref_consistent(&pdf);
}

/// Drawing text embeds a Type0 font with its descendants.
#[test]
fn test_font_object_graph() {
    let mut doc = common::document(300.0, 300.0);
    doc.add_paragraph_runs(&[TextRun::new("AB AB")], &ParagraphOptions::default())
        .unwrap();
    let pdf = doc.output().unwrap();
    let text = String::from_utf8_lossy(&pdf);

    assert!(text.contains("/Subtype /Type0"));
    assert!(text.contains("/Encoding /Identity-H"));
    assert!(text.contains("/Subtype /CIDFontType2"));
    assert!(text.contains("/CIDToGIDMap /Identity"));
    assert!(text.contains("/Type /FontDescriptor"));
    assert!(text.contains("/FontFile2"));
    assert!(text.contains("/ToUnicode"));
    // 'A' is glyph 34 (0x22), 'B' glyph 35
    assert!(text.contains("<0022> <0041>"));
    assert!(text.contains("<0023> <0042>"));
    assert!(text.contains("/F1 "));
    assert!(text.contains(" Tj"));
    assert_xref_consistent(&pdf);
}

/// Registered but unused fonts are not embedded.
#[test]
fn test_unused_font_not_embedded() {
    let mut doc = common::document(300.0, 300.0);
    doc.add_font("spare", common::latin_font()).unwrap();
    doc.add_paragraph_runs(&[TextRun::new("A")], &ParagraphOptions::default())
        .unwrap();
    let text = String::from_utf8_lossy(&doc.output().unwrap()).into_owned();
    assert_eq!(count(&text, "/Subtype /Type0"), 1);
}

/// Hyperlinked words become link annotations on their page.
#[test]
fn test_link_annotations() {
    let mut doc = common::document(300.0, 300.0);
    doc.add_paragraph_runs(
        &[TextRun::new("see "), TextRun::new("docs").link("https://example.com/docs")],
        &ParagraphOptions::default(),
    )
    .unwrap();
    let text = String::from_utf8_lossy(&doc.output().unwrap()).into_owned();

    assert!(text.contains("/Annots ["));
    assert!(text.contains("/Subtype /Link"));
    assert!(text.contains("/URI (https://example.com/docs)"));
}

/// Footers resolve the page count on every page.
#[test]
fn test_footer_on_every_page() {
    let mut doc = common::document(300.0, 200.0);
    doc.set_footer(HeaderFooter::new("{page}/{pages}").with_align(HFAlignment::Right))
        .unwrap();
    doc.add_paragraph_runs(&[TextRun::new(common::numbered_lines(12))], &ParagraphOptions::default())
        .unwrap();
    assert_eq!(doc.page_count(), 2);
    let text = String::from_utf8_lossy(&doc.output().unwrap()).into_owned();

    assert!(text.contains("/Count 2"));
    // "/" is glyph 16 (0x10); it is only drawn by the footer
    assert!(text.contains("<0010> <002F>"));
}

/// Headers cannot be attached once page 1 has content.
#[test]
fn test_header_after_content_rejected() {
    let mut doc = common::document(300.0, 300.0);
    doc.set_header(HeaderFooter::new("{title}")).unwrap();
    assert!(matches!(
        doc.set_header(HeaderFooter::new("again")),
        Err(Error::DuplicateHeaderFooter("header"))
    ));

    let mut late = common::document(300.0, 300.0);
    late.add_spacer(10.0);
    late.add_paragraph_runs(&[TextRun::new("A")], &ParagraphOptions::default())
        .unwrap();
    assert!(matches!(
        late.set_header(HeaderFooter::new("x")),
        Err(Error::HeaderAfterContent)
    ));
}

/// Metadata lands in the Info dictionary.
#[test]
fn test_info_dictionary() {
    let config = DocumentConfig::default()
        .with_title("Quarterly Report")
        .with_author("Finance")
        .with_keywords("q3, revenue")
        .with_creation_date(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
    let pdf = Document::new(config).unwrap().output().unwrap();
    let text = String::from_utf8_lossy(&pdf);

    assert!(text.contains("/Title (Quarterly Report)"));
    assert!(text.contains("/Author (Finance)"));
    assert!(text.contains("/Keywords (q3, revenue)"));
    assert!(text.contains("/CreationDate (D:20240102030405Z)"));
    assert!(text.contains("/Producer (pdf_scribe"));
    assert!(text.contains("/Info "));
}

/// Compressed content streams inflate back to the operators.
#[test]
fn test_compressed_content_stream() {
    let config = DocumentConfig::default()
        .with_page_size(PageSize::new(300.0, 300.0))
        .with_margins(Margins::uniform(50.0))
        .with_compress(true);
    let mut doc = common::document_with(config);
    doc.add_paragraph_runs(&[TextRun::new("AB")], &ParagraphOptions::default())
        .unwrap();
    let pdf = doc.output().unwrap();
    let text = String::from_utf8_lossy(&pdf);
    assert!(text.contains("/Filter /FlateDecode"));
    assert!(!text.contains(" Tj"));

    // Find the stream whose inflated form has a text object.
    let mut found = false;
    let mut rest = &pdf[..];
    while let Some(pos) = find(rest, b"stream\n") {
        let body = &rest[pos + 7..];
        let end = find(body, b"\nendstream").unwrap();
        let mut inflated = Vec::new();
        if flate2::read::ZlibDecoder::new(&body[..end])
            .read_to_end(&mut inflated)
            .is_ok()
        {
            let ops = String::from_utf8_lossy(&inflated);
            if ops.contains("BT") && ops.contains(" Tj") {
                found = true;
                break;
            }
        }
        rest = &body[end + b"\nendstream".len()..];
    }
    assert!(found, "no content stream with text");
    assert_xref_consistent(&pdf);
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Objects added by collaborators can be named in page resources.
#[test]
fn test_ext_gstate_resource() {
    let mut doc = common::document(300.0, 300.0);
    let gs = doc
        .context_mut()
        .writer
        .add_object(b"<< /Type /ExtGState /ca 0.5 >>".to_vec());
    doc.register_page_resource(ResourceKind::ExtGState, "GS1", gs);
    doc.context_mut().content().unwrap().set_ext_gstate("GS1");
    let pdf = doc.output().unwrap();
    let text = String::from_utf8_lossy(&pdf);

    assert!(text.contains(&format!("/ExtGState <</GS1 {} 0 R>>", gs)));
    assert!(text.contains("/GS1 gs"));
    assert_xref_consistent(&pdf);
}

/// Non-ASCII metadata is written as UTF-16.
#[test]
fn test_unicode_title() {
    let config = DocumentConfig::default().with_title("\u{e9}t\u{e9}");
    let text = String::from_utf8_lossy(&Document::new(config).unwrap().output().unwrap()).into_owned();
    assert!(text.contains("/Title <FEFF00E9007400E9>"));
}

/// The same input always produces the same bytes.
#[test]
fn test_output_is_deterministic() {
    let build = || {
        let mut doc = common::document(300.0, 200.0);
        doc.add_paragraph_runs(
            &[TextRun::new("Deterministic "), TextRun::new("output").bold()],
            &ParagraphOptions::default(),
        )
        .unwrap();
        doc.output().unwrap()
    };
    assert_eq!(build(), build());
}
