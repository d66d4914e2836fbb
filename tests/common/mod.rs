//! Shared helpers for integration tests.

#![allow(dead_code)]

#[path = "../../src/fonts/test_font.rs"]
pub mod test_font;

pub use test_font::{latin_font, TestFont};

use pdf_scribe::{Document, DocumentConfig, Margins, PageSize};

/// Route `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A document with 50pt margins and the synthetic font active as `body`
/// at 10pt (line height 12.5).
pub fn document(width: f32, height: f32) -> Document {
    document_with(
        DocumentConfig::default()
            .with_page_size(PageSize::new(width, height))
            .with_margins(Margins::uniform(50.0)),
    )
}

/// Like [`document`] with a custom configuration.
pub fn document_with(config: DocumentConfig) -> Document {
    init_logging();
    let mut doc = Document::new(config).expect("valid config");
    doc.add_font("body", latin_font()).expect("synthetic font parses");
    doc.set_font("body", 10.0, None).expect("font registered");
    doc
}

/// `count` one-word lines separated by newlines.
pub fn numbered_lines(count: usize) -> String {
    (1..=count)
        .map(|n| format!("L{}", n))
        .collect::<Vec<_>>()
        .join("\n")
}
