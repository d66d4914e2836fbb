//! Integration tests for paragraph layout.
//!
//! These tests cover:
//! - Greedy breaking and justification
//! - Style and measurement balance after top-level calls
//! - Dry-run height computation
//! - Text decorations in the emitted operators
//! - Script sizes and baselines, marker gutters and hanging indents

mod common;

use pdf_scribe::layout::{
    break_lines, place_line, Color, MarkerAlign, MarkerSpec, MeasuredToken, MeasurementMode,
    ParagraphOptions, RunStyle, StyleOptions, TextAlign, TextRun, VerticalAlign,
};
use pdf_scribe::Document;
use pdf_scribe::writer::ContentStreamOp;
use proptest::prelude::*;

/// A word wider than the region sits alone on one line, unsplit.
#[test]
fn test_overwide_word_takes_one_line() {
    // 200pt page with 50pt margins leaves a 100pt region
    let mut doc = common::document(200.0, 400.0);
    // 25 capitals at 6pt each
    let word = "A".repeat(25);
    let layout = doc
        .add_paragraph_runs(&[TextRun::new(word)], &ParagraphOptions::default())
        .unwrap();
    assert_eq!(layout.lines, 1);
    assert_eq!(layout.height, 12.5);
}

/// Words wrap when the region is full.
#[test]
fn test_words_wrap() {
    let mut doc = common::document(200.0, 400.0);
    // "AAAAAAAA" is 48pt, a space 2.5pt: two fit per 100pt line
    let text = "AAAAAAAA AAAAAAAA AAAAAAAA AAAAAAAA AAAAAAAA";
    let layout = doc
        .add_paragraph_runs(&[TextRun::new(text)], &ParagraphOptions::default())
        .unwrap();
    assert_eq!(layout.lines, 3);
}

/// 80pt of content on a 100pt line with two gaps gets 10pt per gap.
#[test]
fn test_justify_extra_per_gap() {
    let tokens = [
        MeasuredToken::word(30.0),
        MeasuredToken::space(5.0),
        MeasuredToken::word(30.0),
        MeasuredToken::space(5.0),
        MeasuredToken::word(10.0),
        MeasuredToken::space(5.0),
        MeasuredToken::word(50.0),
    ];
    let lines = break_lines(&tokens, 100.0, 100.0);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].width, 80.0);
    assert_eq!(lines[0].interior_spaces, 2);

    let placement = place_line(TextAlign::Justify, 100.0, &lines[0]);
    assert!((placement.extra_per_space - 10.0).abs() < 1e-4);

    let last = place_line(TextAlign::Justify, 100.0, &lines[1]);
    assert_eq!(last.extra_per_space, 0.0);
}

/// Style depth and measurement depth are unchanged by any call.
#[test]
fn test_state_balanced_after_calls() {
    let mut doc = common::document(300.0, 300.0);
    let depth = doc.context().style.depth();
    let runs = [
        TextRun::new("plain "),
        TextRun::new("bold ").bold(),
        TextRun::new("italic").italic().underline(),
    ];
    doc.add_paragraph_runs(&runs, &ParagraphOptions::aligned(TextAlign::Center))
        .unwrap();
    doc.compute_paragraph_height(&runs, &ParagraphOptions::default())
        .unwrap();

    assert_eq!(doc.context().style.depth(), depth);
    assert_eq!(doc.context().measurement.depth(), 0);
    assert_eq!(doc.context().style.current().font_alias.as_deref(), Some("body"));
}

/// Entering twice and leaving once keeps measurement active.
#[test]
fn test_measurement_mode_counts_depth() {
    let mut mode = MeasurementMode::new();
    mode.enter();
    mode.enter();
    mode.exit();
    assert!(mode.is_active());
    mode.exit();
    assert!(!mode.is_active());
}

/// The dry pass predicts exactly what drawing consumes, and leaves no
/// trace on the page.
#[test]
fn test_compute_height_matches_layout() {
    let mut doc = common::document(200.0, 600.0);
    let runs = [TextRun::new("AAAAAAAA AAAAAAAA AAAAAAAA\nshort")];
    let options = ParagraphOptions {
        space_before: 4.0,
        space_after: 6.0,
        ..Default::default()
    };

    let start = doc.context().layout.cursor_y();
    let predicted = doc.compute_paragraph_height(&runs, &options).unwrap();
    assert_eq!(doc.context().layout.cursor_y(), start);
    assert_eq!(doc.page_count(), 0);

    let layout = doc.add_paragraph_runs(&runs, &options).unwrap();
    assert_eq!(layout.height, predicted);
    assert_eq!(start - doc.context().layout.cursor_y(), predicted);
    // 3 lines of 12.5 plus the spacing
    assert_eq!(predicted, 4.0 + 37.5 + 6.0);
}

/// Letter spacing goes out as Tc and underline as a stroked line.
#[test]
fn test_letter_spacing_and_underline_operators() {
    let mut doc = common::document(300.0, 300.0);
    let mut spaced = TextRun::new("AB");
    spaced.style.letter_spacing = Some(2.0);
    doc.add_paragraph_runs(&[spaced, TextRun::new(" CD").underline()], &ParagraphOptions::default())
        .unwrap();

    let ops = doc.context().pages.get(0).unwrap().content.operations().to_vec();
    assert!(ops.contains(&ContentStreamOp::SetCharacterSpacing(2.0)));
    assert!(ops.iter().any(|op| matches!(op, ContentStreamOp::Stroke)));
}

/// Center alignment starts the line inside the region.
#[test]
fn test_centered_line_position() {
    let mut doc = common::document(200.0, 300.0);
    // "AB" is 12pt wide in a 100pt region starting at x=50
    doc.add_paragraph_runs(&[TextRun::new("AB")], &ParagraphOptions::aligned(TextAlign::Center))
        .unwrap();

    let ops = doc.context().pages.get(0).unwrap().content.operations().to_vec();
    let x = ops
        .iter()
        .find_map(|op| match op {
            ContentStreamOp::SetTextMatrix(_, _, _, _, x, _) => Some(*x),
            _ => None,
        })
        .unwrap();
    assert!((x - 94.0).abs() < 1e-4, "x = {}", x);
}

/// Document-level style applies to later paragraphs; run overrides win.
#[test]
fn test_document_style_and_run_overrides() {
    let mut doc = common::document(300.0, 300.0);
    doc.apply_style(&StyleOptions {
        size: Some(20.0),
        color: Some(Color::Rgb(1.0, 0.0, 0.0)),
        ..Default::default()
    });
    let blue = TextRun::new(" CD").with_style(RunStyle {
        color: Some(Color::Rgb(0.0, 0.0, 1.0)),
        ..Default::default()
    });
    let layout = doc
        .add_paragraph_runs(&[TextRun::new("AB"), blue], &ParagraphOptions::default())
        .unwrap();
    // 20pt text on a 25pt line
    assert_eq!(layout.height, 25.0);

    let ops = doc.context().pages.get(0).unwrap().content.operations().to_vec();
    assert!(ops.contains(&ContentStreamOp::SetFillColorRGB(1.0, 0.0, 0.0)));
    assert!(ops.contains(&ContentStreamOp::SetFillColorRGB(0.0, 0.0, 1.0)));
    assert!(ops.contains(&ContentStreamOp::SetFont("F1".to_string(), 20.0)));
}

/// Font size and text origin of every text object on the first page.
fn text_draws(doc: &Document) -> Vec<(f32, f32, f32)> {
    let mut size = 0.0;
    let mut draws = Vec::new();
    for op in doc.context().pages.get(0).unwrap().content.operations() {
        match op {
            ContentStreamOp::SetFont(_, s) => size = *s,
            ContentStreamOp::SetTextMatrix(_, _, _, _, x, y) => draws.push((size, *x, *y)),
            _ => {},
        }
    }
    draws
}

fn scripted(vertical: VerticalAlign, baseline_shift: Option<f32>) -> Vec<(f32, f32, f32)> {
    let mut doc = common::document(300.0, 300.0);
    let script = TextRun::new("B").with_style(RunStyle {
        vertical,
        baseline_shift,
        ..Default::default()
    });
    doc.add_paragraph_runs(&[TextRun::new("A"), script], &ParagraphOptions::default())
        .unwrap();
    text_draws(&doc)
}

/// Superscript is drawn at three quarters size, 0.35 line heights up.
#[test]
fn test_superscript_size_and_rise() {
    let draws = scripted(VerticalAlign::Superscript, None);
    assert_eq!(draws.len(), 2);
    let (plain, sup) = (draws[0], draws[1]);
    assert_eq!(plain.0, 10.0);
    assert_eq!(sup.0, 7.5);
    // 6pt "A" then the script run
    assert_eq!(sup.1, 56.0);
    assert!((sup.2 - plain.2 - 4.375).abs() < 1e-4, "rise = {}", sup.2 - plain.2);
}

/// Subscript is drawn at three quarters size, 0.15 line heights down.
#[test]
fn test_subscript_size_and_drop() {
    let draws = scripted(VerticalAlign::Subscript, None);
    let (plain, sub) = (draws[0], draws[1]);
    assert_eq!(sub.0, 7.5);
    assert!((sub.2 - plain.2 + 1.875).abs() < 1e-4, "drop = {}", plain.2 - sub.2);
}

/// An explicit shift replaces the script default.
#[test]
fn test_explicit_baseline_shift() {
    let draws = scripted(VerticalAlign::Superscript, Some(2.0));
    let (plain, sup) = (draws[0], draws[1]);
    assert_eq!(sup.0, 7.5);
    assert!((sup.2 - plain.2 - 2.0).abs() < 1e-4);

    // Shifted baseline text keeps its size
    let draws = scripted(VerticalAlign::Baseline, Some(-3.0));
    assert_eq!(draws[1].0, 10.0);
    assert!((draws[1].2 - draws[0].2 + 3.0).abs() < 1e-4);
}

fn marked(align: MarkerAlign) -> Vec<(f32, f32, f32)> {
    let mut doc = common::document(300.0, 300.0);
    let options = ParagraphOptions {
        indent: 18.0,
        hang_indent: 18.0,
        marker: Some(MarkerSpec {
            align,
            ..MarkerSpec::new("\u{2022}")
        }),
        ..Default::default()
    };
    doc.add_paragraph_runs(&[TextRun::new("Item")], &options).unwrap();
    text_draws(&doc)
}

/// A right-aligned marker ends one gap before the text.
#[test]
fn test_right_marker_in_gutter() {
    let draws = marked(MarkerAlign::Right);
    assert_eq!(draws.len(), 2);
    let (marker, text) = (draws[0], draws[1]);
    // 50 + 18 indent - 6 gap - 3.5 bullet
    assert!((marker.1 - 58.5).abs() < 1e-4, "marker x = {}", marker.1);
    assert_eq!(text.1, 68.0);
    assert_eq!(marker.2, text.2);
}

/// A left-aligned marker sits at the region edge.
#[test]
fn test_left_marker_at_edge() {
    let draws = marked(MarkerAlign::Left);
    assert_eq!(draws[0].1, 50.0);
    assert_eq!(draws[1].1, 68.0);
}

/// The first line takes `indent`, continuation lines `hang_indent`.
#[test]
fn test_hang_indent_on_continuation_lines() {
    let mut doc = common::document(200.0, 400.0);
    let options = ParagraphOptions {
        indent: 20.0,
        hang_indent: 10.0,
        ..Default::default()
    };
    // One 48pt word per line in both the 80pt and 90pt widths
    let layout = doc
        .add_paragraph_runs(&[TextRun::new("AAAAAAAA AAAAAAAA AAAAAAAA")], &options)
        .unwrap();
    assert_eq!(layout.lines, 3);

    let xs: Vec<f32> = text_draws(&doc).iter().map(|d| d.1).collect();
    assert_eq!(xs, vec![70.0, 60.0, 60.0]);
}

fn token_strategy() -> impl Strategy<Value = Vec<MeasuredToken>> {
    prop::collection::vec(
        prop_oneof![
            (1.0f32..80.0).prop_map(MeasuredToken::word),
            (1.0f32..6.0).prop_map(MeasuredToken::space),
        ],
        0..40,
    )
}

proptest! {
    /// Lines never start or end with a space, and every word lands on
    /// exactly one line in order.
    #[test]
    fn prop_lines_cover_words(tokens in token_strategy(), width in 20.0f32..200.0) {
        let lines = break_lines(&tokens, width, width);
        prop_assert!(!lines.is_empty());

        let mut seen = Vec::new();
        let mut previous_end = 0;
        for line in &lines {
            if line.is_empty() {
                continue;
            }
            prop_assert!(!tokens[line.start].is_space);
            prop_assert!(!tokens[line.end - 1].is_space);
            prop_assert!(line.start >= previous_end);
            previous_end = line.end;
            seen.extend((line.start..line.end).filter(|&i| !tokens[i].is_space));
        }
        let words: Vec<usize> = (0..tokens.len()).filter(|&i| !tokens[i].is_space).collect();
        prop_assert_eq!(seen, words);
    }

    /// Only the last line of a block is exempt from justification, and
    /// a justified line always fills its width.
    #[test]
    fn prop_justified_lines_fill(tokens in token_strategy(), width in 100.0f32..200.0) {
        let lines = break_lines(&tokens, width, width);
        for line in &lines {
            let placement = place_line(TextAlign::Justify, width, line);
            if line.last_in_block || line.interior_spaces == 0 {
                prop_assert_eq!(placement.extra_per_space, 0.0);
            } else if line.width <= width {
                let filled = line.width + placement.extra_per_space * line.interior_spaces as f32;
                prop_assert!((filled - width).abs() < 1e-2);
            }
        }
    }
}
