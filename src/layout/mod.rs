//! Text layout and pagination.
//!
//! This module provides the pieces that decide where things go on a page:
//! - Style scoping ([`StyleContext`]) and color normalization
//! - Page regions and the cursor ([`LayoutManager`])
//! - Dry-run height computation ([`MeasurementMode`])
//! - Tokenizing, line breaking and paragraph emission ([`TextLayoutEngine`])
//! - Box fragmentation across page breaks

pub mod color;
pub mod fragments;
pub mod layout_manager;
pub mod line_breaker;
pub mod measurement;
pub mod style_context;
pub mod text_layout;
pub mod tokenizer;

// Re-export main types
pub use color::{BasicColorNormalizer, Color, ColorNormalizer, ColorSpec};
pub use fragments::{BorderSpec, BoxDecoration, Fragment, FragmentKind, FragmentTracker, Padding};
pub use layout_manager::{LayoutContext, LayoutManager, LayoutSnapshot};
pub use line_breaker::{
    baseline_offset, break_lines, place_line, LinePlacement, LineSpan, MeasuredToken, TextAlign,
};
pub use measurement::MeasurementMode;
pub use style_context::{StyleContext, StyleMarkers, StyleOptions, StyleState};
pub use text_layout::{MarkerAlign, MarkerSpec, ParagraphLayout, ParagraphOptions, TextLayoutEngine};
pub use tokenizer::{tokenize, InlineObject, RunStyle, TextRun, Token, TokenKind, VerticalAlign};
