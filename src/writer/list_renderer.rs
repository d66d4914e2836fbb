//! Bulleted and numbered lists.
//!
//! Each item is a paragraph whose first line carries a marker in the
//! hanging gutter. Nested items indent by one more gutter and restart
//! their numbering.

use serde::{Deserialize, Serialize};

use super::render_context::RenderContext;
use crate::error::Result;
use crate::layout::{MarkerAlign, MarkerSpec, ParagraphOptions, RunStyle, TextLayoutEngine, TextRun};

/// Marker kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    /// `•`
    #[default]
    Bullet,
    /// `1.`, `2.`, ...
    Decimal,
    /// `a.`, `b.`, ..., `z.`, `aa.`, ...
    LowerAlpha,
}

/// A list entry and its nested entries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ListItem {
    pub runs: Vec<TextRun>,
    pub children: Vec<ListItem>,
}

impl ListItem {
    /// Item with plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            runs: vec![TextRun::new(text)],
            children: Vec::new(),
        }
    }

    /// Add nested items.
    pub fn with_children(mut self, children: Vec<ListItem>) -> Self {
        self.children = children;
        self
    }
}

/// List-level options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ListOptions {
    pub style: ListStyle,
    /// Bullet text for [`ListStyle::Bullet`]
    pub bullet: String,
    /// Gutter width per nesting level
    pub indent: f32,
    /// Gap between marker and text
    pub marker_gap: f32,
    /// Extra space after each item
    pub item_spacing: f32,
    /// Style overrides for markers
    pub marker_style: RunStyle,
    /// Options of each item's paragraph; indents are overridden
    pub paragraph: ParagraphOptions,
    pub space_before: f32,
    pub space_after: f32,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            style: ListStyle::Bullet,
            bullet: "\u{2022}".to_string(),
            indent: 18.0,
            marker_gap: 6.0,
            item_spacing: 2.0,
            marker_style: RunStyle::default(),
            paragraph: ParagraphOptions::default(),
            space_before: 0.0,
            space_after: 6.0,
        }
    }
}

impl ListOptions {
    /// Options for the given marker kind.
    pub fn styled(style: ListStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Marker of the item at `index` (0-based).
    pub fn marker(&self, index: usize) -> String {
        match self.style {
            ListStyle::Bullet => self.bullet.clone(),
            ListStyle::Decimal => format!("{}.", index + 1),
            ListStyle::LowerAlpha => format!("{}.", alpha_label(index)),
        }
    }
}

/// `0 -> a`, `25 -> z`, `26 -> aa`.
fn alpha_label(mut index: usize) -> String {
    let mut label = Vec::new();
    loop {
        label.push(b'a' + (index % 26) as u8);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    label.reverse();
    String::from_utf8_lossy(&label).into_owned()
}

/// Lay out and draw a list at the cursor. Returns the number of items
/// drawn, nested ones included.
pub fn add_list(ctx: &mut RenderContext, items: &[ListItem], options: &ListOptions) -> Result<usize> {
    ctx.layout.advance_cursor(options.space_before);
    let count = add_level(ctx, items, options, 0)?;
    ctx.layout.advance_cursor(options.space_after);
    Ok(count)
}

fn add_level(ctx: &mut RenderContext, items: &[ListItem], options: &ListOptions, level: usize) -> Result<usize> {
    let gutter = options.indent * (level + 1) as f32;
    let mut count = 0;
    for (index, item) in items.iter().enumerate() {
        let paragraph = ParagraphOptions {
            indent: gutter,
            hang_indent: gutter,
            space_after: options.item_spacing,
            marker: Some(MarkerSpec {
                text: options.marker(index),
                align: MarkerAlign::Right,
                gap: options.marker_gap,
                style: options.marker_style.clone(),
            }),
            ..options.paragraph.clone()
        };
        TextLayoutEngine::add_paragraph_runs(ctx, &item.runs, &paragraph)?;
        count += 1;
        count += add_level(ctx, &item.children, options, level + 1)?;
    }
    Ok(count)
}
