//! Flow records.
//!
//! A [`FlowElement`] is one block-level thing to lay out: a paragraph, a
//! list, a table, an image, vertical space, a rule, or a nested region.
//! Front ends (an HTML converter, a template engine) produce a sequence of
//! them, usually as JSON, and feed them to
//! [`Document::add_flow`](crate::writer::Document::add_flow) in order.
//!
//! ```
//! use pdf_scribe::elements::{parse_flow, FlowElement};
//!
//! let flow = parse_flow(r#"[
//!     {"type": "paragraph", "runs": [{"text": "Hello"}, {"text": " world", "bold": true}]},
//!     {"type": "spacer", "height": 12},
//!     {"type": "rule"}
//! ]"#).unwrap();
//! assert_eq!(flow.len(), 3);
//! assert!(matches!(flow[1], FlowElement::Spacer { height } if height == 12.0));
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layout::{ParagraphOptions, TextLayoutEngine, TextRun};
use crate::writer::{
    add_horizontal_line, add_image_block, add_list, add_spacer, add_table_data, ImageOptions, ListItem,
    ListOptions, RenderContext, RuleOptions, TableOptions, TableRow,
};

fn default_gap() -> f32 {
    12.0
}

/// One block-level element of a document flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FlowElement {
    /// Styled text
    Paragraph {
        runs: Vec<TextRun>,
        #[serde(default)]
        options: ParagraphOptions,
    },
    /// Bulleted or numbered list
    List {
        items: Vec<ListItem>,
        #[serde(default)]
        options: ListOptions,
    },
    /// Table of paragraph cells
    Table {
        rows: Vec<TableRow>,
        #[serde(default)]
        options: TableOptions,
    },
    /// Registered image placed as a block
    Image {
        alias: String,
        #[serde(default)]
        options: ImageOptions,
    },
    /// Vertical space
    Spacer { height: f32 },
    /// Horizontal rule
    Rule {
        #[serde(default)]
        options: RuleOptions,
    },
    /// Children laid out in a narrower region
    Block {
        #[serde(default)]
        x_offset: f32,
        /// Region width; the rest of the parent width when absent
        #[serde(default)]
        width: Option<f32>,
        children: Vec<FlowElement>,
    },
    /// Side-by-side columns of equal width starting at the same height
    Columns {
        #[serde(default = "default_gap")]
        gap: f32,
        columns: Vec<Vec<FlowElement>>,
    },
}

impl FlowElement {
    /// Lay out and draw this element at the cursor.
    pub fn render(&self, ctx: &mut RenderContext) -> Result<()> {
        match self {
            FlowElement::Paragraph { runs, options } => {
                TextLayoutEngine::add_paragraph_runs(ctx, runs, options)?;
            },
            FlowElement::List { items, options } => {
                add_list(ctx, items, options)?;
            },
            FlowElement::Table { rows, options } => {
                add_table_data(ctx, rows, options)?;
            },
            FlowElement::Image { alias, options } => add_image_block(ctx, alias, options)?,
            FlowElement::Spacer { height } => add_spacer(ctx, *height),
            FlowElement::Rule { options } => add_horizontal_line(ctx, options),
            FlowElement::Block {
                x_offset,
                width,
                children,
            } => {
                let width = width.unwrap_or(ctx.layout.width() - x_offset).max(0.0);
                ctx.layout.push_context(*x_offset, width, None);
                let result = render_all(ctx, children);
                ctx.layout.pop_context();
                result?;
            },
            FlowElement::Columns { gap, columns } => render_columns(ctx, *gap, columns)?,
        }
        Ok(())
    }
}

/// Draw elements in order.
pub fn render_all(ctx: &mut RenderContext, elements: &[FlowElement]) -> Result<()> {
    elements.iter().try_for_each(|element| element.render(ctx))
}

/// Decode a JSON array of flow records.
pub fn parse_flow(json: &str) -> Result<Vec<FlowElement>> {
    Ok(serde_json::from_str(json)?)
}

/// Every column starts at the current cursor on the current page. The
/// cursor ends below the column that reached furthest down, on the latest
/// page any column reached.
fn render_columns(ctx: &mut RenderContext, gap: f32, columns: &[Vec<FlowElement>]) -> Result<()> {
    if columns.is_empty() {
        return Ok(());
    }
    let count = columns.len() as f32;
    let width = ((ctx.layout.width() - gap * (count - 1.0)) / count).max(0.0);
    let start_page = ctx.pages.current_index();
    let start_y = ctx.layout.cursor_y();
    let mut end = (start_page, start_y);

    for (index, column) in columns.iter().enumerate() {
        ctx.pages.set_current(start_page);
        ctx.layout.set_cursor_y(start_y);
        ctx.layout.push_context(index as f32 * (width + gap), width, None);
        let result = render_all(ctx, column);
        ctx.layout.pop_context();
        result?;

        let reached = (ctx.pages.current_index(), ctx.layout.cursor_y());
        if reached.0 > end.0 || (reached.0 == end.0 && reached.1 < end.1) {
            end = reached;
        }
    }

    ctx.pages.set_current(end.0);
    ctx.layout.set_cursor_y(end.1);
    Ok(())
}
