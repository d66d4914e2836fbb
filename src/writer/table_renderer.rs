//! Tables built from paragraph cells.
//!
//! Every cell is an ordinary paragraph laid out in a column region pushed
//! for it. All cells of a row start from the same cursor position; the row
//! is as tall as its tallest cell. Row heights are found with a dry pass
//! first so that a row is never split: when it does not fit, the page
//! breaks before it and the header rows are drawn again.

use serde::{Deserialize, Serialize};

use super::render_context::RenderContext;
use crate::error::Result;
use crate::layout::{Color, Padding, ParagraphOptions, StyleOptions, TextLayoutEngine, TextRun};

/// Column width specification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnWidth {
    /// Fixed width in points
    Fixed(f32),
    /// Share of the width left after fixed columns
    Weight(f32),
}

impl Default for ColumnWidth {
    fn default() -> Self {
        ColumnWidth::Weight(1.0)
    }
}

/// Resolve column specs against the table width.
///
/// Columns without a spec get weight 1. Weighted columns split what the
/// fixed ones leave, never less than zero.
pub fn resolve_column_widths(specs: &[ColumnWidth], columns: usize, table_width: f32) -> Vec<f32> {
    let spec = |i: usize| specs.get(i).copied().unwrap_or_default();
    let fixed: f32 = (0..columns)
        .filter_map(|i| match spec(i) {
            ColumnWidth::Fixed(w) => Some(w.max(0.0)),
            ColumnWidth::Weight(_) => None,
        })
        .sum();
    let total_weight: f32 = (0..columns)
        .filter_map(|i| match spec(i) {
            ColumnWidth::Weight(w) => Some(w.max(0.0)),
            ColumnWidth::Fixed(_) => None,
        })
        .sum();
    let remaining = (table_width - fixed).max(0.0);

    (0..columns)
        .map(|i| match spec(i) {
            ColumnWidth::Fixed(w) => w.max(0.0),
            ColumnWidth::Weight(w) if total_weight > 0.0 => remaining * w.max(0.0) / total_weight,
            ColumnWidth::Weight(_) => 0.0,
        })
        .collect()
}

/// One table cell.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableCell {
    /// Cell text
    pub runs: Vec<TextRun>,
    /// Paragraph options inside the cell
    pub paragraph: ParagraphOptions,
    /// Cell fill, drawn over the row fill
    pub background: Option<Color>,
}

impl TableCell {
    /// Cell with plain text.
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_runs(vec![TextRun::new(text)])
    }

    /// Cell with styled runs.
    pub fn from_runs(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    /// Set the cell fill.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }
}

/// A row of cells.
pub type TableRow = Vec<TableCell>;

/// Table-level options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TableOptions {
    /// Column widths; missing entries are weight 1
    pub columns: Vec<ColumnWidth>,
    pub cell_padding: Padding,
    /// Grid line width; 0 disables the grid
    pub border_width: f32,
    pub border_color: Color,
    /// Leading rows that form the header
    pub header_rows: usize,
    pub header_background: Option<Color>,
    /// Draw header cells bold
    pub header_bold: bool,
    /// Draw the header again after a page break
    pub repeat_header: bool,
    pub space_before: f32,
    pub space_after: f32,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            cell_padding: Padding::uniform(4.0),
            border_width: 0.5,
            border_color: Color::black(),
            header_rows: 0,
            header_background: None,
            header_bold: true,
            repeat_header: true,
            space_before: 0.0,
            space_after: 6.0,
        }
    }
}

/// What laying out a table produced.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TableLayout {
    /// Body and header rows drawn, repeats included
    pub rows_drawn: usize,
    /// Page breaks taken between rows
    pub page_breaks: usize,
}

/// Lay out and draw a table at the cursor.
pub fn add_table_data(ctx: &mut RenderContext, rows: &[TableRow], options: &TableOptions) -> Result<TableLayout> {
    let mut layout = TableLayout::default();
    let columns = rows
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(options.columns.len());
    if rows.is_empty() || columns == 0 {
        return Ok(layout);
    }

    let widths = resolve_column_widths(&options.columns, columns, ctx.layout.width());
    let header_rows = options.header_rows.min(rows.len());
    ctx.layout.advance_cursor(options.space_before);

    for (index, row) in rows.iter().enumerate() {
        let is_header = index < header_rows;
        let height = measure_row(ctx, row, &widths, options, is_header)?;

        if ctx.check_page_break(height) {
            layout.page_breaks += 1;
            if !is_header && options.repeat_header {
                for header in &rows[..header_rows] {
                    let header_height = measure_row(ctx, header, &widths, options, true)?;
                    draw_row(ctx, header, &widths, header_height, options, true)?;
                    layout.rows_drawn += 1;
                }
            }
        }

        draw_row(ctx, row, &widths, height, options, is_header)?;
        layout.rows_drawn += 1;
    }

    ctx.layout.advance_cursor(options.space_after);
    Ok(layout)
}

fn header_style(options: &TableOptions, is_header: bool) -> StyleOptions {
    StyleOptions {
        bold: (is_header && options.header_bold).then_some(true),
        ..Default::default()
    }
}

/// Lay out every cell of a row starting at the current cursor.
///
/// The row already passed its page-break check, so cells never break: a
/// row taller than the page overflows the page it started on.
fn layout_cells(
    ctx: &mut RenderContext,
    row: &[TableCell],
    widths: &[f32],
    options: &TableOptions,
    is_header: bool,
) -> Result<f32> {
    let pad = options.cell_padding;
    let top = ctx.layout.cursor_y();
    let page = ctx.pages.current_index();
    let bounds = ctx.layout.snapshot();
    let mut lowest = top;
    let mut x_offset = 0.0;

    ctx.layout.unbound_bottom();
    ctx.style.push();
    ctx.style.apply_options(&header_style(options, is_header));
    let mut result = Ok(());
    for (cell, &width) in row.iter().zip(widths) {
        ctx.pages.set_current(page);
        ctx.layout.set_cursor_y(top - pad.top);
        ctx.layout
            .push_context(x_offset + pad.left, width - pad.left - pad.right, None);
        result = TextLayoutEngine::add_paragraph_runs(ctx, &cell.runs, &cell.paragraph).map(|_| ());
        ctx.layout.pop_context();
        if result.is_err() {
            break;
        }
        lowest = lowest.min(ctx.layout.cursor_y());
        x_offset += width;
    }
    ctx.style.pop();
    ctx.layout.restore(bounds);
    result?;

    Ok(top - lowest + pad.bottom)
}

fn measure_row(
    ctx: &mut RenderContext,
    row: &[TableCell],
    widths: &[f32],
    options: &TableOptions,
    is_header: bool,
) -> Result<f32> {
    let mut height = 0.0;
    ctx.measure(|c| {
        height = layout_cells(c, row, widths, options, is_header)?;
        Ok(())
    })?;
    // An empty row still shows its padding.
    Ok(height.max(options.cell_padding.top + options.cell_padding.bottom))
}

fn draw_row(
    ctx: &mut RenderContext,
    row: &[TableCell],
    widths: &[f32],
    height: f32,
    options: &TableOptions,
    is_header: bool,
) -> Result<()> {
    let top = ctx.layout.cursor_y();
    let left = ctx.layout.x();
    let bottom = top - height;
    let row_width: f32 = widths.iter().sum();

    if let Some(content) = ctx.content() {
        if let Some(color) = options.header_background.filter(|_| is_header) {
            content
                .save_state()
                .fill_color(color)
                .rect(left, bottom, row_width, height)
                .fill()
                .restore_state();
        }
        let mut x = left;
        for (cell, &width) in row.iter().zip(widths) {
            if let Some(color) = cell.background {
                content
                    .save_state()
                    .fill_color(color)
                    .rect(x, bottom, width, height)
                    .fill()
                    .restore_state();
            }
            x += width;
        }
    }

    layout_cells(ctx, row, widths, options, is_header)?;

    if options.border_width > 0.0 {
        if let Some(content) = ctx.content() {
            content
                .save_state()
                .stroke_color(options.border_color)
                .set_line_width(options.border_width);
            let mut x = left;
            for &width in widths {
                content.rect(x, bottom, width, height);
                x += width;
            }
            content.stroke().restore_state();
        }
    }

    ctx.layout.set_cursor_y(bottom);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_widths_fixed_and_weighted() {
        let widths = resolve_column_widths(
            &[ColumnWidth::Fixed(100.0), ColumnWidth::Weight(1.0), ColumnWidth::Weight(3.0)],
            3,
            500.0,
        );
        assert_eq!(widths, vec![100.0, 100.0, 300.0]);
    }

    #[test]
    fn test_missing_specs_share_evenly() {
        let widths = resolve_column_widths(&[], 4, 400.0);
        assert_eq!(widths, vec![100.0; 4]);
    }

    #[test]
    fn test_fixed_overflow_leaves_weights_empty() {
        let widths = resolve_column_widths(&[ColumnWidth::Fixed(600.0)], 2, 500.0);
        assert_eq!(widths, vec![600.0, 0.0]);
    }

    #[test]
    fn test_column_width_deserializes() {
        let specs: Vec<ColumnWidth> = serde_json::from_str(r#"[{"fixed": 80}, {"weight": 2}]"#).unwrap();
        assert_eq!(specs, vec![ColumnWidth::Fixed(80.0), ColumnWidth::Weight(2.0)]);
    }
}
