//! Page geometry, nested regions and the vertical cursor.
//!
//! The manager keeps a stack of [`LayoutContext`] regions. The top of the
//! stack bounds the usable width and the page-break threshold. There is a
//! single cursor for the whole stack: pushing a region does not move it,
//! which is what lets several columns start at the same height.
//!
//! All values are in points with the origin at the bottom-left of the page.

use crate::config::Margins;

/// A rectangular region of the page that content flows into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutContext {
    /// Absolute left edge
    pub origin_x: f32,
    /// Top edge of the region on a fresh page
    pub origin_y: f32,
    /// Usable width
    pub width: f32,
    /// Distance from the page top where a fresh page starts
    pub top_margin: f32,
    /// Content must stay above this y
    pub bottom_margin: f32,
}

/// Saved layout state for speculative passes.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSnapshot {
    stack: Vec<LayoutContext>,
    cursor_y: f32,
}

/// Region stack plus cursor.
#[derive(Debug, Clone)]
pub struct LayoutManager {
    page_width: f32,
    page_height: f32,
    stack: Vec<LayoutContext>,
    cursor_y: f32,
}

impl LayoutManager {
    /// Create a manager for pages of the given size and margins.
    pub fn new(page_width: f32, page_height: f32, margins: &Margins) -> Self {
        let base = LayoutContext {
            origin_x: margins.left,
            origin_y: page_height - margins.top,
            width: (page_width - margins.left - margins.right).max(0.0),
            top_margin: margins.top,
            bottom_margin: margins.bottom,
        };
        Self {
            page_width,
            page_height,
            stack: vec![base],
            cursor_y: page_height - margins.top,
        }
    }

    /// Page width in points.
    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    /// Page height in points.
    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// The active region.
    pub fn current(&self) -> &LayoutContext {
        // The base context is never popped
        &self.stack[self.stack.len() - 1]
    }

    /// Number of regions on the stack, including the base.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Left edge of the active region.
    pub fn x(&self) -> f32 {
        self.current().origin_x
    }

    /// Width of the active region.
    pub fn width(&self) -> f32 {
        self.current().width
    }

    /// Current cursor position.
    pub fn cursor_y(&self) -> f32 {
        self.cursor_y
    }

    /// Move the cursor to an absolute position.
    pub fn set_cursor_y(&mut self, y: f32) {
        self.cursor_y = y;
    }

    /// Where the cursor sits on a fresh page for the active region.
    pub fn page_top(&self) -> f32 {
        self.page_height - self.current().top_margin
    }

    /// Push a child region `x_offset` points right of the active one.
    ///
    /// The cursor is left where it is.
    pub fn push_context(&mut self, x_offset: f32, width: f32, top_margin: Option<f32>) {
        let parent = *self.current();
        let top_margin = top_margin.unwrap_or(parent.top_margin);
        self.stack.push(LayoutContext {
            origin_x: parent.origin_x + x_offset,
            origin_y: self.page_height - top_margin,
            width: width.max(0.0),
            top_margin,
            bottom_margin: parent.bottom_margin,
        });
    }

    /// Drop the active region. The base region is never removed.
    pub fn pop_context(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    /// Move the cursor down by `height` (negative moves it up).
    pub fn advance_cursor(&mut self, height: f32) {
        self.cursor_y -= height;
    }

    /// Put the cursor at the top of a fresh page.
    pub fn reset_cursor(&mut self) {
        self.cursor_y = self.page_top();
    }

    /// Whether `needed` points fit above the bottom margin.
    pub fn fits(&self, needed: f32) -> bool {
        self.cursor_y - needed >= self.current().bottom_margin
    }

    /// Decide whether `needed` points require a new page.
    ///
    /// On `true` the cursor has been reset and the caller must start a new
    /// page. A cursor already at the top of a page never breaks, so content
    /// taller than a page is drawn (and clipped by the viewer) instead of
    /// producing an endless run of blank pages.
    pub fn check_page_break(&mut self, needed: f32) -> bool {
        if self.fits(needed) || self.cursor_y >= self.page_top() {
            return false;
        }
        self.reset_cursor();
        true
    }

    /// Capture the region stack and cursor.
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            stack: self.stack.clone(),
            cursor_y: self.cursor_y,
        }
    }

    /// Return to a captured state.
    pub fn restore(&mut self, snapshot: LayoutSnapshot) {
        self.stack = snapshot.stack;
        self.cursor_y = snapshot.cursor_y;
    }

    /// Remove the page-break threshold from every region so a speculative
    /// pass can run to any depth. Undo with [`restore`](Self::restore).
    pub fn unbound_bottom(&mut self) {
        for context in &mut self.stack {
            context.bottom_margin = f32::NEG_INFINITY;
        }
    }
}
