//! Measurement mode.
//!
//! Heights of paragraphs and table rows are found by running the real
//! layout code against a scratch copy of the layout state. While the mode
//! is active nothing reaches a page: no content, no resources, no
//! annotations, no glyph usage. Passes can nest (a table cell measured
//! inside a measured table), so this is a depth counter, not a flag.

/// Reentrant depth counter for dry layout passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasurementMode {
    depth: usize,
}

impl MeasurementMode {
    /// Create an inactive counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a measurement pass.
    pub fn enter(&mut self) {
        self.depth += 1;
    }

    /// Leave a measurement pass.
    pub fn exit(&mut self) {
        if self.depth == 0 {
            log::warn!("Measurement exit without a matching enter");
            return;
        }
        self.depth -= 1;
    }

    /// Whether any pass is running.
    pub fn is_active(&self) -> bool {
        self.depth > 0
    }

    /// Number of nested passes.
    pub fn depth(&self) -> usize {
        self.depth
    }
}
