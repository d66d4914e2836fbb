//! Scoped text style.
//!
//! [`StyleContext`] holds the current [`StyleState`] plus a stack of saved
//! states. Nested runs push, apply only the overrides they carry, then pop,
//! so anything they leave unset is inherited from the enclosing scope.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::color::Color;

/// Default italic shear angle in degrees.
pub const DEFAULT_ITALIC_ANGLE: f32 = 12.0;

/// Default line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.25;

bitflags! {
    /// Bold / italic / underline markers carried by a style.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleMarkers: u8 {
        /// Bold weight requested
        const BOLD = 0b001;
        /// Italic requested
        const ITALIC = 0b010;
        /// Underline decoration
        const UNDERLINE = 0b100;
    }
}

/// The complete text style in effect at one point of the layout.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleState {
    /// Registered font alias; `None` until a font is selected
    pub font_alias: Option<String>,
    /// Font size in points
    pub font_size: f32,
    /// Line height in points
    pub line_height: f32,
    /// Fill color for glyphs
    pub text_color: Color,
    /// Extra space after every character (`Tc`)
    pub letter_spacing: f32,
    /// Extra space added to every space token
    pub word_spacing: f32,
    /// Shear angle used for synthetic italics
    pub italic_angle_deg: f32,
    /// Bold / italic / underline
    pub markers: StyleMarkers,
}

impl Default for StyleState {
    fn default() -> Self {
        Self {
            font_alias: None,
            font_size: 12.0,
            line_height: 12.0 * LINE_HEIGHT_FACTOR,
            text_color: Color::black(),
            letter_spacing: 0.0,
            word_spacing: 0.0,
            italic_angle_deg: DEFAULT_ITALIC_ANGLE,
            markers: StyleMarkers::empty(),
        }
    }
}

/// Partial style: only fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleOptions {
    pub font: Option<String>,
    pub size: Option<f32>,
    pub line_height: Option<f32>,
    pub color: Option<Color>,
    pub letter_spacing: Option<f32>,
    pub word_spacing: Option<f32>,
    pub italic_angle: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
}

/// Current style plus the stack of saved states.
#[derive(Debug, Clone, Default)]
pub struct StyleContext {
    current: StyleState,
    stack: Vec<StyleState>,
}

impl StyleContext {
    /// Create a context with the default style and no font.
    pub fn new() -> Self {
        Self::default()
    }

    /// The style in effect.
    pub fn current(&self) -> &StyleState {
        &self.current
    }

    /// Mutable access to the style in effect.
    pub fn current_mut(&mut self) -> &mut StyleState {
        &mut self.current
    }

    /// Save a snapshot of the current state.
    pub fn push(&mut self) {
        self.stack.push(self.current.clone());
    }

    /// Restore the last saved state. Popping an empty stack does nothing.
    pub fn pop(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Select a font. Line height defaults to `size * 1.25`.
    pub fn set_font(&mut self, alias: impl Into<String>, size: f32, line_height: Option<f32>) {
        self.current.font_alias = Some(alias.into());
        self.current.font_size = size;
        self.current.line_height = line_height.unwrap_or(size * LINE_HEIGHT_FACTOR);
    }

    /// Apply the fields present in `options`.
    ///
    /// A new size without a new line height rescales the line height.
    pub fn apply_options(&mut self, options: &StyleOptions) {
        let state = &mut self.current;
        if let Some(font) = &options.font {
            state.font_alias = Some(font.clone());
        }
        if let Some(size) = options.size {
            state.font_size = size;
            if options.line_height.is_none() {
                state.line_height = size * LINE_HEIGHT_FACTOR;
            }
        }
        if let Some(line_height) = options.line_height {
            state.line_height = line_height;
        }
        if let Some(color) = options.color {
            state.text_color = color;
        }
        if let Some(spacing) = options.letter_spacing {
            state.letter_spacing = spacing;
        }
        if let Some(spacing) = options.word_spacing {
            state.word_spacing = spacing;
        }
        if let Some(angle) = options.italic_angle {
            state.italic_angle_deg = angle;
        }
        for (flag, value) in [
            (StyleMarkers::BOLD, options.bold),
            (StyleMarkers::ITALIC, options.italic),
            (StyleMarkers::UNDERLINE, options.underline),
        ] {
            if let Some(on) = value {
                state.markers.set(flag, on);
            }
        }
    }
}
