//! Styled runs and their tokenization.
//!
//! A paragraph is a list of [`TextRun`]s. Newlines split the runs into
//! independent wrapping blocks; whitespace splits each block into word and
//! space tokens. Every token keeps a handle to the style of the run that
//! produced it. Inline objects become single tokens of their own.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::color::Color;
use super::style_context::StyleOptions;
use crate::error::Result;
use crate::writer::RenderContext;

/// Default size factor for superscript and subscript text.
pub const DEFAULT_SCRIPT_SCALE: f32 = 0.75;

/// Something other than text placed in the line, such as an inline image.
pub trait InlineObject: fmt::Debug {
    /// Advance width in points.
    fn width(&self) -> f32;

    /// Height above the baseline, used for line height.
    fn height(&self) -> f32 {
        0.0
    }

    /// Draw with the left edge at `x` and the bottom on `baseline`.
    fn draw(&self, ctx: &mut RenderContext, x: f32, baseline: f32) -> Result<()>;
}

/// Vertical placement of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Baseline,
    Superscript,
    Subscript,
}

/// Per-run overrides. Unset fields inherit from the enclosing style.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunStyle {
    pub font: Option<String>,
    pub size: Option<f32>,
    pub color: Option<Color>,
    pub letter_spacing: Option<f32>,
    pub word_spacing: Option<f32>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub vertical: VerticalAlign,
    /// Explicit baseline shift in points; overrides the script default
    pub baseline_shift: Option<f32>,
    /// Size factor for super/subscript
    pub script_scale: Option<f32>,
    /// Hyperlink target
    pub href: Option<String>,
    /// Highlight drawn behind the run
    pub background: Option<Color>,
    /// Shear angle for synthetic italics
    pub italic_angle: Option<f32>,
    /// Inline object drawn instead of text
    #[serde(skip)]
    pub inline: Option<Arc<dyn InlineObject>>,
}

impl RunStyle {
    /// The fields that go through [`StyleContext::apply_options`](super::StyleContext::apply_options).
    pub fn style_options(&self) -> StyleOptions {
        StyleOptions {
            font: self.font.clone(),
            size: self.size,
            line_height: None,
            color: self.color,
            letter_spacing: self.letter_spacing,
            word_spacing: self.word_spacing,
            italic_angle: self.italic_angle,
            bold: self.bold,
            italic: self.italic,
            underline: self.underline,
        }
    }
}

/// A piece of text sharing one style.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextRun {
    /// Text, possibly containing newlines
    #[serde(default)]
    pub text: String,
    /// Overrides for this run
    #[serde(default, flatten)]
    pub style: RunStyle,
}

impl TextRun {
    /// A run in the inherited style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: RunStyle::default(),
        }
    }

    /// A run holding an inline object.
    pub fn inline(object: Arc<dyn InlineObject>) -> Self {
        Self {
            text: String::new(),
            style: RunStyle {
                inline: Some(object),
                ..Default::default()
            },
        }
    }

    /// Replace the overrides.
    pub fn with_style(mut self, style: RunStyle) -> Self {
        self.style = style;
        self
    }

    /// Bold run.
    pub fn bold(mut self) -> Self {
        self.style.bold = Some(true);
        self
    }

    /// Italic run.
    pub fn italic(mut self) -> Self {
        self.style.italic = Some(true);
        self
    }

    /// Underlined run.
    pub fn underline(mut self) -> Self {
        self.style.underline = Some(true);
        self
    }

    /// Colored run.
    pub fn color(mut self, color: Color) -> Self {
        self.style.color = Some(color);
        self
    }

    /// Sized run.
    pub fn size(mut self, size: f32) -> Self {
        self.style.size = Some(size);
        self
    }

    /// Hyperlinked run.
    pub fn link(mut self, href: impl Into<String>) -> Self {
        self.style.href = Some(href.into());
        self
    }

    /// Superscript or subscript run.
    pub fn vertical(mut self, vertical: VerticalAlign) -> Self {
        self.style.vertical = vertical;
        self
    }
}

/// What a token holds.
#[derive(Debug, Clone)]
pub enum TokenKind {
    /// Non-whitespace text
    Word(String),
    /// Whitespace text
    Space(String),
    /// Inline object
    Inline(Arc<dyn InlineObject>),
}

/// A token and the style it was produced under.
#[derive(Debug, Clone)]
pub struct Token<S> {
    pub kind: TokenKind,
    pub style: S,
}

impl<S> Token<S> {
    /// Whether this is a whitespace token.
    pub fn is_space(&self) -> bool {
        matches!(self.kind, TokenKind::Space(_))
    }
}

/// Tokens of one newline-delimited block.
pub type Block<S> = Vec<Token<S>>;

/// Whitespace that separates words. No-break space does not.
fn is_break_space(c: char) -> bool {
    c.is_whitespace() && c != '\u{00A0}' && c != '\u{202F}'
}

/// Split styled runs into blocks of tokens.
///
/// `runs` pairs each run with the style handle its tokens should carry.
/// There is always at least one block; `"a\n\nb"` gives three.
pub fn tokenize<'a, S: Clone>(runs: impl IntoIterator<Item = (&'a TextRun, S)>) -> Vec<Block<S>> {
    let mut blocks: Vec<Block<S>> = vec![Vec::new()];

    for (run, style) in runs {
        if let Some(object) = &run.style.inline {
            push_token(&mut blocks, TokenKind::Inline(object.clone()), &style);
            continue;
        }

        let text = run.text.replace("\r\n", "\n").replace('\r', "\n");
        for (i, line) in text.split('\n').enumerate() {
            if i > 0 {
                blocks.push(Vec::new());
            }
            let mut current = String::new();
            let mut in_space = false;
            for c in line.chars() {
                let space = is_break_space(c);
                if space != in_space && !current.is_empty() {
                    let piece = std::mem::take(&mut current);
                    push_token(&mut blocks, make_kind(piece, in_space), &style);
                }
                in_space = space;
                current.push(c);
            }
            if !current.is_empty() {
                push_token(&mut blocks, make_kind(current, in_space), &style);
            }
        }
    }
    blocks
}

fn make_kind(text: String, space: bool) -> TokenKind {
    if space {
        TokenKind::Space(text)
    } else {
        TokenKind::Word(text)
    }
}

fn push_token<S: Clone>(blocks: &mut [Block<S>], kind: TokenKind, style: &S) {
    if let Some(block) = blocks.last_mut() {
        block.push(Token {
            kind,
            style: style.clone(),
        });
    }
}
