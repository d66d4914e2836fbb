//! Paragraph boxes split across pages.
//!
//! A bordered or shaded paragraph that crosses a page break is painted as
//! one piece per page. Only the outer ends of the box get horizontal edges
//! and rounded corners, so a two-page box shows one top edge and one bottom
//! edge, never a pair of corners at the break.

use serde::{Deserialize, Serialize};

use super::color::Color;
use crate::writer::{ContentStreamBuilder, ContentStreamOp, KAPPA};

/// Border drawn around a paragraph box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderSpec {
    /// Stroke width in points
    pub width: f32,
    /// Stroke color
    pub color: Color,
    /// Corner radius in points
    pub radius: f32,
}

impl Default for BorderSpec {
    fn default() -> Self {
        Self {
            width: 1.0,
            color: Color::black(),
            radius: 0.0,
        }
    }
}

/// Space between a box edge and its content.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Padding {
    /// The same padding on every side.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }
}

/// Position of a piece within its box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    /// The box fit on one page
    Single,
    /// Top piece: no bottom edge
    First,
    /// Inner piece: side edges only
    Middle,
    /// Bottom piece: no top edge
    Last,
}

impl FragmentKind {
    /// Kind of piece `index` out of `count`.
    pub fn at(index: usize, count: usize) -> Self {
        match (index, count) {
            (_, 0 | 1) => FragmentKind::Single,
            (0, _) => FragmentKind::First,
            (i, n) if i + 1 == n => FragmentKind::Last,
            _ => FragmentKind::Middle,
        }
    }

    /// Whether the piece has a top edge and top corners.
    pub fn has_top(&self) -> bool {
        matches!(self, FragmentKind::Single | FragmentKind::First)
    }

    /// Whether the piece has a bottom edge and bottom corners.
    pub fn has_bottom(&self) -> bool {
        matches!(self, FragmentKind::Single | FragmentKind::Last)
    }

    /// Corner radii `[top-left, top-right, bottom-right, bottom-left]`.
    pub fn radii(&self, radius: f32) -> [f32; 4] {
        let top = if self.has_top() { radius } else { 0.0 };
        let bottom = if self.has_bottom() { radius } else { 0.0 };
        [top, top, bottom, bottom]
    }
}

/// One page's piece of a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Page the piece is on
    pub page: usize,
    /// Content position where the piece is painted (under the text)
    pub mark: usize,
    /// Top of the piece
    pub top: f32,
    /// Bottom of the piece
    pub bottom: f32,
}

/// Records piece boundaries while a paragraph is laid out.
#[derive(Debug, Clone, Default)]
pub struct FragmentTracker {
    open: Option<(usize, usize, f32)>,
    closed: Vec<Fragment>,
}

impl FragmentTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a piece on `page` at content position `mark`.
    pub fn open(&mut self, page: usize, mark: usize, top: f32) {
        self.open = Some((page, mark, top));
    }

    /// End the open piece. Does nothing when none is open.
    pub fn close(&mut self, bottom: f32) {
        if let Some((page, mark, top)) = self.open.take() {
            self.closed.push(Fragment {
                page,
                mark,
                top,
                bottom,
            });
        }
    }

    /// Whether a piece is open.
    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    /// Number of closed pieces.
    pub fn len(&self) -> usize {
        self.closed.len()
    }

    /// Whether no piece was closed.
    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }

    /// Closed pieces with their kinds.
    pub fn finish(self) -> Vec<(FragmentKind, Fragment)> {
        let count = self.closed.len();
        self.closed
            .into_iter()
            .enumerate()
            .map(|(i, fragment)| (FragmentKind::at(i, count), fragment))
            .collect()
    }
}

/// How a paragraph box is painted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoxDecoration {
    /// Left edge
    pub x: f32,
    /// Box width
    pub width: f32,
    /// Fill color
    pub background: Option<Color>,
    /// Border
    pub border: Option<BorderSpec>,
    /// XObject label of a background image
    pub image: Option<String>,
}

impl BoxDecoration {
    /// Whether painting would produce anything.
    pub fn is_visible(&self) -> bool {
        self.background.is_some() || self.image.is_some() || self.stroke_width() > 0.0
    }

    fn stroke_width(&self) -> f32 {
        self.border.map_or(0.0, |b| b.width.max(0.0))
    }

    /// Operators painting one piece, clipped to the piece.
    pub fn fragment_ops(&self, kind: FragmentKind, fragment: &Fragment) -> Vec<ContentStreamOp> {
        let x = self.x;
        let y = fragment.bottom;
        let w = self.width;
        let h = (fragment.top - fragment.bottom).max(0.0);
        let radius = self.border.map_or(0.0, |b| b.radius);
        let radii = clamp_radii(kind.radii(radius), w, h);
        let half = self.stroke_width() / 2.0;

        let mut b = ContentStreamBuilder::new();
        b.save_state().clip_rect(x - half, y - half, w + 2.0 * half, h + 2.0 * half);

        if let Some(color) = self.background {
            b.fill_color(color);
            closed_outline(&mut b, x, y, w, h, radii);
            b.fill();
        }
        if let Some(image) = &self.image {
            b.draw_image(image, x, y, w, h);
        }
        if let Some(border) = self.border.filter(|b| b.width > 0.0) {
            b.stroke_color(border.color).set_line_width(border.width);
            match kind {
                FragmentKind::Single => closed_outline(&mut b, x, y, w, h, radii),
                FragmentKind::First => open_top_outline(&mut b, x, y, w, h, radii),
                FragmentKind::Last => open_bottom_outline(&mut b, x, y, w, h, radii),
                FragmentKind::Middle => {
                    b.move_to(x, y).line_to(x, y + h).move_to(x + w, y).line_to(x + w, y + h);
                },
            }
            b.stroke();
        }
        b.restore_state();
        b.operations().to_vec()
    }
}

fn clamp_radii(radii: [f32; 4], w: f32, h: f32) -> [f32; 4] {
    let limit = (w / 2.0).min(h / 2.0).max(0.0);
    radii.map(|r| r.clamp(0.0, limit))
}

/// Closed outline with per-corner radii `[tl, tr, br, bl]`.
fn closed_outline(b: &mut ContentStreamBuilder, x: f32, y: f32, w: f32, h: f32, radii: [f32; 4]) {
    let [tl, tr, br, bl] = radii;
    b.move_to(x + bl, y).line_to(x + w - br, y);
    if br > 0.0 {
        b.curve_to(x + w - br + br * KAPPA, y, x + w, y + br - br * KAPPA, x + w, y + br);
    }
    b.line_to(x + w, y + h - tr);
    if tr > 0.0 {
        b.curve_to(x + w, y + h - tr + tr * KAPPA, x + w - tr + tr * KAPPA, y + h, x + w - tr, y + h);
    }
    b.line_to(x + tl, y + h);
    if tl > 0.0 {
        b.curve_to(x + tl - tl * KAPPA, y + h, x, y + h - tl + tl * KAPPA, x, y + h - tl);
    }
    b.line_to(x, y + bl);
    if bl > 0.0 {
        b.curve_to(x, y + bl - bl * KAPPA, x + bl - bl * KAPPA, y, x + bl, y);
    }
    b.close_path();
}

/// Left, top and right edges; the bottom stays open.
fn open_top_outline(b: &mut ContentStreamBuilder, x: f32, y: f32, w: f32, h: f32, radii: [f32; 4]) {
    let [tl, tr, _, _] = radii;
    b.move_to(x, y).line_to(x, y + h - tl);
    if tl > 0.0 {
        b.curve_to(x, y + h - tl + tl * KAPPA, x + tl - tl * KAPPA, y + h, x + tl, y + h);
    }
    b.line_to(x + w - tr, y + h);
    if tr > 0.0 {
        b.curve_to(x + w - tr + tr * KAPPA, y + h, x + w, y + h - tr + tr * KAPPA, x + w, y + h - tr);
    }
    b.line_to(x + w, y);
}

/// Left, bottom and right edges; the top stays open.
fn open_bottom_outline(b: &mut ContentStreamBuilder, x: f32, y: f32, w: f32, h: f32, radii: [f32; 4]) {
    let [_, _, br, bl] = radii;
    b.move_to(x, y + h).line_to(x, y + bl);
    if bl > 0.0 {
        b.curve_to(x, y + bl - bl * KAPPA, x + bl - bl * KAPPA, y, x + bl, y);
    }
    b.line_to(x + w - br, y);
    if br > 0.0 {
        b.curve_to(x + w - br + br * KAPPA, y, x + w, y + br - br * KAPPA, x + w, y + br);
    }
    b.line_to(x + w, y + h);
}
