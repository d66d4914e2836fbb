//! Greedy line filling and horizontal placement.
//!
//! The breaker works on measured widths only, so it is independent of fonts
//! and can be exercised directly. Adjacent non-space tokens form a segment
//! that never breaks internally, which keeps differently styled pieces of a
//! word together.

use serde::{Deserialize, Serialize};

/// Slack allowed when comparing widths, absorbing float noise.
const FIT_EPSILON: f32 = 1e-4;

/// Horizontal alignment of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

/// A token as seen by the line breaker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasuredToken {
    /// Advance width in points
    pub width: f32,
    /// Whether this is breakable whitespace
    pub is_space: bool,
}

impl MeasuredToken {
    /// A word or inline object.
    pub fn word(width: f32) -> Self {
        Self {
            width,
            is_space: false,
        }
    }

    /// A whitespace token.
    pub fn space(width: f32) -> Self {
        Self {
            width,
            is_space: true,
        }
    }
}

/// One output line: a token range with its trailing spaces dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSpan {
    /// First token (never a space)
    pub start: usize,
    /// One past the last non-space token
    pub end: usize,
    /// Width of the tokens in `start..end`
    pub width: f32,
    /// Space tokens inside `start..end`
    pub interior_spaces: usize,
    /// Whether this is the final line of its block
    pub last_in_block: bool,
}

impl LineSpan {
    fn empty() -> Self {
        Self {
            start: 0,
            end: 0,
            width: 0.0,
            interior_spaces: 0,
            last_in_block: true,
        }
    }

    /// Whether the line holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Break a block into lines.
///
/// `first_width` is available to the first line and `rest_width` to every
/// other line. A segment wider than the available width gets a line of its
/// own and is never split. A block without any words still yields one empty
/// line.
pub fn break_lines(tokens: &[MeasuredToken], first_width: f32, rest_width: f32) -> Vec<LineSpan> {
    let mut lines = Vec::new();
    let mut current: Option<LineSpan> = None;
    let mut pending_width = 0.0f32;
    let mut pending_spaces = 0usize;

    let mut i = 0;
    while i < tokens.len() {
        if tokens[i].is_space {
            if current.is_some() {
                pending_width += tokens[i].width;
                pending_spaces += 1;
            }
            i += 1;
            continue;
        }

        let mut j = i;
        let mut segment = 0.0f32;
        while j < tokens.len() && !tokens[j].is_space {
            segment += tokens[j].width;
            j += 1;
        }

        let available = if lines.is_empty() { first_width } else { rest_width };
        let fits = current
            .as_ref()
            .is_some_and(|line| line.width + pending_width + segment <= available + FIT_EPSILON);
        if fits {
            if let Some(line) = current.as_mut() {
                line.width += pending_width + segment;
                line.interior_spaces += pending_spaces;
                line.end = j;
            }
        } else {
            lines.extend(current.take());
            current = Some(LineSpan {
                start: i,
                end: j,
                width: segment,
                interior_spaces: 0,
                last_in_block: false,
            });
        }
        pending_width = 0.0;
        pending_spaces = 0;
        i = j;
    }

    lines.extend(current);
    match lines.last_mut() {
        Some(last) => last.last_in_block = true,
        None => lines.push(LineSpan::empty()),
    }
    lines
}

/// Where a line starts and how much each interior space grows.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinePlacement {
    /// Offset from the left edge of the line box
    pub offset_x: f32,
    /// Extra width added to every interior space
    pub extra_per_space: f32,
}

/// Place a line inside `target` points.
///
/// The last line of a block is never justified; it falls back to left
/// alignment. Lines that overflow are left-aligned rather than shifted left.
pub fn place_line(align: TextAlign, target: f32, line: &LineSpan) -> LinePlacement {
    let slack = (target - line.width).max(0.0);
    match align {
        TextAlign::Left => LinePlacement::default(),
        TextAlign::Center => LinePlacement {
            offset_x: slack / 2.0,
            extra_per_space: 0.0,
        },
        TextAlign::Right => LinePlacement {
            offset_x: slack,
            extra_per_space: 0.0,
        },
        TextAlign::Justify => {
            if line.last_in_block || line.interior_spaces == 0 {
                LinePlacement::default()
            } else {
                LinePlacement {
                    offset_x: 0.0,
                    extra_per_space: slack / line.interior_spaces as f32,
                }
            }
        },
    }
}

/// Distance from the top of a line box to its baseline.
///
/// The leading left over after the glyph box (`ascent - descent`, both in
/// points with descent negative) is split evenly above and below it.
pub fn baseline_offset(line_height: f32, ascent: f32, descent: f32) -> f32 {
    (line_height - (ascent - descent)) / 2.0 + ascent
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(spec: &[(f32, bool)]) -> Vec<MeasuredToken> {
        spec.iter()
            .map(|&(w, space)| if space { MeasuredToken::space(w) } else { MeasuredToken::word(w) })
            .collect()
    }

    #[test]
    fn test_overwide_word_alone() {
        let lines = break_lines(&[MeasuredToken::word(150.0)], 100.0, 100.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].width, 150.0);
    }

    #[test]
    fn test_wraps_and_drops_trailing_space() {
        // "aaa bbb ccc" with 40pt words and 5pt spaces in 90pt
        let tokens = words(&[(40.0, false), (5.0, true), (40.0, false), (5.0, true), (40.0, false)]);
        let lines = break_lines(&tokens, 90.0, 90.0);
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[0].start, lines[0].end), (0, 3));
        assert_eq!(lines[0].width, 85.0);
        assert_eq!(lines[0].interior_spaces, 1);
        assert!(!lines[0].last_in_block);
        assert_eq!(lines[1].start, 4);
        assert!(lines[1].last_in_block);
    }

    #[test]
    fn test_leading_spaces_skipped() {
        let tokens = words(&[(5.0, true), (10.0, false), (5.0, true)]);
        let lines = break_lines(&tokens, 100.0, 100.0);
        assert_eq!(lines.len(), 1);
        assert_eq!((lines[0].start, lines[0].end), (1, 2));
        assert_eq!(lines[0].width, 10.0);
    }

    #[test]
    fn test_glued_segment_not_split() {
        // Two adjacent words without a space between them behave as one.
        let tokens = words(&[(30.0, false), (5.0, true), (30.0, false), (30.0, false)]);
        let lines = break_lines(&tokens, 70.0, 70.0);
        assert_eq!(lines.len(), 2);
        assert_eq!((lines[1].start, lines[1].end), (2, 4));
    }

    #[test]
    fn test_first_line_width_differs() {
        let tokens = words(&[(40.0, false), (0.0, true), (40.0, false), (0.0, true), (40.0, false)]);
        let lines = break_lines(&tokens, 40.0, 100.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].end, 1);
        assert_eq!(lines[1].width, 80.0);
    }

    #[test]
    fn test_empty_block_gives_empty_line() {
        let lines = break_lines(&words(&[(5.0, true)]), 100.0, 100.0);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].is_empty());
        assert!(lines[0].last_in_block);
    }

    #[test]
    fn test_justify_distributes_slack() {
        let line = LineSpan {
            start: 0,
            end: 5,
            width: 80.0,
            interior_spaces: 2,
            last_in_block: false,
        };
        let placement = place_line(TextAlign::Justify, 100.0, &line);
        assert!((placement.extra_per_space - 10.0).abs() < 1e-6);
        assert_eq!(placement.offset_x, 0.0);
    }

    #[test]
    fn test_justify_skips_last_line() {
        let line = LineSpan {
            start: 0,
            end: 5,
            width: 80.0,
            interior_spaces: 2,
            last_in_block: true,
        };
        assert_eq!(place_line(TextAlign::Justify, 100.0, &line), LinePlacement::default());
    }

    #[test]
    fn test_center_and_right() {
        let line = LineSpan {
            start: 0,
            end: 1,
            width: 60.0,
            interior_spaces: 0,
            last_in_block: true,
        };
        assert_eq!(place_line(TextAlign::Center, 100.0, &line).offset_x, 20.0);
        assert_eq!(place_line(TextAlign::Right, 100.0, &line).offset_x, 40.0);
        assert_eq!(place_line(TextAlign::Right, 50.0, &line).offset_x, 0.0);
    }

    #[test]
    fn test_baseline_offset_centers_leading() {
        // 15pt line, 9.6pt ascent, -2.4pt descent: 1.5pt leading above
        let offset = baseline_offset(15.0, 9.6, -2.4);
        assert!((offset - 11.1).abs() < 1e-4);
    }
}
