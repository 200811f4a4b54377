//! # Digit Rendering
//!
//! Turns "digit D shows value V" into the strokes that have to go dark and
//! blanks them through the scheme the active mode uses. Also renders the
//! physical display back to ASCII for the desktop simulator.

use crate::addressing::SegmentAddressing;
use crate::glyph;
use crate::strip::{SegmentRuntime, FX_SOLID};
use crate::{Mode, Rgb, NUM_DIGITS, SEGS_PER_DIGIT};
use log::warn;
use std::ops::Range;

/// Absolute strokes owned by `digit` (0 = leftmost).
///
/// Digits are wired right to left, so digit 0 owns the highest window.
/// Returns `None` for a digit that does not fit on a display of
/// `total_segments` strokes.
///
/// # Example
/// ```
/// use nanoleaf_display::renderer::digit_window;
///
/// assert_eq!(digit_window(0, 28), Some(21..28));
/// assert_eq!(digit_window(3, 28), Some(0..7));
/// assert_eq!(digit_window(4, 28), None);
/// ```
pub fn digit_window(digit: usize, total_segments: usize) -> Option<Range<usize>> {
    let base = total_segments.checked_sub(SEGS_PER_DIGIT * (digit + 1))?;
    Some(base..base + SEGS_PER_DIGIT)
}

/// Blank the strokes `digit` does not need to show `value`.
///
/// Region modes blank the stroke's runtime segment; [`Mode::InSeries`]
/// writes black into the stroke's raw pixels. Strokes of other digits are
/// never touched. Invalid digits or values are logged and skipped.
pub fn render_digit<R: SegmentRuntime>(
    runtime: &mut R,
    addressing: &SegmentAddressing,
    digit: usize,
    value: u8,
    mode: Mode,
) {
    let Some(window) = digit_window(digit, addressing.total_segments()) else {
        warn!("Digit position {} does not exist", digit);
        return;
    };
    let Some(off) = glyph::segments_to_turn_off(value) else {
        warn!("Digit {} asked to show {}, skipping", digit, value);
        return;
    };

    for &stroke in off {
        let index = window.start + stroke as usize;
        if mode.uses_regions() {
            turn_off_stroke(runtime, addressing, index);
        } else {
            turn_off_stroke_pixels(runtime, addressing, index);
        }
    }
}

/// Render all four digits, leftmost first.
pub fn render_digits<R: SegmentRuntime>(
    runtime: &mut R,
    addressing: &SegmentAddressing,
    digits: [u8; NUM_DIGITS],
    mode: Mode,
) {
    for (digit, value) in digits.into_iter().enumerate() {
        render_digit(runtime, addressing, digit, value, mode);
    }
}

/// Clear every color slot of the stroke's segment and stop its effect.
fn turn_off_stroke<R: SegmentRuntime>(
    runtime: &mut R,
    addressing: &SegmentAddressing,
    index: usize,
) {
    let Some(id) = addressing.stroke(index) else {
        return;
    };
    if let Some(seg) = runtime.segment_mut(id) {
        seg.style.colors = [Rgb::BLACK; 3];
        seg.style.effect = FX_SOLID;
    }
}

fn turn_off_stroke_pixels<R: SegmentRuntime>(
    runtime: &mut R,
    addressing: &SegmentAddressing,
    index: usize,
) {
    for px in addressing.pixel_range(index) {
        runtime.set_pixel_color(px, Rgb::BLACK);
    }
}

/// Which strokes are lit in a rendered pixel buffer.
///
/// A stroke counts as lit when any of its pixels is not black.
pub fn lit_strokes(pixels: &[Rgb], addressing: &SegmentAddressing) -> Vec<bool> {
    (0..addressing.total_segments())
        .map(|index| {
            addressing
                .pixel_range(index)
                .filter_map(|px| pixels.get(px))
                .any(|c| !c.is_off())
        })
        .collect()
}

/// Read the displayed digit values back from lit strokes.
///
/// Returns `None` for a position whose stroke pattern is not a digit.
pub fn decode_digits(lit: &[bool]) -> [Option<u8>; NUM_DIGITS] {
    let mut out = [None; NUM_DIGITS];
    for (digit, slot) in out.iter_mut().enumerate() {
        let Some(window) = digit_window(digit, lit.len()) else {
            continue;
        };
        let strokes = &lit[window];
        *slot = (0..=9u8).find(|&v| {
            glyph::lit_segments(v).is_some_and(|pattern| pattern[..] == *strokes)
        });
    }
    out
}

/// Format lit strokes as three rows of ASCII art, digit 0 on the left.
///
/// ```text
///            _   _
///   | |_|   | |   |
///   |   |   |_|   |
/// ```
pub fn format_ascii(lit: &[bool]) -> String {
    let mut rows = [String::new(), String::new(), String::new()];

    for digit in 0..NUM_DIGITS {
        let Some(window) = digit_window(digit, lit.len()) else {
            continue;
        };
        let s = |stroke: usize| lit[window.start + stroke];
        let mark = |on: bool, c: char| if on { c } else { ' ' };

        rows[0].push(' ');
        rows[0].push(mark(s(5), '_'));
        rows[0].push(' ');

        rows[1].push(mark(s(6), '|'));
        rows[1].push(mark(s(3), '_'));
        rows[1].push(mark(s(4), '|'));

        rows[2].push(mark(s(2), '|'));
        rows[2].push(mark(s(1), '_'));
        rows[2].push(mark(s(0), '|'));

        let gap = if digit == 1 { "   " } else { " " };
        for row in rows.iter_mut() {
            row.push_str(gap);
        }
    }

    rows.iter()
        .map(|row| row.trim_end())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print the display as ASCII art for development mode.
pub fn draw_ascii(pixels: &[Rgb], addressing: &SegmentAddressing) {
    let lit = lit_strokes(pixels, addressing);
    println!("{}", format_ascii(&lit));
}
