//! # Digit Glyphs
//!
//! Lookup table from a digit value to the strokes that must be switched
//! **off** to draw it. Strokes inside one digit are numbered like this:
//!
//! ```text
//!  - 5 -
//! 6     4
//!  - 3 -
//! 2     0
//!  - 1 -
//! ```
//!
//! Strokes not listed keep whatever color the style pass gave them.

/// Strokes to blank for each value, indexed by the value itself.
const GLYPHS: [&[u8]; 10] = [
    &[3],             // 0
    &[1, 2, 3, 5, 6], // 1
    &[0, 6],          // 2
    &[2, 6],          // 3
    &[1, 2, 5],       // 4
    &[2, 4],          // 5
    &[4],             // 6
    &[1, 2, 3, 6],    // 7
    &[],              // 8
    &[2],             // 9
];

/// Strokes (0..=6) to switch off so the digit shows `value`.
///
/// Returns `None` when `value` is not a single decimal digit.
///
/// # Example
/// ```
/// use nanoleaf_display::glyph::segments_to_turn_off;
///
/// assert_eq!(segments_to_turn_off(0), Some(&[3u8][..]));
/// assert_eq!(segments_to_turn_off(8), Some(&[][..]));
/// assert_eq!(segments_to_turn_off(10), None);
/// ```
pub fn segments_to_turn_off(value: u8) -> Option<&'static [u8]> {
    GLYPHS.get(value as usize).copied()
}

/// Strokes (0..=6) that stay lit for `value`, the complement of
/// [`segments_to_turn_off`].
pub fn lit_segments(value: u8) -> Option<[bool; 7]> {
    let off = segments_to_turn_off(value)?;
    let mut lit = [true; 7];
    for &stroke in off {
        lit[stroke as usize] = false;
    }
    Some(lit)
}
