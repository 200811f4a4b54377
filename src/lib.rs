//! # NanoLeaf Display Core Library
//!
//! This library drives a four digit, seven segment display built from 28
//! addressable LED segment groups. It maps a 4-digit value (time of day, a
//! temperature/humidity reading or manually entered digits) onto the
//! physical segments and keeps the LED partitioning in step with the
//! selected rendering mode.
//!
//! ## Physical Layout
//!
//! The strip starts with 3 single-LED **control regions** that sit inside the
//! electronics housing. They are never drawn as strokes; the user picks colors
//! and effects on them and the display copies those styles onto the digits.
//! After the control regions come 28 segment groups of `leds_per_segment`
//! LEDs each, wired right to left: digit 0 (leftmost) owns absolute segments
//! 21..=27 and digit 3 owns 0..=6.
//!
//! ## Rendering Model
//!
//! Segments are "on" by default and inherit their color from a control
//! region. Rendering a glyph means switching **off** the strokes the glyph
//! does not use:
//! 1. [`style`] copies control-region styles onto every segment
//! 2. [`renderer`] looks up the glyph in [`glyph`] and blanks the unused strokes
//! 3. [`addressing`] decides whether strokes are blanked as regions or as raw pixels
//!
//! [`controller`] ties those steps together and reacts to settings changes.
//!
//! ## Core Types
//! - [`Rgb`]: 24-bit color value used for region colors and raw pixels
//! - [`Mode`]: the addressing/styling mode that owns the display

// Module declarations
pub mod addressing;
pub mod config;
pub mod controller;
pub mod glyph;
pub mod renderer;
pub mod sensor;
pub mod settings;
pub mod strip;
pub mod style;
pub mod time_source;

/// Number of stroke segments on the whole display (4 digits x 7 strokes).
pub const TOTAL_SEGMENTS: usize = 28;

/// Number of strokes that make up one digit.
pub const SEGS_PER_DIGIT: usize = 7;

/// Number of rendered digit positions.
pub const NUM_DIGITS: usize = 4;

/// Leading single-LED regions used only as color/effect sources.
pub const CONTROL_REGIONS: usize = 3;

/// Addressable LEDs (ICs) per stroke on the stock build.
pub const DEFAULT_LEDS_PER_SEGMENT: usize = 1;

/// A 24-bit RGB color.
///
/// # Example
/// ```
/// use nanoleaf_display::Rgb;
///
/// let orange = Rgb::new(255, 160, 0);
/// assert!(!orange.is_off());
/// assert!(Rgb::BLACK.is_off());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// All channels off.
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// True when every channel is zero.
    pub fn is_off(&self) -> bool {
        *self == Self::BLACK
    }
}

/// Which addressing and styling scheme owns the display.
///
/// Exactly one mode is authoritative at a time. Manual digit entry and the
/// minutes/seconds view are orthogonal flags on top of a mode, see
/// [`settings::Settings`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Left and right digit pairs each take their style from their own control region.
    TwoTone,
    /// The strokes are one long strip; digits are drawn by blanking raw pixels.
    InSeries,
    /// Temperature on the left pair, humidity on the right pair.
    TempHumid,
}

impl Mode {
    /// True for modes that style and blank strokes through per-segment regions.
    pub fn uses_regions(&self) -> bool {
        matches!(self, Mode::TwoTone | Mode::TempHumid)
    }
}

/// Split a two-digit quantity into `[tens, ones]`.
///
/// Values above 99 saturate to 99 so the result always stays inside the
/// glyph table.
///
/// # Example
/// ```
/// use nanoleaf_display::split_pair;
///
/// assert_eq!(split_pair(7), [0, 7]);
/// assert_eq!(split_pair(45), [4, 5]);
/// ```
pub fn split_pair(value: u8) -> [u8; 2] {
    let value = value.min(99);
    [value / 10, value % 10]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_pair_round_trips_every_two_digit_value() {
        for v in 0..=99u8 {
            let [tens, ones] = split_pair(v);
            assert!(tens <= 9 && ones <= 9);
            assert_eq!(tens * 10 + ones, v, "split of {v} did not round-trip");
        }
    }

    #[test]
    fn split_pair_saturates_above_99() {
        assert_eq!(split_pair(100), [9, 9]);
        assert_eq!(split_pair(255), [9, 9]);
    }

    #[test]
    fn only_region_modes_use_regions() {
        assert!(Mode::TwoTone.uses_regions());
        assert!(Mode::TempHumid.uses_regions());
        assert!(!Mode::InSeries.uses_regions());
    }
}
