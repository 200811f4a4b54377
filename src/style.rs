//! # Style Propagation
//!
//! Copies color and effect settings from the control regions onto the
//! strokes. Runs every tick before digits are blanked, so blanking always
//! wins for the strokes a glyph switches off.
//!
//! | Mode      | strokes >= midpoint              | strokes < midpoint |
//! |-----------|----------------------------------|--------------------|
//! | TwoTone   | Primary                          | Secondary          |
//! | TempHumid | Primary if temp > 0, else Secondary | Tertiary        |
//! | InSeries  | untouched (host styles the flat segment directly) | |

use crate::addressing::{ControlRegion, SegmentAddressing};
use crate::strip::SegmentRuntime;
use crate::Mode;

/// Sign of the current temperature as seen by the TempHumid styling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Polarity {
    /// Strictly above zero
    Positive,
    /// Zero or below
    NonPositive,
}

impl Polarity {
    /// Classify a temperature. Zero counts as non-positive.
    pub fn of(temperature: i32) -> Self {
        if temperature > 0 {
            Polarity::Positive
        } else {
            Polarity::NonPositive
        }
    }
}

/// Propagate control-region styles onto every stroke for `mode`.
///
/// `polarity` only matters for [`Mode::TempHumid`]; `None` is treated as
/// positive.
pub fn propagate_style<R: SegmentRuntime>(
    runtime: &mut R,
    addressing: &SegmentAddressing,
    mode: Mode,
    polarity: Option<Polarity>,
) {
    let (upper, lower) = match mode {
        Mode::TwoTone => (ControlRegion::Primary, ControlRegion::Secondary),
        Mode::TempHumid => {
            let upper = match polarity.unwrap_or(Polarity::Positive) {
                Polarity::Positive => ControlRegion::Primary,
                Polarity::NonPositive => ControlRegion::Secondary,
            };
            (upper, ControlRegion::Tertiary)
        }
        Mode::InSeries => return,
    };

    let (Some(upper), Some(lower)) = (addressing.control(upper), addressing.control(lower)) else {
        return;
    };

    let midpoint = addressing.total_segments() / 2;
    for index in 0..addressing.total_segments() {
        let Some(target) = addressing.stroke(index) else {
            continue;
        };
        let source = if index >= midpoint { upper } else { lower };
        copy_style(runtime, source, target);
    }
}

/// Copy primary color, effect, speed, intensity and palette from `source`
/// to `target`. Secondary and tertiary color slots of `target` are kept.
pub fn copy_style<R: SegmentRuntime>(runtime: &mut R, source: usize, target: usize) {
    let Some(src) = runtime.segment(source).map(|seg| seg.style) else {
        return;
    };
    if let Some(dst) = runtime.segment_mut(target) {
        dst.style.colors[0] = src.colors[0];
        dst.style.effect = src.effect;
        dst.style.speed = src.speed;
        dst.style.intensity = src.intensity;
        dst.style.palette = src.palette;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::{SegmentStyle, VirtualStrip};
    use crate::{Rgb, TOTAL_SEGMENTS};

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);
    const GREEN: Rgb = Rgb::new(0, 255, 0);

    fn styled_strip() -> (VirtualStrip, SegmentAddressing) {
        let mut strip = VirtualStrip::new(3 + TOTAL_SEGMENTS);
        let mut addr = SegmentAddressing::new(1, TOTAL_SEGMENTS);
        addr.partition(&mut strip, 1, TOTAL_SEGMENTS);
        addr.refresh_handles(&strip);

        strip.segment_mut(0).unwrap().style = SegmentStyle {
            effect: 3,
            speed: 120,
            intensity: 40,
            palette: 6,
            ..SegmentStyle::solid(RED)
        };
        strip.segment_mut(1).unwrap().style = SegmentStyle::solid(BLUE);
        strip.segment_mut(2).unwrap().style = SegmentStyle::solid(GREEN);
        (strip, addr)
    }

    fn stroke_color(strip: &VirtualStrip, addr: &SegmentAddressing, index: usize) -> Rgb {
        strip.segment(addr.stroke(index).unwrap()).unwrap().style.colors[0]
    }

    #[test]
    fn two_tone_splits_at_the_midpoint() {
        let (mut strip, addr) = styled_strip();
        propagate_style(&mut strip, &addr, Mode::TwoTone, None);

        assert_eq!(stroke_color(&strip, &addr, 13), BLUE);
        assert_eq!(stroke_color(&strip, &addr, 14), RED);
        assert_eq!(stroke_color(&strip, &addr, 27), RED);
        assert_eq!(stroke_color(&strip, &addr, 0), BLUE);

        let upper = strip.segment(addr.stroke(20).unwrap()).unwrap().style;
        assert_eq!(
            (upper.effect, upper.speed, upper.intensity, upper.palette),
            (3, 120, 40, 6)
        );
    }

    #[test]
    fn temp_humid_follows_temperature_sign() {
        let (mut strip, addr) = styled_strip();
        propagate_style(&mut strip, &addr, Mode::TempHumid, Some(Polarity::of(21)));
        assert_eq!(stroke_color(&strip, &addr, 20), RED);
        assert_eq!(stroke_color(&strip, &addr, 5), GREEN);

        propagate_style(&mut strip, &addr, Mode::TempHumid, Some(Polarity::of(-3)));
        assert_eq!(stroke_color(&strip, &addr, 20), BLUE);
        assert_eq!(stroke_color(&strip, &addr, 5), GREEN);
    }

    #[test]
    fn zero_degrees_is_not_positive() {
        assert_eq!(Polarity::of(0), Polarity::NonPositive);
        assert_eq!(Polarity::of(1), Polarity::Positive);
    }

    #[test]
    fn in_series_leaves_segments_alone() {
        let (mut strip, addr) = styled_strip();
        propagate_style(&mut strip, &addr, Mode::InSeries, None);
        assert!(stroke_color(&strip, &addr, 20).is_off());
    }

    #[test]
    fn copy_keeps_target_secondary_colors() {
        let (mut strip, addr) = styled_strip();
        let target = addr.stroke(0).unwrap();
        strip.set_color(target, 1, GREEN);
        copy_style(&mut strip, 0, target);
        let style = strip.segment(target).unwrap().style;
        assert_eq!(style.colors, [RED, GREEN, Rgb::BLACK]);
    }

    #[test]
    fn stale_handles_skip_propagation() {
        let (mut strip, mut addr) = styled_strip();
        addr.partition(&mut strip, 1, TOTAL_SEGMENTS);
        propagate_style(&mut strip, &addr, Mode::TwoTone, None);
        assert!(strip.segment(20).unwrap().style.colors[0].is_off());
    }
}
