//! # LED Strip Runtime
//!
//! The display does not own pixel memory. A host runtime owns the pixel
//! buffer and a table of named segments (contiguous pixel ranges with their
//! own color and effect). This module defines that seam as the
//! [`SegmentRuntime`] trait and provides [`VirtualStrip`], an in-memory
//! runtime used by the desktop simulator and the test-suite.
//!
//! Segments are addressed by id only. Copying a style from one segment to
//! another is a value copy between table entries, never a shared reference.

use crate::Rgb;

/// Effect id of the static, non-animated effect.
pub const FX_SOLID: u8 = 0;

/// Color and effect properties of one runtime segment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SegmentStyle {
    /// Primary, secondary and tertiary color slots
    pub colors: [Rgb; 3],
    /// Running effect id, [`FX_SOLID`] when static
    pub effect: u8,
    pub speed: u8,
    pub intensity: u8,
    pub palette: u8,
}

impl SegmentStyle {
    /// Solid style with `color` in the primary slot.
    pub fn solid(color: Rgb) -> Self {
        Self {
            colors: [color, Rgb::BLACK, Rgb::BLACK],
            ..Self::default()
        }
    }
}

/// One contiguous pixel range defined on the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StripSegment {
    /// First pixel (inclusive)
    pub start: usize,
    /// Last pixel (exclusive)
    pub stop: usize,
    pub style: SegmentStyle,
}

impl StripSegment {
    pub fn len(&self) -> usize {
        self.stop.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Operations the display needs from the LED runtime.
pub trait SegmentRuntime {
    /// Drop every segment definition.
    fn reset_segments(&mut self);

    /// Define (or redefine) segment `id` over pixels `start..stop`.
    ///
    /// Redefining keeps nothing of the previous segment with that id.
    fn set_segment(&mut self, id: usize, start: usize, stop: usize);

    /// Fetch a previously defined segment.
    fn segment(&self, id: usize) -> Option<&StripSegment>;

    /// Mutable access to a previously defined segment.
    fn segment_mut(&mut self, id: usize) -> Option<&mut StripSegment>;

    /// Write one raw pixel. Out-of-range indices are ignored.
    fn set_pixel_color(&mut self, index: usize, color: Rgb);

    /// Total pixels on the strip.
    fn pixel_count(&self) -> usize;

    /// Set one color slot of a segment.
    fn set_color(&mut self, id: usize, slot: usize, color: Rgb) {
        if let Some(seg) = self.segment_mut(id) {
            if let Some(c) = seg.style.colors.get_mut(slot) {
                *c = color;
            }
        }
    }

    /// Set the running effect of a segment.
    fn set_effect(&mut self, id: usize, effect: u8) {
        if let Some(seg) = self.segment_mut(id) {
            seg.style.effect = effect;
        }
    }
}

/// In-memory LED runtime.
///
/// Segment ids map to slots in a table that grows on demand. `render_frame`
/// paints every defined segment's primary color into the pixel buffer,
/// standing in for the host's own render pass.
#[derive(Clone, Debug)]
pub struct VirtualStrip {
    segments: Vec<Option<StripSegment>>,
    pixels: Vec<Rgb>,
    resets: usize,
}

impl VirtualStrip {
    pub fn new(pixel_count: usize) -> Self {
        Self {
            segments: Vec::new(),
            pixels: vec![Rgb::BLACK; pixel_count],
            resets: 0,
        }
    }

    /// Paint defined segments into the pixel buffer.
    ///
    /// Effects are not animated; a segment shows its primary color. Pixels
    /// outside every segment are black.
    pub fn render_frame(&mut self) {
        self.pixels.fill(Rgb::BLACK);
        // Stops are clamped on definition, so a non-empty segment is in bounds
        for seg in self.segments.iter().flatten().filter(|seg| !seg.is_empty()) {
            self.pixels[seg.start..seg.stop].fill(seg.style.colors[0]);
        }
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    /// Ids of every currently defined segment, ascending.
    pub fn segment_ids(&self) -> Vec<usize> {
        self.segments
            .iter()
            .enumerate()
            .filter_map(|(id, seg)| seg.map(|_| id))
            .collect()
    }

    /// How many times [`SegmentRuntime::reset_segments`] ran.
    pub fn reset_count(&self) -> usize {
        self.resets
    }
}

impl SegmentRuntime for VirtualStrip {
    fn reset_segments(&mut self) {
        self.segments.clear();
        self.resets += 1;
    }

    fn set_segment(&mut self, id: usize, start: usize, stop: usize) {
        if self.segments.len() <= id {
            self.segments.resize(id + 1, None);
        }
        self.segments[id] = Some(StripSegment {
            start,
            stop: stop.min(self.pixels.len()),
            style: SegmentStyle::default(),
        });
    }

    fn segment(&self, id: usize) -> Option<&StripSegment> {
        self.segments.get(id).and_then(Option::as_ref)
    }

    fn segment_mut(&mut self, id: usize) -> Option<&mut StripSegment> {
        self.segments.get_mut(id).and_then(Option::as_mut)
    }

    fn set_pixel_color(&mut self, index: usize, color: Rgb) {
        if let Some(px) = self.pixels.get_mut(index) {
            *px = color;
        }
    }

    fn pixel_count(&self) -> usize {
        self.pixels.len()
    }
}
