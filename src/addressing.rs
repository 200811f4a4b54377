//! # Segment Addressing
//!
//! Partitions the strip into runtime segments for the active mode.
//!
//! ## Region scheme (TwoTone / TempHumid)
//! ```text
//! pixel:  0   1   2   3 .. 3+L  3+L .. 3+2L  ...
//! id:     0   1   2   3         4            ...  3+27
//!         control     stroke 0  stroke 1          stroke 27
//! ```
//! Every stroke is its own runtime segment, so strokes are styled and
//! blanked per segment.
//!
//! ## Flat scheme (InSeries)
//! One runtime segment (id 0) spans all stroke pixels after the control
//! prefix. Strokes are blanked by writing raw pixels.
//!
//! Every rebuild drops the previous handles. Callers must run
//! [`SegmentAddressing::refresh_handles`] straight after [`SegmentAddressing::partition`]
//! and before the next render. Region lookups after a flat partition are a
//! caller error and simply resolve to nothing.

use crate::strip::SegmentRuntime;
use crate::CONTROL_REGIONS;
use log::{debug, info};
use std::ops::Range;

/// The three control regions at the head of the strip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlRegion {
    /// Style source for the right-hand pair and positive temperatures
    Primary = 0,
    /// Style source for the left-hand pair and non-positive temperatures
    Secondary = 1,
    /// Style source for humidity digits
    Tertiary = 2,
}

/// A stroke's pixel run, as laid out by the last region partition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SegmentRegion {
    /// First pixel of the run
    pub start: usize,
    /// Pixels in the run
    pub len: usize,
    /// Position in the 0-based stroke array
    pub index: usize,
}

/// Partitioning currently installed on the runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Scheme {
    /// Nothing installed yet
    Unpartitioned,
    /// Control regions plus one runtime segment per stroke
    Regions,
    /// One runtime segment over every stroke pixel
    Flat,
}

/// Runtime ids resolved after a region partition.
#[derive(Clone, Debug)]
struct Handles {
    controls: [usize; CONTROL_REGIONS],
    strokes: Vec<usize>,
}

/// Owns the stroke layout and the handles into the runtime's segment table.
#[derive(Clone, Debug)]
pub struct SegmentAddressing {
    leds_per_segment: usize,
    total_segments: usize,
    scheme: Scheme,
    regions: Vec<SegmentRegion>,
    handles: Option<Handles>,
    generation: u32,
}

impl SegmentAddressing {
    pub fn new(leds_per_segment: usize, total_segments: usize) -> Self {
        Self {
            leds_per_segment,
            total_segments,
            scheme: Scheme::Unpartitioned,
            regions: Vec::new(),
            handles: None,
            generation: 0,
        }
    }

    /// Rebuild control regions and one runtime segment per stroke.
    ///
    /// Replaces whatever was installed before and invalidates all handles.
    pub fn partition<R: SegmentRuntime>(
        &mut self,
        runtime: &mut R,
        leds_per_segment: usize,
        total_segments: usize,
    ) {
        runtime.reset_segments();

        for id in 0..CONTROL_REGIONS {
            runtime.set_segment(id, id, id + 1);
        }

        self.leds_per_segment = leds_per_segment;
        self.total_segments = total_segments;
        self.regions = (0..total_segments)
            .map(|index| SegmentRegion {
                start: CONTROL_REGIONS + index * leds_per_segment,
                len: leds_per_segment,
                index,
            })
            .collect();

        for region in &self.regions {
            runtime.set_segment(
                region.index + CONTROL_REGIONS,
                region.start,
                region.start + region.len,
            );
        }

        self.handles = None;
        self.scheme = Scheme::Regions;
        self.generation += 1;
        info!(
            "Partitioned {} strokes x {} LEDs (rebuild #{})",
            total_segments, leds_per_segment, self.generation
        );
    }

    /// Replace the layout with one runtime segment spanning `total_units`
    /// pixels after the control prefix.
    pub fn partition_flat<R: SegmentRuntime>(&mut self, runtime: &mut R, total_units: usize) {
        runtime.reset_segments();
        runtime.set_segment(0, CONTROL_REGIONS, CONTROL_REGIONS + total_units);

        self.regions.clear();
        self.handles = None;
        self.scheme = Scheme::Flat;
        self.generation += 1;
        info!(
            "Flat partition over {} pixels (rebuild #{})",
            total_units, self.generation
        );
    }

    /// Resolve control and stroke handles against the runtime.
    ///
    /// Returns false if any expected segment is missing, in which case no
    /// handles are held.
    pub fn refresh_handles<R: SegmentRuntime>(&mut self, runtime: &R) -> bool {
        let present = |id: usize| runtime.segment(id).map(|_| id);

        let controls = [
            present(ControlRegion::Primary as usize),
            present(ControlRegion::Secondary as usize),
            present(ControlRegion::Tertiary as usize),
        ];
        let strokes: Option<Vec<usize>> = self
            .regions
            .iter()
            .map(|r| present(r.index + CONTROL_REGIONS))
            .collect();

        self.handles = match (controls, strokes) {
            ([Some(a), Some(b), Some(c)], Some(strokes)) => Some(Handles {
                controls: [a, b, c],
                strokes,
            }),
            _ => None,
        };
        debug!("Handles refreshed: {}", self.handles.is_some());
        self.handles.is_some()
    }

    /// Runtime id of a control region.
    pub fn control(&self, which: ControlRegion) -> Option<usize> {
        self.handles.as_ref().map(|h| h.controls[which as usize])
    }

    /// Runtime id of stroke `index` (0..total_segments).
    pub fn stroke(&self, index: usize) -> Option<usize> {
        self.handles.as_ref()?.strokes.get(index).copied()
    }

    /// Absolute pixel range of stroke `index`, valid under either scheme.
    pub fn pixel_range(&self, index: usize) -> Range<usize> {
        let start = CONTROL_REGIONS + index * self.leds_per_segment;
        start..start + self.leds_per_segment
    }

    /// Pixels covered by all strokes together.
    pub fn total_units(&self) -> usize {
        self.total_segments * self.leds_per_segment
    }

    pub fn regions(&self) -> &[SegmentRegion] {
        &self.regions
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn leds_per_segment(&self) -> usize {
        self.leds_per_segment
    }

    pub fn total_segments(&self) -> usize {
        self.total_segments
    }

    /// Number of partitions performed so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strip::VirtualStrip;
    use crate::TOTAL_SEGMENTS;

    #[test]
    fn partition_lays_strokes_after_controls() {
        let mut strip = VirtualStrip::new(3 + 28 * 2);
        let mut addr = SegmentAddressing::new(2, TOTAL_SEGMENTS);
        addr.partition(&mut strip, 2, TOTAL_SEGMENTS);

        assert_eq!(addr.scheme(), Scheme::Regions);
        assert_eq!(addr.regions().len(), 28);
        assert_eq!(
            addr.regions()[0],
            SegmentRegion {
                start: 3,
                len: 2,
                index: 0
            }
        );
        assert_eq!(addr.regions()[27].start, 3 + 27 * 2);

        for id in 0..3 {
            let seg = strip.segment(id).unwrap();
            assert_eq!((seg.start, seg.stop), (id, id + 1));
        }
        let last = strip.segment(30).unwrap();
        assert_eq!((last.start, last.stop), (57, 59));
    }

    #[test]
    fn handles_are_stale_until_refreshed() {
        let mut strip = VirtualStrip::new(31);
        let mut addr = SegmentAddressing::new(1, TOTAL_SEGMENTS);
        addr.partition(&mut strip, 1, TOTAL_SEGMENTS);
        assert_eq!(addr.stroke(0), None);
        assert_eq!(addr.control(ControlRegion::Primary), None);

        assert!(addr.refresh_handles(&strip));
        assert_eq!(addr.stroke(0), Some(3));
        assert_eq!(addr.stroke(27), Some(30));
        assert_eq!(addr.control(ControlRegion::Tertiary), Some(2));
    }

    #[test]
    fn flat_partition_drops_region_handles() {
        let mut strip = VirtualStrip::new(31);
        let mut addr = SegmentAddressing::new(1, TOTAL_SEGMENTS);
        addr.partition(&mut strip, 1, TOTAL_SEGMENTS);
        addr.refresh_handles(&strip);

        addr.partition_flat(&mut strip, addr.total_units());
        assert_eq!(addr.scheme(), Scheme::Flat);
        assert_eq!(addr.stroke(5), None);
        assert_eq!(strip.segment_ids(), vec![0]);
        let flat = strip.segment(0).unwrap();
        assert_eq!((flat.start, flat.stop), (3, 31));
        assert_eq!(addr.generation(), 2);
    }

    #[test]
    fn pixel_ranges_follow_leds_per_segment() {
        let addr = SegmentAddressing::new(3, TOTAL_SEGMENTS);
        assert_eq!(addr.pixel_range(0), 3..6);
        assert_eq!(addr.pixel_range(10), 33..36);
        assert_eq!(addr.total_units(), 84);
    }

    #[test]
    fn refresh_fails_when_runtime_lost_segments() {
        let mut strip = VirtualStrip::new(31);
        let mut addr = SegmentAddressing::new(1, TOTAL_SEGMENTS);
        addr.partition(&mut strip, 1, TOTAL_SEGMENTS);
        strip.reset_segments();
        assert!(!addr.refresh_handles(&strip));
        assert_eq!(addr.stroke(0), None);
    }
}
