//! # Mode Controller
//!
//! Top-level state of the display. The host calls into it from three hooks:
//!
//! - [`ModeController::update`] on every loop pass: styles and renders the
//!   region modes (TwoTone, TempHumid)
//! - [`ModeController::handle_overlay_draw`] after the host painted its pixel
//!   buffer: renders InSeries by writing raw pixels
//! - [`ModeController::connected`] after every network (re)connect
//!
//! Settings updates go through [`ModeController::apply_settings`], which
//! compares the authoritative mode against the previous update and rebuilds
//! the addressing once per mode change, before any further render can run.

use crate::addressing::{Scheme, SegmentAddressing};
use crate::renderer::render_digits;
use crate::sensor::{Reading, SensorDriver, ThrottledSensor};
use crate::settings::Settings;
use crate::strip::SegmentRuntime;
use crate::style::{propagate_style, Polarity};
use crate::time_source::TimeSource;
use crate::{Mode, NUM_DIGITS, TOTAL_SEGMENTS};
use log::{debug, info, warn};
use serde_json::Value;

/// Display state owned by the host's render loop.
pub struct ModeController<T, S> {
    settings: Settings,
    /// Authoritative mode as of the previous settings update
    shadow: Option<Mode>,
    addressing: SegmentAddressing,
    clock: T,
    sensor: ThrottledSensor<S>,
}

impl<T: TimeSource, S: SensorDriver> ModeController<T, S> {
    /// Controller with default settings (TwoTone).
    pub fn new(leds_per_segment: usize, clock: T, sensor: ThrottledSensor<S>) -> Self {
        Self::with_settings(leds_per_segment, Settings::default(), clock, sensor)
    }

    pub fn with_settings(
        leds_per_segment: usize,
        settings: Settings,
        clock: T,
        sensor: ThrottledSensor<S>,
    ) -> Self {
        Self {
            shadow: settings.mode(),
            settings,
            addressing: SegmentAddressing::new(leds_per_segment, TOTAL_SEGMENTS),
            clock,
            sensor,
        }
    }

    /// Boot-time work: install the addressing for the configured mode and
    /// take the first sensor reading.
    pub fn setup<R: SegmentRuntime>(&mut self, strip: &mut R, now_ms: u64) {
        match self.settings.mode() {
            Some(Mode::InSeries) => self.install_flat(strip),
            Some(_) => self.install_regions(strip),
            None => info!("No display mode selected, addressing left alone"),
        }
        self.shadow = self.settings.mode();
        self.sensor.read_now(now_ms);
    }

    /// Called on every network (re)connect.
    ///
    /// Time is read fresh on every render, so only the sensor needs a
    /// refresh here.
    pub fn connected(&mut self, now_ms: u64) {
        let reading = self.sensor.read(now_ms);
        debug!("Connected, sensor at {:?}", reading);
    }

    /// Read settings from the host document and react to mode changes.
    ///
    /// Returns false when the document was incomplete; missing keys keep
    /// their previous values.
    pub fn apply_settings<R: SegmentRuntime>(&mut self, strip: &mut R, root: &Value) -> bool {
        let complete = self.settings.read_from_config(root);
        self.sync_addressing(strip);
        complete
    }

    /// Replace the settings wholesale and react to mode changes.
    pub fn set_settings<R: SegmentRuntime>(&mut self, strip: &mut R, settings: Settings) {
        self.settings = settings;
        self.sync_addressing(strip);
    }

    /// Rebuild the addressing when the authoritative mode changed, then
    /// record it as the new shadow copy.
    ///
    /// Flags that rise or fall underneath a higher-priority mode change
    /// nothing. Dropping to no mode keeps the current addressing. At most
    /// one rebuild happens per call.
    fn sync_addressing<R: SegmentRuntime>(&mut self, strip: &mut R) {
        let mode = self.settings.mode();
        if mode != self.shadow {
            match mode {
                Some(Mode::InSeries) => self.install_flat(strip),
                Some(_) => self.install_regions(strip),
                None => {}
            }
            info!("Switched from {:?} to {:?} mode", self.shadow, mode);
        }
        self.shadow = mode;
    }

    fn install_regions<R: SegmentRuntime>(&mut self, strip: &mut R) {
        let leds = self.addressing.leds_per_segment();
        self.addressing.partition(strip, leds, TOTAL_SEGMENTS);
        self.addressing.refresh_handles(strip);
    }

    fn install_flat<R: SegmentRuntime>(&mut self, strip: &mut R) {
        let units = self.addressing.total_units();
        self.addressing.partition_flat(strip, units);
    }

    /// Per-loop hook for the region modes.
    ///
    /// Returns the digits rendered this pass, or `None` when the active mode
    /// renders from the overlay hook instead.
    pub fn update<R: SegmentRuntime>(
        &mut self,
        strip: &mut R,
        now_ms: u64,
    ) -> Option<[u8; NUM_DIGITS]> {
        let mode = self.settings.mode()?;
        if mode.uses_regions() && self.addressing.scheme() != Scheme::Regions {
            warn!("{:?} needs the region scheme, skipping render", mode);
            return None;
        }
        let digits = match mode {
            Mode::TwoTone => {
                propagate_style(strip, &self.addressing, Mode::TwoTone, None);
                let digits = self.time_digits();
                render_digits(strip, &self.addressing, digits, Mode::TwoTone);
                digits
            }
            Mode::TempHumid => {
                let reading = self.sensor.read(now_ms);
                let polarity = Polarity::of(reading.temperature);
                propagate_style(strip, &self.addressing, Mode::TempHumid, Some(polarity));
                let digits = if self.settings.manual {
                    self.settings.digits
                } else {
                    reading.digits()
                };
                render_digits(strip, &self.addressing, digits, Mode::TempHumid);
                digits
            }
            Mode::InSeries => return None,
        };
        debug!("Rendered {:?}", digits);
        Some(digits)
    }

    /// Per-frame hook, run after the host painted its pixel buffer.
    ///
    /// Only InSeries draws here. Returns the digits rendered.
    pub fn handle_overlay_draw<R: SegmentRuntime>(
        &mut self,
        strip: &mut R,
    ) -> Option<[u8; NUM_DIGITS]> {
        if self.settings.mode() != Some(Mode::InSeries) {
            return None;
        }
        if self.addressing.scheme() != Scheme::Flat {
            warn!("InSeries needs the flat scheme, skipping render");
            return None;
        }
        let digits = self.time_digits();
        render_digits(strip, &self.addressing, digits, Mode::InSeries);
        Some(digits)
    }

    /// Digits of the clock view, or the manual digits when overridden.
    fn time_digits(&mut self) -> [u8; NUM_DIGITS] {
        if self.settings.manual {
            return self.settings.digits;
        }
        let time = self.clock.now();
        if self.settings.secs_mins {
            time.minutes_seconds()
        } else {
            time.hours_minutes()
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn addressing(&self) -> &SegmentAddressing {
        &self.addressing
    }

    /// Addressing rebuilds performed so far.
    pub fn rebuilds(&self) -> u32 {
        self.addressing.generation()
    }

    /// Last sensor reading, without touching the gate.
    pub fn reading(&self) -> Reading {
        self.sensor.cached()
    }

    pub fn sensor(&self) -> &ThrottledSensor<S> {
        &self.sensor
    }

    pub fn sensor_mut(&mut self) -> &mut ThrottledSensor<S> {
        &mut self.sensor
    }

    pub fn clock_mut(&mut self) -> &mut T {
        &mut self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::SimulatedSensor;
    use crate::strip::VirtualStrip;
    use crate::time_source::{FixedClock, TimeOfDay};
    use serde_json::json;

    fn controller(settings: Settings) -> ModeController<FixedClock, SimulatedSensor> {
        ModeController::with_settings(
            1,
            settings,
            FixedClock(TimeOfDay::new(14, 7, 33).unwrap()),
            ThrottledSensor::new(SimulatedSensor::new(21, 40), 10_000),
        )
    }

    #[test]
    fn setup_installs_the_scheme_for_the_mode() {
        let mut strip = VirtualStrip::new(31);
        let mut two_tone = controller(Settings::default());
        two_tone.setup(&mut strip, 0);
        assert_eq!(two_tone.addressing().scheme(), Scheme::Regions);
        assert_eq!(two_tone.sensor().driver().reads(), 1);

        let mut in_series = controller(Settings {
            two_tone: false,
            in_series: true,
            ..Settings::default()
        });
        in_series.setup(&mut strip, 0);
        assert_eq!(in_series.addressing().scheme(), Scheme::Flat);
    }

    #[test]
    fn unchanged_flags_never_rebuild() {
        let mut strip = VirtualStrip::new(31);
        let mut ctl = controller(Settings::default());
        ctl.setup(&mut strip, 0);
        let doc = json!({ "NanoLeafDisplay": { "TwoTone": true, "Manual": true } });
        for _ in 0..5 {
            ctl.apply_settings(&mut strip, &doc);
            ctl.update(&mut strip, 0);
        }
        assert_eq!(ctl.rebuilds(), 1);
    }

    #[test]
    fn overlapping_flags_follow_the_authoritative_mode() {
        let mut strip = VirtualStrip::new(31);
        let mut ctl = controller(Settings::default());
        ctl.setup(&mut strip, 0);
        let flags = |two_tone, in_series| Settings {
            two_tone,
            in_series,
            ..Settings::default()
        };

        // InSeries under TwoTone changes nothing
        ctl.set_settings(&mut strip, flags(true, true));
        assert_eq!(ctl.rebuilds(), 1);
        assert_eq!(ctl.addressing().scheme(), Scheme::Regions);
        assert_eq!(ctl.update(&mut strip, 0), Some([1, 4, 0, 7]));

        // Dropping TwoTone exposes InSeries
        ctl.set_settings(&mut strip, flags(false, true));
        assert_eq!(ctl.rebuilds(), 2);
        assert_eq!(ctl.addressing().scheme(), Scheme::Flat);

        ctl.set_settings(&mut strip, flags(true, true));
        assert_eq!(ctl.rebuilds(), 3);
        assert_eq!(ctl.addressing().scheme(), Scheme::Regions);

        // No mode leaves the addressing alone
        ctl.set_settings(&mut strip, flags(false, false));
        assert_eq!(ctl.rebuilds(), 3);
    }

    #[test]
    fn rendering_waits_for_the_addressing() {
        let mut strip = VirtualStrip::new(31);
        let mut ctl = controller(Settings::default());
        assert_eq!(ctl.update(&mut strip, 0), None);

        ctl.setup(&mut strip, 0);
        assert_eq!(ctl.update(&mut strip, 0), Some([1, 4, 0, 7]));
    }

    #[test]
    fn update_is_idle_in_series_and_overlay_is_idle_otherwise() {
        let mut strip = VirtualStrip::new(31);
        let mut ctl = controller(Settings::default());
        ctl.setup(&mut strip, 0);
        assert_eq!(ctl.handle_overlay_draw(&mut strip), None);
        assert_eq!(ctl.update(&mut strip, 0), Some([1, 4, 0, 7]));

        ctl.set_settings(
            &mut strip,
            Settings {
                two_tone: false,
                in_series: true,
                ..Settings::default()
            },
        );
        assert_eq!(ctl.update(&mut strip, 0), None);
        assert_eq!(ctl.handle_overlay_draw(&mut strip), Some([1, 4, 0, 7]));
    }

    #[test]
    fn connected_refreshes_the_sensor() {
        let mut ctl = controller(Settings::default());
        ctl.connected(50_000);
        assert_eq!(ctl.reading().temperature, 21);
        assert_eq!(ctl.sensor().driver().reads(), 1);

        ctl.sensor_mut().driver_mut().reading.temperature = 25;
        ctl.connected(55_000);
        assert_eq!(ctl.reading().temperature, 21);
        ctl.connected(60_001);
        assert_eq!(ctl.reading().temperature, 25);
    }

    #[test]
    fn no_mode_renders_nothing() {
        let mut strip = VirtualStrip::new(31);
        let mut ctl = controller(Settings {
            two_tone: false,
            ..Settings::default()
        });
        ctl.setup(&mut strip, 0);
        assert_eq!(ctl.rebuilds(), 0);
        assert_eq!(ctl.update(&mut strip, 0), None);
        assert_eq!(ctl.handle_overlay_draw(&mut strip), None);
    }
}
