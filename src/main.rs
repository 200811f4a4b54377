//! # NanoLeaf Display Host Simulator
//!
//! Desktop stand-in for the LED controller firmware. It owns an in-memory
//! strip, drives the display controller from a periodic loop the way the
//! firmware's render loop does, and prints the resulting digits as ASCII.
//!
//! Each pass runs the three host hooks in firmware order:
//! 1. `update` (region modes style and blank strokes)
//! 2. host frame render (segments painted into pixels)
//! 3. `handle_overlay_draw` (InSeries blanks raw pixels)
//!
//! The settings document is re-read whenever its modification time changes,
//! so editing the JSON file switches modes live.
//!
//! Flags:
//! - `--once`: render a single frame and exit


use anyhow::Context;
use nanoleaf_display::addressing::{ControlRegion, Scheme, SegmentAddressing};
use nanoleaf_display::config::Config;
use nanoleaf_display::controller::ModeController;
use nanoleaf_display::renderer::draw_ascii;
use nanoleaf_display::sensor::{SensorDriver, SimulatedSensor, ThrottledSensor};
use nanoleaf_display::settings::{self, SettingsError};
use nanoleaf_display::strip::{SegmentRuntime, SegmentStyle, VirtualStrip};
use nanoleaf_display::time_source::{LocalClock, OffsetClock, TimeSource};
use nanoleaf_display::Rgb;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant, SystemTime};

/// Colors the simulated user picked on the control regions.
const PRIMARY: Rgb = Rgb::new(255, 140, 0);
const SECONDARY: Rgb = Rgb::new(0, 180, 255);
const TERTIARY: Rgb = Rgb::new(60, 255, 60);

/// Re-reads the settings document when its modification time changes.
struct SettingsWatcher {
    path: PathBuf,
    modified: Option<SystemTime>,
}

impl SettingsWatcher {
    fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            modified: None,
        }
    }

    /// The document, if it changed since the last call.
    fn poll(&mut self) -> Result<Option<serde_json::Value>, SettingsError> {
        let modified = fs::metadata(&self.path).and_then(|m| m.modified()).ok();
        if modified.is_some() && modified == self.modified {
            return Ok(None);
        }
        self.modified = modified;
        settings::load_document(&self.path).map(Some)
    }
}

/// Give freshly partitioned control regions (or the flat segment) a style,
/// the way a user would on the real controller.
fn seed_styles(strip: &mut VirtualStrip, addressing: &SegmentAddressing) {
    match addressing.scheme() {
        Scheme::Regions => {
            let seeds = [
                (ControlRegion::Primary, PRIMARY),
                (ControlRegion::Secondary, SECONDARY),
                (ControlRegion::Tertiary, TERTIARY),
            ];
            for (which, color) in seeds {
                let id = addressing.control(which);
                if let Some(seg) = id.and_then(|id| strip.segment_mut(id)) {
                    seg.style = SegmentStyle::solid(color);
                }
            }
        }
        Scheme::Flat => {
            if let Some(seg) = strip.segment_mut(0) {
                seg.style = SegmentStyle::solid(PRIMARY);
            }
        }
        Scheme::Unpartitioned => {}
    }
}

/// Run one host pass and return the digits shown, if any mode rendered.
fn render_pass<T: TimeSource, S: SensorDriver>(
    controller: &mut ModeController<T, S>,
    strip: &mut VirtualStrip,
    now_ms: u64,
) -> Option<[u8; 4]> {
    let updated = controller.update(strip, now_ms);
    strip.render_frame();
    let overlaid = controller.handle_overlay_draw(strip);
    updated.or(overlaid)
}

fn run<T: TimeSource>(clock: T, config: &Config, once: bool) -> anyhow::Result<()> {
    let mut strip = VirtualStrip::new(config.pixel_count());
    let sensor = ThrottledSensor::new(
        SimulatedSensor::new(
            config.sensor.simulated_temperature,
            config.sensor.simulated_humidity,
        ),
        config.sensor.read_delay_ms,
    );
    let mut controller = ModeController::new(config.layout.leds_per_segment, clock, sensor);
    let mut watcher = SettingsWatcher::new(&config.host.settings_path);
    let started = Instant::now();
    let now_ms = |started: Instant| started.elapsed().as_millis() as u64;

    controller.setup(&mut strip, 0);
    controller.connected(0);
    let mut seeded_generation = None;

    // Single-threaded pacing only; the controller itself never blocks
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("build host runtime")?;

    rt.block_on(async {
        let mut interval = tokio::time::interval(Duration::from_millis(
            config.host.tick_interval_ms.max(1),
        ));
        loop {
            interval.tick().await;

            match watcher.poll() {
                Ok(Some(mut document)) => {
                    if !controller.apply_settings(&mut strip, &document) {
                        // Fill in the missing keys so the next read is complete
                        controller.settings().add_to_config(&mut document);
                        settings::save_document(&watcher.path, &document)
                            .context("write completed settings document")?;
                        eprintln!("📝 Settings completed in {}", watcher.path.display());
                    }
                }
                Ok(None) => {}
                Err(e) => eprintln!("⚠️  Settings not applied: {}", e),
            }

            if seeded_generation != Some(controller.rebuilds()) {
                seed_styles(&mut strip, controller.addressing());
                seeded_generation = Some(controller.rebuilds());
            }

            let digits = render_pass(&mut controller, &mut strip, now_ms(started));
            match digits {
                Some(d) => eprintln!(
                    "🕐 {:?} mode: {}{}{}{}",
                    controller.settings().mode(),
                    d[0],
                    d[1],
                    d[2],
                    d[3]
                ),
                None => eprintln!("💤 No display mode selected"),
            }
            draw_ascii(strip.pixels(), controller.addressing());
            println!();

            if once {
                return Ok::<(), anyhow::Error>(());
            }
        }
    })
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::init();

    // Single frame for scripting and quick checks
    let once = env::args().any(|arg| arg == "--once");

    let config = Config::load();

    match config.clock.utc_offset_minutes {
        Some(minutes) => {
            let clock = OffsetClock::new(minutes)
                .with_context(|| format!("invalid utc_offset_minutes {}", minutes))?;
            run(clock, &config, once)
        }
        None => run(LocalClock, &config, once),
    }
}
