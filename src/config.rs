//! # Configuration Management
//!
//! This module handles loading and parsing configuration from the
//! nanoleaf-config.toml file. It describes the physical build (LEDs per
//! stroke), the sensor timing, the clock zone and how the host loop runs.
//! The user-facing display options are a separate JSON document, see
//! [`crate::settings`].

use crate::sensor::DEFAULT_READ_DELAY_MS;
use crate::{CONTROL_REGIONS, DEFAULT_LEDS_PER_SEGMENT, TOTAL_SEGMENTS};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = "nanoleaf-config.toml";

/// Application configuration loaded from nanoleaf-config.toml
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Physical strip layout
    pub layout: LayoutConfig,
    /// Temperature/humidity sensor options
    pub sensor: SensorConfig,
    /// Time zone handling
    #[serde(default)]
    pub clock: ClockConfig,
    /// Host loop options
    pub host: HostConfig,
}

/// Physical strip layout
#[derive(Debug, Deserialize, Serialize)]
pub struct LayoutConfig {
    /// Addressable LEDs (ICs) per stroke
    pub leds_per_segment: usize,
    /// Leading color-source LEDs; the addressing always reserves 3
    pub control_regions: usize,
    /// Strokes on the display; the renderer always drives 28
    pub total_segments: usize,
}

/// Temperature/humidity sensor options
#[derive(Debug, Deserialize, Serialize)]
pub struct SensorConfig {
    /// Minimum time between physical reads in milliseconds
    pub read_delay_ms: u64,
    /// Temperature reported by the simulated sensor (°C)
    pub simulated_temperature: i32,
    /// Humidity reported by the simulated sensor (%)
    pub simulated_humidity: i32,
}

/// Time zone handling
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ClockConfig {
    /// Fixed offset from UTC in minutes; system local time when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}

/// Host loop options
#[derive(Debug, Deserialize, Serialize)]
pub struct HostConfig {
    /// Time between update passes in milliseconds
    pub tick_interval_ms: u64,
    /// JSON document holding the display settings section
    pub settings_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            layout: LayoutConfig {
                leds_per_segment: DEFAULT_LEDS_PER_SEGMENT,
                control_regions: CONTROL_REGIONS,
                total_segments: TOTAL_SEGMENTS,
            },
            sensor: SensorConfig {
                read_delay_ms: DEFAULT_READ_DELAY_MS,
                simulated_temperature: 21,
                simulated_humidity: 45,
            },
            clock: ClockConfig::default(),
            host: HostConfig {
                tick_interval_ms: 1000,
                settings_path: "nanoleaf-settings.json".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from nanoleaf-config.toml
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load() -> Self {
        Self::load_from_path(CONFIG_FILE)
    }

    /// Load configuration from specified path
    /// Falls back to default configuration if file doesn't exist or is invalid
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Self {
        let config = match fs::read_to_string(&path) {
            Ok(contents) => match toml::from_str::<Config>(&contents) {
                Ok(config) => {
                    info!(
                        "Loaded configuration: {} LED(s) per stroke",
                        config.layout.leds_per_segment
                    );
                    config
                }
                Err(e) => {
                    warn!("Invalid config file format: {}", e);
                    warn!("Using default configuration");
                    Self::default()
                }
            },
            Err(_) => {
                info!("No config file found, using default configuration");
                Self::default()
            }
        };
        config.normalized()
    }

    /// Save current configuration to nanoleaf-config.toml
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.save_to_path(CONFIG_FILE)
    }

    /// Save current configuration to the specified path
    pub fn save_to_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(&path, contents)?;
        info!("Configuration saved to {}", path.as_ref().display());
        Ok(())
    }

    /// Pixels the strip needs: control LEDs plus every stroke.
    pub fn pixel_count(&self) -> usize {
        self.layout.control_regions + self.layout.total_segments * self.layout.leds_per_segment
    }

    /// Pin the fixed parts of the layout and reject a zero-LED stroke.
    fn normalized(mut self) -> Self {
        if self.layout.control_regions != CONTROL_REGIONS
            || self.layout.total_segments != TOTAL_SEGMENTS
        {
            warn!(
                "Layout must be {} control regions and {} strokes, overriding",
                CONTROL_REGIONS, TOTAL_SEGMENTS
            );
            self.layout.control_regions = CONTROL_REGIONS;
            self.layout.total_segments = TOTAL_SEGMENTS;
        }
        if self.layout.leds_per_segment == 0 {
            warn!("leds_per_segment = 0, using {}", DEFAULT_LEDS_PER_SEGMENT);
            self.layout.leds_per_segment = DEFAULT_LEDS_PER_SEGMENT;
        }
        self
    }
}
