//! # Display Settings
//!
//! The user-facing options live in one flat section of the host's JSON
//! settings document:
//!
//! ```json
//! {
//!   "NanoLeafDisplay": {
//!     "TwoTone": true,  "InSeries": false, "SecsMins": false,
//!     "Manual": false,  "Digit0": 0, "Digit1": 0, "Digit2": 0, "Digit3": 0,
//!     "TempHumid": false
//!   }
//! }
//! ```
//!
//! Reading is forgiving: a missing section or key keeps the previous value
//! and only flips the returned "complete" flag to false.

use crate::{Mode, NUM_DIGITS};
use log::warn;
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Name of the settings section in the host document.
pub const SECTION: &str = "NanoLeafDisplay";

const KEY_TWO_TONE: &str = "TwoTone";
const KEY_IN_SERIES: &str = "InSeries";
const KEY_SECS_MINS: &str = "SecsMins";
const KEY_MANUAL: &str = "Manual";
const KEY_TEMP_HUMID: &str = "TempHumid";
const KEY_DIGITS: [&str; NUM_DIGITS] = ["Digit0", "Digit1", "Digit2", "Digit3"];

/// Errors reading or writing a settings document on disk.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// File could not be read or written
    #[error("settings IO: {0}")]
    Io(#[from] std::io::Error),

    /// File is not valid JSON
    #[error("settings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// User options of the display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub two_tone: bool,
    pub in_series: bool,
    /// Show minutes and seconds instead of hours and minutes
    pub secs_mins: bool,
    /// Show `digits` instead of time or sensor values
    pub manual: bool,
    /// Manual digit values, leftmost first
    pub digits: [u8; NUM_DIGITS],
    pub temp_humid: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            two_tone: true,
            in_series: false,
            secs_mins: false,
            manual: false,
            digits: [0; NUM_DIGITS],
            temp_humid: false,
        }
    }
}

impl Settings {
    /// The authoritative mode.
    ///
    /// When several mode flags are set, TwoTone wins over TempHumid, which
    /// wins over InSeries. `None` when no mode flag is set. The controller
    /// rebuilds the addressing whenever this changes.
    pub fn mode(&self) -> Option<Mode> {
        if self.two_tone {
            Some(Mode::TwoTone)
        } else if self.temp_humid {
            Some(Mode::TempHumid)
        } else if self.in_series {
            Some(Mode::InSeries)
        } else {
            None
        }
    }

    /// Update from the host document `root`.
    ///
    /// Returns true only if the section and every key were present and
    /// valid. Fields whose key is missing or invalid keep their value.
    ///
    /// # Example
    /// ```
    /// use nanoleaf_display::settings::Settings;
    /// use serde_json::json;
    ///
    /// let mut settings = Settings::default();
    /// let complete = settings.read_from_config(&json!({
    ///     "NanoLeafDisplay": { "Manual": true }
    /// }));
    /// assert!(!complete);
    /// assert!(settings.manual);
    /// assert!(settings.two_tone);
    /// ```
    pub fn read_from_config(&mut self, root: &Value) -> bool {
        let Some(top) = root.get(SECTION).and_then(Value::as_object) else {
            warn!("Settings section {} missing, keeping current values", SECTION);
            return false;
        };

        let mut complete = true;
        complete &= read_bool(top, KEY_TWO_TONE, &mut self.two_tone);
        complete &= read_bool(top, KEY_IN_SERIES, &mut self.in_series);
        complete &= read_bool(top, KEY_SECS_MINS, &mut self.secs_mins);
        complete &= read_bool(top, KEY_MANUAL, &mut self.manual);
        for (key, slot) in KEY_DIGITS.iter().zip(self.digits.iter_mut()) {
            complete &= read_digit(top, key, slot);
        }
        complete &= read_bool(top, KEY_TEMP_HUMID, &mut self.temp_humid);

        if !complete {
            warn!("Settings section {} incomplete, kept previous values", SECTION);
        }
        complete
    }

    /// Write every option into the section of `root`, replacing the section.
    ///
    /// A `root` that is not a JSON object is replaced by one.
    pub fn add_to_config(&self, root: &mut Value) {
        if !root.is_object() {
            *root = Value::Object(Map::new());
        }
        if let Some(obj) = root.as_object_mut() {
            obj.insert(SECTION.to_string(), self.to_section());
        }
    }

    fn to_section(&self) -> Value {
        let mut top = Map::new();
        top.insert(KEY_TWO_TONE.into(), self.two_tone.into());
        top.insert(KEY_IN_SERIES.into(), self.in_series.into());
        top.insert(KEY_SECS_MINS.into(), self.secs_mins.into());
        top.insert(KEY_MANUAL.into(), self.manual.into());
        for (key, value) in KEY_DIGITS.iter().zip(self.digits) {
            top.insert((*key).into(), value.into());
        }
        top.insert(KEY_TEMP_HUMID.into(), self.temp_humid.into());
        Value::Object(top)
    }
}

fn read_bool(top: &Map<String, Value>, key: &str, field: &mut bool) -> bool {
    match top.get(key).and_then(Value::as_bool) {
        Some(v) => {
            *field = v;
            true
        }
        None => false,
    }
}

fn read_digit(top: &Map<String, Value>, key: &str, field: &mut u8) -> bool {
    match top.get(key).and_then(Value::as_u64) {
        Some(v) if v <= 9 => {
            *field = v as u8;
            true
        }
        Some(v) => {
            warn!("{} = {} is not a digit, ignored", key, v);
            false
        }
        None => false,
    }
}

/// Load a host settings document. A missing file yields an empty object.
pub fn load_document<P: AsRef<Path>>(path: P) -> Result<Value, SettingsError> {
    match fs::read_to_string(&path) {
        Ok(contents) => Ok(serde_json::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Value::Object(Map::new())),
        Err(e) => Err(e.into()),
    }
}

/// Write a host settings document as pretty JSON.
pub fn save_document<P: AsRef<Path>>(path: P, document: &Value) -> Result<(), SettingsError> {
    let contents = serde_json::to_string_pretty(document)?;
    fs::write(path, contents)?;
    Ok(())
}
