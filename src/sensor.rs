//! # Temperature / Humidity Source
//!
//! The physical sensor (a DHT11 on the stock build) is slow and must not be
//! polled faster than about once every ten seconds. [`ThrottledSensor`] puts
//! a monotonic-clock gate in front of any [`SensorDriver`]: while the gate is
//! closed the last reading is served from cache and the driver is not
//! touched.
//!
//! Readings are not validated. A misbehaving driver shows up as odd digits
//! on the display rather than as an error.

use crate::split_pair;
use log::debug;

/// Default minimum spacing between physical reads.
pub const DEFAULT_READ_DELAY_MS: u64 = 10_000;

/// One temperature/humidity sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Reading {
    /// Degrees Celsius
    pub temperature: i32,
    /// Relative humidity in percent
    pub humidity: i32,
}

impl Reading {
    /// Display digits: temperature magnitude then humidity, each clamped to 0..=99.
    ///
    /// # Example
    /// ```
    /// use nanoleaf_display::sensor::Reading;
    ///
    /// let r = Reading { temperature: -3, humidity: 45 };
    /// assert_eq!(r.digits(), [0, 3, 4, 5]);
    /// ```
    pub fn digits(&self) -> [u8; 4] {
        let clamp = |v: i32| v.unsigned_abs().min(99) as u8;
        let [t1, t2] = split_pair(clamp(self.temperature));
        let [h1, h2] = split_pair(clamp(self.humidity));
        [t1, t2, h1, h2]
    }
}

/// A physical temperature/humidity sensor.
pub trait SensorDriver {
    /// Take one reading from the hardware.
    fn read(&mut self) -> Reading;
}

/// Rate-limited, caching front for a [`SensorDriver`].
#[derive(Debug)]
pub struct ThrottledSensor<S> {
    driver: S,
    delay_ms: u64,
    last_read_ms: Option<u64>,
    cached: Reading,
}

impl<S: SensorDriver> ThrottledSensor<S> {
    pub fn new(driver: S, delay_ms: u64) -> Self {
        Self {
            driver,
            delay_ms,
            last_read_ms: None,
            cached: Reading::default(),
        }
    }

    /// Read the hardware regardless of the gate and restart the gate at `now_ms`.
    pub fn read_now(&mut self, now_ms: u64) -> Reading {
        self.cached = self.driver.read();
        self.last_read_ms = Some(now_ms);
        debug!(
            "Sensor read at {} ms: {} C, {} %",
            now_ms, self.cached.temperature, self.cached.humidity
        );
        self.cached
    }

    /// Read the hardware only if more than the delay passed since the last
    /// physical read, otherwise return the cached reading.
    pub fn read(&mut self, now_ms: u64) -> Reading {
        let open = match self.last_read_ms {
            None => true,
            Some(last) => now_ms.saturating_sub(last) > self.delay_ms,
        };
        if open {
            self.read_now(now_ms)
        } else {
            self.cached
        }
    }

    /// Last reading served, without touching the gate.
    pub fn cached(&self) -> Reading {
        self.cached
    }

    pub fn delay_ms(&self) -> u64 {
        self.delay_ms
    }

    pub fn driver(&self) -> &S {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut S {
        &mut self.driver
    }
}

/// Stand-in sensor returning fixed values, for running without hardware.
#[derive(Clone, Debug, Default)]
pub struct SimulatedSensor {
    pub reading: Reading,
    reads: usize,
}

impl SimulatedSensor {
    pub fn new(temperature: i32, humidity: i32) -> Self {
        Self {
            reading: Reading {
                temperature,
                humidity,
            },
            reads: 0,
        }
    }

    /// Physical reads performed so far.
    pub fn reads(&self) -> usize {
        self.reads
    }
}

impl SensorDriver for SimulatedSensor {
    fn read(&mut self) -> Reading {
        self.reads += 1;
        self.reading
    }
}
