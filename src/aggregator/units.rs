//! Tick, cycle and wall-time conversion.
//!
//! The profiling counters tick once every `cycles_per_tick` CPU cycles and
//! the soft CPU is assumed to run at `cpu_freq_hz`. Both values describe the
//! target board and are passed in rather than baked into the math.

use crate::utils::config::{DEFAULT_CPU_FREQ_HZ, DEFAULT_CYCLES_PER_TICK};
use crate::utils::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Hardware clock assumptions used for every conversion in one analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockModel {
    /// CPU cycles per profiling tick
    pub cycles_per_tick: u64,

    /// Assumed CPU frequency in Hz
    pub cpu_freq_hz: u64,
}

impl Default for ClockModel {
    fn default() -> Self {
        Self {
            cycles_per_tick: DEFAULT_CYCLES_PER_TICK,
            cpu_freq_hz: DEFAULT_CPU_FREQ_HZ,
        }
    }
}

impl ClockModel {
    /// Create a clock model, rejecting zero values
    pub fn new(cycles_per_tick: u64, cpu_freq_hz: u64) -> Result<Self, ConfigError> {
        if cycles_per_tick == 0 {
            return Err(ConfigError::Invalid(
                "cycles_per_tick must be greater than 0".to_string(),
            ));
        }
        if cpu_freq_hz == 0 {
            return Err(ConfigError::Invalid(
                "cpu_freq_hz must be greater than 0".to_string(),
            ));
        }
        Ok(Self {
            cycles_per_tick,
            cpu_freq_hz,
        })
    }

    pub fn ticks_to_cycles(&self, ticks: f64) -> f64 {
        ticks * self.cycles_per_tick as f64
    }

    pub fn cycles_to_ms(&self, cycles: f64) -> f64 {
        cycles / self.cpu_freq_hz as f64 * 1000.0
    }

    pub fn ticks_to_ms(&self, ticks: f64) -> f64 {
        self.cycles_to_ms(self.ticks_to_cycles(ticks))
    }

    /// Clock frequency in MHz, for display
    pub fn cpu_freq_mhz(&self) -> f64 {
        self.cpu_freq_hz as f64 / 1e6
    }
}
