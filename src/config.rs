// Thu Oct 15 2026 - Alex

use crate::emulator::EmulatorId;
use crate::memory::MemoryError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Upper bound for `connect_delay_ticks`; ten seconds at the default rate.
pub const MAX_CONNECT_DELAY_TICKS: u32 = 100;
/// Upper bound for `reconnect_ticks`; a little over sixteen minutes at the default rate.
pub const MAX_RECONNECT_TICKS: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub emulator_order: Vec<EmulatorId>,
    pub poll_rate_hz: u32,
    /// Ticks between a connect request and the blocking probe, so the UI can show "connecting".
    pub connect_delay_ticks: u32,
    /// Idle ticks between failed connect attempts while tracking.
    pub reconnect_ticks: u32,
    pub log_level: String,
    pub use_color: bool,
    pub only_changes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            emulator_order: EmulatorId::CONNECT_ORDER.to_vec(),
            poll_rate_hz: 10,
            connect_delay_ticks: 1,
            reconnect_ticks: 20,
            log_level: "info".to_string(),
            use_color: true,
            only_changes: true,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, MemoryError> {
        let text = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&text)
            .map_err(|e| MemoryError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate().map_err(MemoryError::Config)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, MemoryError> {
        serde_json::to_string_pretty(self).map_err(|e| MemoryError::Config(e.to_string()))
    }

    pub fn with_emulator_order(mut self, order: Vec<EmulatorId>) -> Self {
        self.emulator_order = order;
        self
    }

    pub fn with_only(self, emulator: EmulatorId) -> Self {
        self.with_emulator_order(vec![emulator])
    }

    pub fn with_poll_rate(mut self, hz: u32) -> Self {
        self.poll_rate_hz = hz;
        self
    }

    pub fn with_log_level(mut self, level: &str) -> Self {
        self.log_level = level.to_string();
        self
    }

    pub fn with_color(mut self, use_color: bool) -> Self {
        self.use_color = use_color;
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(1000 / self.poll_rate_hz.max(1) as u64)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.emulator_order.is_empty() {
            return Err("emulator_order must name at least one emulator".to_string());
        }
        if self.poll_rate_hz == 0 || self.poll_rate_hz > 1000 {
            return Err("poll_rate_hz must be between 1 and 1000".to_string());
        }
        if self.connect_delay_ticks > MAX_CONNECT_DELAY_TICKS {
            return Err(format!("connect_delay_ticks must be at most {}", MAX_CONNECT_DELAY_TICKS));
        }
        if self.reconnect_ticks > MAX_RECONNECT_TICKS {
            return Err(format!("reconnect_ticks must be at most {}", MAX_RECONNECT_TICKS));
        }
        Ok(())
    }
}
