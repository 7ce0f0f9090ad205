use std::fmt;
use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::mode::OptionId;

pub const DEFAULT_INTERVAL_MS: u64 = 300_000;
/// Cadence forced when an option is picked in real-time mode.
pub const REALTIME_INTERVAL_MS: u64 = 10_000;

/// Labelled refresh cadences offered in scheduled mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Frequency {
    #[default]
    FiveMinutes,
    TenMinutes,
    ThirtyMinutes,
    SixtyMinutes,
    OneHour,
}

impl Frequency {
    pub const ALL: [Frequency; 5] = [
        Frequency::FiveMinutes,
        Frequency::TenMinutes,
        Frequency::ThirtyMinutes,
        Frequency::SixtyMinutes,
        Frequency::OneHour,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Frequency::FiveMinutes => "5m",
            Frequency::TenMinutes => "10m",
            Frequency::ThirtyMinutes => "30m",
            Frequency::SixtyMinutes => "60m",
            Frequency::OneHour => "1h",
        }
    }

    pub fn interval_ms(self) -> u64 {
        match self {
            Frequency::FiveMinutes => 300_000,
            Frequency::TenMinutes => 600_000,
            Frequency::ThirtyMinutes => 1_800_000,
            Frequency::SixtyMinutes | Frequency::OneHour => 3_600_000,
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown refresh frequency: {0}")]
pub struct UnknownFrequency(pub String);

impl FromStr for Frequency {
    type Err = UnknownFrequency;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        Frequency::ALL
            .into_iter()
            .find(|frequency| frequency.label() == raw)
            .ok_or_else(|| UnknownFrequency(raw.to_string()))
    }
}

/// Active refresh cadence. `next_fire_at` is derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleConfig {
    pub frequency: Frequency,
    pub interval_ms: u64,
    pub enabled: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::default(),
            interval_ms: DEFAULT_INTERVAL_MS,
            enabled: false,
        }
    }
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn select_frequency(&mut self, frequency: Frequency) {
        self.frequency = frequency;
        self.interval_ms = frequency.interval_ms();
    }

    /// Real-time selection overrides whatever cadence was configured before.
    pub fn force_realtime(&mut self) {
        self.enabled = true;
        self.interval_ms = REALTIME_INTERVAL_MS;
    }

    pub fn next_fire_at(&self, now: Instant) -> Instant {
        now + self.interval()
    }
}

/// Parameters the refresh timer is armed with. Any difference between the
/// armed value and the desired one means cancel and re-arm from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arming {
    pub interval_ms: u64,
    pub frequency: Frequency,
    pub option: OptionId,
}

/// The timer runs only when enabled, with a selection, after a first successful fetch.
pub fn desired_arming(
    config: &ScheduleConfig,
    selection: Option<OptionId>,
    has_results: bool,
) -> Option<Arming> {
    let option = selection?;
    if !config.enabled || !has_results {
        return None;
    }
    Some(Arming {
        interval_ms: config.interval_ms,
        frequency: config.frequency,
        option,
    })
}
