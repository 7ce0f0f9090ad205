use std::str::FromStr;

use crate::mode::{Mode, OptionId};
use crate::schedule::{Frequency, DEFAULT_INTERVAL_MS};

pub const DEFAULT_BLOCK_COUNT: u32 = 1;
pub const MAX_BLOCK_COUNT: u32 = 100;

/// String keys of the session-scoped store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SessionKey {
    ProcessingMode,
    SelectedOption,
    BlockCount,
    AutoRefresh,
    RefreshInterval,
    ScheduleFrequency,
}

impl SessionKey {
    pub const ALL: [SessionKey; 6] = [
        SessionKey::ProcessingMode,
        SessionKey::SelectedOption,
        SessionKey::BlockCount,
        SessionKey::AutoRefresh,
        SessionKey::RefreshInterval,
        SessionKey::ScheduleFrequency,
    ];

    /// Removed on "change mode". Block count and cadence survive the reset.
    pub const MODE_RESET: [SessionKey; 3] = [
        SessionKey::ProcessingMode,
        SessionKey::SelectedOption,
        SessionKey::AutoRefresh,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionKey::ProcessingMode => "processingMode",
            SessionKey::SelectedOption => "selectedOption",
            SessionKey::BlockCount => "blockCount",
            SessionKey::AutoRefresh => "autoRefresh",
            SessionKey::RefreshInterval => "refreshInterval",
            SessionKey::ScheduleFrequency => "scheduleFrequency",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        SessionKey::ALL.into_iter().find(|key| key.as_str() == raw)
    }
}

/// One persisted value, written as soon as the corresponding setting changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEntry {
    ProcessingMode(Mode),
    SelectedOption(OptionId),
    BlockCount(u32),
    AutoRefresh(bool),
    RefreshInterval(u64),
    ScheduleFrequency(Frequency),
}

impl SessionEntry {
    pub fn key(&self) -> SessionKey {
        match self {
            SessionEntry::ProcessingMode(_) => SessionKey::ProcessingMode,
            SessionEntry::SelectedOption(_) => SessionKey::SelectedOption,
            SessionEntry::BlockCount(_) => SessionKey::BlockCount,
            SessionEntry::AutoRefresh(_) => SessionKey::AutoRefresh,
            SessionEntry::RefreshInterval(_) => SessionKey::RefreshInterval,
            SessionEntry::ScheduleFrequency(_) => SessionKey::ScheduleFrequency,
        }
    }

    pub fn encode(&self) -> String {
        match self {
            SessionEntry::ProcessingMode(mode) => mode.as_str().to_string(),
            SessionEntry::SelectedOption(id) => id.to_string(),
            SessionEntry::BlockCount(count) => count.to_string(),
            SessionEntry::AutoRefresh(enabled) => enabled.to_string(),
            SessionEntry::RefreshInterval(ms) => ms.to_string(),
            SessionEntry::ScheduleFrequency(frequency) => frequency.label().to_string(),
        }
    }
}

/// Partial session state read at startup. Absent or unreadable values stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mode: Option<Mode>,
    pub selected_option: Option<OptionId>,
    pub block_count: Option<u32>,
    pub auto_refresh: Option<bool>,
    pub refresh_interval_ms: Option<u64>,
    pub frequency: Option<Frequency>,
}

impl SessionSnapshot {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut snapshot = Self::default();
        for (key, value) in pairs {
            let Some(key) = SessionKey::parse(key) else {
                continue;
            };
            match key {
                SessionKey::ProcessingMode => snapshot.mode = Mode::from_str(value).ok(),
                SessionKey::SelectedOption => snapshot.selected_option = value.trim().parse().ok(),
                SessionKey::BlockCount => snapshot.block_count = value.trim().parse().ok(),
                SessionKey::AutoRefresh => snapshot.auto_refresh = Some(value.trim() == "true"),
                SessionKey::RefreshInterval => {
                    snapshot.refresh_interval_ms = value.trim().parse().ok()
                }
                SessionKey::ScheduleFrequency => snapshot.frequency = value.parse().ok(),
            }
        }
        snapshot
    }

    pub fn block_count_or_default(&self) -> u32 {
        self.block_count
            .map(clamp_block_count)
            .unwrap_or(DEFAULT_BLOCK_COUNT)
    }

    pub fn auto_refresh_or_default(&self) -> bool {
        self.auto_refresh.unwrap_or(false)
    }

    pub fn refresh_interval_or_default(&self) -> u64 {
        self.refresh_interval_ms
            .filter(|ms| *ms > 0)
            .unwrap_or(DEFAULT_INTERVAL_MS)
    }

    pub fn frequency_or_default(&self) -> Frequency {
        self.frequency.unwrap_or_default()
    }
}

pub fn clamp_block_count(count: u32) -> u32 {
    count.clamp(DEFAULT_BLOCK_COUNT, MAX_BLOCK_COUNT)
}
