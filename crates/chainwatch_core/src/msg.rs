use serde_json::Value;

use crate::{Batch, Frequency, HealthStatus, JobError, Mode, OptionId, ProcessingOption, SessionSnapshot};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// Session values loaded before anything else initializes.
    Started(SessionSnapshot),
    /// User picked a processing mode.
    ModeSelected(Mode),
    /// Option catalogue answer for a mode.
    OptionsLoaded {
        mode: Mode,
        result: Result<Vec<ProcessingOption>, String>,
    },
    /// User picked an option of the current mode.
    OptionSelected(OptionId),
    /// User edited the block count.
    BlockCountChanged(u32),
    /// User flipped the auto-refresh switch.
    AutoRefreshToggled(bool),
    /// User picked a refresh cadence.
    FrequencySelected(Frequency),
    /// User asked for a fetch now.
    FetchClicked,
    /// The refresh timer armed as `generation` fired.
    RefreshTick { generation: u64 },
    /// A submitted job reached a terminal state.
    FetchFinished {
        epoch: u64,
        result: Result<Batch, JobError>,
    },
    /// Time for a recurring health check.
    HealthCheckDue,
    /// Health check answer.
    HealthChecked(HealthStatus),
    /// User flipped the analysis model switch.
    ModelToggleRequested(bool),
    /// Backend answer to a model toggle.
    ModelToggleFinished {
        enabled: bool,
        result: Result<(), String>,
    },
    /// Summary statistics from the backend.
    StatsLoaded(Value),
    /// User asked for the detail of one record.
    DetailRequested(String),
    DetailLoaded(Result<Value, String>),
    DetailClosed,
    AdvisoryDismissed,
    /// User went back to mode selection.
    BackToModeClicked,
    /// Render tick to coalesce redraws.
    Tick,
    NoOp,
}
