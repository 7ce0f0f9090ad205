use crate::{JobRequest, Mode, SessionEntry, SessionKey};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    CheckHealth,
    LoadStats,
    LoadOptions { mode: Mode },
    /// Submit and poll a job; the result comes back tagged with `epoch`.
    SubmitJob { epoch: u64, request: JobRequest },
    /// Start the refresh timer, replacing any timer already running. Its ticks
    /// carry `generation`; ticks of an older arming are ignored.
    ArmRefresh { generation: u64, interval_ms: u64 },
    DisarmRefresh,
    Persist(SessionEntry),
    ForgetSession(Vec<SessionKey>),
    ToggleModel { enabled: bool },
    LoadDetail { hash: String },
}
