//! Chainwatch core: pure refresh-controller state machine and its building blocks.
mod dedupe;
mod effect;
mod error;
mod health;
mod job;
mod mode;
mod msg;
mod record;
mod schedule;
mod session;
mod state;
mod update;
mod view_model;

pub use dedupe::{merge, ResultCollection};
pub use effect::Effect;
pub use error::{Advisory, JobError};
pub use health::{HealthCondition, HealthStatus};
pub use job::{Job, JobId, JobRequest, JobState, MAX_WAIT, POLL_INTERVAL};
pub use mode::{Mode, OptionId, ProcessingOption, UnknownMode};
pub use msg::Msg;
pub use record::{Batch, Record, FALLBACK_KEY_FIELD, PRIMARY_KEY_FIELD};
pub use schedule::{
    desired_arming, Arming, Frequency, ScheduleConfig, UnknownFrequency, DEFAULT_INTERVAL_MS,
    REALTIME_INTERVAL_MS,
};
pub use session::{
    clamp_block_count, SessionEntry, SessionKey, SessionSnapshot, DEFAULT_BLOCK_COUNT,
    MAX_BLOCK_COUNT,
};
pub use state::AppState;
pub use update::update;
pub use view_model::{AppViewModel, RecordRowView};
