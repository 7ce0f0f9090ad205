use serde_json::Value;

use crate::{Frequency, HealthCondition, Mode, OptionId, ProcessingOption};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub mode: Option<Mode>,
    pub options: Vec<ProcessingOption>,
    pub selected_option: Option<OptionId>,
    pub block_count: u32,
    pub auto_refresh: bool,
    pub frequency: Frequency,
    pub refresh_interval_ms: u64,
    pub refresh_armed: bool,
    pub records: Vec<RecordRowView>,
    pub stats: Option<Value>,
    pub health: Option<HealthCondition>,
    pub model_enabled: bool,
    pub advisory: Option<String>,
    pub loading: bool,
    pub detail: Option<Value>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordRowView {
    pub key: Option<String>,
    pub payload: Value,
}
