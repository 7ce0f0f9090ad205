use serde_json::Value;

use crate::dedupe::{merge, ResultCollection};
use crate::schedule::{desired_arming, Arming};
use crate::session::{clamp_block_count, DEFAULT_BLOCK_COUNT};
use crate::view_model::{AppViewModel, RecordRowView};
use crate::{
    Advisory, Batch, Frequency, HealthCondition, HealthStatus, JobError, JobRequest, Mode, OptionId,
    ProcessingOption, ScheduleConfig, SessionSnapshot,
};

/// Everything the controller knows. Only `update` mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    mode: Option<Mode>,
    options: Vec<ProcessingOption>,
    selected_option: Option<OptionId>,
    block_count: u32,
    schedule: ScheduleConfig,
    armed: Option<Arming>,
    arm_generation: u64,
    results: ResultCollection,
    stats: Option<Value>,
    health: Option<HealthStatus>,
    model_enabled: bool,
    advisory: Option<Advisory>,
    in_flight: usize,
    epoch: u64,
    detail: Option<Value>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            mode: None,
            options: Vec::new(),
            selected_option: None,
            block_count: DEFAULT_BLOCK_COUNT,
            schedule: ScheduleConfig::default(),
            armed: None,
            arm_generation: 0,
            results: ResultCollection::new(),
            stats: None,
            health: None,
            model_enabled: true,
            advisory: None,
            in_flight: 0,
            epoch: 0,
            detail: None,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            mode: self.mode,
            options: self.options.clone(),
            selected_option: self.selected_option,
            block_count: self.block_count,
            auto_refresh: self.schedule.enabled,
            frequency: self.schedule.frequency,
            refresh_interval_ms: self.schedule.interval_ms,
            refresh_armed: self.armed.is_some(),
            records: self
                .results
                .records()
                .iter()
                .map(|record| RecordRowView {
                    key: record.key().map(ToOwned::to_owned),
                    payload: record.payload().clone(),
                })
                .collect(),
            stats: self.stats.clone(),
            health: self.health_condition(),
            model_enabled: self.model_enabled,
            advisory: self.advisory.as_ref().map(ToString::to_string),
            loading: self.in_flight > 0,
            detail: self.detail.clone(),
            dirty: self.dirty,
        }
    }

    pub fn mode(&self) -> Option<Mode> {
        self.mode
    }

    pub fn selected_option(&self) -> Option<OptionId> {
        self.selected_option
    }

    pub fn schedule(&self) -> &ScheduleConfig {
        &self.schedule
    }

    pub fn results(&self) -> &ResultCollection {
        &self.results
    }

    pub fn advisory(&self) -> Option<&Advisory> {
        self.advisory.as_ref()
    }

    /// Selection epoch; results submitted under an older epoch are discarded.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn armed(&self) -> Option<Arming> {
        self.armed
    }

    /// Bumped every time the refresh timer is armed.
    pub fn arm_generation(&self) -> u64 {
        self.arm_generation
    }

    pub fn desired_arming(&self) -> Option<Arming> {
        desired_arming(
            &self.schedule,
            self.selected_option,
            !self.results.is_empty(),
        )
    }

    pub fn health_condition(&self) -> Option<HealthCondition> {
        self.health.and_then(|health| health.condition())
    }

    pub fn backend_known_unreachable(&self) -> bool {
        self.health.is_some_and(|health| !health.backend_reachable)
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_armed(&mut self, arming: Option<Arming>) {
        if arming.is_some() {
            self.arm_generation += 1;
        }
        self.armed = arming;
    }

    pub(crate) fn restore(&mut self, snapshot: &SessionSnapshot) {
        self.mode = snapshot.mode;
        self.selected_option = snapshot.selected_option;
        self.block_count = snapshot.block_count_or_default();
        self.schedule = ScheduleConfig {
            frequency: snapshot.frequency_or_default(),
            interval_ms: snapshot.refresh_interval_or_default(),
            enabled: snapshot.auto_refresh_or_default(),
        };
    }

    pub(crate) fn select_mode(&mut self, mode: Mode) {
        self.mode = Some(mode);
        self.epoch += 1;
    }

    /// Returns false when the answer belongs to a mode that is no longer current.
    pub(crate) fn apply_options(
        &mut self,
        mode: Mode,
        result: Result<Vec<ProcessingOption>, String>,
    ) -> bool {
        if self.mode != Some(mode) {
            return false;
        }
        match result {
            Ok(options) if options.is_empty() => {
                self.options.clear();
                self.advisory = Some(Advisory::OptionsUnavailable { mode });
            }
            Ok(options) => {
                self.options = options;
                self.advisory = None;
            }
            Err(message) => {
                self.options.clear();
                self.advisory = Some(Advisory::OptionsLoadFailed { mode, message });
            }
        }
        true
    }

    /// Returns true when the selection forced the real-time cadence.
    pub(crate) fn select_option(&mut self, option: OptionId) -> bool {
        self.selected_option = Some(option);
        self.epoch += 1;
        if self.mode == Some(Mode::Realtime) {
            self.schedule.force_realtime();
            return true;
        }
        false
    }

    pub(crate) fn set_block_count(&mut self, count: u32) -> u32 {
        self.block_count = clamp_block_count(count);
        self.block_count
    }

    pub(crate) fn set_auto_refresh(&mut self, enabled: bool) {
        self.schedule.enabled = enabled;
    }

    pub(crate) fn select_frequency(&mut self, frequency: Frequency) {
        self.schedule.select_frequency(frequency);
    }

    /// Builds the request for a fetch and counts it as in flight.
    pub(crate) fn begin_fetch(&mut self) -> Result<(u64, JobRequest), JobError> {
        let (Some(mode), Some(option)) = (self.mode, self.selected_option) else {
            return Err(JobError::MissingSelection);
        };
        self.in_flight += 1;
        self.advisory = None;
        Ok((
            self.epoch,
            JobRequest {
                mode,
                option: Some(option),
                block_count: self.block_count,
            },
        ))
    }

    /// Applies a finished job. Returns the number of inserted records, or
    /// `None` when the result was stale or a failure.
    pub(crate) fn finish_fetch(
        &mut self,
        epoch: u64,
        result: Result<Batch, JobError>,
    ) -> Option<usize> {
        self.in_flight = self.in_flight.saturating_sub(1);
        if epoch != self.epoch {
            return None;
        }
        match result {
            Ok(batch) => {
                let (merged, inserted) = merge(std::mem::take(&mut self.results), batch.records);
                self.results = merged;
                if batch.stats.is_some() {
                    self.stats = batch.stats;
                }
                Some(inserted)
            }
            Err(err) => {
                self.advisory = Some(err.into());
                None
            }
        }
    }

    pub(crate) fn apply_health(&mut self, status: HealthStatus) {
        self.health = Some(status);
        self.model_enabled = status.model_enabled;
        match status.condition() {
            Some(condition) => self.advisory = Some(condition.into()),
            None => {
                if self.advisory.as_ref().is_some_and(Advisory::is_health) {
                    self.advisory = None;
                }
            }
        }
    }

    pub(crate) fn set_model_enabled(&mut self, enabled: bool) {
        self.model_enabled = enabled;
    }

    pub(crate) fn set_stats(&mut self, stats: Value) {
        self.stats = Some(stats);
    }

    pub(crate) fn set_detail(&mut self, detail: Option<Value>) {
        self.detail = detail;
    }

    pub(crate) fn set_advisory(&mut self, advisory: Option<Advisory>) {
        self.advisory = advisory;
    }

    /// Back to mode selection. The auto-refresh flag, cadence and block count stay.
    pub(crate) fn reset_mode(&mut self) {
        self.mode = None;
        self.selected_option = None;
        self.options.clear();
        self.results = ResultCollection::new();
        self.stats = None;
        self.advisory = None;
        self.detail = None;
        self.epoch += 1;
    }
}
