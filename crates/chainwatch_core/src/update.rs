use crate::{Advisory, AppState, Effect, Msg, SessionEntry, SessionKey};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let mut effects = match msg {
        Msg::Started(snapshot) => {
            state.restore(&snapshot);
            let mut effects = vec![Effect::CheckHealth, Effect::LoadStats];
            if let Some(mode) = state.mode() {
                effects.push(Effect::LoadOptions { mode });
            }
            effects
        }
        Msg::ModeSelected(mode) => {
            if state.mode() == Some(mode) {
                return (state, Vec::new());
            }
            let mut effects = Vec::new();
            // Switching modes goes through mode selection: nothing of the old mode survives.
            if state.mode().is_some() {
                state.reset_mode();
                effects.push(Effect::ForgetSession(SessionKey::MODE_RESET.to_vec()));
            }
            state.select_mode(mode);
            effects.push(Effect::Persist(SessionEntry::ProcessingMode(mode)));
            effects.push(Effect::LoadOptions { mode });
            effects
        }
        Msg::OptionsLoaded { mode, result } => {
            if !state.apply_options(mode, result) {
                return (state, Vec::new());
            }
            Vec::new()
        }
        Msg::OptionSelected(option) => {
            if state.mode().is_none() {
                return (state, Vec::new());
            }
            let mut effects = vec![Effect::Persist(SessionEntry::SelectedOption(option))];
            if state.select_option(option) {
                let schedule = state.schedule();
                effects.push(Effect::Persist(SessionEntry::AutoRefresh(schedule.enabled)));
                effects.push(Effect::Persist(SessionEntry::RefreshInterval(
                    schedule.interval_ms,
                )));
            }
            effects
        }
        Msg::BlockCountChanged(count) => {
            let count = state.set_block_count(count);
            vec![Effect::Persist(SessionEntry::BlockCount(count))]
        }
        Msg::AutoRefreshToggled(enabled) => {
            // Refresh settings are locked until an option is selected.
            if state.selected_option().is_none() {
                return (state, Vec::new());
            }
            state.set_auto_refresh(enabled);
            vec![Effect::Persist(SessionEntry::AutoRefresh(enabled))]
        }
        Msg::FrequencySelected(frequency) => {
            if state.selected_option().is_none() {
                return (state, Vec::new());
            }
            state.select_frequency(frequency);
            vec![
                Effect::Persist(SessionEntry::ScheduleFrequency(frequency)),
                Effect::Persist(SessionEntry::RefreshInterval(frequency.interval_ms())),
            ]
        }
        Msg::FetchClicked => submit(&mut state),
        Msg::RefreshTick { generation } => {
            // Late ticks from a disarmed or replaced timer and ticks against a dead backend are dropped.
            if state.armed().is_none()
                || generation != state.arm_generation()
                || state.backend_known_unreachable()
            {
                return (state, Vec::new());
            }
            submit(&mut state)
        }
        Msg::FetchFinished { epoch, result } => {
            state.finish_fetch(epoch, result);
            Vec::new()
        }
        Msg::HealthCheckDue => vec![Effect::CheckHealth],
        Msg::HealthChecked(status) => {
            state.apply_health(status);
            Vec::new()
        }
        Msg::ModelToggleRequested(enabled) => {
            state.set_model_enabled(enabled);
            vec![Effect::ToggleModel { enabled }]
        }
        Msg::ModelToggleFinished { enabled, result } => match result {
            Ok(()) if enabled => vec![Effect::CheckHealth],
            Ok(()) => Vec::new(),
            Err(message) => {
                state.set_model_enabled(!enabled);
                state.set_advisory(Some(Advisory::ToggleFailed(message)));
                Vec::new()
            }
        },
        Msg::StatsLoaded(stats) => {
            state.set_stats(stats);
            Vec::new()
        }
        Msg::DetailRequested(hash) => vec![Effect::LoadDetail { hash }],
        Msg::DetailLoaded(result) => {
            match result {
                Ok(detail) => state.set_detail(Some(detail)),
                Err(_) => state.set_advisory(Some(Advisory::DetailUnavailable)),
            }
            Vec::new()
        }
        Msg::DetailClosed => {
            state.set_detail(None);
            Vec::new()
        }
        Msg::AdvisoryDismissed => {
            state.set_advisory(None);
            Vec::new()
        }
        Msg::BackToModeClicked => {
            state.reset_mode();
            vec![Effect::ForgetSession(SessionKey::MODE_RESET.to_vec())]
        }
        Msg::Tick | Msg::NoOp => return (state, Vec::new()),
    };

    state.mark_dirty();
    reconcile_refresh(&mut state, &mut effects);
    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    match state.begin_fetch() {
        Ok((epoch, request)) => vec![Effect::SubmitJob { epoch, request }],
        Err(err) => {
            state.set_advisory(Some(err.into()));
            Vec::new()
        }
    }
}

/// Keeps the refresh timer in step with its preconditions. Any change of
/// cadence, selection, enabled flag or result emptiness re-arms from scratch.
fn reconcile_refresh(state: &mut AppState, effects: &mut Vec<Effect>) {
    let desired = state.desired_arming();
    if desired == state.armed() {
        return;
    }
    state.set_armed(desired);
    match desired {
        Some(arming) => effects.push(Effect::ArmRefresh {
            generation: state.arm_generation(),
            interval_ms: arming.interval_ms,
        }),
        None => effects.push(Effect::DisarmRefresh),
    }
}
