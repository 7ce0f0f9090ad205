use std::sync::Once;

use chainwatch_core::{
    update, Advisory, AppState, Effect, Frequency, HealthCondition, HealthStatus, Mode, Msg,
    ProcessingOption, SessionEntry, SessionKey, SessionSnapshot,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Map};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chainwatch_logging::initialize_for_tests);
}

fn option(id: u32, name: &str) -> ProcessingOption {
    ProcessingOption {
        id,
        name: name.to_string(),
        description: String::new(),
        processing_stage: None,
        storage_type: None,
        extra: Map::new(),
    }
}

fn health(backend_reachable: bool, model_enabled: bool, model_loaded: bool) -> HealthStatus {
    HealthStatus {
        backend_reachable,
        model_enabled,
        model_loaded,
    }
}

#[test]
fn startup_without_session_uses_defaults() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::Started(SessionSnapshot::default()));
    let view = state.view();

    assert_eq!(effects, vec![Effect::CheckHealth, Effect::LoadStats]);
    assert_eq!(view.mode, None);
    assert_eq!(view.block_count, 1);
    assert!(!view.auto_refresh);
    assert_eq!(view.refresh_interval_ms, 300_000);
    assert_eq!(view.frequency, Frequency::FiveMinutes);
}

#[test]
fn startup_restores_session_and_reloads_options() {
    init_logging();
    let snapshot = SessionSnapshot {
        mode: Some(Mode::Scheduled),
        selected_option: Some(2),
        block_count: Some(12),
        auto_refresh: Some(true),
        refresh_interval_ms: Some(600_000),
        frequency: Some(Frequency::TenMinutes),
    };

    let (state, effects) = update(AppState::new(), Msg::Started(snapshot));
    let view = state.view();

    assert_eq!(
        effects,
        vec![
            Effect::CheckHealth,
            Effect::LoadStats,
            Effect::LoadOptions {
                mode: Mode::Scheduled
            },
        ]
    );
    assert_eq!(view.selected_option, Some(2));
    assert_eq!(view.block_count, 12);
    assert!(view.auto_refresh);
    assert_eq!(view.refresh_interval_ms, 600_000);
    // Nothing fetched yet, so the timer stays idle.
    assert!(!view.refresh_armed);
}

#[test]
fn settings_changes_are_persisted_immediately() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ModeSelected(Mode::Scheduled));
    assert_eq!(
        effects,
        vec![
            Effect::Persist(SessionEntry::ProcessingMode(Mode::Scheduled)),
            Effect::LoadOptions {
                mode: Mode::Scheduled
            },
        ]
    );

    let (state, effects) = update(state, Msg::BlockCountChanged(250));
    assert_eq!(effects, vec![Effect::Persist(SessionEntry::BlockCount(100))]);

    let (state, _) = update(state, Msg::OptionSelected(1));
    let (_, effects) = update(state, Msg::FrequencySelected(Frequency::ThirtyMinutes));
    assert_eq!(
        effects,
        vec![
            Effect::Persist(SessionEntry::ScheduleFrequency(Frequency::ThirtyMinutes)),
            Effect::Persist(SessionEntry::RefreshInterval(1_800_000)),
        ]
    );
}

#[test]
fn back_to_mode_forgets_only_mode_selection_and_auto_refresh() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModeSelected(Mode::Scheduled));
    let (state, _) = update(state, Msg::OptionSelected(1));
    let (state, _) = update(state, Msg::BlockCountChanged(9));

    let (state, effects) = update(state, Msg::BackToModeClicked);
    assert_eq!(
        effects,
        vec![Effect::ForgetSession(vec![
            SessionKey::ProcessingMode,
            SessionKey::SelectedOption,
            SessionKey::AutoRefresh,
        ])]
    );
    let view = state.view();
    assert_eq!(view.mode, None);
    assert_eq!(view.selected_option, None);
    assert_eq!(view.block_count, 9);
    assert!(view.options.is_empty());
}

#[test]
fn empty_option_list_is_reported() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModeSelected(Mode::Realtime));
    let (state, _) = update(
        state,
        Msg::OptionsLoaded {
            mode: Mode::Realtime,
            result: Ok(Vec::new()),
        },
    );
    assert_eq!(
        state.advisory(),
        Some(&Advisory::OptionsUnavailable {
            mode: Mode::Realtime
        })
    );

    let (state, _) = update(
        state,
        Msg::OptionsLoaded {
            mode: Mode::Realtime,
            result: Ok(vec![option(1, "Stream")]),
        },
    );
    assert_eq!(state.advisory(), None);
    assert_eq!(state.view().options.len(), 1);
}

#[test]
fn options_for_a_previous_mode_are_ignored() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModeSelected(Mode::Realtime));
    let (state, _) = update(
        state,
        Msg::OptionsLoaded {
            mode: Mode::Scheduled,
            result: Ok(vec![option(1, "Batch")]),
        },
    );
    assert!(state.view().options.is_empty());
}

#[test]
fn unreachable_backend_wins_over_model_flags() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::HealthChecked(health(false, true, true)));
    assert_eq!(state.advisory(), Some(&Advisory::BackendUnreachable));
    assert_eq!(state.view().health, Some(HealthCondition::BackendUnreachable));
}

#[test]
fn recovered_health_clears_only_health_advisories() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::HealthChecked(health(true, true, false)));
    assert_eq!(state.advisory(), Some(&Advisory::ModelNotReady));

    let (state, _) = update(state, Msg::HealthChecked(health(true, true, true)));
    assert_eq!(state.advisory(), None);

    let (state, _) = update(state, Msg::FetchClicked);
    let (state, _) = update(state, Msg::HealthChecked(health(true, false, false)));
    assert!(matches!(state.advisory(), Some(Advisory::Job(_))));
}

#[test]
fn ticks_are_skipped_while_backend_is_unreachable() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModeSelected(Mode::Realtime));
    let (state, _) = update(state, Msg::OptionSelected(1));
    let (state, effects) = update(state, Msg::FetchClicked);
    let epoch = match effects.as_slice() {
        [Effect::SubmitJob { epoch, .. }] => *epoch,
        other => panic!("unexpected effects: {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::FetchFinished {
            epoch,
            result: Ok(chainwatch_core::Batch::new(vec![chainwatch_core::Record::new(
                json!({ "tx_hash": "0x1" }),
            )])),
        },
    );
    let (state, _) = update(state, Msg::HealthChecked(health(false, false, false)));

    let msg = Msg::RefreshTick {
        generation: state.arm_generation(),
    };
    let (state, effects) = update(state, msg);
    assert!(effects.is_empty());

    // Manual fetches still go out.
    let (_, effects) = update(state, Msg::FetchClicked);
    assert!(matches!(effects.as_slice(), [Effect::SubmitJob { .. }]));
}

#[test]
fn failed_model_toggle_reverts_optimistic_state() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::ModelToggleRequested(false));
    assert_eq!(effects, vec![Effect::ToggleModel { enabled: false }]);
    assert!(!state.view().model_enabled);

    let (state, effects) = update(
        state,
        Msg::ModelToggleFinished {
            enabled: false,
            result: Err("model service busy".to_string()),
        },
    );
    assert!(effects.is_empty());
    assert!(state.view().model_enabled);
    assert_eq!(
        state.advisory(),
        Some(&Advisory::ToggleFailed("model service busy".to_string()))
    );
}

#[test]
fn enabling_model_rechecks_health() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::ModelToggleRequested(true));
    let (_, effects) = update(
        state,
        Msg::ModelToggleFinished {
            enabled: true,
            result: Ok(()),
        },
    );
    assert_eq!(effects, vec![Effect::CheckHealth]);
}

#[test]
fn detail_failure_is_an_advisory() {
    init_logging();
    let (state, effects) = update(AppState::new(), Msg::DetailRequested("0xabc".into()));
    assert_eq!(
        effects,
        vec![Effect::LoadDetail {
            hash: "0xabc".into()
        }]
    );
    let (state, _) = update(state, Msg::DetailLoaded(Err("404".into())));
    assert_eq!(state.advisory(), Some(&Advisory::DetailUnavailable));

    let (state, _) = update(state, Msg::DetailLoaded(Ok(json!({ "tx_hash": "0xabc" }))));
    assert!(state.view().detail.is_some());
    let (state, _) = update(state, Msg::DetailClosed);
    assert_eq!(state.view().detail, None);
}

#[test]
fn tick_and_noop_leave_state_clean() {
    init_logging();
    let (mut state, effects) = update(AppState::new(), Msg::Tick);
    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    let (mut state, _) = update(state, Msg::NoOp);
    assert!(!state.consume_dirty());
}
