use std::time::Duration;

use chainwatch_core::{Effect, Msg};
use chainwatch_engine::{EngineCommand, EngineEvent, EngineHandle, RefreshScheduler, SessionStore};
use chainwatch_logging::{watch_debug, watch_info, watch_warn};
use tokio::sync::mpsc;

/// Carries out the effects `update` asks for.
pub struct EffectRunner {
    engine: EngineHandle,
    store: SessionStore,
    refresh: RefreshScheduler,
    msg_tx: mpsc::UnboundedSender<Msg>,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle, store: SessionStore, msg_tx: mpsc::UnboundedSender<Msg>) -> Self {
        Self {
            engine,
            store,
            refresh: RefreshScheduler::new("refresh"),
            msg_tx,
        }
    }

    pub fn run(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CheckHealth => self.engine.enqueue(EngineCommand::CheckHealth),
                Effect::LoadStats => self.engine.enqueue(EngineCommand::LoadStats),
                Effect::LoadOptions { mode } => {
                    self.engine.enqueue(EngineCommand::LoadOptions { mode })
                }
                Effect::SubmitJob { epoch, request } => {
                    watch_info!(
                        "Fetch epoch={} mode={} option={:?} blocks={}",
                        epoch,
                        request.mode,
                        request.option,
                        request.block_count
                    );
                    self.engine
                        .enqueue(EngineCommand::SubmitJob { epoch, request });
                }
                Effect::ArmRefresh {
                    generation,
                    interval_ms,
                } => {
                    let msg_tx = self.msg_tx.clone();
                    self.refresh
                        .start(Duration::from_millis(interval_ms), move || {
                            let _ = msg_tx.send(Msg::RefreshTick { generation });
                        });
                }
                Effect::DisarmRefresh => self.refresh.stop(),
                Effect::Persist(entry) => {
                    watch_debug!("Persist {:?}", entry);
                    if let Err(err) = self.store.save(entry) {
                        watch_warn!("Failed to save session value: {}", err);
                    }
                }
                Effect::ForgetSession(keys) => {
                    if let Err(err) = self.store.remove(&keys) {
                        watch_warn!("Failed to remove session values {:?}: {}", keys, err);
                    }
                }
                Effect::ToggleModel { enabled } => {
                    self.engine.enqueue(EngineCommand::ToggleModel { enabled })
                }
                Effect::LoadDetail { hash } => {
                    self.engine.enqueue(EngineCommand::LoadDetail { hash })
                }
            }
        }
    }

    pub fn time_until_refresh(&self) -> Option<Duration> {
        self.refresh.time_until_next_tick()
    }
}

/// Turns an engine outcome into the message `update` understands.
pub fn to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::HealthChecked(status) => Msg::HealthChecked(status),
        EngineEvent::StatsLoaded(Ok(stats)) => Msg::StatsLoaded(stats),
        EngineEvent::StatsLoaded(Err(err)) => {
            watch_warn!("Stats unavailable: {}", err);
            Msg::NoOp
        }
        EngineEvent::OptionsLoaded { mode, result } => Msg::OptionsLoaded {
            mode,
            result: result.map_err(|err| {
                watch_warn!("Options for {} failed: {}", mode, err);
                err.message
            }),
        },
        EngineEvent::JobFinished { epoch, result } => Msg::FetchFinished { epoch, result },
        EngineEvent::ModelToggled { enabled, result } => Msg::ModelToggleFinished {
            enabled,
            result: result.map_err(|err| {
                watch_warn!("Model toggle to {} failed: {}", enabled, err);
                err.message
            }),
        },
        EngineEvent::DetailLoaded { hash, result } => Msg::DetailLoaded(result.map_err(|err| {
            watch_warn!("Detail for {} failed: {}", hash, err);
            err.message
        })),
    }
}
