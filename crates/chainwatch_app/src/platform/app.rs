use std::sync::Arc;

use anyhow::Context;
use chainwatch_core::{update, AppState, HealthCondition, Msg};
use chainwatch_engine::{
    EngineHandle, PollSettings, RefreshScheduler, ReqwestBackend, SessionStore, TokioClock,
};
use chainwatch_logging::{watch_info, watch_warn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use super::config::Cli;
use super::effects::{to_msg, EffectRunner};
use super::input::{self, Command, HELP};
use super::render::render;

pub async fn run_app(cli: Cli) -> anyhow::Result<()> {
    chainwatch_logging::initialize(cli.log.into(), cli.log_level());
    watch_info!("chainwatch v{} against {}", env!("CARGO_PKG_VERSION"), cli.api_url);

    let store = SessionStore::new(&cli.session_file);
    if cli.fresh_session {
        store
            .clear()
            .with_context(|| format!("clearing session file {:?}", store.path()))?;
        watch_info!("Started a fresh session");
    }

    let backend = ReqwestBackend::new(cli.backend_settings()).context("invalid --api-url")?;
    let (engine, mut events) =
        EngineHandle::new(Arc::new(backend), Arc::new(TokioClock), PollSettings::default());

    let (msg_tx, mut msg_rx) = mpsc::unbounded_channel::<Msg>();
    let mut controller = Controller::new(EffectRunner::new(engine, store.clone(), msg_tx.clone()));

    let mut health_timer = RefreshScheduler::new("health");
    if let Some(interval) = cli.health_interval() {
        let msg_tx = msg_tx.clone();
        health_timer.start(interval, move || {
            let _ = msg_tx.send(Msg::HealthCheckDue);
        });
    }

    println!("{HELP}\n");
    // Session values must be in place before anything else initializes.
    controller.dispatch(Msg::Started(store.load()));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            Some(msg) = msg_rx.recv() => controller.dispatch(msg),
            Some(event) = events.recv() => controller.dispatch(to_msg(event)),
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(err) => {
                        watch_warn!("stdin read failed: {}", err);
                        break;
                    }
                };
                match input::parse(&line) {
                    Ok(Command::Dispatch(msg)) => controller.dispatch(msg),
                    Ok(Command::Show) => controller.print(),
                    Ok(Command::Help) => println!("{HELP}"),
                    Ok(Command::Quit) => break,
                    Ok(Command::Nothing) => {}
                    Err(err) => println!("{err}"),
                }
            }
        }
    }

    health_timer.stop();
    watch_info!("chainwatch exiting");
    Ok(())
}

/// Owns the state; every change goes through `update`.
struct Controller {
    state: AppState,
    runner: EffectRunner,
}

impl Controller {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let health_before = self.health();
        let records_before = self.state.results().len();
        if let Msg::FetchFinished { epoch, result } = &msg {
            if *epoch != self.state.epoch() {
                watch_info!(
                    "Discarding result of epoch {} (current {}), ok={}",
                    epoch,
                    self.state.epoch(),
                    result.is_ok()
                );
            }
        }
        let is_fetch_result = matches!(msg, Msg::FetchFinished { .. });
        let is_tick = matches!(msg, Msg::RefreshTick { .. });

        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if is_tick && effects.is_empty() && self.state.backend_known_unreachable() {
            watch_warn!("Skipped scheduled refresh: backend unreachable");
        }
        if is_fetch_result && self.state.results().len() != records_before {
            watch_info!(
                "Merged {} new records ({} total)",
                self.state.results().len() - records_before,
                self.state.results().len()
            );
        }
        let health_after = self.health();
        if health_after != health_before {
            watch_info!("Health condition: {:?} -> {:?}", health_before, health_after);
        }

        self.runner.run(effects);
        if was_dirty {
            self.print();
        }
    }

    fn health(&self) -> Option<HealthCondition> {
        self.state.health_condition()
    }

    fn print(&self) {
        println!(
            "{}",
            render(&self.state.view(), self.runner.time_until_refresh())
        );
    }
}
