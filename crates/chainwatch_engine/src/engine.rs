use std::sync::Arc;

use tokio::sync::mpsc;

use crate::health::check_health;
use crate::poller::{JobPoller, PollSettings};
use crate::{Backend, Clock, EngineCommand, EngineEvent};

/// Runs engine commands as tasks on the current runtime and reports each
/// outcome as one [`EngineEvent`].
#[derive(Clone)]
pub struct EngineHandle {
    backend: Arc<dyn Backend>,
    poller: Arc<JobPoller>,
    event_tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineHandle {
    pub fn new(
        backend: Arc<dyn Backend>,
        clock: Arc<dyn Clock>,
        poll_settings: PollSettings,
    ) -> (Self, mpsc::UnboundedReceiver<EngineEvent>) {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let poller = Arc::new(JobPoller::new(backend.clone(), clock, poll_settings));
        (
            Self {
                backend,
                poller,
                event_tx,
            },
            event_rx,
        )
    }

    /// Spawns the command. Must be called from within a tokio runtime.
    pub fn enqueue(&self, command: EngineCommand) {
        let engine = self.clone();
        tokio::spawn(async move {
            let event = engine.execute(command).await;
            // The receiver is gone only during shutdown.
            let _ = engine.event_tx.send(event);
        });
    }

    pub async fn execute(&self, command: EngineCommand) -> EngineEvent {
        match command {
            EngineCommand::CheckHealth => {
                EngineEvent::HealthChecked(check_health(self.backend.as_ref()).await)
            }
            EngineCommand::LoadStats => EngineEvent::StatsLoaded(self.backend.stats().await),
            EngineCommand::LoadOptions { mode } => EngineEvent::OptionsLoaded {
                mode,
                result: self.backend.options(mode).await,
            },
            EngineCommand::SubmitJob { epoch, request } => EngineEvent::JobFinished {
                epoch,
                result: self.poller.submit_and_await(&request).await,
            },
            EngineCommand::ToggleModel { enabled } => EngineEvent::ModelToggled {
                enabled,
                result: self.backend.toggle_model(enabled).await.map(|_| ()),
            },
            EngineCommand::LoadDetail { hash } => {
                let result = self.backend.record_detail(&hash).await;
                EngineEvent::DetailLoaded { hash, result }
            }
        }
    }
}
