//! Chainwatch engine: backend I/O, job polling, refresh timers and session storage.
mod backend;
mod clock;
mod engine;
mod health;
mod poller;
mod scheduler;
mod session_store;
mod types;

pub use backend::{Backend, BackendSettings, ReqwestBackend};
pub use clock::{Clock, TokioClock};
pub use engine::EngineHandle;
pub use health::check_health;
pub use poller::{JobPoller, PollSettings};
pub use scheduler::RefreshScheduler;
pub use session_store::{PersistError, SessionStore};
pub use types::{
    BackendError, EngineCommand, EngineEvent, FailureKind, HealthResponse, JobResultBody,
    JobStatusKind, JobStatusResponse, SubmitResponse,
};
