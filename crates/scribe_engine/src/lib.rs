//! Scribe engine: backend gateway client, poll timer and effect execution.
mod client;
mod engine;
mod poll;
mod types;

pub use client::{ContentApi, ReqwestContentApi};
pub use engine::{EngineCommand, EngineHandle};
pub use poll::PollTimer;
pub use types::{ApiError, ApiSettings, EngineEvent, FailureKind, DEFAULT_BASE_URL};
