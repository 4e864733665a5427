//! Generation job lifecycle
//!
//! This module provides:
//! - Request/result value objects shared with generation providers
//! - `GenerationJob`, the single-flight state machine
//! - `GenerationProvider` implementations (mock, and an HTTP bridge behind
//!   the `bridge` feature)
//! - `JobOrchestrator`, one per generation surface, owning the result list

pub mod job;
pub mod orchestrator;
pub mod provider;
pub mod request;

pub use job::{GenerationJob, JobState, JobToken};
pub use orchestrator::JobOrchestrator;
pub use provider::{GenerationProvider, MockProvider, ProviderHandle, ProviderReply};
pub use request::{
    AspectRatio, Engine, GenerationKind, GenerationRequest, GenerationResult, RequestSettings,
    Resolution,
};

#[cfg(feature = "bridge")]
pub use provider::HttpBridgeProvider;
