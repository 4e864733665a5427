//! Generation job state machine
//!
//! One job exists per orchestrated surface. The machine enforces the
//! single-flight invariant (submit while Pending is refused) and carries a
//! generation counter as the staleness token: cancel and every accepted
//! submit advance it, and completions bearing an older token are discarded
//! instead of applied.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, warn};
use serde::Serialize;

use crate::error::{CadenzaError, Result};
use crate::generation::request::{GenerationRequest, GenerationResult};

/// Staleness token tying a completion to the submit that started it.
pub type JobToken = u64;

/// Lifecycle state of one generation surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum JobState {
    Idle,
    Pending { request: GenerationRequest },
    Succeeded { result: GenerationResult },
    Failed { reason: String },
}

impl JobState {
    pub fn is_pending(&self) -> bool {
        matches!(self, JobState::Pending { .. })
    }

    /// Terminal states accept a resubmission.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Succeeded { .. } | JobState::Failed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            JobState::Idle => "idle",
            JobState::Pending { .. } => "pending",
            JobState::Succeeded { .. } => "succeeded",
            JobState::Failed { .. } => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Single-flight asynchronous task state for one surface.
#[derive(Debug)]
pub struct GenerationJob {
    state: JobState,
    generation: u64,
    started_at: Option<Instant>,
}

impl GenerationJob {
    pub fn new() -> Self {
        Self {
            state: JobState::Idle,
            generation: 0,
            started_at: None,
        }
    }

    pub fn state(&self) -> &JobState {
        &self.state
    }

    /// Token identifying the current in-flight call, if any.
    pub fn token(&self) -> JobToken {
        self.generation
    }

    /// Time spent in the current Pending state.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|t| t.elapsed())
    }

    /// Accept a request, moving to Pending and returning the token the
    /// eventual completion must present.
    ///
    /// Refused with `JobBusy` while already Pending; resubmission from a
    /// terminal state clears it. Refusal has no side effect.
    pub fn submit(&mut self, request: GenerationRequest) -> Result<JobToken> {
        if self.state.is_pending() {
            return Err(CadenzaError::JobBusy {
                surface: request.kind.to_string(),
            });
        }
        self.generation += 1;
        self.started_at = Some(Instant::now());
        debug!(
            "job -> pending ({} '{}', token {})",
            request.kind, request.prompt, self.generation
        );
        self.state = JobState::Pending { request };
        Ok(self.generation)
    }

    /// Cancel the in-flight call, returning to Idle.
    ///
    /// Idempotent: cancel outside Pending is a no-op returning `false`.
    /// Advancing the generation counter guarantees any late completion for
    /// the cancelled call is stale and will be discarded.
    pub fn cancel(&mut self) -> bool {
        if !self.state.is_pending() {
            return false;
        }
        self.generation += 1;
        self.started_at = None;
        self.state = JobState::Idle;
        debug!("job cancelled, token advanced to {}", self.generation);
        true
    }

    /// Apply a successful completion if it is still current.
    pub fn resolve(&mut self, token: JobToken, result: GenerationResult) -> bool {
        if !self.accepts(token) {
            warn!("discarding stale success (token {})", token);
            return false;
        }
        debug!("job -> succeeded ('{}')", result.name);
        self.started_at = None;
        self.state = JobState::Succeeded { result };
        true
    }

    /// Apply a failed completion if it is still current.
    pub fn reject(&mut self, token: JobToken, reason: String) -> bool {
        if !self.accepts(token) {
            warn!("discarding stale failure (token {})", token);
            return false;
        }
        debug!("job -> failed ({})", reason);
        self.started_at = None;
        self.state = JobState::Failed { reason };
        true
    }

    /// Fail the in-flight call once it has outlived the surface timeout.
    pub fn expire_if_overdue(&mut self, timeout: Option<Duration>) -> bool {
        let Some(timeout) = timeout else {
            return false;
        };
        if !self.state.is_pending() {
            return false;
        }
        match self.started_at {
            Some(started) if started.elapsed() >= timeout => {
                self.generation += 1;
                self.started_at = None;
                self.state = JobState::Failed {
                    reason: format!("generation timed out after {}s", timeout.as_secs()),
                };
                true
            }
            _ => false,
        }
    }

    fn accepts(&self, token: JobToken) -> bool {
        self.state.is_pending() && token == self.generation
    }
}

impl Default for GenerationJob {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::request::{Engine, RequestSettings};

    fn track_request(prompt: &str) -> GenerationRequest {
        GenerationRequest::new(prompt, Engine::Suno, RequestSettings::track("Pop", "aria", 120))
            .unwrap()
    }

    #[test]
    fn test_submit_resolve_cycle() {
        let mut job = GenerationJob::new();
        assert_eq!(job.state().label(), "idle");

        let token = job.submit(track_request("Sunset Drive")).unwrap();
        assert!(job.state().is_pending());

        let result = GenerationResult::new("Sunset Drive", 204, Engine::Suno);
        assert!(job.resolve(token, result));
        assert_eq!(job.state().label(), "succeeded");
    }

    #[test]
    fn test_single_flight_refusal_keeps_state() {
        let mut job = GenerationJob::new();
        let token = job.submit(track_request("first")).unwrap();

        let err = job.submit(track_request("second")).unwrap_err();
        assert_eq!(err.error_code(), "JOB_BUSY");
        // The original request is untouched and its token still resolves.
        match job.state() {
            JobState::Pending { request } => assert_eq!(request.prompt, "first"),
            other => panic!("expected pending, got {}", other),
        }
        assert!(job.resolve(token, GenerationResult::new("first", 180, Engine::Suno)));
    }

    #[test]
    fn test_resubmission_from_terminal_states() {
        let mut job = GenerationJob::new();
        let token = job.submit(track_request("one")).unwrap();
        job.reject(token, "engine offline".to_string());
        assert_eq!(job.state().label(), "failed");

        job.submit(track_request("two")).unwrap();
        assert!(job.state().is_pending());
    }

    #[test]
    fn test_cancel_discards_late_completion() {
        let mut job = GenerationJob::new();
        let token = job.submit(track_request("doomed")).unwrap();
        assert!(job.cancel());
        assert_eq!(job.state().label(), "idle");

        // The completion for the cancelled call arrives late and is stale.
        assert!(!job.resolve(token, GenerationResult::new("doomed", 180, Engine::Suno)));
        assert_eq!(job.state().label(), "idle");
    }

    #[test]
    fn test_cancel_while_idle_is_noop() {
        let mut job = GenerationJob::new();
        assert!(!job.cancel());
        assert_eq!(job.state().label(), "idle");
    }

    #[test]
    fn test_expiry_needs_timeout_and_pending() {
        let mut job = GenerationJob::new();
        assert!(!job.expire_if_overdue(Some(Duration::ZERO)));

        job.submit(track_request("slow")).unwrap();
        assert!(!job.expire_if_overdue(None));
        assert!(job.expire_if_overdue(Some(Duration::ZERO)));
        match job.state() {
            JobState::Failed { reason } => assert!(reason.contains("timed out")),
            other => panic!("expected failed, got {}", other),
        }
    }
}
