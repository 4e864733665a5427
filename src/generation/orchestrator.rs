//! Job orchestration, one instance per generation surface
//!
//! The orchestrator owns the surface's job, its in-flight provider handle,
//! and the result list (newest first). Completions are drained by `poll()`,
//! which also applies the staleness token check and the surface timeout;
//! hosts call it from their event loop.

use std::sync::Arc;
use std::time::Duration;

use log::{info, warn};

use crate::error::{CadenzaError, Result};
use crate::generation::job::{GenerationJob, JobState, JobToken};
use crate::generation::provider::{GenerationProvider, ProviderHandle};
use crate::generation::request::{GenerationKind, GenerationRequest, GenerationResult};

pub struct JobOrchestrator {
    surface: GenerationKind,
    provider: Arc<dyn GenerationProvider>,
    job: GenerationJob,
    inflight: Option<(JobToken, ProviderHandle)>,
    results: Vec<GenerationResult>,
    timeout: Option<Duration>,
}

impl JobOrchestrator {
    pub fn new(surface: GenerationKind, provider: Arc<dyn GenerationProvider>) -> Self {
        Self {
            surface,
            provider,
            job: GenerationJob::new(),
            inflight: None,
            results: Vec::new(),
            timeout: None,
        }
    }

    /// Fail a pending job once it has been in flight this long.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Pre-populate the result list, newest first. Host configuration for
    /// panels that open with catalog entries already showing.
    pub fn seed_results(&mut self, results: Vec<GenerationResult>) {
        self.results = results;
    }

    pub fn surface(&self) -> GenerationKind {
        self.surface
    }

    pub fn state(&self) -> &JobState {
        self.job.state()
    }

    /// Results surfaced so far, newest first.
    pub fn results(&self) -> &[GenerationResult] {
        &self.results
    }

    /// Accept a request and begin the provider call.
    ///
    /// Refusals (wrong surface, already in flight) happen before dispatch
    /// and have no side effect.
    pub fn submit(&mut self, request: GenerationRequest) -> Result<()> {
        if request.kind != self.surface {
            return Err(CadenzaError::InvalidRequest {
                reason: format!(
                    "{} request submitted to the {} surface",
                    request.kind, self.surface
                ),
            });
        }
        if self.job.state().is_pending() {
            return Err(CadenzaError::JobBusy {
                surface: self.surface.to_string(),
            });
        }

        let handle = self.provider.dispatch(&request);
        info!("{}: dispatching '{}'", self.surface, request.display_name());
        let token = self.job.submit(request)?;
        self.inflight = Some((token, handle));
        Ok(())
    }

    /// Cancel the in-flight call, if any. Idempotent.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.job.cancel();
        if cancelled {
            info!("{}: cancelled in-flight generation", self.surface);
            self.inflight = None;
        }
        cancelled
    }

    /// Drain the provider completion and apply the timeout policy.
    ///
    /// Returns `true` when observable state changed (job transition and/or
    /// result list update).
    pub fn poll(&mut self) -> bool {
        let mut changed = false;

        let reply = match &self.inflight {
            Some((token, handle)) => handle.try_take().map(|reply| (*token, reply)),
            None => None,
        };
        if let Some((token, reply)) = reply {
            self.inflight = None;
            match reply {
                Ok(result) => {
                    if self.job.resolve(token, result.clone()) {
                        info!("{}: '{}' ready", self.surface, result.name);
                        self.results.insert(0, result);
                        changed = true;
                    } else {
                        warn!("{}: dropping stale result '{}'", self.surface, result.name);
                    }
                }
                Err(reason) => {
                    if self.job.reject(token, reason.clone()) {
                        info!("{}: generation failed: {}", self.surface, reason);
                        changed = true;
                    } else {
                        warn!("{}: dropping stale failure: {}", self.surface, reason);
                    }
                }
            }
        }

        if self.job.expire_if_overdue(self.timeout) {
            warn!("{}: generation timed out", self.surface);
            self.inflight = None;
            changed = true;
        }

        changed
    }
}
