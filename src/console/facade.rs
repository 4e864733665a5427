//! Presentation-layer entry point
//!
//! The facade composes one channel registry, one parameter surface, and one
//! job orchestrator per generation surface, and is the only object the
//! presentation layer talks to. Every observable change fans out to
//! subscribers as a `ConsoleEvent` so panels re-render without polling the
//! whole state.
//!
//! Ownership: one facade per open console; nothing inside is shared across
//! panels, and callbacks run inline on the caller's thread (single-threaded
//! cooperative model). Subscriber callbacks must not re-enter the facade.

use std::sync::Arc;
use std::time::Duration;

use log::debug;

use crate::console::channel::{Channel, ChannelRegistry};
use crate::console::surface::{ControlParameterSet, ParameterSurface};
use crate::error::Result;
use crate::generation::{
    GenerationKind, GenerationProvider, GenerationRequest, GenerationResult, JobOrchestrator,
    JobState,
};

/// Identifies one subscriber for removal.
pub type SubscriptionId = u64;

/// What changed, for targeted re-rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleEvent {
    ChannelsChanged,
    SurfaceChanged,
    JobChanged { surface: GenerationKind },
    ResultsChanged { surface: GenerationKind },
}

/// Host configuration for one console instance.
#[derive(Debug, Clone, Default)]
pub struct ConsoleConfig {
    /// Append one mixer channel per isolated stem when a stem-split job
    /// succeeds. Off by default.
    pub stems_to_channels: bool,
    /// Per-surface timeouts; `None` waits indefinitely.
    pub track_timeout: Option<Duration>,
    pub video_timeout: Option<Duration>,
    pub stem_timeout: Option<Duration>,
}

type Subscriber = Box<dyn FnMut(&ConsoleEvent)>;

pub struct ControlConsoleFacade {
    mixer: ChannelRegistry,
    granular: ParameterSurface,
    track: JobOrchestrator,
    video: JobOrchestrator,
    stems: JobOrchestrator,
    config: ConsoleConfig,
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_subscription: SubscriptionId,
}

impl ControlConsoleFacade {
    /// Console over one generation provider, with the standard channel
    /// strip and the granular surface.
    pub fn new(provider: Arc<dyn GenerationProvider>, config: ConsoleConfig) -> Self {
        let orchestrator = |kind: GenerationKind, timeout: Option<Duration>| {
            let o = JobOrchestrator::new(kind, Arc::clone(&provider));
            match timeout {
                Some(t) => o.with_timeout(t),
                None => o,
            }
        };
        Self {
            mixer: ChannelRegistry::new(),
            granular: ParameterSurface::granular(),
            track: orchestrator(GenerationKind::Track, config.track_timeout),
            video: orchestrator(GenerationKind::Video, config.video_timeout),
            stems: orchestrator(GenerationKind::StemSplit, config.stem_timeout),
            config,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    // ------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------

    /// Register a re-render callback; returns the id used to unsubscribe.
    pub fn subscribe(&mut self, callback: impl FnMut(&ConsoleEvent) + 'static) -> SubscriptionId {
        self.next_subscription += 1;
        let id = self.next_subscription;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    fn notify(&mut self, event: ConsoleEvent) {
        debug!("console event: {:?}", event);
        for (_, callback) in &mut self.subscribers {
            callback(&event);
        }
    }

    // ------------------------------------------------------------------
    // Mixer
    // ------------------------------------------------------------------

    pub fn channels(&self) -> &[Channel] {
        self.mixer.channels()
    }

    /// Derived audible level for one channel.
    pub fn effective_level(&self, id: &str) -> Option<u8> {
        self.mixer.effective_level(id)
    }

    /// Derived level map for the whole strip.
    pub fn level_map(&self) -> Vec<(String, u8)> {
        self.mixer.level_map()
    }

    pub fn set_volume(&mut self, id: &str, value: i32) -> bool {
        let applied = self.mixer.set_volume(id, value);
        if applied {
            self.notify(ConsoleEvent::ChannelsChanged);
        }
        applied
    }

    pub fn set_pan(&mut self, id: &str, value: i32) -> bool {
        let applied = self.mixer.set_pan(id, value);
        if applied {
            self.notify(ConsoleEvent::ChannelsChanged);
        }
        applied
    }

    pub fn toggle_mute(&mut self, id: &str) -> bool {
        let applied = self.mixer.toggle_mute(id);
        if applied {
            self.notify(ConsoleEvent::ChannelsChanged);
        }
        applied
    }

    pub fn toggle_solo(&mut self, id: &str) -> bool {
        let applied = self.mixer.toggle_solo(id);
        if applied {
            self.notify(ConsoleEvent::ChannelsChanged);
        }
        applied
    }

    pub fn toggle_fx(&mut self, id: &str, slot: usize) -> bool {
        let applied = self.mixer.toggle_fx(id, slot);
        if applied {
            self.notify(ConsoleEvent::ChannelsChanged);
        }
        applied
    }

    pub fn set_fx_intensity(&mut self, id: &str, slot: usize, value: i32) -> bool {
        let applied = self.mixer.set_fx_intensity(id, slot, value);
        if applied {
            self.notify(ConsoleEvent::ChannelsChanged);
        }
        applied
    }

    /// Restore the strip to panel-open defaults.
    pub fn reset_mixer(&mut self) {
        self.mixer.reset();
        self.notify(ConsoleEvent::ChannelsChanged);
    }

    // ------------------------------------------------------------------
    // Granular surface
    // ------------------------------------------------------------------

    pub fn set_surface_position(&mut self, x: i32, y: i32) {
        self.granular.set_position(x, y);
        self.notify(ConsoleEvent::SurfaceChanged);
    }

    pub fn set_surface_parameter(&mut self, name: &str, value: i32) -> bool {
        let applied = self.granular.set_parameter(name, value);
        if applied {
            self.notify(ConsoleEvent::SurfaceChanged);
        }
        applied
    }

    pub fn surface_snapshot(&self) -> ControlParameterSet {
        self.granular.snapshot()
    }

    pub fn surface_position(&self) -> (u8, u8) {
        self.granular.position()
    }

    // ------------------------------------------------------------------
    // Generation
    // ------------------------------------------------------------------

    /// Submit a request to the surface its kind names.
    pub fn submit(&mut self, request: GenerationRequest) -> Result<()> {
        let surface = request.kind;
        self.orchestrator_mut(surface).submit(request)?;
        self.notify(ConsoleEvent::JobChanged { surface });
        Ok(())
    }

    /// Cancel the named surface's in-flight job. Idempotent.
    pub fn cancel(&mut self, surface: GenerationKind) -> bool {
        let cancelled = self.orchestrator_mut(surface).cancel();
        if cancelled {
            self.notify(ConsoleEvent::JobChanged { surface });
        }
        cancelled
    }

    pub fn job_state(&self, surface: GenerationKind) -> &JobState {
        self.orchestrator(surface).state()
    }

    /// Results for a surface, newest first.
    pub fn results(&self, surface: GenerationKind) -> &[GenerationResult] {
        self.orchestrator(surface).results()
    }

    /// Pre-populate a surface's result list (panels that open with catalog
    /// entries already showing).
    pub fn seed_results(&mut self, surface: GenerationKind, results: Vec<GenerationResult>) {
        self.orchestrator_mut(surface).seed_results(results);
    }

    /// Drain provider completions across all surfaces.
    ///
    /// Call from the host event loop. Returns `true` when anything changed;
    /// subscribers have already been notified by then. A successful
    /// stem-split additionally populates mixer channels when the console is
    /// configured for it.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        for surface in [
            GenerationKind::Track,
            GenerationKind::Video,
            GenerationKind::StemSplit,
        ] {
            if !self.orchestrator_mut(surface).poll() {
                continue;
            }
            changed = true;
            self.notify(ConsoleEvent::JobChanged { surface });

            let succeeded_stems = match self.orchestrator(surface).state() {
                JobState::Succeeded { result } => Some(result.stems.clone()),
                _ => None,
            };
            if let Some(stems) = succeeded_stems {
                self.notify(ConsoleEvent::ResultsChanged { surface });
                if surface == GenerationKind::StemSplit
                    && self.config.stems_to_channels
                    && !stems.is_empty()
                {
                    self.mixer.add_stem_channels(&stems);
                    self.notify(ConsoleEvent::ChannelsChanged);
                }
            }
        }
        changed
    }

    fn orchestrator(&self, surface: GenerationKind) -> &JobOrchestrator {
        match surface {
            GenerationKind::Track => &self.track,
            GenerationKind::Video => &self.video,
            GenerationKind::StemSplit => &self.stems,
        }
    }

    fn orchestrator_mut(&mut self, surface: GenerationKind) -> &mut JobOrchestrator {
        match surface {
            GenerationKind::Track => &mut self.track,
            GenerationKind::Video => &mut self.video,
            GenerationKind::StemSplit => &mut self.stems,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::MockProvider;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn facade() -> ControlConsoleFacade {
        ControlConsoleFacade::new(
            Arc::new(MockProvider::with_delay(Duration::from_millis(1))),
            ConsoleConfig::default(),
        )
    }

    #[test]
    fn test_subscribers_see_channel_changes() {
        let mut console = facade();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        console.subscribe(move |event| sink.borrow_mut().push(*event));

        console.set_volume("drums", 60);
        console.toggle_mute("bass");
        // A no-op mutation must not notify.
        console.set_volume("theremin", 60);

        assert_eq!(
            events.borrow().as_slice(),
            &[ConsoleEvent::ChannelsChanged, ConsoleEvent::ChannelsChanged]
        );
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let mut console = facade();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let id = console.subscribe(move |event| sink.borrow_mut().push(*event));

        console.set_volume("drums", 60);
        assert!(console.unsubscribe(id));
        assert!(!console.unsubscribe(id));
        console.set_volume("drums", 70);

        assert_eq!(events.borrow().len(), 1);
    }

    #[test]
    fn test_surface_events() {
        let mut console = facade();
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        console.subscribe(move |event| sink.borrow_mut().push(*event));

        console.set_surface_position(25, 75);
        assert!(console.set_surface_parameter("spread", 10));
        assert!(!console.set_surface_parameter("wobble", 10));

        assert_eq!(
            events.borrow().as_slice(),
            &[ConsoleEvent::SurfaceChanged, ConsoleEvent::SurfaceChanged]
        );
    }
}
