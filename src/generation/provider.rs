//! Generation providers
//!
//! A provider is the external collaborator that actually generates. The
//! console treats it as an opaque call completing on its own time: dispatch
//! returns a handle owning the receiving end of a completion channel, and
//! the orchestrator drains it cooperatively. Providers may run a worker
//! thread internally; nothing on the console side blocks.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::generation::request::{GenerationKind, GenerationRequest, GenerationResult};

/// Completion payload: a result, or a human-readable failure reason.
pub type ProviderReply = std::result::Result<GenerationResult, String>;

/// Handle to one in-flight provider call.
#[derive(Debug)]
pub struct ProviderHandle {
    rx: Receiver<ProviderReply>,
}

impl ProviderHandle {
    /// A connected (sender, handle) pair. Providers keep the sender for
    /// their worker; tests use it to complete calls by hand.
    pub fn pair() -> (Sender<ProviderReply>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self { rx })
    }

    /// Take the completion if it has arrived. A provider that hung up
    /// without replying reads as a failure, not a hang.
    pub fn try_take(&self) -> Option<ProviderReply> {
        match self.rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                Some(Err("generation provider disconnected".to_string()))
            }
        }
    }
}

/// External generation collaborator.
pub trait GenerationProvider: Send + Sync {
    /// Begin a generation call; the completion arrives on the handle.
    fn dispatch(&self, request: &GenerationRequest) -> ProviderHandle;
}

/// Simulated provider: synthesizes a plausible result after a fixed delay.
///
/// The delay defaults to the three seconds the studio panels simulate;
/// tests shrink it. Results are derived deterministically from the request
/// so runs are reproducible.
pub struct MockProvider {
    delay: Duration,
    fail_with: Option<String>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            delay: Duration::from_secs(3),
            fail_with: None,
        }
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            fail_with: None,
        }
    }

    /// A provider that always fails, for exercising the failure path.
    pub fn failing(reason: impl Into<String>, delay: Duration) -> Self {
        Self {
            delay,
            fail_with: Some(reason.into()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationProvider for MockProvider {
    fn dispatch(&self, request: &GenerationRequest) -> ProviderHandle {
        let (tx, handle) = ProviderHandle::pair();
        let delay = self.delay;
        let reply = match &self.fail_with {
            Some(reason) => Err(reason.clone()),
            None => Ok(synthesize(request)),
        };
        thread::spawn(move || {
            thread::sleep(delay);
            // The console may have cancelled and dropped the handle.
            let _ = tx.send(reply);
        });
        handle
    }
}

/// Derive a mock result from the request: named from the prompt, duration
/// from the settings where they declare one, otherwise a stable
/// three-minutes-and-change derived from the prompt bytes.
fn synthesize(request: &GenerationRequest) -> GenerationResult {
    use crate::generation::request::RequestSettings;

    let name = request.display_name();
    let duration_secs = match &request.settings {
        RequestSettings::Video { duration_secs, .. } => *duration_secs,
        _ => 180 + prompt_seed(&request.prompt) % 60,
    };
    let result = GenerationResult::new(name, duration_secs, request.engine);
    match &request.settings {
        RequestSettings::StemSplit { stems } if request.kind == GenerationKind::StemSplit => {
            result.with_stems(stems.clone())
        }
        _ => result,
    }
}

fn prompt_seed(prompt: &str) -> u32 {
    prompt.bytes().map(u32::from).sum()
}

/// Real generation service over the studio's HTTP bridge.
///
/// Posts the request as JSON and maps the response envelope back into the
/// result contract. The blocking call runs on a worker thread so dispatch
/// itself never blocks the console.
#[cfg(feature = "bridge")]
pub struct HttpBridgeProvider {
    endpoint: String,
    client: reqwest::blocking::Client,
}

#[cfg(feature = "bridge")]
#[derive(Debug, serde::Deserialize)]
struct BridgeResponse {
    success: bool,
    result: Option<GenerationResult>,
    error: Option<String>,
}

#[cfg(feature = "bridge")]
impl HttpBridgeProvider {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            client: reqwest::blocking::Client::new(),
        }
    }
}

#[cfg(feature = "bridge")]
impl GenerationProvider for HttpBridgeProvider {
    fn dispatch(&self, request: &GenerationRequest) -> ProviderHandle {
        let (tx, handle) = ProviderHandle::pair();
        let endpoint = self.endpoint.clone();
        let client = self.client.clone();
        let request = request.clone();
        thread::spawn(move || {
            let reply = call_bridge(&client, &endpoint, &request);
            let _ = tx.send(reply);
        });
        handle
    }
}

#[cfg(feature = "bridge")]
fn call_bridge(
    client: &reqwest::blocking::Client,
    endpoint: &str,
    request: &GenerationRequest,
) -> ProviderReply {
    let response = client
        .post(endpoint)
        .json(request)
        .send()
        .map_err(|e| format!("bridge request failed: {}", e))?;
    let body: BridgeResponse = response
        .json()
        .map_err(|e| format!("malformed bridge response: {}", e))?;
    if body.success {
        body.result
            .ok_or_else(|| "bridge response missing result".to_string())
    } else {
        Err(body
            .error
            .unwrap_or_else(|| "unknown provider error".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::request::{Engine, RequestSettings};

    fn pump(handle: &ProviderHandle) -> ProviderReply {
        for _ in 0..200 {
            if let Some(reply) = handle.try_take() {
                return reply;
            }
            thread::sleep(Duration::from_millis(5));
        }
        panic!("provider never completed");
    }

    #[test]
    fn test_mock_names_result_from_prompt() {
        let provider = MockProvider::with_delay(Duration::from_millis(1));
        let request = GenerationRequest::new(
            "Sunset Drive",
            Engine::Suno,
            RequestSettings::track("Lo-Fi", "aria", 90),
        )
        .unwrap();

        let result = pump(&provider.dispatch(&request)).unwrap();
        assert_eq!(result.name, "Sunset Drive");
        assert_eq!(result.engine, Engine::Suno);
        assert!((180..240).contains(&result.duration_secs));
    }

    #[test]
    fn test_mock_video_duration_follows_settings() {
        let provider = MockProvider::with_delay(Duration::from_millis(1));
        let request = GenerationRequest::new(
            "neon skyline",
            Engine::Kling,
            RequestSettings::video(
                15,
                "Cinematic",
                crate::generation::request::Resolution::Fhd1080,
                30,
                crate::generation::request::AspectRatio::Widescreen,
            ),
        )
        .unwrap();

        let result = pump(&provider.dispatch(&request)).unwrap();
        assert_eq!(result.duration_secs, 15);
    }

    #[test]
    fn test_mock_stem_split_carries_stems() {
        let provider = MockProvider::with_delay(Duration::from_millis(1));
        let request = GenerationRequest::new(
            "isolate this mix",
            Engine::Demucs,
            RequestSettings::stem_split(),
        )
        .unwrap();

        let result = pump(&provider.dispatch(&request)).unwrap();
        assert_eq!(result.stems, vec!["vocals", "drums", "bass", "other"]);
    }

    #[test]
    fn test_failing_mock_reports_reason() {
        let provider = MockProvider::failing("engine offline", Duration::from_millis(1));
        let request = GenerationRequest::new(
            "anything",
            Engine::Suno,
            RequestSettings::track("Pop", "aria", 120),
        )
        .unwrap();

        let reply = pump(&provider.dispatch(&request));
        assert_eq!(reply.unwrap_err(), "engine offline");
    }

    #[test]
    fn test_disconnected_provider_reads_as_failure() {
        let (tx, handle) = ProviderHandle::pair();
        drop(tx);
        let reply = handle.try_take().expect("disconnect should surface");
        assert!(reply.unwrap_err().contains("disconnected"));
    }
}
