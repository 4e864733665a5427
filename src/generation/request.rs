//! Generation request and result value objects
//!
//! Requests are immutable once constructed and validated at construction:
//! an empty prompt or an engine paired with the wrong kind never reaches
//! the job state machine. Both sides of the contract are serde types so a
//! bridge provider can carry them as JSON.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CadenzaError, Result};

/// Prompts longer than this are truncated for display names.
const DISPLAY_NAME_MAX: usize = 20;

/// Tempo range accepted for track generation, in BPM.
pub const TEMPO_RANGE: (u16, u16) = (60, 200);

/// Duration range accepted for video generation, in seconds.
pub const VIDEO_DURATION_RANGE: (u32, u32) = (5, 60);

/// Frame rates the video engines accept.
pub const SUPPORTED_FPS: [u8; 3] = [24, 30, 60];

/// Stem layout used when a stem-split request does not name its own.
pub const DEFAULT_STEMS: [&str; 4] = ["vocals", "drums", "bass", "other"];

/// The logical surface a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GenerationKind {
    Track,
    Video,
    StemSplit,
}

impl fmt::Display for GenerationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerationKind::Track => write!(f, "track"),
            GenerationKind::Video => write!(f, "video"),
            GenerationKind::StemSplit => write!(f, "stem-split"),
        }
    }
}

impl FromStr for GenerationKind {
    type Err = CadenzaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "track" => Ok(GenerationKind::Track),
            "video" => Ok(GenerationKind::Video),
            "stem-split" | "stems" => Ok(GenerationKind::StemSplit),
            other => Err(CadenzaError::InvalidRequest {
                reason: format!("unknown generation kind '{}'", other),
            }),
        }
    }
}

/// Generation engines the studio can dispatch to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Engine {
    Suno,
    Elevenlabs,
    Kling,
    Veo3,
    Runway,
    Pika,
    Demucs,
}

impl Engine {
    /// Whether this engine serves the given kind of generation.
    pub fn serves(self, kind: GenerationKind) -> bool {
        matches!(
            (self, kind),
            (Engine::Suno | Engine::Elevenlabs, GenerationKind::Track)
                | (
                    Engine::Kling | Engine::Veo3 | Engine::Runway | Engine::Pika,
                    GenerationKind::Video
                )
                | (Engine::Demucs, GenerationKind::StemSplit)
        )
    }

    /// Default engine for a kind, matching the panels' initial selection.
    pub fn default_for(kind: GenerationKind) -> Engine {
        match kind {
            GenerationKind::Track => Engine::Suno,
            GenerationKind::Video => Engine::Kling,
            GenerationKind::StemSplit => Engine::Demucs,
        }
    }

    /// Human-readable engine name.
    pub fn display_name(self) -> &'static str {
        match self {
            Engine::Suno => "Suno v3.5",
            Engine::Elevenlabs => "ElevenLabs",
            Engine::Kling => "Kling AI",
            Engine::Veo3 => "Veo 3",
            Engine::Runway => "Runway Gen-3",
            Engine::Pika => "Pika Labs",
            Engine::Demucs => "Demucs",
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Engine::Suno => "suno",
            Engine::Elevenlabs => "elevenlabs",
            Engine::Kling => "kling",
            Engine::Veo3 => "veo3",
            Engine::Runway => "runway",
            Engine::Pika => "pika",
            Engine::Demucs => "demucs",
        };
        write!(f, "{}", id)
    }
}

impl FromStr for Engine {
    type Err = CadenzaError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "suno" => Ok(Engine::Suno),
            "elevenlabs" => Ok(Engine::Elevenlabs),
            "kling" => Ok(Engine::Kling),
            "veo3" => Ok(Engine::Veo3),
            "runway" => Ok(Engine::Runway),
            "pika" => Ok(Engine::Pika),
            "demucs" => Ok(Engine::Demucs),
            other => Err(CadenzaError::InvalidRequest {
                reason: format!("unknown engine '{}'", other),
            }),
        }
    }
}

/// Output resolution for video generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[serde(rename = "720p")]
    Hd720,
    #[serde(rename = "1080p")]
    Fhd1080,
    #[serde(rename = "4K")]
    Uhd4k,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Hd720 => write!(f, "720p"),
            Resolution::Fhd1080 => write!(f, "1080p"),
            Resolution::Uhd4k => write!(f, "4K"),
        }
    }
}

/// Aspect ratio for video generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AspectRatio {
    #[serde(rename = "16:9")]
    Widescreen,
    #[serde(rename = "9:16")]
    Vertical,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "4:3")]
    Standard,
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AspectRatio::Widescreen => write!(f, "16:9"),
            AspectRatio::Vertical => write!(f, "9:16"),
            AspectRatio::Square => write!(f, "1:1"),
            AspectRatio::Standard => write!(f, "4:3"),
        }
    }
}

/// Kind-specific request settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum RequestSettings {
    Track {
        genre: String,
        voice: String,
        tempo_bpm: u16,
    },
    Video {
        duration_secs: u32,
        style: String,
        resolution: Resolution,
        fps: u8,
        aspect_ratio: AspectRatio,
    },
    StemSplit {
        stems: Vec<String>,
    },
}

impl RequestSettings {
    /// Track settings; tempo clamps to the slider range.
    pub fn track(genre: impl Into<String>, voice: impl Into<String>, tempo_bpm: u16) -> Self {
        RequestSettings::Track {
            genre: genre.into(),
            voice: voice.into(),
            tempo_bpm: tempo_bpm.clamp(TEMPO_RANGE.0, TEMPO_RANGE.1),
        }
    }

    /// Video settings; duration clamps to the slider range.
    pub fn video(
        duration_secs: u32,
        style: impl Into<String>,
        resolution: Resolution,
        fps: u8,
        aspect_ratio: AspectRatio,
    ) -> Self {
        RequestSettings::Video {
            duration_secs: duration_secs.clamp(VIDEO_DURATION_RANGE.0, VIDEO_DURATION_RANGE.1),
            style: style.into(),
            resolution,
            fps,
            aspect_ratio,
        }
    }

    /// Stem-split settings with the standard four-stem layout.
    pub fn stem_split() -> Self {
        RequestSettings::StemSplit {
            stems: DEFAULT_STEMS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Stem-split settings naming the stems to isolate.
    pub fn stem_split_with(stems: Vec<String>) -> Self {
        RequestSettings::StemSplit { stems }
    }

    /// The kind of surface these settings belong to.
    pub fn kind(&self) -> GenerationKind {
        match self {
            RequestSettings::Track { .. } => GenerationKind::Track,
            RequestSettings::Video { .. } => GenerationKind::Video,
            RequestSettings::StemSplit { .. } => GenerationKind::StemSplit,
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            RequestSettings::Video { fps, .. } if !SUPPORTED_FPS.contains(fps) => {
                Err(CadenzaError::InvalidRequest {
                    reason: format!("unsupported frame rate: {} fps", fps),
                })
            }
            RequestSettings::StemSplit { stems } if stems.is_empty() => {
                Err(CadenzaError::InvalidRequest {
                    reason: "stem-split needs at least one stem".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

/// An immutable, validated generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub kind: GenerationKind,
    pub prompt: String,
    pub engine: Engine,
    pub settings: RequestSettings,
    pub submitted_at: DateTime<Utc>,
}

impl GenerationRequest {
    /// Build and validate a request.
    ///
    /// Validation happens here, before any job ever sees the request: a
    /// blank prompt, a mismatched engine, or out-of-contract settings are
    /// refused without touching the single-flight state.
    pub fn new(
        prompt: impl Into<String>,
        engine: Engine,
        settings: RequestSettings,
    ) -> Result<Self> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(CadenzaError::EmptyPrompt);
        }
        let kind = settings.kind();
        if !engine.serves(kind) {
            return Err(CadenzaError::EngineMismatch {
                engine: engine.to_string(),
                kind: kind.to_string(),
            });
        }
        settings.validate()?;
        Ok(Self {
            kind,
            prompt,
            engine,
            settings,
            submitted_at: Utc::now(),
        })
    }

    /// Display name derived from the prompt: long prompts are truncated
    /// to twenty characters plus an ellipsis.
    pub fn display_name(&self) -> String {
        display_name_for_prompt(&self.prompt)
    }
}

pub(crate) fn display_name_for_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();
    if trimmed.chars().count() > DISPLAY_NAME_MAX {
        let head: String = trimmed.chars().take(DISPLAY_NAME_MAX).collect();
        format!("{}...", head)
    } else {
        trimmed.to_string()
    }
}

/// An immutable generation result, prepended to the owning surface's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    pub id: String,
    pub name: String,
    pub duration_secs: u32,
    pub engine: Engine,
    /// Stem names carried by stem-split results; empty otherwise.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stems: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl GenerationResult {
    pub fn new(name: impl Into<String>, duration_secs: u32, engine: Engine) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            duration_secs,
            engine,
            stems: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_stems(mut self, stems: Vec<String>) -> Self {
        self.stems = stems;
        self
    }

    /// Duration as the catalog renders it, e.g. `3:24`.
    pub fn duration_display(&self) -> String {
        format!("{}:{:02}", self.duration_secs / 60, self.duration_secs % 60)
    }
}
