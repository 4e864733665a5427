//! Mixer channels and the registry that owns them
//!
//! All mutators clamp to the declared ranges and return `bool`: `true` when
//! the reference resolved and the mutation applied, `false` for an unknown
//! channel or slot. Callers are free to ignore the flag - this is a
//! fire-and-forget control surface and nothing here ever panics on a bad
//! reference.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::console::level::{self, MeterZone};

/// Default fader position for a freshly opened channel.
pub const DEFAULT_VOLUME: u8 = 75;

/// The master strip opens slightly hotter than the instrument strips.
pub const DEFAULT_MASTER_VOLUME: u8 = 85;

/// Default intensity for a freshly created FX slot.
pub const DEFAULT_FX_INTENSITY: u8 = 50;

/// FX chain every channel opens with, in processing order.
pub const DEFAULT_FX_CHAIN: [&str; 7] = [
    "Reverb",
    "Delay",
    "Compressor",
    "EQ",
    "Limiter",
    "Chorus",
    "Flanger",
];

/// The fixed strip created when a mixing panel is opened: (id, label).
const DEFAULT_CHANNELS: [(&str, &str); 7] = [
    ("vocals", "Vocals"),
    ("drums", "Drums"),
    ("bass", "Bass"),
    ("guitar", "Guitar"),
    ("keys", "Keys"),
    ("fx", "FX"),
    ("master", "Master"),
];

/// A named, toggleable effect unit owned by one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FxSlot {
    pub name: String,
    pub enabled: bool,
    /// Intensity in [0, 100]; only observable downstream while `enabled`.
    pub intensity: u8,
}

impl FxSlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: false,
            intensity: DEFAULT_FX_INTENSITY,
        }
    }
}

/// One mixer channel strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Stable identity, unique within one registry.
    pub id: String,
    pub label: String,
    /// Fader volume in [0, 100].
    pub volume: u8,
    /// Pan position in [-100, 100], centered at 0.
    pub pan: i8,
    pub muted: bool,
    pub soloed: bool,
    /// Ordered FX chain; slot index is the reference used by mutators.
    pub fx: Vec<FxSlot>,
}

impl Channel {
    /// A channel at console defaults: centered pan, unmuted, unsoloed,
    /// carrying the standard FX chain.
    pub fn new(id: impl Into<String>, label: impl Into<String>, volume: u8) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            volume: volume.min(level::MAX_LEVEL),
            pan: 0,
            muted: false,
            soloed: false,
            fx: DEFAULT_FX_CHAIN.iter().map(|s| FxSlot::new(*s)).collect(),
        }
    }
}

/// Owns the channel set for one mixing panel.
///
/// Channels are created as a fixed set when the panel opens and are never
/// individually destroyed - only reset to defaults. Effective levels are
/// derived on every read, never cached on the channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelRegistry {
    channels: Vec<Channel>,
}

impl ChannelRegistry {
    /// Registry with the standard seven-channel strip.
    pub fn new() -> Self {
        Self {
            channels: default_channel_set(),
        }
    }

    /// Registry with a caller-supplied channel set.
    pub fn with_channels(channels: Vec<Channel>) -> Self {
        Self { channels }
    }

    /// Restore every channel to panel-open defaults.
    pub fn reset(&mut self) {
        debug!("mixer reset to defaults");
        self.channels = default_channel_set();
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    fn channel_mut(&mut self, id: &str) -> Option<&mut Channel> {
        self.channels.iter_mut().find(|c| c.id == id)
    }

    /// Set a channel's fader volume, clamped to [0, 100].
    pub fn set_volume(&mut self, id: &str, value: i32) -> bool {
        match self.channel_mut(id) {
            Some(channel) => {
                channel.volume = value.clamp(0, i32::from(level::MAX_LEVEL)) as u8;
                debug!("channel '{}' volume -> {}", id, channel.volume);
                true
            }
            None => false,
        }
    }

    /// Set a channel's pan position, clamped to [-100, 100].
    pub fn set_pan(&mut self, id: &str, value: i32) -> bool {
        match self.channel_mut(id) {
            Some(channel) => {
                channel.pan = value.clamp(-100, 100) as i8;
                debug!("channel '{}' pan -> {}", id, channel.pan);
                true
            }
            None => false,
        }
    }

    pub fn toggle_mute(&mut self, id: &str) -> bool {
        match self.channel_mut(id) {
            Some(channel) => {
                channel.muted = !channel.muted;
                debug!("channel '{}' muted -> {}", id, channel.muted);
                true
            }
            None => false,
        }
    }

    pub fn toggle_solo(&mut self, id: &str) -> bool {
        match self.channel_mut(id) {
            Some(channel) => {
                channel.soloed = !channel.soloed;
                debug!("channel '{}' soloed -> {}", id, channel.soloed);
                true
            }
            None => false,
        }
    }

    /// Toggle an FX slot's enabled flag. Enabling a slot does not change the
    /// channel's effective level; FX are parametric only in this core.
    pub fn toggle_fx(&mut self, id: &str, slot: usize) -> bool {
        match self.channel_mut(id).and_then(|c| c.fx.get_mut(slot)) {
            Some(fx) => {
                fx.enabled = !fx.enabled;
                debug!("channel '{}' fx[{}] enabled -> {}", id, slot, fx.enabled);
                true
            }
            None => false,
        }
    }

    /// Set an FX slot's intensity, clamped to [0, 100].
    ///
    /// A disabled slot ignores the write: the enabled flag gates whether the
    /// intensity parameter is observable downstream at all.
    pub fn set_fx_intensity(&mut self, id: &str, slot: usize, value: i32) -> bool {
        match self.channel_mut(id).and_then(|c| c.fx.get_mut(slot)) {
            Some(fx) if fx.enabled => {
                fx.intensity = value.clamp(0, i32::from(level::MAX_LEVEL)) as u8;
                debug!("channel '{}' fx[{}] intensity -> {}", id, slot, fx.intensity);
                true
            }
            _ => false,
        }
    }

    /// Whether any channel in the registry is soloed.
    pub fn any_solo(&self) -> bool {
        self.channels.iter().any(|c| c.soloed)
    }

    /// Derived audible level for one channel after mute/solo precedence.
    pub fn effective_level(&self, id: &str) -> Option<u8> {
        let any_solo = self.any_solo();
        self.channel(id)
            .map(|c| level::effective_level(c.volume, c.muted, c.soloed, any_solo))
    }

    /// Derived level map for the whole strip, in channel order.
    pub fn level_map(&self) -> Vec<(String, u8)> {
        let any_solo = self.any_solo();
        self.channels
            .iter()
            .map(|c| {
                (
                    c.id.clone(),
                    level::effective_level(c.volume, c.muted, c.soloed, any_solo),
                )
            })
            .collect()
    }

    /// Meter zone for one channel's current effective level.
    pub fn meter_zone(&self, id: &str) -> Option<MeterZone> {
        self.effective_level(id).map(level::meter_zone)
    }

    /// Append one channel per isolated stem, at default volume.
    ///
    /// Stem ids are derived from the stem name and deduplicated against the
    /// existing strip, so re-running an isolation never clobbers a channel.
    pub fn add_stem_channels(&mut self, stems: &[String]) {
        for stem in stems {
            let base = format!("stem-{}", stem.to_lowercase().replace(' ', "-"));
            let mut id = base.clone();
            let mut n = 1;
            while self.channel(&id).is_some() {
                n += 1;
                id = format!("{}-{}", base, n);
            }
            debug!("adding stem channel '{}'", id);
            self.channels.push(Channel::new(id, stem.clone(), DEFAULT_VOLUME));
        }
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn default_channel_set() -> Vec<Channel> {
    DEFAULT_CHANNELS
        .iter()
        .map(|(id, label)| {
            let volume = if *id == "master" {
                DEFAULT_MASTER_VOLUME
            } else {
                DEFAULT_VOLUME
            };
            Channel::new(*id, *label, volume)
        })
        .collect()
}
