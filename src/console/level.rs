//! Level math for the mixing console
//!
//! Effective level is a derived projection over the whole channel set, not
//! per-channel local state: whether one channel is audible depends on every
//! other channel's solo flag. Keeping these as pure functions means the
//! registry can recompute on demand and nothing can go stale.

/// Upper bound of the fader/meter range.
pub const MAX_LEVEL: u8 = 100;

/// Levels above this read as "hot" on the meter.
pub const HOT_THRESHOLD: u8 = 85;

/// Audible level of one channel given the console-wide solo state.
///
/// Precedence: if any channel is soloed (`any_solo`), non-soloed channels
/// are silent regardless of their own mute flag. Among soloed channels -
/// or when nothing is soloed - mute silences, otherwise the fader volume
/// passes through.
pub fn effective_level(volume: u8, muted: bool, soloed: bool, any_solo: bool) -> u8 {
    if any_solo && !soloed {
        return 0;
    }
    if muted {
        return 0;
    }
    volume.min(MAX_LEVEL)
}

/// Meter zone for a metered level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeterZone {
    Nominal,
    Hot,
}

/// Classify a metered level into its display zone.
pub fn meter_zone(level: u8) -> MeterZone {
    if level > HOT_THRESHOLD {
        MeterZone::Hot
    } else {
        MeterZone::Nominal
    }
}

/// Constant-power left/right gains for a pan position in [-100, 100].
///
/// Does not participate in effective-level math; hosts use it to render a
/// stereo meter from a mono level.
pub fn pan_gains(pan: i8) -> (f32, f32) {
    let pos = (f32::from(pan.clamp(-100, 100)) / 100.0 + 1.0) * 0.5;
    let theta = pos * std::f32::consts::FRAC_PI_2;
    (theta.cos(), theta.sin())
}
