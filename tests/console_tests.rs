//! Console Integration Tests
//!
//! End-to-end scenarios for the mixer strip and the granular surface.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;

use cadenza::console::{Channel, ChannelRegistry, ConsoleConfig, ControlConsoleFacade};
use cadenza::generation::MockProvider;

fn three_channel_registry() -> ChannelRegistry {
    ChannelRegistry::with_channels(vec![
        Channel::new("a", "A", 75),
        Channel::new("b", "B", 75),
        Channel::new("c", "C", 75),
    ])
}

fn levels(registry: &ChannelRegistry) -> Vec<u8> {
    registry.level_map().into_iter().map(|(_, l)| l).collect()
}

fn console() -> ControlConsoleFacade {
    ControlConsoleFacade::new(
        Arc::new(MockProvider::with_delay(Duration::from_millis(1))),
        ConsoleConfig::default(),
    )
}

// === Solo/mute precedence ===

#[test]
fn test_solo_mute_scenario() {
    let mut registry = three_channel_registry();
    assert_eq!(levels(&registry), vec![75, 75, 75]);

    // Solo B: everything else goes silent.
    registry.toggle_solo("b");
    assert_eq!(levels(&registry), vec![0, 75, 0]);

    // Mute B while still soloed: mute wins among soloed channels.
    registry.toggle_mute("b");
    assert_eq!(levels(&registry), vec![0, 0, 0]);

    // Un-solo B: the strip comes back, B stays muted.
    registry.toggle_solo("b");
    assert_eq!(levels(&registry), vec![75, 0, 75]);
}

#[test]
fn test_non_soloed_channels_silent_regardless_of_own_flags() {
    let mut registry = three_channel_registry();
    registry.toggle_solo("a");
    registry.set_volume("c", 100);
    registry.toggle_mute("c");
    // C's own volume and mute are irrelevant while A holds the solo.
    assert_eq!(registry.effective_level("c"), Some(0));
    assert_eq!(registry.effective_level("a"), Some(75));
}

#[test]
fn test_multiple_solos_coexist() {
    let mut registry = three_channel_registry();
    registry.toggle_solo("a");
    registry.toggle_solo("c");
    assert_eq!(levels(&registry), vec![75, 0, 75]);
}

// === Clamping through the facade ===

#[test]
fn test_facade_clamps_volume_and_pan() {
    let mut console = console();
    console.set_volume("drums", 150);
    console.set_pan("drums", -250);
    let drums = console
        .channels()
        .iter()
        .find(|c| c.id == "drums")
        .unwrap()
        .clone();
    assert_eq!(drums.volume, 100);
    assert_eq!(drums.pan, -100);

    console.set_volume("drums", -10);
    assert_eq!(console.effective_level("drums"), Some(0));
}

// === Surface projection ===

#[test]
fn test_surface_midpoint_and_extremes() {
    let mut console = console();

    console.set_surface_position(50, 50);
    let snapshot = console.surface_snapshot();
    assert_eq!(snapshot.value("density"), Some(50));
    assert_eq!(snapshot.value("pitch"), Some(0));

    console.set_surface_position(0, 0);
    let snapshot = console.surface_snapshot();
    assert_eq!(snapshot.value("density"), Some(0));
    assert_eq!(snapshot.value("pitch"), Some(24));

    console.set_surface_position(100, 100);
    let snapshot = console.surface_snapshot();
    assert_eq!(snapshot.value("density"), Some(100));
    assert_eq!(snapshot.value("pitch"), Some(-24));
}

#[test]
fn test_fx_state_does_not_move_levels() {
    let mut console = console();
    let before = console.effective_level("keys");
    console.toggle_fx("keys", 0);
    console.set_fx_intensity("keys", 0, 90);
    assert_eq!(console.effective_level("keys"), before);
}

#[test]
fn test_reset_after_heavy_editing() {
    let mut console = console();
    console.set_volume("vocals", 10);
    console.toggle_solo("vocals");
    console.toggle_mute("drums");
    console.set_surface_position(0, 0);
    console.reset_mixer();

    let vocals = console
        .channels()
        .iter()
        .find(|c| c.id == "vocals")
        .unwrap();
    assert_eq!(vocals.volume, 75);
    assert!(!vocals.soloed);
    assert_eq!(console.effective_level("drums"), Some(75));
    // The surface is untouched by a mixer reset.
    assert_eq!(console.surface_snapshot().value("pitch"), Some(24));
}
