//! 2-D control surface mapped onto a named parameter set
//!
//! The surface owns a set of declared parameters (name + [min, max]) and a
//! projection table binding pad axes to parameter names. Positions and
//! single-parameter edits both clamp; the projection is configuration, not
//! logic, so other engines can declare their own parameter sets.

use log::debug;
use serde::{Deserialize, Serialize};

/// Upper bound of a pad axis; positions are in [0, 100].
pub const AXIS_MAX: u8 = 100;

/// A declared surface parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub min: i32,
    pub max: i32,
    pub default: i32,
}

impl ParamSpec {
    pub fn new(name: impl Into<String>, min: i32, max: i32, default: i32) -> Self {
        Self {
            name: name.into(),
            min,
            max,
            default: default.clamp(min, max),
        }
    }

    fn clamp(&self, value: i32) -> i32 {
        value.clamp(self.min, self.max)
    }
}

/// A pad axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

/// One row of the projection table: an axis driving a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisBinding {
    pub axis: Axis,
    pub parameter: String,
    /// Inverted axes map position 0 to the parameter maximum. The default
    /// granular pad inverts Y so the top of the pad is maximum pitch.
    pub inverted: bool,
}

impl AxisBinding {
    pub fn new(axis: Axis, parameter: impl Into<String>) -> Self {
        Self {
            axis,
            parameter: parameter.into(),
            inverted: false,
        }
    }

    pub fn inverted(mut self) -> Self {
        self.inverted = true;
        self
    }
}

/// Read-only copy of the surface state, for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControlParameterSet {
    params: Vec<(ParamSpec, i32)>,
}

impl ControlParameterSet {
    /// Current value of a parameter, if declared.
    pub fn value(&self, name: &str) -> Option<i32> {
        self.params
            .iter()
            .find(|(spec, _)| spec.name == name)
            .map(|(_, value)| *value)
    }

    /// Declared parameters with their current values, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&ParamSpec, i32)> {
        self.params.iter().map(|(spec, value)| (spec, *value))
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// A 2-D control surface plus single-axis knobs over one parameter set.
#[derive(Debug, Clone)]
pub struct ParameterSurface {
    specs: Vec<ParamSpec>,
    values: Vec<i32>,
    bindings: Vec<AxisBinding>,
    position: (u8, u8),
}

impl ParameterSurface {
    /// Surface over a declared parameter set with a projection table.
    /// Parameters open at their declared defaults; the pad rests centered.
    pub fn new(specs: Vec<ParamSpec>, bindings: Vec<AxisBinding>) -> Self {
        let values = specs.iter().map(|s| s.default).collect();
        Self {
            specs,
            values,
            bindings,
            position: (AXIS_MAX / 2, AXIS_MAX / 2),
        }
    }

    /// The granular-engine surface: grain size, density, pitch, spread,
    /// attack, release, with the pad projecting x onto density and y
    /// (inverted) onto pitch.
    pub fn granular() -> Self {
        Self::new(
            vec![
                ParamSpec::new("grain_size", 0, 100, 50),
                ParamSpec::new("density", 0, 100, 70),
                ParamSpec::new("pitch", -24, 24, 0),
                ParamSpec::new("spread", 0, 100, 40),
                ParamSpec::new("attack", 0, 100, 30),
                ParamSpec::new("release", 0, 100, 50),
            ],
            vec![
                AxisBinding::new(Axis::X, "density"),
                AxisBinding::new(Axis::Y, "pitch").inverted(),
            ],
        )
    }

    /// Set one parameter directly, clamped to its declared range.
    /// Unknown names are a no-op returning `false`.
    pub fn set_parameter(&mut self, name: &str, value: i32) -> bool {
        match self.specs.iter().position(|s| s.name == name) {
            Some(index) => {
                self.values[index] = self.specs[index].clamp(value);
                debug!("surface parameter '{}' -> {}", name, self.values[index]);
                true
            }
            None => false,
        }
    }

    /// Move the pad. Both axes clamp to [0, 100] and every bound parameter
    /// is remapped linearly across its declared range.
    pub fn set_position(&mut self, x: i32, y: i32) {
        let x = x.clamp(0, i32::from(AXIS_MAX)) as u8;
        let y = y.clamp(0, i32::from(AXIS_MAX)) as u8;
        self.position = (x, y);
        debug!("surface position -> ({}, {})", x, y);

        for binding in &self.bindings {
            let raw = match binding.axis {
                Axis::X => x,
                Axis::Y => y,
            };
            let pos = if binding.inverted { AXIS_MAX - raw } else { raw };
            if let Some(index) = self.specs.iter().position(|s| s.name == binding.parameter) {
                self.values[index] = project(&self.specs[index], pos);
            }
        }
    }

    /// Last pad position, for rendering the dot.
    pub fn position(&self) -> (u8, u8) {
        self.position
    }

    /// Current value of a parameter, if declared.
    pub fn value(&self, name: &str) -> Option<i32> {
        self.specs
            .iter()
            .position(|s| s.name == name)
            .map(|i| self.values[i])
    }

    /// Read-only copy of the full parameter set.
    pub fn snapshot(&self) -> ControlParameterSet {
        ControlParameterSet {
            params: self
                .specs
                .iter()
                .cloned()
                .zip(self.values.iter().copied())
                .collect(),
        }
    }
}

/// Linear map of an axis position in [0, 100] onto a parameter range,
/// rounding to the nearest integer value.
fn project(spec: &ParamSpec, pos: u8) -> i32 {
    let span = i64::from(spec.max) - i64::from(spec.min);
    let mapped = i64::from(spec.min) + (i64::from(pos) * span + 50) / 100;
    mapped as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn test_opens_at_defaults() {
        let surface = ParameterSurface::granular();
        assert_eq!(surface.value("density"), Some(70));
        assert_eq!(surface.value("pitch"), Some(0));
        assert_eq!(surface.position(), (50, 50));
    }

    #[test]
    fn test_midpoint_maps_to_range_midpoints() {
        let mut surface = ParameterSurface::granular();
        surface.set_position(50, 50);
        assert_eq!(surface.value("density"), Some(50));
        assert_eq!(surface.value("pitch"), Some(0));
    }

    #[test]
    fn test_extremes_map_to_range_extremes() {
        let mut surface = ParameterSurface::granular();
        surface.set_position(0, 0);
        assert_eq!(surface.value("density"), Some(0));
        // Y is inverted: top of the pad is maximum pitch.
        assert_eq!(surface.value("pitch"), Some(24));

        surface.set_position(100, 100);
        assert_eq!(surface.value("density"), Some(100));
        assert_eq!(surface.value("pitch"), Some(-24));
    }

    #[test_case(150, 150, (100, 100) ; "clamps above")]
    #[test_case(-20, -20, (0, 0) ; "clamps below")]
    fn test_position_clamps(x: i32, y: i32, stored: (u8, u8)) {
        let mut surface = ParameterSurface::granular();
        surface.set_position(x, y);
        assert_eq!(surface.position(), stored);
    }

    #[test]
    fn test_set_parameter_clamps_and_rejects_unknown() {
        let mut surface = ParameterSurface::granular();
        assert!(surface.set_parameter("pitch", 99));
        assert_eq!(surface.value("pitch"), Some(24));
        assert!(surface.set_parameter("attack", -5));
        assert_eq!(surface.value("attack"), Some(0));
        assert!(!surface.set_parameter("wobble", 10));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut surface = ParameterSurface::granular();
        let snapshot = surface.snapshot();
        surface.set_parameter("spread", 90);
        assert_eq!(snapshot.value("spread"), Some(40));
        assert_eq!(surface.value("spread"), Some(90));
        assert_eq!(snapshot.len(), 6);
    }

    #[test]
    fn test_position_drives_only_bound_parameters() {
        let mut surface = ParameterSurface::granular();
        surface.set_position(10, 10);
        assert_eq!(surface.value("grain_size"), Some(50));
        assert_eq!(surface.value("attack"), Some(30));
    }
}
