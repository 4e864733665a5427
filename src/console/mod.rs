//! Mixing console state
//!
//! This module provides:
//! - Pure level math with mute/solo precedence
//! - `ChannelRegistry` owning the channel strip
//! - `ParameterSurface` mapping a 2-D pad onto named parameters
//! - `ControlConsoleFacade`, the single entry point for the presentation layer

pub mod channel;
pub mod facade;
pub mod level;
pub mod surface;

pub use channel::{Channel, ChannelRegistry, FxSlot};
pub use facade::{ConsoleConfig, ConsoleEvent, ControlConsoleFacade, SubscriptionId};
pub use level::{effective_level, pan_gains, MeterZone};
pub use surface::{Axis, AxisBinding, ControlParameterSet, ParamSpec, ParameterSurface};
