//! Cadenza - Control-Surface Core for an AI Music Studio
//!
//! Cadenza models the two stateful halves of the studio shell:
//! 1. Mixing Console - channel volume/pan/mute/solo with derived metering
//! 2. Generation Jobs - single-flight asynchronous requests to AI engines
//!
//! # Architecture
//!
//! The console side is plain synchronous state: a [`console::ChannelRegistry`]
//! owning the channel strip, a [`console::ParameterSurface`] mapping a 2-D pad
//! onto named synthesis parameters, and a [`console::ControlConsoleFacade`]
//! that composes them with one [`generation::JobOrchestrator`] per generation
//! surface and notifies subscribers on every observable change.
//!
//! The generation side is a small state machine ({Idle, Pending, Succeeded,
//! Failed}) fed by a [`generation::GenerationProvider`]. Providers complete on
//! their own time; the console drains completions cooperatively via `poll()`
//! and never blocks.

pub mod cli;
pub mod console;
pub mod error;
pub mod generation;

// Re-export commonly used types
pub use console::{ChannelRegistry, ControlConsoleFacade, ParameterSurface};
pub use error::{CadenzaError, Result};
