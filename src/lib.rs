//! Morse Beacon - text ↔ Morse conversion with beep, trace and speech output
//!
//! The codec and pulse planner are pure; everything under [`render`] and
//! [`speech`] is an optional presentation layer built on top of them.

/// Text ↔ Morse codec
pub mod codec;
/// Configuration management
pub mod config;
/// Fixed phrase translations
pub mod phrasebook;
/// Pulse timing plans
pub mod pulse;
/// Audio and visual renderers
pub mod render;
/// External text-to-speech
pub mod speech;
/// Logging setup
pub mod telemetry;

pub use codec::{decode, encode};
pub use pulse::{plan, Level, PulsePlan, TimedPulse};
