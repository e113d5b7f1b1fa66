//! Quizladder · ladder-quiz game backend library.
//!
//! The game engine (`engine`) is a synchronous state machine; everything
//! async (timers, question generation, WebSocket IO) lives at the edges in
//! `routes` and `state`. Exposed as a library so integration tests can drive
//! the engine directly.

pub mod telemetry;
pub mod util;
pub mod domain;
pub mod config;
pub mod bank;
pub mod engine;
pub mod state;
pub mod protocol;
pub mod openai;
pub mod routes;
