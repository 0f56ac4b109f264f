//! # Examscope LLM
//!
//! Chat-completions client for OpenRouter-compatible endpoints.
//!
//! Configuration comes from the process environment once at startup: a
//! missing API key is a fatal configuration error, never something to retry
//! around. The client itself is a thin typed wrapper over the wire format;
//! prompt construction lives with the callers.

mod client;
mod config;
mod error;

pub use client::{ChatMessage, LlmClient};
pub use config::LlmConfig;
pub use error::{LlmError, Result};
