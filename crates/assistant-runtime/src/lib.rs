//! # assistant-runtime
//!
//! Concrete [`assistant_core::LlmProvider`] backends. Ollama is the default
//! (local inference, no API key); the feature gate leaves room for hosted
//! providers later without touching the chat loop.

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "ollama")]
pub use ollama::{OllamaConfig, OllamaProvider};
