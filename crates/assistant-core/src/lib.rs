//! # assistant-core
//!
//! Chat-layer plumbing for the trading assistant: conversation messages, the
//! append-only memory log, deterministic intent routing, and a
//! provider-agnostic LLM abstraction.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                       Chat layer                           │
//! │  ┌────────────┐  ┌──────────────┐  ┌────────────────────┐  │
//! │  │   Intent   │  │ Conversation │  │    LlmProvider     │  │
//! │  │   Table    │──│  + MemoryLog │──│    (Strategy)      │  │
//! │  └────────────┘  └──────────────┘  └────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `LlmProvider` trait keeps the chat loop independent of the backend
//! (Ollama today, anything else tomorrow). The memory log is an explicit
//! object owned by the chat loop and persisted with a single
//! serialize-on-write operation - never a global.

pub mod error;
pub mod intent;
pub mod memory;
pub mod message;
pub mod provider;

pub use error::{AssistantError, Result};
pub use intent::{Intent, IntentTable};
pub use memory::{ChatTurn, MemoryLog};
pub use message::{Conversation, Message, Role};
pub use provider::{Completion, GenerationOptions, LlmProvider, StreamChunk, TokenUsage};
