//! Text-generation collaborator.
//!
//! The planner hands the skeleton to a chat model, which names the subject
//! of every study block and writes some advice around the week. The model is
//! opaque: a [`TextGenerator`] takes a system instruction and a prompt and
//! returns raw text. [`prompt`] builds the request, [`response`] turns the
//! reply back into schedule data.

pub mod client;
pub mod prompt;
pub mod response;

pub use client::{ChatCompletionClient, GenerationConfig};
pub use response::{GeneratedPlan, ResponseError};

use anyhow::Result;
use async_trait::async_trait;

/// A chat model behind a single request/response call.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Complete `prompt` under the `system` instruction.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}
