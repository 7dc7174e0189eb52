//! Summarization: prompt construction, the chat-completion client, retries.

pub mod client;
pub mod prompt;
pub mod retry;

pub use client::{ChatClient, ClientSettings, DEFAULT_BASE_URL, Summarizer, TEMPERATURE};
pub use prompt::{Prompt, PromptBuilder};
pub use retry::{RetryPolicy, summarize_with_retry};
