pub mod client;
pub mod generator;
#[cfg(test)]
pub mod mock;
pub mod prompts;

// Public API exports
pub use client::{CompletionRequest, LlmProvider, ModelConfig, OpenRouterClient, DEFAULT_MODEL};
pub use generator::{
    generate_quiz, generate_summary, get_clarification, parse_quiz_response,
    CLARIFICATION_FALLBACK, SUMMARY_FALLBACK,
};
pub use prompts::{ClarificationContext, GenerationOptions};
