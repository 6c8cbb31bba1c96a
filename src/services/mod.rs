pub mod generation;
pub mod openai_client;
pub mod prompt;
pub mod sanitize;

pub use generation::GenerationPipeline;
pub use openai_client::OpenAIClient;
pub use prompt::{build_prompt, PromptPair};
