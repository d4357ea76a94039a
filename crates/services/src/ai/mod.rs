pub mod client;
pub mod parse;
pub mod prompts;
pub mod remedial;

pub use client::{ChatCompletionsClient, LanguageModel, LlmConfig};
pub use parse::{parse_structured, strip_code_fence};
pub use remedial::RemedialPlanner;
