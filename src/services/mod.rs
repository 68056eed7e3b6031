// Service exports
pub mod llm;
pub mod search;

pub use llm::{LlmClient, LlmError, PrimaryAnalyzer};
pub use search::{GoogleSearchClient, SearchError, SearchGateway};
