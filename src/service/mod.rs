pub mod extraction;
pub mod llm;
pub mod reprocess;
pub mod review;

pub use extraction::{ExtractionOutcome, ExtractionPipeline, ExtractionStatus};
pub use llm::{LlmClient, TextCompletion};
pub use reprocess::ReprocessService;
pub use review::SuggestionReviewService;
