pub mod artifact;
pub mod config;
pub mod contact;
pub mod field_schema;
pub mod suggestion;

pub use artifact::{
    AiParsingStatus, Artifact, ArtifactType, Ineligibility, ResetOutcome, TranscriptionStatus,
};
pub use config::{Config, ExtractionConfig};
pub use contact::{ContactPatch, ContactRecord, ContactWriteError, FieldWrite};
pub use field_schema::FieldKind;
pub use suggestion::{
    ExtractedSuggestion, ReviewState, SuggestedUpdates, Suggestion, SuggestionAction,
    SuggestionPriority, SuggestionRecord, SuggestionStatus,
};
