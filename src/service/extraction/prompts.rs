//! Prompts for contact profile extraction

use schemars::schema_for;
use serde_json::Value;

use crate::model::field_schema::render_prompt_documentation;
use crate::model::{ContactRecord, ExtractedSuggestion};

/// System prompt for profile extraction
pub const EXTRACTION_SYSTEM_PROMPT: &str = r#"You are a conservative relationship-intelligence analyst. Your task is to read a voice memo transcription about a contact and propose structured updates to that contact's profile.

## Critical Rules

1. **Only use field paths from the documented list.**
   - Never invent a field path, never add a prefix or suffix to one.
   - If a fact does not fit any documented field, leave it out.

2. **Only propose facts stated in, or strongly implied by, the transcription.**
   - Do not restate information the contact profile already contains.
   - Do not speculate about the contact's feelings, motives or plans.

3. **Choose the action carefully.**
   - "add": a new element for an array field, or a new value for an empty field
   - "update": replace the current value of a field wholesale
   - "remove": the transcription says a stored fact is no longer true

4. **Array fields take one element per suggestion.**
   - Submit each new element as its own "add" suggestion.
   - Never resubmit the whole array.

## Output Requirements

- Respond with a JSON array of suggestion objects and nothing else.
- No prose, no markdown, no code fences.
- Return an empty array `[]` if the transcription contains no profile updates; this is a normal outcome.
"#;

/// Guidance on calibrating the confidence score
const CONFIDENCE_GUIDANCE: &str = r#"- 0.9 - 1.0: the fact is stated explicitly in the transcription
- 0.7 - 0.8: a strong inference from what was said
- 0.5 - 0.6: a weak inference; include only when it is still useful"#;

/// System and user instructions for one extraction call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system: String,
    pub user: String,
}

fn identity_line(label: &str, value: Option<&String>) -> String {
    format!("- {}: {}", label, value.map(String::as_str).unwrap_or("(unknown)"))
}

fn render_context(value: &Value) -> String {
    if value.is_null() {
        return "{}".to_string();
    }
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn render_suggestion_schema() -> String {
    let schema = schema_for!(ExtractedSuggestion);
    serde_json::to_string_pretty(&schema).unwrap_or_default()
}

/// Build the extraction prompt for a transcription and the contact's current state
///
/// Pure: identical inputs produce identical text.
pub fn build_extraction_prompt(transcription: &str, contact: &ContactRecord) -> PromptPayload {
    let identity = [
        identity_line("Name", contact.name.as_ref()),
        identity_line("Email", contact.email.as_ref()),
        identity_line("Phone", contact.phone.as_ref()),
        identity_line("Company", contact.company.as_ref()),
        identity_line("Title", contact.title.as_ref()),
        identity_line("Location", contact.location.as_ref()),
        identity_line("LinkedIn", contact.linkedin_url.as_ref()),
    ]
    .join("\n");

    let user = format!(
        r#"Propose profile updates for the following contact based on a voice memo.

## Contact

{identity}

## Current professional_context

{professional}

## Current personal_context

{personal}

## Voice Memo Transcription

{transcription}

---

## Legal Field Paths

{fields}

## Suggestion Object Schema

{schema}

## Confidence Scoring

{confidence}

## Response Format

Return a JSON array where every element has:
- field_path: one of the legal field paths above, verbatim
- action: add | update | remove
- suggested_value: the new value (a single element for array fields with "add"; null to clear a field with "remove")
- confidence: number between 0.0 and 1.0
- reasoning: one sentence grounding the change in the transcription

Return only the JSON array, with no surrounding text or code fences."#,
        professional = render_context(&contact.professional_context),
        personal = render_context(&contact.personal_context),
        fields = render_prompt_documentation(),
        schema = render_suggestion_schema(),
        confidence = CONFIDENCE_GUIDANCE,
    );

    PromptPayload {
        system: EXTRACTION_SYSTEM_PROMPT.to_string(),
        user,
    }
}
