//! Field schema registry
//!
//! The catalog of every contact field path the extraction pipeline may touch,
//! with the value shape each one expects. Lookups are exact: a path is legal
//! only if it is listed here verbatim.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Root key of the personal context JSON tree
pub const PERSONAL_CONTEXT: &str = "personal_context";

/// Root key of the professional context JSON tree
pub const PROFESSIONAL_CONTEXT: &str = "professional_context";

/// Expected shape of a field's value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Array,
    Object,
    String,
    /// Legal path without a declared shape; accepted permissively downstream
    Unknown,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Array => "array",
            Self::Object => "object",
            Self::String => "string",
            Self::Unknown => "unknown",
        }
    }
}

/// Which part of the contact record a field lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// A column on the contact row itself
    Direct,
    Personal,
    Professional,
}

impl FieldGroup {
    fn heading(self) -> &'static str {
        match self {
            Self::Direct => "Direct contact fields",
            Self::Personal => "Personal context fields",
            Self::Professional => "Professional context fields",
        }
    }
}

/// One registry entry
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub path: &'static str,
    pub kind: FieldKind,
    pub description: &'static str,
}

const fn field(path: &'static str, kind: FieldKind, description: &'static str) -> FieldSpec {
    FieldSpec {
        path,
        kind,
        description,
    }
}

pub const DIRECT_FIELDS: &[FieldSpec] = &[
    field("name", FieldKind::String, "Full name"),
    field("email", FieldKind::String, "Primary email address"),
    field("phone", FieldKind::String, "Primary phone number"),
    field("company", FieldKind::String, "Current employer"),
    field("title", FieldKind::String, "Current job title"),
    field("location", FieldKind::String, "City / region they live in"),
    field("linkedin_url", FieldKind::String, "LinkedIn profile URL"),
];

pub const PERSONAL_FIELDS: &[FieldSpec] = &[
    field(
        "personal_context.family.partner",
        FieldKind::Object,
        "Partner or spouse, e.g. {\"name\": \"...\", \"relationship\": \"spouse\"}",
    ),
    field(
        "personal_context.family.children",
        FieldKind::Array,
        "Children, each {\"name\": \"...\", \"age\": ...} or a short description",
    ),
    field("personal_context.family.parents", FieldKind::Array, "Parents"),
    field("personal_context.family.siblings", FieldKind::Array, "Siblings"),
    field("personal_context.interests", FieldKind::Array, "Topics they care about"),
    field("personal_context.hobbies", FieldKind::Array, "Hobbies and activities"),
    field("personal_context.values", FieldKind::Array, "Personal values"),
    field(
        "personal_context.upcoming_changes",
        FieldKind::Array,
        "Upcoming life changes (moves, new roles, births)",
    ),
    field("personal_context.milestones", FieldKind::Array, "Past milestones"),
    field(
        "personal_context.key_life_events",
        FieldKind::Array,
        "Significant life events",
    ),
    field(
        "personal_context.anecdotes",
        FieldKind::Array,
        "Memorable stories they shared",
    ),
    field(
        "personal_context.preferences",
        FieldKind::Object,
        "Preferences, e.g. {\"food\": \"...\", \"drinks\": \"...\"}",
    ),
    field(
        "personal_context.communication_style",
        FieldKind::String,
        "How they prefer to communicate",
    ),
    field(
        "personal_context.relationship_goal",
        FieldKind::String,
        "What the user wants from this relationship",
    ),
    field(
        "personal_context.conversation_starters.personal",
        FieldKind::Array,
        "Personal topics to bring up next time",
    ),
    field(
        "personal_context.conversation_starters.professional",
        FieldKind::Array,
        "Professional topics to bring up next time",
    ),
    field(
        "personal_context.education",
        FieldKind::Unknown,
        "Schools, degrees or other education details",
    ),
];

pub const PROFESSIONAL_FIELDS: &[FieldSpec] = &[
    field(
        "professional_context.current_role",
        FieldKind::String,
        "Current role description",
    ),
    field(
        "professional_context.current_company",
        FieldKind::String,
        "Current company",
    ),
    field("professional_context.industry", FieldKind::String, "Industry"),
    field(
        "professional_context.goals",
        FieldKind::Array,
        "Professional goals",
    ),
    field(
        "professional_context.challenges",
        FieldKind::Array,
        "Current professional challenges",
    ),
    field("professional_context.skills", FieldKind::Array, "Skills"),
    field(
        "professional_context.expertise_areas",
        FieldKind::Array,
        "Areas of expertise",
    ),
    field(
        "professional_context.projects",
        FieldKind::Array,
        "Projects they are working on",
    ),
    field(
        "professional_context.achievements",
        FieldKind::Array,
        "Professional achievements",
    ),
    field(
        "professional_context.opportunities_to_help",
        FieldKind::Array,
        "Ways the user could help them",
    ),
    field(
        "professional_context.ways_they_can_help",
        FieldKind::Array,
        "Ways they could help the user",
    ),
    field(
        "professional_context.work_history",
        FieldKind::Array,
        "Previous roles",
    ),
    field(
        "professional_context.speaking_topics",
        FieldKind::Array,
        "Topics they speak or write about",
    ),
    field(
        "professional_context.background",
        FieldKind::Unknown,
        "Free-form professional background",
    ),
];

fn groups() -> [(FieldGroup, &'static [FieldSpec]); 3] {
    [
        (FieldGroup::Direct, DIRECT_FIELDS),
        (FieldGroup::Personal, PERSONAL_FIELDS),
        (FieldGroup::Professional, PROFESSIONAL_FIELDS),
    ]
}

/// Look up a registry entry by exact path
pub fn lookup(path: &str) -> Option<(FieldGroup, &'static FieldSpec)> {
    groups().into_iter().find_map(|(group, fields)| {
        fields
            .iter()
            .find(|spec| spec.path == path)
            .map(|spec| (group, spec))
    })
}

/// True if `path` is listed verbatim in the registry
pub fn is_valid_field_path(path: &str) -> bool {
    lookup(path).is_some()
}

/// Expected value shape for a path
///
/// Unclassified paths and paths outside the registry report `Unknown`;
/// callers check legality separately.
pub fn expected_type(path: &str) -> FieldKind {
    lookup(path)
        .map(|(_, spec)| spec.kind)
        .unwrap_or(FieldKind::Unknown)
}

/// Render the registry as prompt documentation
///
/// Output is deterministic: groups and fields appear in declaration order.
pub fn render_prompt_documentation() -> String {
    let mut doc = String::new();

    for (group, fields) in groups() {
        doc.push_str(&format!("### {}\n", group.heading()));
        for spec in fields {
            doc.push_str(&format!(
                "- `{}` ({}): {}",
                spec.path,
                spec.kind.as_str(),
                spec.description
            ));
            if spec.kind == FieldKind::Array {
                doc.push_str(
                    " [array field: submit each new element as its own \"add\" suggestion, never replace the whole array]",
                );
            }
            doc.push('\n');
        }
        doc.push('\n');
    }

    doc
}

/// Where a field path resolves inside a contact record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLocation<'a> {
    /// Column on the contact row
    Direct(&'a str),
    /// Key path below `personal_context`
    Personal(Vec<&'a str>),
    /// Key path below `professional_context`
    Professional(Vec<&'a str>),
}

/// Split a registry path into its storage location
///
/// Returns `None` for paths outside the registry.
pub fn locate(path: &str) -> Option<FieldLocation<'_>> {
    let (group, _) = lookup(path)?;
    match group {
        FieldGroup::Direct => Some(FieldLocation::Direct(path)),
        FieldGroup::Personal => path
            .strip_prefix("personal_context.")
            .map(|rest| FieldLocation::Personal(rest.split('.').collect())),
        FieldGroup::Professional => path
            .strip_prefix("professional_context.")
            .map(|rest| FieldLocation::Professional(rest.split('.').collect())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        assert!(is_valid_field_path("personal_context.family.partner"));
        assert!(is_valid_field_path("email"));
        assert!(!is_valid_field_path("personal_context.family"));
        assert!(!is_valid_field_path("personal_context.family.partner.name"));
        assert!(!is_valid_field_path("personal_context.pets"));
        assert!(!is_valid_field_path("personal_context.*"));
        assert!(!is_valid_field_path(""));
    }

    #[test]
    fn test_expected_types() {
        assert_eq!(
            expected_type("personal_context.upcoming_changes"),
            FieldKind::Array
        );
        assert_eq!(
            expected_type("personal_context.family.partner"),
            FieldKind::Object
        );
        assert_eq!(expected_type("title"), FieldKind::String);
        assert_eq!(
            expected_type("professional_context.background"),
            FieldKind::Unknown
        );
        assert_eq!(expected_type("not.a.path"), FieldKind::Unknown);
    }

    #[test]
    fn test_paths_are_unique() {
        let mut seen = std::collections::HashSet::new();
        for (_, fields) in groups() {
            for spec in fields {
                assert!(seen.insert(spec.path), "duplicate path {}", spec.path);
            }
        }
    }

    #[test]
    fn test_documentation_is_deterministic_and_complete() {
        let first = render_prompt_documentation();
        assert_eq!(first, render_prompt_documentation());

        for (_, fields) in groups() {
            for spec in fields {
                assert!(first.contains(&format!("`{}`", spec.path)));
            }
        }

        let direct = first.find("### Direct contact fields").unwrap();
        let personal = first.find("### Personal context fields").unwrap();
        let professional = first.find("### Professional context fields").unwrap();
        assert!(direct < personal && personal < professional);
    }

    #[test]
    fn test_array_fields_carry_add_instruction() {
        let doc = render_prompt_documentation();
        let line = doc
            .lines()
            .find(|l| l.contains("`personal_context.hobbies`"))
            .unwrap();
        assert!(line.contains("\"add\""));

        let line = doc.lines().find(|l| l.contains("`title`")).unwrap();
        assert!(!line.contains("\"add\""));
    }

    #[test]
    fn test_locate() {
        assert_eq!(locate("company"), Some(FieldLocation::Direct("company")));
        assert_eq!(
            locate("personal_context.family.partner"),
            Some(FieldLocation::Personal(vec!["family", "partner"]))
        );
        assert_eq!(
            locate("professional_context.goals"),
            Some(FieldLocation::Professional(vec!["goals"]))
        );
        assert_eq!(locate("personal_context.pets"), None);
    }
}
