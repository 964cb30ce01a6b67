//! Note resource definition.

use serde::{Deserialize, Serialize};

use super::ResourceDefinition;
use crate::domains::resources::error::ValidationError;
use crate::domains::resources::payload::Payload;
use crate::domains::resources::validation::{optional_bool, required_string};

/// A short note with an importance flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub important: bool,
}

/// A validated note without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub content: String,
    pub important: bool,
}

impl NoteDraft {
    pub fn new(content: impl Into<String>, important: bool) -> Self {
        Self {
            content: content.into(),
            important,
        }
    }
}

impl ResourceDefinition for Note {
    type Draft = NoteDraft;

    const COLLECTION: &'static str = "notes";
    const TITLE: &'static str = "Notebook";
    const PLURAL: &'static str = "notes";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(payload: &Payload) -> Result<NoteDraft, ValidationError> {
        let content = required_string(payload, "content")?;
        let important = optional_bool(payload, "important")?.unwrap_or(false);
        Ok(NoteDraft { content, important })
    }

    fn from_draft(id: String, draft: NoteDraft) -> Self {
        Self {
            id,
            content: draft.content,
            important: draft.important,
        }
    }

    fn to_payload(&self) -> Payload {
        Payload::new()
            .with("id", self.id.clone())
            .with("content", self.content.clone())
            .with("important", self.important)
    }

    fn samples() -> Vec<NoteDraft> {
        vec![
            NoteDraft::new("HTML is easy", true),
            NoteDraft::new("Browser can execute only JavaScript", false),
            NoteDraft::new(
                "GET and POST are the most important methods of HTTP protocol",
                true,
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_note_metadata() {
        assert_eq!(Note::COLLECTION, "notes");
        assert_eq!(Note::base_path(), "/api/notes");
        assert_eq!(Note::summary(3), "Notebook has info for 3 notes");
    }

    #[test]
    fn test_validate_defaults_important_to_false() {
        let draft = Note::validate(&Payload::new().with("content", "Learn Go")).unwrap();
        assert_eq!(draft, NoteDraft::new("Learn Go", false));
    }

    #[test]
    fn test_validate_missing_content() {
        assert_eq!(
            Note::validate(&Payload::new()),
            Err(ValidationError::Missing("content"))
        );
        assert_eq!(
            Note::validate(&Payload::new().with("content", "")),
            Err(ValidationError::Missing("content"))
        );
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let payload = Payload::new()
            .with("content", "x")
            .with("color", "blue")
            .with("id", "123");
        let note = Note::from_draft("5".into(), Note::validate(&payload).unwrap());
        assert_eq!(
            serde_json::to_value(&note).unwrap(),
            json!({"id": "5", "content": "x", "important": false})
        );
    }

    #[test]
    fn test_merged_keeps_id() {
        let note = Note::from_draft("1".into(), NoteDraft::new("HTML is easy", true));
        let patch = Payload::new().with("important", false).with("id", "9");
        let merged = note.merged(&patch).unwrap();
        assert_eq!(merged.id, "1");
        assert_eq!(merged.content, "HTML is easy");
        assert!(!merged.important);
    }

    #[test]
    fn test_merged_cannot_blank_content() {
        let note = Note::from_draft("1".into(), NoteDraft::new("HTML is easy", true));
        let patch = Payload::new().with("content", "");
        assert_eq!(
            note.merged(&patch),
            Err(ValidationError::Missing("content"))
        );
    }

    #[test]
    fn test_deserialize_without_important() {
        let note: Note = serde_json::from_value(json!({"id": "1", "content": "a"})).unwrap();
        assert!(!note.important);
    }
}
