//! Phonebook entry definition.

use serde::{Deserialize, Serialize};

use super::ResourceDefinition;
use crate::domains::resources::error::ValidationError;
use crate::domains::resources::payload::Payload;
use crate::domains::resources::validation::{optional_string, required_string};

/// A person with an optional phone number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

/// A validated person without an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
}

impl PersonDraft {
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: Some(number.into()),
        }
    }
}

impl ResourceDefinition for Person {
    type Draft = PersonDraft;

    const COLLECTION: &'static str = "persons";
    const TITLE: &'static str = "Phonebook";
    const PLURAL: &'static str = "people";

    fn id(&self) -> &str {
        &self.id
    }

    fn validate(payload: &Payload) -> Result<PersonDraft, ValidationError> {
        let name = required_string(payload, "name")?;
        let number = optional_string(payload, "number")?;
        Ok(PersonDraft { name, number })
    }

    fn from_draft(id: String, draft: PersonDraft) -> Self {
        Self {
            id,
            name: draft.name,
            number: draft.number,
        }
    }

    fn to_payload(&self) -> Payload {
        let payload = Payload::new()
            .with("id", self.id.clone())
            .with("name", self.name.clone());
        match &self.number {
            Some(number) => payload.with("number", number.clone()),
            None => payload,
        }
    }

    fn samples() -> Vec<PersonDraft> {
        vec![
            PersonDraft::new("Arto Hellas", "040-123456"),
            PersonDraft::new("Ada Lovelace", "39-44-5323523"),
            PersonDraft::new("Dan Abramov", "12-43-234345"),
            PersonDraft::new("Mary Poppendieck", "39-23-6423122"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_person_summary() {
        assert_eq!(Person::summary(4), "Phonebook has info for 4 people");
        assert_eq!(Person::base_path(), "/api/persons");
    }

    #[test]
    fn test_number_is_optional() {
        let draft = Person::validate(&Payload::new().with("name", "Ada")).unwrap();
        let person = Person::from_draft("1".into(), draft);
        assert_eq!(
            serde_json::to_value(&person).unwrap(),
            json!({"id": "1", "name": "Ada"})
        );
    }

    #[test]
    fn test_name_required_even_with_number() {
        let payload = Payload::new().with("number", "040-123456");
        assert_eq!(
            Person::validate(&payload),
            Err(ValidationError::Missing("name"))
        );
    }

    #[test]
    fn test_merged_updates_number() {
        let person = Person::from_draft("2".into(), PersonDraft::new("Ada Lovelace", "1"));
        let merged = person
            .merged(&Payload::new().with("number", "39-44-5323523"))
            .unwrap();
        assert_eq!(merged.name, "Ada Lovelace");
        assert_eq!(merged.number.as_deref(), Some("39-44-5323523"));
    }
}
