use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::consts::consts::EntityId;

/// A stored person, as returned by every read
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    pub id: EntityId,
    pub name: String,
    pub phone: String,
    /// Kept verbatim as received, `YYYY-M-D`
    pub birth_date: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating a person, already validated by the caller
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPerson {
    pub id: EntityId,
    pub name: String,
    pub phone: String,
    pub birth_date: String,
}

/// Mutable fields of a person. The id is never part of an update
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PersonUpdate {
    pub name: String,
    pub phone: String,
    pub birth_date: String,
}

impl NewPerson {
    /// Stamps the record with its creation time
    pub fn into_person(self, now: DateTime<Utc>) -> Person {
        Person {
            id: self.id,
            name: self.name,
            phone: self.phone,
            birth_date: self.birth_date,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_test() -> Self {
        NewPerson {
            id: EntityId("12345678901".to_string()),
            name: "Maria Silva".to_string(),
            phone: "11987654321".to_string(),
            birth_date: "1990-5-17".to_string(),
        }
    }
}

impl Person {
    pub fn apply_update(&mut self, update: PersonUpdate, now: DateTime<Utc>) {
        self.name = update.name;
        self.phone = update.phone;
        self.birth_date = update.birth_date;
        self.updated_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_camel_case_fields() {
        // Given a stored person
        let person = NewPerson::new_test().into_person(Utc::now());

        // When it is serialized
        let json = serde_json::to_value(&person).expect("should serialize");

        // Then the wire names are camelCase and the id is a bare string
        assert_eq!(json["id"], "12345678901");
        assert_eq!(json["birthDate"], "1990-5-17");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("birth_date").is_none());
    }

    #[test]
    fn update_keeps_id_and_creation_time() {
        // Given a stored person
        let created = Utc::now();
        let mut person = NewPerson::new_test().into_person(created);

        // When it is updated later
        let later = created + chrono::Duration::seconds(5);
        person.apply_update(
            PersonUpdate {
                name: "Maria Souza".to_string(),
                phone: "21912345678".to_string(),
                birth_date: "1990-5-18".to_string(),
            },
            later,
        );

        // Then only the mutable fields and the update time move
        assert_eq!(person.id, EntityId("12345678901".to_string()));
        assert_eq!(person.name, "Maria Souza");
        assert_eq!(person.birth_date, "1990-5-18");
        assert_eq!(person.created_at, created);
        assert_eq!(person.updated_at, later);
    }
}
