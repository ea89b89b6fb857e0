use std::{
    collections::BTreeMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::Utc;

use crate::{
    consts::consts::EntityId,
    model::person::{NewPerson, Person, PersonUpdate},
};

use super::{PersonStore, StoreError, StoreResult};

/// Keeps every person in an ordered map, keyed by id. Nothing survives a restart
#[derive(Default)]
pub struct MemoryPersonStore {
    people: Mutex<BTreeMap<EntityId, Person>>,
}

impl MemoryPersonStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn people(&self) -> StoreResult<MutexGuard<'_, BTreeMap<EntityId, Person>>> {
        self.people.lock().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl PersonStore for MemoryPersonStore {
    async fn ensure_schema(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list_all(&self) -> StoreResult<Vec<Person>> {
        Ok(self.people()?.values().cloned().collect())
    }

    async fn get_by_id(&self, id: &EntityId) -> StoreResult<Option<Person>> {
        Ok(self.people()?.get(id).cloned())
    }

    async fn create(&self, person: NewPerson) -> StoreResult<Person> {
        let mut people = self.people()?;

        if people.contains_key(&person.id) {
            return Err(StoreError::DuplicateId(person.id));
        }

        let person = person.into_person(Utc::now());
        people.insert(person.id.clone(), person.clone());

        Ok(person)
    }

    async fn update(&self, id: &EntityId, update: PersonUpdate) -> StoreResult<u64> {
        match self.people()?.get_mut(id) {
            Some(person) => {
                person.apply_update(update, Utc::now());
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn remove(&self, id: &EntityId) -> StoreResult<u64> {
        Ok(self.people()?.remove(id).map_or(0, |_| 1))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use rstest::rstest;

    use super::*;

    fn update_data(birth_date: &str) -> PersonUpdate {
        PersonUpdate {
            name: "João Pereira".to_string(),
            phone: "31999990000".to_string(),
            birth_date: birth_date.to_string(),
        }
    }

    mod crud {
        use super::*;

        #[test_log::test(tokio::test)]
        async fn create_then_get_returns_same_fields() {
            // Given an empty store
            let store = MemoryPersonStore::new();

            // When we create a person
            let created = store
                .create(NewPerson::new_test())
                .await
                .expect("should create");

            // Then reading it back returns the same record
            let fetched = store
                .get_by_id(&created.id)
                .await
                .expect("should read")
                .expect("should exist");

            assert_eq!(fetched, created);
            assert_eq!(fetched.birth_date, "1990-5-17");
        }

        #[tokio::test]
        async fn get_missing_is_none() {
            let store = MemoryPersonStore::new();

            let fetched = store
                .get_by_id(&EntityId("00000000000".to_string()))
                .await
                .expect("should read");

            assert_eq!(fetched, None);
        }

        #[tokio::test]
        async fn list_is_empty_then_ordered_by_id() {
            // Given an empty store
            let store = MemoryPersonStore::new();
            assert!(store.list_all().await.expect("should list").is_empty());

            // When people are added out of order
            for id in ["33333333333", "11111111111", "22222222222"] {
                let mut person = NewPerson::new_test();
                person.id = EntityId(id.to_string());
                store.create(person).await.expect("should create");
            }

            // Then they are listed by id
            let ids: Vec<String> = store
                .list_all()
                .await
                .expect("should list")
                .into_iter()
                .map(|p| p.id.to_string())
                .collect();

            assert_eq!(ids, vec!["11111111111", "22222222222", "33333333333"]);
        }

        #[tokio::test]
        async fn duplicate_id_is_rejected() {
            // Given a stored person
            let store = MemoryPersonStore::new();
            store
                .create(NewPerson::new_test())
                .await
                .expect("should create");

            // When the same id is created again
            let result = store.create(NewPerson::new_test()).await;

            // Then the store refuses it and the original stays
            assert!(matches!(result, Err(StoreError::DuplicateId(_))));
            assert_eq!(store.list_all().await.expect("should list").len(), 1);
        }

        #[rstest]
        #[case::existing("12345678901", 1)]
        #[case::missing("99999999999", 0)]
        #[tokio::test]
        async fn update_reports_affected_rows(#[case] id: &str, #[case] expected: u64) {
            // Given a stored person
            let store = MemoryPersonStore::new();
            store
                .create(NewPerson::new_test())
                .await
                .expect("should create");

            // When an update targets the id
            let affected = store
                .update(&EntityId(id.to_string()), update_data("1990-5-18"))
                .await
                .expect("should update");

            // Then the count reflects whether the row existed
            assert_eq!(affected, expected);
        }

        #[tokio::test]
        async fn update_replaces_mutable_fields() {
            let store = MemoryPersonStore::new();
            let created = store
                .create(NewPerson::new_test())
                .await
                .expect("should create");

            store
                .update(&created.id, update_data("2001-12-31"))
                .await
                .expect("should update");

            let fetched = store
                .get_by_id(&created.id)
                .await
                .expect("should read")
                .expect("should exist");

            assert_eq!(fetched.name, "João Pereira");
            assert_eq!(fetched.phone, "31999990000");
            assert_eq!(fetched.birth_date, "2001-12-31");
            assert_eq!(fetched.created_at, created.created_at);
        }

        #[rstest]
        #[case::existing("12345678901", 1)]
        #[case::missing("99999999999", 0)]
        #[tokio::test]
        async fn remove_reports_affected_rows(#[case] id: &str, #[case] expected: u64) {
            let store = MemoryPersonStore::new();
            store
                .create(NewPerson::new_test())
                .await
                .expect("should create");

            let affected = store
                .remove(&EntityId(id.to_string()))
                .await
                .expect("should remove");

            assert_eq!(affected, expected);
        }

        #[tokio::test]
        async fn remove_twice_affects_once() {
            let store = MemoryPersonStore::new();
            let created = store
                .create(NewPerson::new_test())
                .await
                .expect("should create");

            assert_eq!(store.remove(&created.id).await.expect("remove"), 1);
            assert_eq!(store.remove(&created.id).await.expect("remove"), 0);
            assert_eq!(store.get_by_id(&created.id).await.expect("get"), None);
        }
    }

    mod concurrency {
        use super::*;

        #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
        async fn concurrent_creates_with_same_id_admit_one() {
            // Given an empty store shared by several tasks
            let store = Arc::new(MemoryPersonStore::new());

            // When they all create the same id at once
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let store = store.clone();
                    tokio::spawn(async move { store.create(NewPerson::new_test()).await })
                })
                .collect();

            let mut created = 0;
            let mut duplicates = 0;

            for handle in handles {
                match handle.await.expect("task should not panic") {
                    Ok(_) => created += 1,
                    Err(StoreError::DuplicateId(_)) => duplicates += 1,
                    Err(e) => panic!("unexpected error: {}", e),
                }
            }

            // Then exactly one wins
            assert_eq!(created, 1);
            assert_eq!(duplicates, 7);
        }
    }
}
