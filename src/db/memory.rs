use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::{decode_entries, email_taken, InsertOutcome, RecordStore};
use crate::errors::AppError;
use crate::models::employee::Employee;

/// In-process hash. A single write lock covers the insert check-and-write.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a raw value as-is, bypassing encoding. Used to seed fixtures.
    pub async fn put_raw(&self, field: &str, value: &str) {
        self.entries
            .write()
            .await
            .insert(field.to_string(), value.to_string());
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }
}

fn pairs<'a>(
    entries: &'a HashMap<String, String>,
) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Employee>, AppError> {
        let entries = self.entries.read().await;
        Ok(decode_entries(pairs(&entries)))
    }

    async fn insert_unique(&self, employee: &Employee) -> Result<InsertOutcome, AppError> {
        let mut entries = self.entries.write().await;

        if email_taken(pairs(&entries), &employee.email) {
            return Ok(InsertOutcome::DuplicateEmail);
        }
        if entries.contains_key(&employee.id) {
            return Ok(InsertOutcome::DuplicateId);
        }

        entries.insert(employee.id.clone(), employee.to_json()?);
        Ok(InsertOutcome::Inserted)
    }

    async fn replace(&self, employee: &Employee) -> Result<(), AppError> {
        let value = employee.to_json()?;
        self.entries.write().await.insert(employee.id.clone(), value);
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<bool, AppError> {
        Ok(self.entries.write().await.remove(id).is_some())
    }
}
