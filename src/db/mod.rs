//! Record store: a single named hash whose fields are employee identifiers and
//! whose values are the JSON encoding of each record.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use log::{info, warn};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::employee::Employee;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Result of an insert attempt. Rejections leave the hash untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    DuplicateEmail,
    DuplicateId,
}

/// Access to the employee hash. `insert_unique` performs its email check and
/// the write as one atomic step.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All decodable records, in whatever order the backend yields them.
    async fn list(&self) -> Result<Vec<Employee>, AppError>;

    async fn insert_unique(&self, employee: &Employee) -> Result<InsertOutcome, AppError>;

    /// Overwrites (or creates) the record at `employee.id`. No checks.
    async fn replace(&self, employee: &Employee) -> Result<(), AppError>;

    /// Returns whether an entry was present.
    async fn remove(&self, id: &str) -> Result<bool, AppError>;
}

/// Decodes raw hash values, skipping entries that are not valid records.
pub(crate) fn decode_entries<'a, I>(values: I) -> Vec<Employee>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    values
        .into_iter()
        .filter_map(|(field, raw)| match Employee::from_json(raw) {
            Ok(employee) => Some(employee),
            Err(err) => {
                warn!("Skipping malformed record '{}': {}", field, err);
                None
            }
        })
        .collect()
}

/// Linear scan for a record holding `email`.
pub(crate) fn email_taken<'a, I>(values: I, email: &str) -> bool
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    values
        .into_iter()
        .filter_map(|(_, raw)| Employee::from_json(raw).ok())
        .any(|existing| existing.email == email)
}

pub async fn create_store(config: &AppConfig) -> Result<Arc<dyn RecordStore>, AppError> {
    match &config.database_url {
        Some(url) => {
            info!("Using PostgreSQL record store (hash '{}')", config.hash_key);
            let store = PgStore::connect(url, &config.hash_key).await?;
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; records are kept in memory only");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: &str = r#"{"id":"1","name":"Alice","email":"a@x.com","gender":"female","designation":"Engineer"}"#;
    const BOB: &str = r#"{"id":"2","name":"Bob","email":"b@x.com","gender":"male","designation":"Ops"}"#;

    #[test]
    fn email_scan_is_case_sensitive() {
        let entries = [("1", ALICE), ("2", BOB)];
        assert!(email_taken(entries, "a@x.com"));
        assert!(!email_taken(entries, "A@x.com"));
    }

    #[test]
    fn email_scan_skips_undecodable_values() {
        let entries = [("broken", r#"{"email":"a@x.com"}"#), ("2", BOB)];
        assert!(!email_taken(entries, "a@x.com"));
        assert!(email_taken(entries, "b@x.com"));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let entries = [("1", ALICE), ("broken", "{not json")];
        let decoded = decode_entries(entries);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].name, "Alice");
    }
}
