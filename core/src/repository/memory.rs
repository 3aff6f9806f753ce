use chrono::{Local, Utc};
use anyhow::{Context, Result};

use crate::model::entry::{ChargingLogEntry, NewEntry};
use crate::repository::traits::LogRepository;

/// Session-scoped log store. Nothing survives the process.
#[derive(Debug, Clone)]
pub struct InMemoryLogRepository {
    entries: Vec<ChargingLogEntry>,
    next_id: u64,
}

impl Default for InMemoryLogRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogRepository {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 1,
        }
    }

    pub fn with_entries(seed: Vec<NewEntry>) -> Result<Self> {
        let mut repo = Self::new();
        for entry in seed {
            repo.append(entry)?;
        }
        Ok(repo)
    }
}

impl LogRepository for InMemoryLogRepository {
    fn append(&mut self, entry: NewEntry) -> Result<ChargingLogEntry> {
        entry
            .validate(Local::now().date_naive())
            .context("Refusing to store malformed session")?;
        let stored = ChargingLogEntry {
            id: self.next_id,
            user: entry.user,
            date: entry.date,
            duration: entry.duration,
            created_at: Utc::now(),
        };
        self.next_id += 1;
        self.entries.push(stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<ChargingLogEntry>> {
        Ok(self.entries.clone())
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn rename_user(&mut self, old: &str, new: &str) -> Result<usize> {
        let mut changed = 0;
        for entry in self.entries.iter_mut().filter(|e| e.user == old) {
            entry.user = new.to_string();
            changed += 1;
        }
        Ok(changed)
    }

    fn reset(&mut self) -> Result<usize> {
        let removed = self.entries.len();
        self.entries.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(user: &str, date: &str, duration: f64) -> NewEntry {
        NewEntry::new(user, NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(), duration)
    }

    #[test]
    fn test_append_assigns_unique_ids_in_order() {
        let mut repo = InMemoryLogRepository::new();
        let a = repo.append(entry("Gal", "2025-06-25", 2.5)).unwrap();
        let b = repo.append(entry("Guy", "2025-06-24", 1.5)).unwrap();
        assert_ne!(a.id, b.id);

        let listed = repo.list().unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].user, "Gal");
        assert_eq!(listed[1].user, "Guy");
    }

    #[test]
    fn test_ids_not_reused_after_reset() {
        let mut repo = InMemoryLogRepository::with_entries(vec![entry("Gal", "2025-06-25", 2.5)]).unwrap();
        let first = repo.list().unwrap()[0].id;
        assert_eq!(repo.reset().unwrap(), 1);
        assert!(repo.is_empty());
        let next = repo.append(entry("Gal", "2025-06-26", 1.0)).unwrap();
        assert!(next.id > first);
    }

    #[test]
    fn test_append_rejects_malformed_records() {
        let mut repo = InMemoryLogRepository::new();
        assert!(repo.append(entry("", "2025-06-25", 1.0)).is_err());
        assert!(repo.append(entry("Gal", "2025-06-25", -3.0)).is_err());
        assert!(repo.append(entry("Gal", "2025-06-25", f64::NAN)).is_err());
        assert!(repo.append(entry("Gal", "2099-01-01", 1.0)).is_err());
        assert!(repo.is_empty());

        let err = InMemoryLogRepository::with_entries(vec![entry("Gal", "2025-06-25", 0.0)]).unwrap_err();
        assert!(err.to_string().contains("malformed"));
        let stored = repo.append(entry("Gal", "2025-06-25", 1.0)).unwrap();
        assert_eq!(stored.id, 1);
    }

    #[test]
    fn test_rename_user_only_touches_matching() {
        let mut repo = InMemoryLogRepository::with_entries(vec![
            entry("Gal", "2025-06-25", 2.5),
            entry("Guy", "2025-06-24", 1.5),
            entry("Gal", "2025-06-20", 2.0),
        ])
        .unwrap();
        assert_eq!(repo.rename_user("Gal", "Gali").unwrap(), 2);
        let users: Vec<String> = repo.list().unwrap().into_iter().map(|e| e.user).collect();
        assert_eq!(users, vec!["Gali", "Guy", "Gali"]);
    }
}
