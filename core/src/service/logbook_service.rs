use crate::admin::AdminSession;
use crate::model::entry::{ChargingLogEntry, NewEntry};
use crate::model::registry::UserRegistry;
use crate::repository::LogRepository;
use crate::service::dto::LogbookOverview;
use chrono::NaiveDate;
use anyhow::{bail, Result};
use log::{info, warn};

/// Count of entries the admin agreed to destroy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetConfirmation {
    pub count: usize,
}

/// Owns the log store and the user registry and keeps them consistent.
///
/// Every mutation validates fully before touching either structure.
pub struct LogbookService<R: LogRepository> {
    repo: R,
    registry: UserRegistry,
}

impl<R: LogRepository> LogbookService<R> {
    pub fn new(repo: R, registry: UserRegistry) -> Self {
        Self { repo, registry }
    }

    pub fn users(&self) -> &[String] {
        self.registry.names()
    }

    pub fn entries(&self) -> Result<Vec<ChargingLogEntry>> {
        self.repo.list()
    }

    pub fn log_session(&mut self, entry: NewEntry, today: NaiveDate) -> Result<ChargingLogEntry> {
        entry.validate(today)?;
        if !self.registry.contains(&entry.user) {
            bail!("Unknown user: {}", entry.user);
        }
        let stored = self.repo.append(entry)?;
        info!("logged {}h for {} on {} (id {})", stored.duration, stored.user, stored.date, stored.id);
        Ok(stored)
    }

    pub fn add_user(&mut self, name: &str) -> Result<String> {
        let added = self.registry.add(name).inspect_err(|e| warn!("add user rejected: {}", e))?;
        info!("user added: {}", added);
        Ok(added)
    }

    /// Renames in the registry and on every historical entry, or changes nothing.
    pub fn rename_user(&mut self, old: &str, new: &str) -> Result<usize> {
        let new = self
            .registry
            .check_rename(old, new)
            .inspect_err(|e| warn!("rename rejected: {}", e))?;
        let changed = self.repo.rename_user(old, &new)?;
        self.registry.apply_rename(old, &new);
        info!("user renamed: {} -> {} ({} entries)", old, new, changed);
        Ok(changed)
    }

    /// Registry only; entries keep the old name as a historical label.
    pub fn remove_user(&mut self, name: &str) -> Result<()> {
        self.registry.remove(name).inspect_err(|e| warn!("remove rejected: {}", e))?;
        info!("user removed: {}", name);
        Ok(())
    }

    pub fn can_remove_user(&self, name: &str) -> bool {
        self.registry.check_remove(name).is_ok()
    }

    pub fn overview(&self) -> Result<LogbookOverview> {
        let entries = self.repo.list()?;
        Ok(LogbookOverview {
            user_count: self.registry.len(),
            session_count: entries.len(),
            total_hours: entries.iter().map(|e| e.duration).sum(),
        })
    }

    pub fn prepare_reset(&self, _session: &AdminSession) -> Result<ResetConfirmation> {
        if self.repo.is_empty() {
            bail!("Database is already empty");
        }
        Ok(ResetConfirmation { count: self.repo.len() })
    }

    /// Irreversible. Fails if the store changed since the confirmation was issued.
    pub fn reset_all(&mut self, _session: &AdminSession, confirmation: ResetConfirmation) -> Result<usize> {
        let current = self.repo.len();
        if current == 0 {
            bail!("Database is already empty");
        }
        if current != confirmation.count {
            bail!(
                "Confirmation was for {} entries but the log now holds {}",
                confirmation.count,
                current
            );
        }
        let removed = self.repo.reset()?;
        warn!("charging log reset: {} entries deleted", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::AdminGate;
    use crate::repository::InMemoryLogRepository;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn service() -> LogbookService<InMemoryLogRepository> {
        let repo = InMemoryLogRepository::with_entries(vec![
            NewEntry::new("Gal", day("2025-06-25"), 2.5),
            NewEntry::new("Guy", day("2025-06-24"), 1.5),
            NewEntry::new("Other", day("2025-06-23"), 3.0),
        ])
        .unwrap();
        LogbookService::new(repo, UserRegistry::new(["Gal", "Guy", "Other"]).unwrap())
    }

    /// Repository whose rename always fails, to prove the registry is untouched.
    struct BrokenRenameRepo(InMemoryLogRepository);

    impl LogRepository for BrokenRenameRepo {
        fn append(&mut self, entry: NewEntry) -> Result<ChargingLogEntry> { self.0.append(entry) }
        fn list(&self) -> Result<Vec<ChargingLogEntry>> { self.0.list() }
        fn len(&self) -> usize { self.0.len() }
        fn rename_user(&mut self, _old: &str, _new: &str) -> Result<usize> { bail!("disk on fire") }
        fn reset(&mut self) -> Result<usize> { self.0.reset() }
    }

    #[test]
    fn test_log_session_appends() {
        let mut svc = service();
        let stored = svc.log_session(NewEntry::new("Gal", day("2025-06-26"), 1.0), day("2025-06-26")).unwrap();
        let entries = svc.entries().unwrap();
        assert_eq!(entries.len(), 4);
        assert_eq!(entries.last().unwrap(), &stored);
    }

    #[test]
    fn test_log_session_rejects_unknown_or_malformed() {
        let mut svc = service();
        let today = day("2025-06-26");
        assert!(svc.log_session(NewEntry::new("Nobody", today, 1.0), today).is_err());
        assert!(svc.log_session(NewEntry::new("Gal", today, 0.0), today).is_err());
        assert!(svc.log_session(NewEntry::new("Gal", day("2025-06-27"), 1.0), today).is_err());
        assert_eq!(svc.entries().unwrap().len(), 3);
    }

    #[test]
    fn test_rename_cascades() {
        let mut svc = service();
        assert_eq!(svc.rename_user("Gal", "Gali").unwrap(), 1);
        assert_eq!(svc.users(), &["Gali", "Guy", "Other"]);
        let entries = svc.entries().unwrap();
        assert!(entries.iter().all(|e| e.user != "Gal"));
        assert_eq!(entries[0].user, "Gali");
    }

    #[test]
    fn test_rejected_rename_changes_nothing() {
        let mut svc = service();
        assert!(svc.rename_user("Gal", "Guy").is_err());
        assert_eq!(svc.users(), &["Gal", "Guy", "Other"]);
        assert_eq!(svc.entries().unwrap()[0].user, "Gal");
    }

    #[test]
    fn test_failed_store_rename_leaves_registry() {
        let repo = BrokenRenameRepo(InMemoryLogRepository::new());
        let mut svc = LogbookService::new(repo, UserRegistry::new(["Gal", "Guy"]).unwrap());
        assert!(svc.rename_user("Gal", "Gali").is_err());
        assert_eq!(svc.users(), &["Gal", "Guy"]);
    }

    #[test]
    fn test_remove_keeps_history() {
        let mut svc = service();
        svc.remove_user("Other").unwrap();
        assert_eq!(svc.users(), &["Gal", "Guy"]);
        let entries = svc.entries().unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2].user, "Other");
    }

    #[test]
    fn test_cannot_remove_last_user() {
        let mut svc = service();
        svc.remove_user("Other").unwrap();
        svc.remove_user("Guy").unwrap();
        assert!(!svc.can_remove_user("Gal"));
        assert!(svc.remove_user("Gal").is_err());
        assert_eq!(svc.users(), &["Gal"]);
    }

    #[test]
    fn test_reset_with_confirmation() {
        let mut svc = service();
        let session = AdminGate::default().unlock("DBreset18").unwrap();
        let confirmation = svc.prepare_reset(&session).unwrap();
        assert_eq!(confirmation.count, 3);
        assert_eq!(svc.reset_all(&session, confirmation).unwrap(), 3);
        assert!(svc.entries().unwrap().is_empty());
        assert!(svc.prepare_reset(&session).is_err());
        // users survive a reset
        assert_eq!(svc.users().len(), 3);
    }

    #[test]
    fn test_stale_confirmation_is_rejected() {
        let mut svc = service();
        let session = AdminGate::default().unlock("DBreset18").unwrap();
        let confirmation = svc.prepare_reset(&session).unwrap();
        svc.log_session(NewEntry::new("Guy", day("2025-06-26"), 1.0), day("2025-06-26")).unwrap();
        assert!(svc.reset_all(&session, confirmation).is_err());
        assert_eq!(svc.entries().unwrap().len(), 4);
    }

    #[test]
    fn test_overview() {
        let overview = service().overview().unwrap();
        assert_eq!(overview.user_count, 3);
        assert_eq!(overview.session_count, 3);
        assert!((overview.total_hours - 7.0).abs() < 1e-9);
    }
}
