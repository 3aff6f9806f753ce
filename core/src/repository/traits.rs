use crate::model::entry::{ChargingLogEntry, NewEntry};
use anyhow::Result;

pub trait LogRepository {
    /// Assigns id and creation time, appends at the end.
    fn append(&mut self, entry: NewEntry) -> Result<ChargingLogEntry>;
    fn list(&self) -> Result<Vec<ChargingLogEntry>>;
    fn len(&self) -> usize;
    /// Rewrites `user` on every matching entry, returns how many changed.
    fn rename_user(&mut self, old: &str, new: &str) -> Result<usize>;
    /// Drops every entry, returns how many were removed.
    fn reset(&mut self) -> Result<usize>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
