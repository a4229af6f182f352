use crate::core::risk::DismissalLookup;
use crate::db::alerts::{clear_dismissals, insert_dismissal, load_dismissals};
use crate::errors::AppResult;
use crate::models::alert::DismissalEntry;
use chrono::Local;
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Persistent set of acknowledged alert ids.
///
/// Loaded once on open; every mutation is written to the database before the
/// in-memory copy changes.
pub struct DismissalStore<'c> {
    conn: &'c Connection,
    entries: BTreeMap<String, DismissalEntry>,
}

impl<'c> DismissalStore<'c> {
    pub fn open(conn: &'c Connection) -> AppResult<Self> {
        let entries = load_dismissals(conn)?
            .into_iter()
            .map(|e| (e.alert_id.clone(), e))
            .collect();
        Ok(Self { conn, entries })
    }

    pub fn is_dismissed(&self, alert_id: &str) -> bool {
        self.entries.contains_key(alert_id)
    }

    pub fn dismiss(
        &mut self,
        alert_id: &str,
        dismissed_by: &str,
        remarks: &str,
    ) -> AppResult<&DismissalEntry> {
        let entry = DismissalEntry {
            alert_id: alert_id.to_string(),
            dismissed_at: Local::now().to_rfc3339(),
            dismissed_by: dismissed_by.to_string(),
            remarks: remarks.to_string(),
        };
        insert_dismissal(self.conn, &entry)?;

        self.entries.insert(alert_id.to_string(), entry);
        Ok(&self.entries[alert_id])
    }

    /// Clear every dismissal. Returns how many were removed.
    pub fn reset_all(&mut self) -> AppResult<usize> {
        let n = clear_dismissals(self.conn)?;
        self.entries.clear();
        Ok(n)
    }

    pub fn entries(&self) -> impl Iterator<Item = &DismissalEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl DismissalLookup for DismissalStore<'_> {
    fn is_dismissed(&self, alert_id: &str) -> bool {
        DismissalStore::is_dismissed(self, alert_id)
    }
}
