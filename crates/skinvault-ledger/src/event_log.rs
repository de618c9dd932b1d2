//! Append-only protocol event log.

use parking_lot::RwLock;
use skinvault_types::{EventRecord, ProtocolEvent};
use tracing::debug;

/// Sequenced, append-only record of every committed state change.
///
/// Sequence numbers are assigned under the write lock, so they are gap-free
/// and match append order.
#[derive(Debug, Default)]
pub struct EventLog {
    records: RwLock<Vec<EventRecord>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `event` at ledger time `at`. Returns its sequence number.
    pub fn append(&self, at: i64, event: ProtocolEvent) -> u64 {
        let mut records = self.records.write();
        let sequence = records.len() as u64;
        debug!(sequence, kind = event.kind(), "Event appended");
        records.push(EventRecord {
            sequence,
            at,
            event,
        });
        sequence
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<EventRecord> {
        self.records.read().last().cloned()
    }

    /// All records with `sequence >= from`.
    #[must_use]
    pub fn since(&self, from: u64) -> Vec<EventRecord> {
        let records = self.records.read();
        let start = usize::try_from(from).unwrap_or(usize::MAX).min(records.len());
        records[start..].to_vec()
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.records.read().clone()
    }

    /// One JSON object per line, in sequence order.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let records = self.records.read();
        let mut out = String::new();
        for record in records.iter() {
            out.push_str(&serde_json::to_string(record)?);
            out.push('\n');
        }
        Ok(out)
    }
}
