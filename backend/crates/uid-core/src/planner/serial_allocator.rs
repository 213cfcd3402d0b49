use crate::UserRecord;
use crate::identifier::parse_serial_for_prefix;

use std::collections::HashMap;

/// Per-prefix serial counters seeded from a frozen snapshot.
///
/// Serials are unique per prefix, so two roles that resolve to the same
/// prefix share one counter. A prefix whose highest serial is `u64::MAX`
/// has no serials left; `next` returns `None` for it.
#[derive(Debug, Clone, Default)]
pub struct SerialAllocator {
    highest: HashMap<String, u64>,
    ceiling: HashMap<String, u64>,
    draws: HashMap<String, u64>,
}

impl SerialAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every prefix with the highest serial found in either the storage
    /// key or the `uid` field of its records.
    pub fn seeded(snapshot: &[UserRecord]) -> Self {
        Self {
            highest: highest_serials(snapshot),
            ..Self::default()
        }
    }

    /// Highest serial seen or issued for `prefix`, 0 when none.
    pub fn highest(&self, prefix: &str) -> u64 {
        self.highest.get(prefix).copied().unwrap_or(0)
    }

    /// Serial the next call to `next` will return for `prefix`.
    pub fn peek(&self, prefix: &str) -> Option<u64> {
        let serial = self.highest(prefix).checked_add(1)?;
        match self.ceiling.get(prefix) {
            Some(ceiling) if serial > *ceiling => None,
            _ => Some(serial),
        }
    }

    pub fn next(&mut self, prefix: &str) -> Option<u64> {
        let serial = self.peek(prefix)?;
        self.highest.insert(prefix.to_string(), serial);
        *self.draws.entry(prefix.to_string()).or_insert(0) += 1;
        Some(serial)
    }

    /// Serials handed out per prefix, including ones later discarded.
    pub fn draws(&self) -> &HashMap<String, u64> {
        &self.draws
    }

    /// Confine `prefix` to the reserved block `first..first + count`.
    pub fn resume_at(&mut self, prefix: &str, first: u64, count: u64) {
        self.highest.insert(prefix.to_string(), first.saturating_sub(1));
        self.ceiling.insert(
            prefix.to_string(),
            first.saturating_add(count).saturating_sub(1),
        );
    }

    /// Stop issuing serials for `prefix`.
    pub fn exhaust(&mut self, prefix: &str) {
        self.ceiling.insert(prefix.to_string(), 0);
    }
}

/// Highest serial per prefix across keys and `uid` fields.
pub fn highest_serials(snapshot: &[UserRecord]) -> HashMap<String, u64> {
    let mut highest: HashMap<String, u64> = HashMap::new();
    for record in snapshot {
        let prefix = record.prefix();
        let candidates = [Some(record.id.as_str()), record.uid.as_deref()];
        for serial in candidates
            .into_iter()
            .flatten()
            .filter_map(|candidate| parse_serial_for_prefix(candidate, &prefix))
        {
            let entry = highest.entry(prefix.clone()).or_insert(0);
            *entry = (*entry).max(serial);
        }
    }
    highest
}
