use std::fmt;

/// Opaque lap identifier, unique for the lifetime of its ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LapId(u64);

impl fmt::Display for LapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lap#{}", self.0)
    }
}

/// Snapshot of elapsed time taken when a lap was recorded.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LapEntry {
    pub id: LapId,
    /// 1-based, assigned as the ledger length at capture plus one.
    pub sequence: u32,
    /// Total elapsed time at capture, not a split.
    pub captured_ms: u64,
}

/// Recorded laps, newest first.
#[derive(Debug, Default)]
pub struct LapLedger {
    entries: Vec<LapEntry>,
    next_id: u64,
}

impl LapLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, captured_ms: u64) -> LapId {
        let id = LapId(self.next_id);
        self.next_id += 1;
        let sequence = self.entries.len() as u32 + 1;
        self.entries.insert(
            0,
            LapEntry {
                id,
                sequence,
                captured_ms,
            },
        );
        id
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns false if no entry has `id`.
    pub fn remove(&mut self, id: LapId) -> bool {
        match self.entries.iter().position(|e| e.id == id) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn entries(&self) -> &[LapEntry] {
        &self.entries
    }

    pub fn get(&self, id: LapId) -> Option<&LapEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Newest entry carrying `sequence`. Sequence numbers can repeat
    /// once an entry has been removed and another recorded.
    pub fn find_by_sequence(&self, sequence: u32) -> Option<&LapEntry> {
        self.entries.iter().find(|e| e.sequence == sequence)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
