use tally_types::{EntryId, LogEntry};

/// Monotonic entry id source.
///
/// Ids are handed out in strictly increasing order and never reused for the
/// lifetime of the allocator, including across `clear`.
///
/// Only entries are persisted, not the counter. After a restart the allocator
/// is re-seeded from the highest id still stored, so the id of a deleted
/// newest entry can be handed out again. Ids of live entries never collide.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    /// `None` once `u64::MAX` has been handed out.
    next: Option<EntryId>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::starting_at(EntryId::new(1))
    }

    pub fn starting_at(first: EntryId) -> Self {
        Self { next: Some(first) }
    }

    /// Hand out the next id, or `None` if the id space is exhausted.
    pub fn allocate(&mut self) -> Option<EntryId> {
        let id = self.next?;
        self.next = id.next();
        Some(id)
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> Option<EntryId> {
        self.next
    }

    /// Move past every id in `entries`. Never moves backwards.
    pub fn observe<'a>(&mut self, entries: impl IntoIterator<Item = &'a LogEntry>) {
        let Some(max) = entries.into_iter().map(LogEntry::id).max() else {
            return;
        };
        match (self.next, max.next()) {
            (Some(next), Some(after)) if after > next => self.next = Some(after),
            (Some(_), None) => self.next = None,
            _ => {}
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}
