use std::collections::VecDeque;

use tracing::{debug, error, info};

use crate::storage::entry_store::EntryStore;

use super::reconcile::WriteOp;

/// Write that was applied locally but hasn't been confirmed by the durable store yet.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub op: WriteOp,
    pub attempts: u32,
    pub last_error: Option<String>,
}

/// How far the durable store is behind local state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Synced,
    /// Writes that haven't been attempted yet.
    Pending { count: usize },
    /// At least one write failed on its last attempt. `count` is the amount of failed writes.
    Failed { count: usize },
}

/// Queue of writes between local state and the durable store. Local state is always treated as
/// the source of truth, so a failed write stays queued until a later flush succeeds.
#[derive(Debug, Default)]
pub struct PendingWrites {
    queue: VecDeque<PendingWrite>,
}

impl PendingWrites {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `op`. Any older write for the same day is dropped, since it's superseded.
    pub fn push(&mut self, op: WriteOp) {
        self.queue.retain(|v| v.op.date() != op.date());
        self.queue.push_back(PendingWrite {
            op,
            attempts: 0,
            last_error: None,
        });
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PendingWrite> {
        self.queue.iter()
    }

    pub fn state(&self) -> SyncState {
        let failed = self.queue.iter().filter(|v| v.last_error.is_some()).count();
        if failed > 0 {
            SyncState::Failed { count: failed }
        } else if !self.queue.is_empty() {
            SyncState::Pending {
                count: self.queue.len(),
            }
        } else {
            SyncState::Synced
        }
    }

    /// Attempts every queued write once, in order. Returns amount of writes that are still
    /// pending afterwards.
    pub async fn flush<S: EntryStore + ?Sized>(&mut self, store: &S) -> usize {
        let mut remaining = VecDeque::new();

        while let Some(mut write) = self.queue.pop_front() {
            debug!("Flushing {:?}", write.op);
            let result = match write.op {
                WriteOp::Upsert(entry) => store.upsert(entry).await,
                WriteOp::Delete(date) => store.delete(date).await,
            };
            write.attempts += 1;
            match result {
                Ok(()) => info!("Persisted {:?}", write.op),
                Err(e) => {
                    error!(
                        "Failed to persist {:?} after {} attempts: {e:?}",
                        write.op, write.attempts
                    );
                    write.last_error = Some(e.to_string());
                    remaining.push_back(write);
                }
            }
        }

        self.queue = remaining;
        self.queue.len()
    }
}
