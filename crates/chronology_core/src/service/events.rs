//! Store change notifications.
//!
//! # Invariants
//! - Events are emitted only for applied mutations, never for no-ops.
//! - Subscribers observe the store after the in-memory change is complete.

use crate::model::record::RecordId;

/// Change notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    RecordCreated(RecordId),
    RecordUpdated(RecordId),
    RecordDeleted(RecordId),
    RecordsImported { added: usize },
    MetaChanged,
    Reset,
}

/// Handle returned by `RecordStore::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) type Subscriber = Box<dyn FnMut(&StoreEvent)>;

/// Ordered subscriber list.
#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Subscriber)>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, subscriber: Subscriber) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.entries.push((id, subscriber));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn notify(&mut self, event: &StoreEvent) {
        for (_, subscriber) in &mut self.entries {
            subscriber(event);
        }
    }
}
