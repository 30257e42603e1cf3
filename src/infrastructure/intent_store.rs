use chrono::Utc;
use dashmap::DashMap;

use crate::domain::errors::DomainError;
use crate::domain::payment::PendingIntent;
use crate::domain::ports::PendingIntentStore;

/// In-process intent store keyed by order number. Intents live only for the
/// gateway auth window; expired entries are purged lazily on writes and
/// treated as absent on reads, so no reaper task is needed.
pub struct InMemoryIntentStore {
    intents: DashMap<String, PendingIntent>,
}

impl InMemoryIntentStore {
    pub fn new() -> Self {
        Self {
            intents: DashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }
}

impl Default for InMemoryIntentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PendingIntentStore for InMemoryIntentStore {
    fn put(&self, intent: PendingIntent) -> Result<(), DomainError> {
        let now = Utc::now();
        self.intents.retain(|_, v| !v.is_expired(now));
        self.intents.insert(intent.order_number.clone(), intent);
        Ok(())
    }

    fn take(&self, order_number: &str) -> Result<Option<PendingIntent>, DomainError> {
        let Some((_, intent)) = self.intents.remove(order_number) else {
            return Ok(None);
        };
        if intent.is_expired(Utc::now()) {
            log::info!("pending intent {} expired; discarded", order_number);
            return Ok(None);
        }
        Ok(Some(intent))
    }
}
