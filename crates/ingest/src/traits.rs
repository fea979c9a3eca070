use std::sync::Arc;

use crate::error::IngestError;
use crate::types::{Envelope, RunId};

pub trait Subscriber<E>: Send + Sync {
    fn on_event(&self, envelope: &Envelope<E>) -> Result<(), IngestError>;
}

/// Publishing side of a run-scoped event bus.
///
/// Events published to one run are delivered to its subscribers in publication order.
/// `publish` returns the sequence number assigned to the event.
pub trait EventSink<E>: Send + Sync {
    fn publish(&self, run_id: &RunId, event: E) -> Result<u64, IngestError>;
}

pub trait EventBus<E>: EventSink<E> {
    /// Opens the scope of a run. Publishing to a run that is not open fails.
    fn open(&self, run_id: &RunId) -> Result<(), IngestError>;
    fn subscribe(
        &self,
        run_id: &RunId,
        subscriber: Arc<dyn Subscriber<E>>,
    ) -> Result<(), IngestError>;
    /// Drops the scope of a run with all its subscribers. Returns `false` if it was not open.
    fn close(&self, run_id: &RunId) -> bool;
}

/// Per-run storage of aggregates keyed by identity.
///
/// Reads observe every write made before them within the same run.
pub trait AggregateStore<K, A>: Send + Sync {
    fn load(&self, run_id: &RunId, key: &K) -> Result<Option<A>, IngestError>;
    fn save(&self, run_id: &RunId, key: K, aggregate: A) -> Result<(), IngestError>;
    /// Applies a mutation to a stored aggregate. Fails if there is no such aggregate.
    fn update(
        &self,
        run_id: &RunId,
        key: &K,
        mutation: &mut dyn FnMut(&mut A) -> Result<(), IngestError>,
    ) -> Result<(), IngestError>;
    /// All aggregates of the run, in the order they were first saved.
    fn all(&self, run_id: &RunId) -> Result<Vec<(K, A)>, IngestError>;
    fn clear(&self, run_id: &RunId);
}
