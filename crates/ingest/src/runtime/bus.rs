use std::sync::{Arc, Mutex, RwLock};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::{debug, trace};

use crate::error::IngestError;
use crate::traits::{EventBus, EventSink, Subscriber};
use crate::types::{Envelope, RunId};

struct RunChannel<E> {
    subscribers: RwLock<Vec<Arc<dyn Subscriber<E>>>>,
    /// Next sequence number. Held for the whole delivery so events never overtake each other.
    next_sequence: Mutex<u64>,
}

impl<E> RunChannel<E> {
    fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            next_sequence: Mutex::new(0),
        }
    }
}

/// Event bus that delivers synchronously, on the publishing thread.
///
/// A subscriber must not publish to the run it is being notified about.
pub struct InMemoryEventBus<E> {
    runs: DashMap<RunId, Arc<RunChannel<E>>>,
}

impl<E> Default for InMemoryEventBus<E> {
    fn default() -> Self {
        Self {
            runs: DashMap::new(),
        }
    }
}

impl<E> InMemoryEventBus<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self, run_id: &RunId) -> bool {
        self.runs.contains_key(run_id)
    }

    fn channel(&self, run_id: &RunId) -> Result<Arc<RunChannel<E>>, IngestError> {
        self.runs
            .get(run_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| IngestError::UnknownRun(run_id.to_string()))
    }
}

impl<E> EventSink<E> for InMemoryEventBus<E>
where
    E: Send + Sync,
{
    fn publish(&self, run_id: &RunId, event: E) -> Result<u64, IngestError> {
        let channel = self.channel(run_id)?;
        let mut next = channel
            .next_sequence
            .lock()
            .map_err(|_| IngestError::Delivery("sequence lock poisoned".to_string()))?;
        let envelope = Envelope {
            run_id: run_id.clone(),
            sequence: *next,
            payload: event,
        };
        *next += 1;

        let subscribers = channel
            .subscribers
            .read()
            .map_err(|_| IngestError::Delivery("subscriber lock poisoned".to_string()))?;
        trace!(
            "delivering event #{} of run {} to {} subscriber(s)",
            envelope.sequence,
            run_id,
            subscribers.len()
        );
        for subscriber in subscribers.iter() {
            subscriber.on_event(&envelope)?;
        }
        Ok(envelope.sequence)
    }
}

impl<E> EventBus<E> for InMemoryEventBus<E>
where
    E: Send + Sync,
{
    fn open(&self, run_id: &RunId) -> Result<(), IngestError> {
        match self.runs.entry(run_id.clone()) {
            Entry::Occupied(_) => Err(IngestError::RunAlreadyOpen(run_id.to_string())),
            Entry::Vacant(vacant) => {
                vacant.insert(Arc::new(RunChannel::new()));
                debug!("opened event scope of run {}", run_id);
                Ok(())
            }
        }
    }

    fn subscribe(
        &self,
        run_id: &RunId,
        subscriber: Arc<dyn Subscriber<E>>,
    ) -> Result<(), IngestError> {
        let channel = self.channel(run_id)?;
        channel
            .subscribers
            .write()
            .map_err(|_| IngestError::Delivery("subscriber lock poisoned".to_string()))?
            .push(subscriber);
        Ok(())
    }

    fn close(&self, run_id: &RunId) -> bool {
        let closed = self.runs.remove(run_id).is_some();
        if closed {
            debug!("closed event scope of run {}", run_id);
        }
        closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        seen: Mutex<Vec<(u64, &'static str)>>,
    }

    impl Subscriber<&'static str> for Recorder {
        fn on_event(&self, envelope: &Envelope<&'static str>) -> Result<(), IngestError> {
            self.seen
                .lock()
                .expect("lock poisoned")
                .push((envelope.sequence, envelope.payload));
            Ok(())
        }
    }

    #[test]
    fn test_events_delivered_in_publication_order() {
        let bus = InMemoryEventBus::new();
        let run = RunId::new("r1");
        bus.open(&run).unwrap();
        let recorder = Arc::new(Recorder {
            seen: Mutex::new(Vec::new()),
        });
        bus.subscribe(&run, recorder.clone()).unwrap();

        for event in ["a", "b", "c"] {
            bus.publish(&run, event).unwrap();
        }

        let seen = recorder.seen.lock().unwrap().clone();
        assert_eq!(seen, vec![(0, "a"), (1, "b"), (2, "c")]);
    }

    #[test]
    fn test_publish_to_unknown_or_closed_run_fails() {
        let bus = InMemoryEventBus::<&'static str>::new();
        let run = RunId::new("r1");
        assert!(matches!(
            bus.publish(&run, "x"),
            Err(IngestError::UnknownRun(_))
        ));

        bus.open(&run).unwrap();
        assert!(matches!(bus.open(&run), Err(IngestError::RunAlreadyOpen(_))));
        assert!(bus.close(&run));
        assert!(!bus.close(&run));
        assert!(bus.publish(&run, "x").is_err());
    }
}
