use std::sync::Arc;

use crate::traits::{AggregateStore, EventBus, EventSink, Subscriber};

pub mod bus;
pub mod store;

pub use bus::InMemoryEventBus;
pub use store::InMemoryAggregateStore;

pub type DynEventBus<E> = Arc<dyn EventBus<E> + Send + Sync>;
pub type DynEventSink<E> = Arc<dyn EventSink<E> + Send + Sync>;
pub type DynSubscriber<E> = Arc<dyn Subscriber<E> + Send + Sync>;
pub type DynAggregateStore<K, A> = Arc<dyn AggregateStore<K, A> + Send + Sync>;
