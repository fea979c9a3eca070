pub mod error;
pub mod runtime;
pub mod traits;
pub mod types;

pub use error::IngestError;
pub use runtime::{
    DynAggregateStore, DynEventBus, DynEventSink, DynSubscriber, InMemoryAggregateStore,
    InMemoryEventBus,
};
pub use traits::{AggregateStore, EventBus, EventSink, Subscriber};
pub use types::{Envelope, RunId};
