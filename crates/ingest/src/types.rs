use std::fmt;

/// Identifies one pipeline run. Event scopes and aggregate stores are keyed by it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(String);

impl RunId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RunId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// An event as delivered to subscribers.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope<E> {
    pub run_id: RunId,
    /// Position of the event in its run, starting from zero.
    pub sequence: u64,
    pub payload: E,
}
