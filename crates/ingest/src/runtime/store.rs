use std::fmt::Debug;
use std::hash::Hash;

use dashmap::DashMap;
use indexmap::IndexMap;

use crate::error::IngestError;
use crate::traits::AggregateStore;
use crate::types::RunId;

/// Aggregate store kept in memory, one insertion-ordered table per run.
pub struct InMemoryAggregateStore<K, A> {
    runs: DashMap<RunId, IndexMap<K, A>>,
}

impl<K, A> Default for InMemoryAggregateStore<K, A>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self {
            runs: DashMap::new(),
        }
    }
}

impl<K, A> InMemoryAggregateStore<K, A>
where
    K: Hash + Eq,
{
    pub fn new() -> Self {
        Self::default()
    }
}

impl<K, A> AggregateStore<K, A> for InMemoryAggregateStore<K, A>
where
    K: Hash + Eq + Clone + Debug + Send + Sync,
    A: Clone + Send + Sync,
{
    fn load(&self, run_id: &RunId, key: &K) -> Result<Option<A>, IngestError> {
        Ok(self
            .runs
            .get(run_id)
            .and_then(|table| table.get(key).cloned()))
    }

    fn save(&self, run_id: &RunId, key: K, aggregate: A) -> Result<(), IngestError> {
        self.runs
            .entry(run_id.clone())
            .or_default()
            .insert(key, aggregate);
        Ok(())
    }

    fn update(
        &self,
        run_id: &RunId,
        key: &K,
        mutation: &mut dyn FnMut(&mut A) -> Result<(), IngestError>,
    ) -> Result<(), IngestError> {
        let mut table = self
            .runs
            .get_mut(run_id)
            .ok_or_else(|| IngestError::UnknownRun(run_id.to_string()))?;
        let aggregate = table.get_mut(key).ok_or_else(|| {
            IngestError::Storage(format!("no aggregate {key:?} in run {run_id}"))
        })?;
        mutation(aggregate)
    }

    fn all(&self, run_id: &RunId) -> Result<Vec<(K, A)>, IngestError> {
        Ok(self
            .runs
            .get(run_id)
            .map(|table| {
                table
                    .iter()
                    .map(|(k, a)| (k.clone(), a.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    fn clear(&self, run_id: &RunId) {
        self.runs.remove(run_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_observe_writes_within_run() {
        let store = InMemoryAggregateStore::<String, Vec<u32>>::new();
        let run = RunId::new("r1");
        store.save(&run, "a".to_string(), vec![1]).unwrap();
        store
            .update(&run, &"a".to_string(), &mut |agg| {
                agg.push(2);
                Ok(())
            })
            .unwrap();

        assert_eq!(store.load(&run, &"a".to_string()).unwrap(), Some(vec![1, 2]));
        assert_eq!(store.load(&RunId::new("r2"), &"a".to_string()).unwrap(), None);
    }

    #[test]
    fn test_update_of_missing_aggregate_fails() {
        let store = InMemoryAggregateStore::<String, u32>::new();
        let run = RunId::new("r1");
        assert!(matches!(
            store.update(&run, &"x".to_string(), &mut |_| Ok(())),
            Err(IngestError::UnknownRun(_))
        ));
        store.save(&run, "a".to_string(), 1).unwrap();
        assert!(matches!(
            store.update(&run, &"x".to_string(), &mut |_| Ok(())),
            Err(IngestError::Storage(_))
        ));
    }

    #[test]
    fn test_all_keeps_insertion_order_and_clear_drops_run() {
        let store = InMemoryAggregateStore::<String, u32>::new();
        let run = RunId::new("r1");
        for (i, key) in ["z", "a", "m"].iter().enumerate() {
            store.save(&run, key.to_string(), i as u32).unwrap();
        }
        let keys: Vec<String> = store.all(&run).unwrap().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["z", "a", "m"]);

        store.clear(&run);
        assert!(store.all(&run).unwrap().is_empty());
    }
}
