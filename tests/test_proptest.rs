//! Property tests comparing the batch hash table against a CPU reference
//! model: a std::HashMap built with the same ordered inserts, with absent
//! keys mapping to MISSING.
//!
//! Keys are drawn from a narrow range so batches repeat keys often and the
//! last-write-wins contract is exercised, not just unique round-trips.

use batch_hashtable::{BatchHashTable, MISSING};
use proptest::collection::vec;
use proptest::prelude::*;
use std::collections::HashMap;

fn small_key() -> impl Strategy<Value = i64> {
    0i64..512
}

fn reference_lookup(model: &HashMap<i64, i64>, queries: &[i64]) -> Vec<i64> {
    queries
        .iter()
        .map(|k| model.get(k).copied().unwrap_or(MISSING))
        .collect()
}

proptest! {
    #[test]
    fn matches_reference_model(
        pairs in vec((small_key(), any::<i64>()), 0..300),
        queries in vec(0i64..768, 0..300),
    ) {
        let keys: Vec<i64> = pairs.iter().map(|p| p.0).collect();
        let values: Vec<i64> = pairs.iter().map(|p| p.1).collect();

        let mut table = BatchHashTable::new();
        table.insert_all(&keys, &values);

        let mut model = HashMap::new();
        for &(k, v) in &pairs {
            model.insert(k, v);
        }

        prop_assert_eq!(table.lookup_all(&queries), reference_lookup(&model, &queries));
        prop_assert_eq!(table.len(), model.len());
    }

    #[test]
    fn accumulated_batches_match_reference_model(
        batches in vec(vec((small_key(), any::<i64>()), 0..100), 0..10),
        queries in vec(0i64..768, 0..300),
    ) {
        // Start tiny so multi-batch runs force rehashing.
        let mut table = BatchHashTable::with_capacity(4);
        let mut model = HashMap::new();

        for batch in &batches {
            let keys: Vec<i64> = batch.iter().map(|p| p.0).collect();
            let values: Vec<i64> = batch.iter().map(|p| p.1).collect();
            table.insert_all(&keys, &values);
            for &(k, v) in batch {
                model.insert(k, v);
            }
        }

        prop_assert_eq!(table.lookup_all(&queries), reference_lookup(&model, &queries));
        prop_assert_eq!(table.len(), model.len());
    }

    #[test]
    fn partitioned_lookup_equals_whole(
        pairs in vec((small_key(), any::<i64>()), 1..200),
        queries in vec(0i64..768, 1..200),
        split in any::<prop::sample::Index>(),
    ) {
        let keys: Vec<i64> = pairs.iter().map(|p| p.0).collect();
        let values: Vec<i64> = pairs.iter().map(|p| p.1).collect();

        let mut table = BatchHashTable::new();
        table.insert_all(&keys, &values);

        let whole = table.lookup_all(&queries);

        let at = split.index(queries.len());
        let mut parts = table.lookup_all(&queries[..at]);
        parts.extend(table.lookup_all(&queries[at..]));

        prop_assert_eq!(parts, whole);
    }
}
