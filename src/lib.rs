//! Batch hash table for translating sparse coordinate keys to compact indices.
//!
//! Build-then-query access pattern:
//! - **insert** is a serial bulk load; when a batch repeats a key, the later
//!   position wins.
//! - **lookup** is a data-parallel bulk query over the immutable table,
//!   returning `0` for keys that were never inserted.
//!
//! The key `-1` is reserved as the empty-slot marker and must not be used
//! as a real key.
//!
//! # Quick Start
//!
//! ```
//! use batch_hashtable::BatchHashTable;
//!
//! let mut table = BatchHashTable::new();
//! table.insert_all(&[10, 20, 30], &[100, 200, 300]);
//!
//! let results = table.lookup_all(&[20, 99, 10]);
//! assert_eq!(results, vec![200, 0, 100]);
//! ```

pub mod bench;
pub mod table;

pub use bench::{hashmap_baseline, run_benchmarks, BenchConfig, BenchResult};
pub use table::{BatchHashTable, EMPTY_KEY, MISSING};
