//! Open-addressing batch hash table: serial bulk insert, parallel bulk lookup.

use rayon::prelude::*;

/// Reserved key marking an unoccupied slot. Never valid as a real key.
pub const EMPTY_KEY: i64 = -1;

/// Result returned for keys that were never inserted.
pub const MISSING: i64 = 0;

/// Smallest slot count the table will allocate.
const MIN_SLOTS: usize = 16;

/// Entry capacity for `new()` (1024 slots at 50% load).
const DEFAULT_CAPACITY: usize = 512;

/// Batches below this size are looked up on the calling thread; rayon's
/// fork-join overhead dominates the probe work under it.
const PAR_THRESHOLD: usize = 4096;

/// Interleaved key+value so a probe touches a single cache line.
#[derive(Clone, Copy)]
struct Slot {
    key: i64,
    val: i64,
}

const EMPTY_SLOT: Slot = Slot {
    key: EMPTY_KEY,
    val: 0,
};

/// MurmurHash3 64-bit finalizer. Full avalanche, so the low bits kept by
/// the index mask depend on every bit of the key.
#[inline]
fn fmix64(key: i64) -> u64 {
    let mut h = key as u64;
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^= h >> 33;
    h
}

/// An open-addressing hash table from `i64` keys to `i64` values, built for
/// a build-then-query access pattern: [`insert_all`](Self::insert_all) is a
/// serial bulk load, [`lookup_all`](Self::lookup_all) a data-parallel bulk
/// query that yields [`MISSING`] for absent keys.
///
/// Slot count is always a power of 2 and the load factor never exceeds 50%,
/// so linear probe chains stay short and always terminate at an empty slot.
/// The key `-1` ([`EMPTY_KEY`]) is reserved to mark empty slots and must not
/// be inserted.
pub struct BatchHashTable {
    slots: Vec<Slot>,
    len: usize,
}

impl BatchHashTable {
    /// Create an empty table at the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create an empty table that holds `n` entries without rehashing.
    ///
    /// The slot count is `2n` rounded up to the next power of 2.
    pub fn with_capacity(n: usize) -> Self {
        let slots = (n * 2).next_power_of_two().max(MIN_SLOTS);
        Self {
            slots: vec![EMPTY_SLOT; slots],
            len: 0,
        }
    }

    /// Bulk-insert `keys[i] -> values[i]` for every position in order.
    ///
    /// Strictly serial: when a key appears more than once in the batch, the
    /// highest position wins. Re-inserting a key overwrites its value.
    /// An empty batch is a no-op.
    ///
    /// # Panics
    ///
    /// Panics if `keys` and `values` have different lengths. Inserting
    /// [`EMPTY_KEY`] is a contract violation caught only in debug builds.
    pub fn insert_all(&mut self, keys: &[i64], values: &[i64]) {
        assert_eq!(keys.len(), values.len());
        self.reserve(keys.len());
        for (&key, &val) in keys.iter().zip(values) {
            debug_assert_ne!(key, EMPTY_KEY, "EMPTY_KEY is reserved");
            self.insert_one(key, val);
        }
    }

    /// Bulk-lookup every key, returning stored values and [`MISSING`] for
    /// absent keys.
    pub fn lookup_all(&self, keys: &[i64]) -> Vec<i64> {
        let mut results = vec![MISSING; keys.len()];
        self.lookup_into(keys, &mut results);
        results
    }

    /// [`lookup_all`](Self::lookup_all) into a caller-supplied buffer.
    ///
    /// Positions are independent: large batches are distributed across the
    /// rayon pool, each worker reading the table and writing its own part
    /// of `results`. Results are identical regardless of thread count.
    ///
    /// # Panics
    ///
    /// Panics if `keys` and `results` have different lengths.
    pub fn lookup_into(&self, keys: &[i64], results: &mut [i64]) {
        assert_eq!(keys.len(), results.len());
        if keys.len() < PAR_THRESHOLD {
            for (result, &key) in results.iter_mut().zip(keys) {
                *result = self.get(key);
            }
        } else {
            results
                .par_iter_mut()
                .zip(keys.par_iter())
                .for_each(|(result, &key)| *result = self.get(key));
        }
    }

    /// Look up a single key, returning its value or [`MISSING`].
    #[inline]
    pub fn get(&self, key: i64) -> i64 {
        let mask = self.slots.len() - 1;
        let mut idx = fmix64(key) as usize & mask;
        loop {
            let slot = self.slots[idx];
            if slot.key == key {
                return slot.val;
            }
            if slot.key == EMPTY_KEY {
                return MISSING;
            }
            idx = (idx + 1) & mask;
        }
    }

    /// Remove every entry, keeping the allocation.
    pub fn clear(&mut self) {
        self.slots.fill(EMPTY_SLOT);
        self.len = 0;
    }

    /// Number of entries stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no entries are stored.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Slot count (power of 2). The table holds up to half this many
    /// entries before rehashing.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    fn insert_one(&mut self, key: i64, val: i64) {
        let mask = self.slots.len() - 1;
        let mut idx = fmix64(key) as usize & mask;
        loop {
            let slot = &mut self.slots[idx];
            if slot.key == key {
                slot.val = val;
                return;
            }
            if slot.key == EMPTY_KEY {
                *slot = Slot { key, val };
                self.len += 1;
                return;
            }
            idx = (idx + 1) & mask;
        }
    }

    /// Grow so that `additional` more entries fit under 50% load.
    ///
    /// Called up front by `insert_all` with the batch size; duplicate keys
    /// in the batch make this an upper bound, never an undercount.
    fn reserve(&mut self, additional: usize) {
        let needed = (self.len + additional) * 2;
        if needed > self.slots.len() {
            self.grow(needed.next_power_of_two());
        }
    }

    fn grow(&mut self, new_slots: usize) {
        let old = std::mem::replace(&mut self.slots, vec![EMPTY_SLOT; new_slots]);
        self.len = 0;
        for slot in old {
            if slot.key != EMPTY_KEY {
                self.insert_one(slot.key, slot.val);
            }
        }
    }
}

impl Default for BatchHashTable {
    fn default() -> Self {
        Self::new()
    }
}
