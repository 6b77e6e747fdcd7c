//! Benchmark harness with statistical analysis.

use crate::table::{BatchHashTable, MISSING};
use rand::Rng;
use std::time::Instant;

/// Benchmark configuration.
pub struct BenchConfig {
    /// Entry capacity to pre-size the table for.
    pub capacity: usize,
    /// Number of keys to insert/lookup.
    pub num_keys: usize,
    /// Number of timed runs per operation.
    pub runs: usize,
    /// Number of warmup runs (not counted).
    pub warmup: usize,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            capacity: 1_000_000,
            num_keys: 1_000_000,
            runs: 10,
            warmup: 3,
        }
    }
}

/// Result of a single benchmark.
#[derive(Debug, Clone)]
pub struct BenchResult {
    pub op: String,
    pub num_keys: usize,
    pub mean_ms: f64,
    pub median_ms: f64,
    pub min_ms: f64,
    pub max_ms: f64,
    pub stddev_ms: f64,
    pub mops: f64,
    pub hit_rate: Option<f64>,
}

impl std::fmt::Display for BenchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:>6} | {:>6} keys | {:>8.3} ms median | {:>8.1} Mops | stddev {:.3} ms",
            self.op,
            format_count(self.num_keys),
            self.median_ms,
            self.mops,
            self.stddev_ms,
        )?;
        if let Some(hr) = self.hit_rate {
            write!(f, " | {:.1}% hits", hr * 100.0)?;
        }
        Ok(())
    }
}

fn format_count(n: usize) -> String {
    if n >= 1_000_000 {
        format!("{}M", n / 1_000_000)
    } else if n >= 1_000 {
        format!("{}K", n / 1_000)
    } else {
        format!("{}", n)
    }
}

struct Stats {
    mean: f64,
    median: f64,
    min: f64,
    max: f64,
    stddev: f64,
}

/// Compute statistics from a sorted slice of timings.
fn stats(sorted: &[f64]) -> Stats {
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let variance = sorted.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    Stats {
        mean,
        median: sorted[sorted.len() / 2],
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        stddev: variance.sqrt(),
    }
}

/// Remove outliers using the IQR method.
fn remove_outliers(timings: &mut Vec<f64>) {
    if timings.len() < 4 {
        return;
    }
    timings.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let q1 = timings[timings.len() / 4];
    let q3 = timings[3 * timings.len() / 4];
    let iqr = q3 - q1;
    let lower = q1 - 1.5 * iqr;
    let upper = q3 + 1.5 * iqr;
    timings.retain(|&x| x >= lower && x <= upper);
}

/// Generate random non-negative keys (never the empty-slot sentinel).
pub fn gen_keys(rng: &mut impl Rng, n: usize) -> Vec<i64> {
    (0..n).map(|_| rng.gen_range(0..i64::MAX)).collect()
}

/// Generate random values, avoiding `MISSING` so hits are countable.
pub fn gen_values(rng: &mut impl Rng, n: usize) -> Vec<i64> {
    (0..n).map(|_| rng.gen_range(1..i64::MAX)).collect()
}

fn summarize(op: &str, num_keys: usize, timings: &mut Vec<f64>, hit_rate: Option<f64>) -> BenchResult {
    remove_outliers(timings);
    timings.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let s = stats(timings);
    BenchResult {
        op: op.to_string(),
        num_keys,
        mean_ms: s.mean,
        median_ms: s.median,
        min_ms: s.min,
        max_ms: s.max,
        stddev_ms: s.stddev,
        mops: num_keys as f64 / s.median / 1000.0,
        hit_rate,
    }
}

/// Run insert and lookup benchmarks for the configured workload.
///
/// Returns two results: one for `insert`, one for `lookup`.
pub fn run_benchmarks(config: &BenchConfig) -> Vec<BenchResult> {
    let mut rng = rand::thread_rng();

    let keys = gen_keys(&mut rng, config.num_keys);
    let values = gen_values(&mut rng, config.num_keys);

    let mut table = BatchHashTable::with_capacity(config.capacity);

    // ── INSERT benchmark ──
    let mut insert_timings = Vec::with_capacity(config.runs);

    for i in 0..(config.warmup + config.runs) {
        table.clear();
        let start = Instant::now();
        table.insert_all(&keys, &values);
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        if i >= config.warmup {
            insert_timings.push(ms);
        }
    }

    let insert = summarize("insert", config.num_keys, &mut insert_timings, None);

    // ── LOOKUP benchmark ──
    // Insert once, then benchmark lookups against the immutable table.
    table.clear();
    table.insert_all(&keys, &values);

    let mut lookup_timings = Vec::with_capacity(config.runs);
    let mut hit_rate = 0.0;

    for i in 0..(config.warmup + config.runs) {
        let start = Instant::now();
        let results = table.lookup_all(&keys);
        let ms = start.elapsed().as_secs_f64() * 1000.0;
        if i >= config.warmup {
            lookup_timings.push(ms);
        }
        if i == config.warmup + config.runs - 1 {
            let hits = results.iter().filter(|&&v| v != MISSING).count();
            hit_rate = hits as f64 / keys.len() as f64;
        }
    }

    let lookup = summarize("lookup", config.num_keys, &mut lookup_timings, Some(hit_rate));

    vec![insert, lookup]
}

/// std::HashMap doing the same insert+lookup workload, for comparison.
///
/// Returns elapsed milliseconds.
pub fn hashmap_baseline(keys: &[i64], values: &[i64]) -> f64 {
    use std::collections::HashMap;

    let start = Instant::now();

    let mut map = HashMap::with_capacity(keys.len());
    for i in 0..keys.len() {
        map.insert(keys[i], values[i]);
    }
    let mut hits = 0u64;
    for k in keys {
        if map.get(k).is_some() {
            hits += 1;
        }
    }
    std::hint::black_box(hits);

    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_benchmarks_reports_full_hit_rate() {
        let config = BenchConfig {
            capacity: 2_000,
            num_keys: 2_000,
            runs: 2,
            warmup: 1,
        };
        let results = run_benchmarks(&config);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].op, "insert");
        assert_eq!(results[1].op, "lookup");
        // Every looked-up key was just inserted.
        assert_eq!(results[1].hit_rate, Some(1.0));
    }

    #[test]
    fn outlier_removal_drops_extremes() {
        let mut timings = vec![1.0, 1.1, 0.9, 1.05, 0.95, 1.0, 100.0];
        remove_outliers(&mut timings);
        assert!(!timings.contains(&100.0));
        assert_eq!(timings.len(), 6);
    }
}
