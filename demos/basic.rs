//! Basic usage: insert 1M keys, parallel lookup, verify, print timing.

use batch_hashtable::{
    bench::{gen_keys, gen_values, hashmap_baseline, run_benchmarks, BenchConfig},
    BatchHashTable, MISSING,
};
use std::time::Instant;

fn main() {
    println!("=== Batch Hash Table ===\n");

    // ── Quick correctness check ──
    let mut rng = rand::thread_rng();
    let n = 1_000_000;
    let keys = gen_keys(&mut rng, n);
    let values = gen_values(&mut rng, n);

    let mut table = BatchHashTable::with_capacity(n);

    let start = Instant::now();
    table.insert_all(&keys, &values);
    let insert_ms = start.elapsed().as_secs_f64() * 1000.0;

    let start = Instant::now();
    let results = table.lookup_all(&keys);
    let lookup_ms = start.elapsed().as_secs_f64() * 1000.0;

    let hits = results.iter().filter(|&&v| v != MISSING).count();
    let hit_rate = hits as f64 / n as f64 * 100.0;

    println!("Quick check (1M keys):");
    println!("  Insert: {:.3} ms ({:.0} Mops)", insert_ms, n as f64 / insert_ms / 1000.0);
    println!("  Lookup: {:.3} ms ({:.0} Mops)", lookup_ms, n as f64 / lookup_ms / 1000.0);
    println!("  Hit rate: {:.1}% ({}/{})", hit_rate, hits, n);
    println!();

    // ── std::HashMap baseline ──
    let cpu_ms = hashmap_baseline(&keys, &values);
    println!("Baseline (std::HashMap insert+lookup): {:.1} ms", cpu_ms);
    println!("Speedup: {:.1}x\n", cpu_ms / (insert_ms + lookup_ms));

    // ── Full benchmark suite ──
    println!("--- Benchmark: 1M keys ---\n");

    let config = BenchConfig {
        capacity: 1_000_000,
        num_keys: 1_000_000,
        runs: 10,
        warmup: 3,
    };

    let results = run_benchmarks(&config);
    for r in &results {
        println!("  {}", r);
    }
    println!();

    // ── Scaling test: 8M keys (DRAM-resident) ──
    println!("--- Benchmark: 8M keys ---\n");

    let config_large = BenchConfig {
        capacity: 8_000_000,
        num_keys: 8_000_000,
        runs: 5,
        warmup: 2,
    };

    let results_large = run_benchmarks(&config_large);
    for r in &results_large {
        println!("  {}", r);
    }
    println!();

    // ── Summary ──
    let lookup_1m = results.iter().find(|r| r.op == "lookup");
    let lookup_8m = results_large.iter().find(|r| r.op == "lookup");

    if let (Some(small), Some(large)) = (lookup_1m, lookup_8m) {
        println!("=== Summary ===");
        println!("  Lookup @ 1M: {:.0} Mops", small.mops);
        println!("  Lookup @ 8M: {:.0} Mops", large.mops);
    }
}
