//! Run the optimizer once on a single worker and once on all cores, then print
//! timings and speedup.
//!
//! Usage: cargo run --release --bin benchmark_parallel_speedup

use std::time::Instant;

use resonance::data::builtin_catalog;
use resonance::data::types::Stat;
use resonance::loadout::Loadout;
use resonance::optimizer::{optimize, OptimizeOptions, TargetStats};

fn main() {
    let catalog = builtin_catalog();
    let mut current = Loadout::new("stormblade", "iaido");
    current.base_stats.insert(Stat::Agility, 1200.0);
    let target = TargetStats::from_array([32.0, 24.0, 28.0, 40.0, 12.0]);
    let base = OptimizeOptions {
        population: 30,
        generations: 300,
        seed: 12345,
        ..OptimizeOptions::default()
    };

    println!(
        "Optimizer: {} restarts × {} generations (class={}, spec={})",
        base.population, base.generations, current.class_name, current.spec_name
    );
    println!();

    let sequential = OptimizeOptions { workers: 1, ..base.clone() };
    let t0 = Instant::now();
    let outcome_seq = optimize(&current, &target, &sequential, &catalog);
    let seq_ms = t0.elapsed().as_secs_f64() * 1000.0;
    println!("Sequential:  {seq_ms:.2} ms  (distance {:.4})", outcome_seq.distance);

    let parallel = OptimizeOptions { workers: 0, ..base };
    let t0 = Instant::now();
    let outcome_par = optimize(&current, &target, &parallel, &catalog);
    let par_ms = t0.elapsed().as_secs_f64() * 1000.0;
    println!("Parallel:    {par_ms:.2} ms  (distance {:.4})", outcome_par.distance);

    println!();
    println!("Speedup:     {:.2}x faster (parallel vs sequential)", seq_ms / par_ms);

    assert_eq!(outcome_seq.restart, outcome_par.restart, "winning restart differs");
    assert_eq!(outcome_seq.loadout, outcome_par.loadout, "winning loadout differs");
    println!("(Results match sequential vs parallel)");
}
