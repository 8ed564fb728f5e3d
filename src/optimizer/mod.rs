//! Loadout optimizer: search gear layouts whose derived core percentages land
//! closest to a target.
//!
//! Restarts are independent and run on rayon. Each owns an [rng::Rng] stream
//! seeded from `(seed, restart index)`, so the outcome does not depend on the
//! worker count.

pub mod generator;
pub mod mutation;
pub mod rng;
pub mod scoring;
pub mod search;

use serde::{Deserialize, Serialize};

use crate::data::catalog::Catalog;
use crate::loadout::Loadout;
use crate::parallel::{batch_ranges, WorkerPool};
use crate::stats::StatsResult;

pub use generator::{gen_layout, SearchSpace};
pub use scoring::{calc_diff, TargetStats};
use search::{pick_better, RestartResult, Search};

/// Number of progress-reporting batches for optimize-with-progress.
const OPTIMIZE_PROGRESS_BATCH_COUNT: usize = 10;

pub const DEFAULT_POPULATION: usize = 30;
pub const DEFAULT_GENERATIONS: usize = 300;
pub const DEFAULT_PURPLE_CHANCE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizeOptions {
    /// Keep equipped pieces of the current loadout; only empty slots are searched.
    pub lock_current_gear: bool,
    pub randomize_imagines: bool,
    pub randomize_purple: bool,
    /// Raid armor pieces allowed, 4 or 6. Other values snap to the nearest.
    pub max_raid_pieces: usize,
    pub population: usize,
    pub generations: usize,
    pub seed: u64,
    /// 0 uses every core.
    pub workers: usize,
    pub purple_chance: f64,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            lock_current_gear: false,
            randomize_imagines: false,
            randomize_purple: true,
            max_raid_pieces: 4,
            population: DEFAULT_POPULATION,
            generations: DEFAULT_GENERATIONS,
            seed: 0,
            workers: 0,
            purple_chance: DEFAULT_PURPLE_CHANCE,
        }
    }
}

impl OptimizeOptions {
    pub fn raid_cap(&self) -> usize {
        if self.max_raid_pieces >= 5 {
            6
        } else {
            4
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizeOutcome {
    pub loadout: Loadout,
    pub distance: f64,
    pub stats: StatsResult,
    /// Winning restart's best distance per generation.
    pub history: Vec<f64>,
    pub restart: usize,
}

impl From<RestartResult> for OptimizeOutcome {
    fn from(result: RestartResult) -> Self {
        Self {
            loadout: result.loadout,
            distance: result.distance,
            stats: result.stats,
            history: result.history,
            restart: result.index,
        }
    }
}

/// Best layout for `target`, starting from `current` (class, spec, talents,
/// psychoscope and any locked gear come from it).
pub fn optimize(
    current: &Loadout,
    target: &TargetStats,
    options: &OptimizeOptions,
    catalog: &Catalog,
) -> OptimizeOutcome {
    optimize_with_progress(current, target, options, catalog, |_, _| {})
}

/// Like [optimize] but runs restarts in batches and calls `on_progress(done, total)`
/// after each one. The result is identical to [optimize].
pub fn optimize_with_progress<F>(
    current: &Loadout,
    target: &TargetStats,
    options: &OptimizeOptions,
    catalog: &Catalog,
    mut on_progress: F,
) -> OptimizeOutcome
where
    F: FnMut(usize, usize),
{
    let search = Search {
        space: SearchSpace::new(current, options, catalog),
        target: *target,
        catalog,
        generations: options.generations,
        seed: options.seed,
    };
    let total = options.population.max(1);
    on_progress(0, total);

    let pool = WorkerPool::with_workers(options.workers);
    let mut best: Option<RestartResult> = None;
    for (start, end) in batch_ranges(total, OPTIMIZE_PROGRESS_BATCH_COUNT) {
        let batch = pool.install(|| search.run_range(start, end));
        for result in batch {
            best = pick_better(best, result);
        }
        on_progress(end, total);
    }

    match best {
        Some(result) => {
            tracing::debug!(
                restart = result.index,
                distance = result.distance,
                "optimizer finished"
            );
            result.into()
        }
        // population is clamped to at least one restart
        None => search.run_restart(0).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_catalog;

    #[test]
    fn raid_cap_snaps_to_four_or_six() {
        let mut options = OptimizeOptions::default();
        assert_eq!(options.raid_cap(), 4);
        options.max_raid_pieces = 6;
        assert_eq!(options.raid_cap(), 6);
        options.max_raid_pieces = 0;
        assert_eq!(options.raid_cap(), 4);
    }

    #[test]
    fn progress_reports_every_restart() {
        let catalog = builtin_catalog();
        let options = OptimizeOptions {
            population: 6,
            generations: 5,
            ..OptimizeOptions::default()
        };
        let mut reports = Vec::new();
        let outcome = optimize_with_progress(
            &Loadout::new("stormblade", "iaido"),
            &TargetStats::from_array([25.0, 15.0, 20.0, 30.0, 8.0]),
            &options,
            &catalog,
            |done, total| reports.push((done, total)),
        );
        assert_eq!(reports.first(), Some(&(0, 6)));
        assert_eq!(reports.last(), Some(&(6, 6)));
        assert!(outcome.restart < 6);
        assert!(outcome.distance.is_finite());
    }
}
