//! Population-restart hill climbing.

use rayon::prelude::*;

use crate::data::catalog::Catalog;
use crate::loadout::Loadout;
use crate::optimizer::generator::{gen_layout, SearchSpace};
use crate::optimizer::mutation::mutate;
use crate::optimizer::rng::Rng;
use crate::optimizer::scoring::{score, TargetStats};
use crate::stats::StatsResult;

#[derive(Debug, Clone)]
pub struct RestartResult {
    pub index: usize,
    pub loadout: Loadout,
    pub distance: f64,
    pub stats: StatsResult,
    /// Best distance after each generation, starting with the initial layout.
    pub history: Vec<f64>,
}

pub struct Search<'a> {
    pub space: SearchSpace,
    pub target: TargetStats,
    pub catalog: &'a Catalog,
    pub generations: usize,
    pub seed: u64,
}

impl Search<'_> {
    /// One restart: random layout, then strictly-improving single mutations.
    pub fn run_restart(&self, index: usize) -> RestartResult {
        let mut rng = Rng::for_stream(self.seed, index as u64);
        let mut best = gen_layout(&self.space, &mut rng);
        let (mut best_distance, mut best_stats) = score(&best, &self.target, self.catalog);
        let mut history = Vec::with_capacity(self.generations + 1);
        history.push(best_distance);

        for _ in 0..self.generations {
            let mutant = mutate(&self.space, &best, &mut rng);
            let (distance, stats) = score(&mutant, &self.target, self.catalog);
            if distance < best_distance {
                best = mutant;
                best_distance = distance;
                best_stats = stats;
            }
            history.push(best_distance);
        }

        tracing::debug!(restart = index, distance = best_distance, "restart finished");
        RestartResult {
            index,
            loadout: best,
            distance: best_distance,
            stats: best_stats,
            history,
        }
    }

    pub fn run_range(&self, start: usize, end: usize) -> Vec<RestartResult> {
        (start..end)
            .into_par_iter()
            .map(|index| self.run_restart(index))
            .collect()
    }
}

/// Keep the lower distance; equal distances keep the lower restart index.
pub fn pick_better(current: Option<RestartResult>, candidate: RestartResult) -> Option<RestartResult> {
    match current {
        Some(best)
            if best.distance < candidate.distance
                || (best.distance == candidate.distance && best.index < candidate.index) =>
        {
            Some(best)
        }
        _ => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_catalog;
    use crate::optimizer::OptimizeOptions;

    fn search(catalog: &Catalog, generations: usize) -> Search<'_> {
        let options = OptimizeOptions::default();
        Search {
            space: SearchSpace::new(&Loadout::new("stormblade", "iaido"), &options, catalog),
            target: TargetStats::from_array([30.0, 20.0, 25.0, 30.0, 10.0]),
            catalog,
            generations,
            seed: 99,
        }
    }

    #[test]
    fn history_never_increases() {
        let catalog = builtin_catalog();
        let result = search(&catalog, 60).run_restart(0);
        assert_eq!(result.history.len(), 61);
        assert!(result.history.windows(2).all(|w| w[1] <= w[0]));
        assert_eq!(result.history.last().copied(), Some(result.distance));
    }

    #[test]
    fn restart_is_reproducible() {
        let catalog = builtin_catalog();
        let search = search(&catalog, 20);
        let a = search.run_restart(3);
        let b = search.run_restart(3);
        assert_eq!(a.loadout, b.loadout);
        assert_eq!(a.distance.to_bits(), b.distance.to_bits());
    }

    fn result(index: usize, distance: f64) -> RestartResult {
        RestartResult {
            index,
            loadout: Loadout::default(),
            distance,
            stats: StatsResult::default(),
            history: Vec::new(),
        }
    }

    #[test]
    fn ties_go_to_the_lowest_index() {
        let best = pick_better(None, result(4, 1.0));
        let best = pick_better(best, result(2, 1.0));
        let best = pick_better(best, result(7, 1.0));
        assert_eq!(best.map(|r| r.index), Some(2));
        let best = pick_better(Some(result(2, 1.0)), result(9, 0.5));
        assert_eq!(best.map(|r| r.index), Some(9));
    }
}
