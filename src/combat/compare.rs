//! Side-by-side simulation of several loadouts through the same fight loop.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::{simulate, Rotation, SimInputs, SimResult};
use crate::data::catalog::Catalog;
use crate::loadout::Loadout;
use crate::stats::{aggregate, StatsResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonEntry {
    pub label: String,
    pub stats: StatsResult,
    pub result: SimResult,
    /// DPS relative to the first entry, in percent.
    pub dps_delta_pct: f64,
}

/// Aggregate and simulate each loadout in parallel. Entries come back in
/// input order; each run uses its loadout's own combat talents.
pub fn compare(
    loadouts: &[(String, Loadout)],
    inputs: &SimInputs,
    rotation: &Rotation,
    catalog: &Catalog,
) -> Vec<ComparisonEntry> {
    let runs: Vec<(StatsResult, SimResult)> = loadouts
        .par_iter()
        .map(|(_, loadout)| {
            let stats = aggregate(loadout, catalog);
            let result = simulate(&stats, &inputs.with_loadout_talents(loadout), rotation);
            (stats, result)
        })
        .collect();

    let baseline = runs.first().map(|(_, r)| r.dps).unwrap_or(0.0);
    loadouts
        .iter()
        .zip(runs)
        .map(|((label, _), (stats, result))| ComparisonEntry {
            label: label.clone(),
            dps_delta_pct: if baseline > 0.0 {
                (result.dps / baseline - 1.0) * 100.0
            } else {
                0.0
            },
            stats,
            result,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::builtin_catalog;
    use crate::data::types::Stat;

    #[test]
    fn results_keep_input_order() {
        let catalog = builtin_catalog();
        let plain = Loadout::new("stormblade", "iaido");
        let mut crit = plain.clone();
        crit.base_stats.insert(Stat::Crit, 4000.0);

        let entries = compare(
            &[("plain".into(), plain), ("crit".into(), crit)],
            &SimInputs::default(),
            &Rotation::Priority,
            &catalog,
        );
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "plain");
        assert_eq!(entries[0].dps_delta_pct, 0.0);
        assert!(entries[1].dps_delta_pct > 0.0);
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let catalog = builtin_catalog();
        assert!(compare(&[], &SimInputs::default(), &Rotation::Priority, &catalog).is_empty());
    }
}
