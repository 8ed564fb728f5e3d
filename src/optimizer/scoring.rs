use serde::{Deserialize, Serialize};

use crate::data::catalog::Catalog;
use crate::data::types::{Stat, CORE_STATS};
use crate::loadout::Loadout;
use crate::stats::{aggregate, StatsResult};

/// Desired core percentages. Unset stats do not count toward the distance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetStats {
    pub crit: Option<f64>,
    pub haste: Option<f64>,
    pub luck: Option<f64>,
    pub mastery: Option<f64>,
    pub versatility: Option<f64>,
}

impl TargetStats {
    /// Targets in `[Crit, Haste, Luck, Mastery, Versatility]` order.
    pub fn from_array(values: [f64; 5]) -> Self {
        let [crit, haste, luck, mastery, versatility] = values.map(Some);
        Self {
            crit,
            haste,
            luck,
            mastery,
            versatility,
        }
    }

    pub fn get(&self, stat: Stat) -> Option<f64> {
        match stat {
            Stat::Crit => self.crit,
            Stat::Haste => self.haste,
            Stat::Luck => self.luck,
            Stat::Mastery => self.mastery,
            Stat::Versatility => self.versatility,
            _ => None,
        }
        .filter(|value| value.is_finite())
    }
}

/// Sum of absolute gaps between derived percentages and the targets. The
/// derived percentages already carry external and percentage-point adds.
pub fn calc_diff(stats: &StatsResult, target: &TargetStats) -> f64 {
    CORE_STATS
        .iter()
        .filter_map(|stat| target.get(*stat).map(|want| (stats.percent(*stat) - want).abs()))
        .sum()
}

pub fn score(loadout: &Loadout, target: &TargetStats, catalog: &Catalog) -> (f64, StatsResult) {
    let stats = aggregate(loadout, catalog);
    (calc_diff(&stats, target), stats)
}
