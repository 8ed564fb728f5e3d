pub mod compare;
pub mod damage;
pub mod engine;
pub mod export_csv;
pub mod rotation;
pub mod skills;
pub mod state;
pub mod trace;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::loadout::Loadout;

pub use compare::{compare, ComparisonEntry};
pub use engine::simulate;
pub use export_csv::{export_trace_csv, write_trace_csv, ExportError};
pub use rotation::{Rotation, RotationStep};
pub use state::CombatTalents;
pub use trace::{TraceMode, TraceSample};

pub const DEFAULT_FIGHT_DURATION: f64 = 120.0;
pub const DEFAULT_BASE_ATTACK: f64 = 2000.0;

/// Fight parameters that are not part of the character sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimInputs {
    /// Seconds.
    pub fight_duration: f64,
    pub base_attack: f64,
    pub damage_bonus_pct: f64,
    /// Applies to Wind and Thunder damage only.
    pub element_bonus_pct: f64,
    /// Fraction of the fight conditional Crit/Luck bonuses are up, `0..=1`.
    pub conditional_uptime: f64,
    pub target_mitigation_pct: f64,
    pub talents: CombatTalents,
    pub trace_mode: TraceMode,
}

impl Default for SimInputs {
    fn default() -> Self {
        Self {
            fight_duration: DEFAULT_FIGHT_DURATION,
            base_attack: DEFAULT_BASE_ATTACK,
            damage_bonus_pct: 0.0,
            element_bonus_pct: 0.0,
            conditional_uptime: 1.0,
            target_mitigation_pct: 0.0,
            talents: CombatTalents::default(),
            trace_mode: TraceMode::default(),
        }
    }
}

impl SimInputs {
    /// Same inputs with the combat talents taken from `loadout`.
    pub fn with_loadout_talents(&self, loadout: &Loadout) -> Self {
        Self {
            talents: CombatTalents::from_names(loadout.talents.iter().map(String::as_str)),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillBreakdown {
    pub casts: u64,
    pub hits: u64,
    pub damage: f64,
    /// Fraction of total damage.
    pub share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimResult {
    pub total_damage: f64,
    pub dps: f64,
    pub duration: f64,
    pub breakdown: BTreeMap<String, SkillBreakdown>,
    pub trace: Vec<TraceSample>,
    pub log: Vec<String>,
}
