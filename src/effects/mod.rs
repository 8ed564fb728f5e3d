//! Closed effect vocabulary for talents and bond-exclusive bonuses.
//!
//! Catalog entries may be authored either as tagged [EffectClause] lists or as
//! free text. Text is compiled into clauses once, when the catalog is built
//! ([compile_talent_text], [compile_bond_text]); the aggregator only ever sees
//! clauses.

mod parser;

use serde::{Deserialize, Serialize};

use crate::data::types::Stat;

pub use parser::{compile_bond_text, compile_talent_text, CompiledText};

/// One bonus shape. Percent values are percentage points (`6.0` = 6%).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectClause {
    AttackSpeedPercent { value: f64 },
    CastSpeedPercent { value: f64 },
    /// Adds directly to the derived percentage of a core stat.
    StatPercentPoints { stat: Stat, value: f64 },
    CritDamagePercent { value: f64 },
    MaxHpPercent { value: f64 },
    ArmorPercent { value: f64 },
    FlatStat { stat: Stat, value: f64 },
    /// Added to the class Haste→ASPD ratio (`1.0` doubles a 1.0 ratio).
    HasteRatioBonus { value: f64 },
    DreamDamagePercent { value: f64 },
    MainStatFlat { value: f64 },
    ConditionalCritLuck {
        crit: f64,
        luck: f64,
        condition: String,
    },
}

/// "when STAT ≥ N" gate evaluated against raw totals at talent time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatCondition {
    pub stat: Stat,
    pub min: f64,
}

impl StatCondition {
    pub fn is_met(&self, current: f64) -> bool {
        current >= self.min
    }
}

impl EffectClause {
    pub fn describe(&self) -> String {
        match self {
            Self::AttackSpeedPercent { value } => format!("ASPD +{value}%"),
            Self::CastSpeedPercent { value } => format!("CSPD +{value}%"),
            Self::StatPercentPoints { stat, value } => format!("{stat} +{value}%"),
            Self::CritDamagePercent { value } => format!("crit damage +{value}%"),
            Self::MaxHpPercent { value } => format!("max HP +{value}%"),
            Self::ArmorPercent { value } => format!("armor +{value}%"),
            Self::FlatStat { stat, value } => format!("{stat} +{value}"),
            Self::HasteRatioBonus { value } => format!("haste conversion +{value}"),
            Self::DreamDamagePercent { value } => format!("dream damage +{value}%"),
            Self::MainStatFlat { value } => format!("main stats +{value}"),
            Self::ConditionalCritLuck {
                crit,
                luck,
                condition,
            } => format!("{condition}: crit +{crit}%, luck +{luck}%"),
        }
    }
}
