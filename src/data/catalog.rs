//! Read-only reference catalog: tiers, DR constants and the class, sigil,
//! module, imagine, talent, factor and projection definitions.
//!
//! Every query is total and returns `Option`; callers treat `None` as a zero
//! contribution.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::types::{AttackType, PurpleKind, SlotType, Stat};
use crate::effects::{compile_bond_text, compile_talent_text, EffectClause, StatCondition};

/// Diminishing-returns parameters for one stat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DrConstant {
    #[serde(default)]
    pub base: f64,
    pub constant: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TierValues {
    pub primary: f64,
    pub secondary: f64,
    pub reforge: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GearTier {
    #[serde(default)]
    pub raid: bool,
    pub weapon: TierValues,
    pub armor: TierValues,
    pub accessory: TierValues,
}

impl GearTier {
    pub fn values(&self, slot_type: SlotType) -> TierValues {
        match slot_type {
            SlotType::Weapon => self.weapon,
            SlotType::Armor => self.armor,
            SlotType::Accessory => self.accessory,
        }
    }
}

/// Fixed values for pieces that carry no tier id, keyed by (weapon?, raid?).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacyTiers {
    pub weapon_gold: TierValues,
    pub weapon_raid: TierValues,
    pub other_gold: TierValues,
    pub other_raid: TierValues,
}

impl LegacyTiers {
    pub fn values(&self, is_weapon: bool, raid: bool) -> TierValues {
        match (is_weapon, raid) {
            (true, true) => self.weapon_raid,
            (true, false) => self.weapon_gold,
            (false, true) => self.other_raid,
            (false, false) => self.other_gold,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatBonus {
    pub stat: Stat,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SigilDef {
    /// `levels[0]` is level 1.
    pub levels: Vec<Vec<StatBonus>>,
}

/// What a module affix level feeds. `MainStat` and `Attack` are adaptive and
/// resolve against the class at apply time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleTarget {
    Stat(Stat),
    MainStat,
    Attack,
    AttackPercent,
    AttackSpeed,
    CastSpeed,
    CritDamage,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModuleBonus {
    pub target: ModuleTarget,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleAffix {
    /// `levels[0]` is module level 1; up to six levels.
    pub levels: Vec<Vec<ModuleBonus>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagineDef {
    pub stat: Stat,
    pub values: [f64; 6],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalentDef {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<StatCondition>,
    #[serde(default)]
    pub effects: Vec<EffectClause>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RaidBonus {
    /// Multiplies the stat's total by `1 + value/100`.
    StatPercent { stat: Stat, value: f64 },
    FlatBuff { stat: Stat, value: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetBonus2 {
    StatPercent { stat: Stat, value: f64 },
    AttackSpeed { value: f64 },
    CastSpeed { value: f64 },
    /// Adds `Mastery% × ratio` to crit damage, read from final totals.
    MasteryToCritDamage { ratio: f64 },
    ArmorIgnore { value: f64 },
    /// Adds ASPD only while the pre-bonus ASPD is below `below`.
    ConditionalAttackSpeed {
        value: f64,
        #[serde(default = "default_conditional_aspd_cap")]
        below: f64,
    },
}

fn default_conditional_aspd_cap() -> f64 {
    80.0
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SetBonus4 {
    CritDamage { value: f64 },
    /// Flat percentage points added to the Haste percentage.
    Haste { value: f64 },
    MainStatPercent { value: f64 },
}

impl SetBonus2 {
    pub fn describe(&self) -> String {
        match self {
            Self::StatPercent { stat, value } => format!("{stat} +{value}%"),
            Self::AttackSpeed { value } => format!("ASPD +{value}%"),
            Self::CastSpeed { value } => format!("CSPD +{value}%"),
            Self::MasteryToCritDamage { ratio } => {
                format!("crit damage +{ratio}x mastery%")
            }
            Self::ArmorIgnore { value } => format!("armor ignore +{value}%"),
            Self::ConditionalAttackSpeed { value, below } => {
                format!("ASPD +{value}% while ASPD < {below}%")
            }
        }
    }
}

impl SetBonus4 {
    pub fn describe(&self) -> String {
        match self {
            Self::CritDamage { value } => format!("crit damage +{value}%"),
            Self::Haste { value } => format!("haste +{value}%"),
            Self::MainStatPercent { value } => format!("main stat +{value}%"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDef {
    pub primary: Stat,
    pub secondary: Stat,
    #[serde(default)]
    pub raid_bonus: Option<RaidBonus>,
    /// Stat multipliers granted by a raid weapon; at most two apply.
    #[serde(default)]
    pub weapon_buffs: Vec<StatBonus>,
    #[serde(default)]
    pub set_2pc: Option<SetBonus2>,
    #[serde(default)]
    pub set_4pc: Option<SetBonus4>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDef {
    pub main_stat: Stat,
    #[serde(default)]
    pub attack_type: AttackType,
    pub aspd_ratio: f64,
    pub cspd_ratio: f64,
    #[serde(default)]
    pub specs: BTreeMap<String, SpecDef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FactorKind {
    FlatStat { stat: Stat },
    StatPercent { stat: Stat },
    /// Rescales the stat's total from all sources; may be negative.
    GainMultiplier { stat: Stat },
    AllElement,
    SpecialSkillDamage,
    ExpertiseSkillDamage,
    /// Class-specific ATK/MATK derived from another stat, as a percent ratio.
    AttackFromStat { class: String, stat: Stat },
    ConditionalAttack { buff: String },
    ConditionalElement { buff: String },
    SkillDamage { skill: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorEffectDef {
    #[serde(flatten)]
    pub kind: FactorKind,
    pub grade10: f64,
    #[serde(default)]
    pub grade1: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FactorDef {
    #[serde(default)]
    pub description: String,
    pub effects: Vec<FactorEffectDef>,
}

/// One row of a projection tree. Slot indices point into the config's
/// factor-slot array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "row", rename_all = "snake_case")]
pub enum ProjectionRow {
    Root,
    BranchPair { left: usize, right: usize },
    FactorSlot { slot: usize },
    Final,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BondTier {
    pub level: u8,
    pub bonuses: Vec<StatBonus>,
}

pub const DEFAULT_BOND_UNLOCK_LEVEL: u8 = 35;

fn default_unlock_level() -> u8 {
    DEFAULT_BOND_UNLOCK_LEVEL
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionDef {
    pub rows: Vec<ProjectionRow>,
    #[serde(default)]
    pub bond_general: Vec<BondTier>,
    #[serde(default = "default_unlock_level")]
    pub unlock_level: u8,
    #[serde(default)]
    pub exclusive_text: Vec<String>,
    #[serde(default)]
    pub exclusive: Vec<EffectClause>,
}

impl ProjectionDef {
    /// Factor-slot indices referenced by this tree, in row order.
    pub fn slot_indices(&self) -> Vec<usize> {
        self.rows
            .iter()
            .flat_map(|row| match *row {
                ProjectionRow::BranchPair { left, right } => vec![left, right],
                ProjectionRow::FactorSlot { slot } => vec![slot],
                ProjectionRow::Root | ProjectionRow::Final => Vec::new(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Catalog {
    pub dr: BTreeMap<Stat, DrConstant>,
    pub tiers: BTreeMap<String, GearTier>,
    pub legacy: LegacyTiers,
    pub sigils: BTreeMap<String, SigilDef>,
    pub module_affixes: BTreeMap<String, ModuleAffix>,
    pub imagines: BTreeMap<String, ImagineDef>,
    pub purple: BTreeMap<PurpleKind, Vec<f64>>,
    pub talents: BTreeMap<String, TalentDef>,
    pub classes: BTreeMap<String, ClassDef>,
    pub factors: BTreeMap<String, FactorDef>,
    pub projections: BTreeMap<String, ProjectionDef>,
    /// Tier ids the optimizer assigns to gold and raid pieces.
    pub gold_tier: String,
    pub raid_tier: String,
}

impl Catalog {
    pub fn dr(&self, stat: Stat) -> Option<DrConstant> {
        self.dr.get(&stat).copied()
    }

    pub fn tier(&self, tier: &str) -> Option<&GearTier> {
        self.tiers.get(tier)
    }

    pub fn tier_values(&self, tier: &str, slot_type: SlotType) -> Option<TierValues> {
        self.tier(tier).map(|t| t.values(slot_type))
    }

    pub fn legacy_values(&self, is_weapon: bool, raid: bool) -> TierValues {
        self.legacy.values(is_weapon, raid)
    }

    /// Sigil bonuses at `level` (1-based).
    pub fn sigil_bonus(&self, name: &str, level: u8) -> Option<&[StatBonus]> {
        let index = usize::from(level.max(1)) - 1;
        self.sigils
            .get(name)
            .and_then(|sigil| sigil.levels.get(index))
            .map(Vec::as_slice)
    }

    /// Module affix bonuses at `level` (1..=6). Level 0 has no bonus.
    pub fn module_bonus(&self, affix: &str, level: u8) -> Option<&[ModuleBonus]> {
        if level == 0 {
            return None;
        }
        self.module_affixes
            .get(affix)
            .and_then(|def| def.levels.get(usize::from(level) - 1))
            .map(Vec::as_slice)
    }

    pub fn imagine_value(&self, name: &str, tier: u8) -> Option<(Stat, f64)> {
        let def = self.imagines.get(name)?;
        let value = def.values.get(usize::from(tier))?;
        Some((def.stat, *value))
    }

    pub fn purple_values(&self, kind: PurpleKind) -> Option<&[f64]> {
        self.purple.get(&kind).map(Vec::as_slice)
    }

    pub fn purple_max(&self, kind: PurpleKind) -> Option<f64> {
        self.purple_values(kind)?
            .iter()
            .copied()
            .max_by(f64::total_cmp)
    }

    pub fn talent(&self, name: &str) -> Option<&TalentDef> {
        self.talents.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub fn spec(&self, class: &str, spec: &str) -> Option<&SpecDef> {
        self.class(class)?.specs.get(spec)
    }

    pub fn factor(&self, name: &str) -> Option<&FactorDef> {
        self.factors.get(name)
    }

    pub fn projection(&self, name: &str) -> Option<&ProjectionDef> {
        self.projections.get(name)
    }

    /// Compile talent and bond-exclusive text into effect clauses. Entries that
    /// already carry clauses are left alone.
    pub fn compile_effects(&mut self) {
        for talent in self.talents.values_mut() {
            if !talent.effects.is_empty() || talent.text.trim().is_empty() {
                continue;
            }
            let compiled = compile_talent_text(&talent.text);
            if talent.condition.is_none() {
                talent.condition = compiled.condition;
            }
            talent.effects = compiled.clauses;
        }
        for projection in self.projections.values_mut() {
            if !projection.exclusive.is_empty() {
                continue;
            }
            projection.exclusive = projection
                .exclusive_text
                .iter()
                .flat_map(|line| compile_bond_text(line))
                .collect();
        }
    }

    /// Talents whose text produced no clause. They still load and contribute nothing.
    pub fn uncompiled_talents(&self) -> Vec<&str> {
        self.talents
            .iter()
            .filter(|(_, def)| def.effects.is_empty() && !def.text.trim().is_empty())
            .map(|(name, _)| name.as_str())
            .collect()
    }
}
