//! Loadout record: the full player configuration the aggregator reads.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::data::types::{GearSlot, ModuleRarity, PurpleKind, Stat, GEAR_SLOT_COUNT};
use crate::factors::PsychoscopeConfig;

pub const MODULE_SLOT_COUNT: usize = 4;
pub const IMAGINE_SLOT_COUNT: usize = 2;
pub const MAX_PERFECTION: f64 = 100.0;
pub const MAX_SIGIL_LEVEL: u8 = 3;
pub const MAX_AFFIX_POINTS: u8 = 10;
pub const MAX_IMAGINE_TIER: u8 = 5;

fn full_perfection() -> f64 {
    MAX_PERFECTION
}

fn first_level() -> u8 {
    1
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SigilSlot {
    pub name: String,
    #[serde(default = "first_level")]
    pub level: u8,
}

impl SigilSlot {
    pub fn clamped_level(&self) -> u8 {
        self.level.clamp(1, MAX_SIGIL_LEVEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PurpleStat {
    pub kind: PurpleKind,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GearPiece {
    /// Tier id; `None` uses the legacy fixed values.
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub raid: bool,
    #[serde(default)]
    pub primary: Option<Stat>,
    #[serde(default)]
    pub secondary: Option<Stat>,
    #[serde(default)]
    pub reforge: Option<Stat>,
    #[serde(default = "full_perfection")]
    pub perfection: f64,
    #[serde(default)]
    pub sigil: Option<SigilSlot>,
    #[serde(default)]
    pub purple: Option<PurpleStat>,
}

impl Default for GearPiece {
    fn default() -> Self {
        Self {
            tier: None,
            raid: false,
            primary: None,
            secondary: None,
            reforge: None,
            perfection: MAX_PERFECTION,
            sigil: None,
            purple: None,
        }
    }
}

impl GearPiece {
    pub fn with_tier(tier: impl Into<String>, raid: bool) -> Self {
        Self {
            tier: Some(tier.into()),
            raid,
            ..Self::default()
        }
    }

    pub fn rolls(mut self, primary: Stat, secondary: Stat, reforge: Option<Stat>) -> Self {
        self.primary = Some(primary);
        self.secondary = Some(secondary);
        self.reforge = reforge;
        self
    }

    pub fn clamped_perfection(&self) -> f64 {
        if self.perfection.is_finite() {
            self.perfection.clamp(0.0, MAX_PERFECTION)
        } else {
            MAX_PERFECTION
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffixRoll {
    pub affix: String,
    pub points: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModuleSlot {
    #[serde(default)]
    pub rarity: ModuleRarity,
    #[serde(default)]
    pub affixes: Vec<AffixRoll>,
}

impl ModuleSlot {
    /// Sub-slots that count for this rarity, with points clamped to 1..=10.
    pub fn active_affixes(&self) -> impl Iterator<Item = (&str, u8)> + '_ {
        self.affixes
            .iter()
            .take(self.rarity.active_affixes())
            .map(|roll| (roll.affix.as_str(), roll.points.clamp(1, MAX_AFFIX_POINTS)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImagineSlot {
    pub name: String,
    #[serde(default)]
    pub tier: u8,
}

impl ImagineSlot {
    pub fn clamped_tier(&self) -> u8 {
        self.tier.min(MAX_IMAGINE_TIER)
    }
}

/// Flat buffs from outside the loadout (party, food), in percentage points.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExternalBuffs {
    pub stat_pct: BTreeMap<Stat, f64>,
    pub aspd_pct: f64,
    pub cspd_pct: f64,
}

impl ExternalBuffs {
    pub fn stat(&self, stat: Stat) -> f64 {
        self.stat_pct.get(&stat).copied().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Loadout {
    pub class_name: String,
    pub spec_name: String,
    pub gear: [Option<GearPiece>; GEAR_SLOT_COUNT],
    pub modules: [ModuleSlot; MODULE_SLOT_COUNT],
    pub imagines: [Option<ImagineSlot>; IMAGINE_SLOT_COUNT],
    pub talents: BTreeSet<String>,
    pub aspd_override: Option<f64>,
    pub base_stats: BTreeMap<Stat, f64>,
    pub external: ExternalBuffs,
    pub psychoscope: PsychoscopeConfig,
}

impl Loadout {
    pub fn new(class_name: impl Into<String>, spec_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            spec_name: spec_name.into(),
            ..Self::default()
        }
    }

    pub fn piece(&self, slot: GearSlot) -> Option<&GearPiece> {
        self.gear[slot.index()].as_ref()
    }

    pub fn piece_mut(&mut self, slot: GearSlot) -> Option<&mut GearPiece> {
        self.gear[slot.index()].as_mut()
    }

    pub fn set_piece(&mut self, slot: GearSlot, piece: GearPiece) {
        self.gear[slot.index()] = Some(piece);
    }

    pub fn equipped(&self) -> impl Iterator<Item = (GearSlot, &GearPiece)> + '_ {
        GearSlot::ALL
            .iter()
            .filter_map(|slot| self.piece(*slot).map(|piece| (*slot, piece)))
    }

    pub fn base_stat(&self, stat: Stat) -> f64 {
        self.base_stats.get(&stat).copied().unwrap_or(0.0)
    }

    /// Raid pieces in set-counting slots. The weapon never counts.
    pub fn raid_armor_count(&self) -> usize {
        GearSlot::RAID_SET
            .iter()
            .filter(|slot| self.piece(**slot).is_some_and(|piece| piece.raid))
            .count()
    }

    pub fn has_raid_weapon(&self) -> bool {
        self.piece(GearSlot::Weapon).is_some_and(|piece| piece.raid)
    }
}
