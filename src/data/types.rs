//! Shared keys for catalog lookups and the loadout model.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stat {
    Crit,
    Haste,
    Luck,
    Mastery,
    Versatility,
    Strength,
    Agility,
    Intellect,
    Armor,
    MaxHp,
}

/// The five stats that go through the diminishing-returns conversion.
pub const CORE_STATS: [Stat; 5] = [
    Stat::Crit,
    Stat::Haste,
    Stat::Luck,
    Stat::Mastery,
    Stat::Versatility,
];

impl Stat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crit => "crit",
            Self::Haste => "haste",
            Self::Luck => "luck",
            Self::Mastery => "mastery",
            Self::Versatility => "versatility",
            Self::Strength => "strength",
            Self::Agility => "agility",
            Self::Intellect => "intellect",
            Self::Armor => "armor",
            Self::MaxHp => "max_hp",
        }
    }

    pub fn is_core(self) -> bool {
        CORE_STATS.contains(&self)
    }

    /// Parse a stat name as it appears in effect text ("Crit", "critical", "Max HP").
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "crit" | "critical" | "critrate" | "criticalrate" => Some(Self::Crit),
            "haste" => Some(Self::Haste),
            "luck" => Some(Self::Luck),
            "mastery" => Some(Self::Mastery),
            "versatility" | "vers" => Some(Self::Versatility),
            "strength" | "str" => Some(Self::Strength),
            "agility" | "agi" => Some(Self::Agility),
            "intellect" | "int" => Some(Self::Intellect),
            "armor" | "armour" => Some(Self::Armor),
            "maxhp" | "hp" => Some(Self::MaxHp),
            _ => None,
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackType {
    Physical,
    Magic,
}

impl Default for AttackType {
    fn default() -> Self {
        Self::Physical
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotType {
    Weapon,
    Armor,
    Accessory,
}

pub const GEAR_SLOT_COUNT: usize = 11;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GearSlot {
    Weapon,
    Helmet,
    Chest,
    Gloves,
    Boots,
    Earrings,
    Necklace,
    Ring,
    LeftBracelet,
    RightBracelet,
    Charm,
}

impl GearSlot {
    pub const ALL: [GearSlot; GEAR_SLOT_COUNT] = [
        GearSlot::Weapon,
        GearSlot::Helmet,
        GearSlot::Chest,
        GearSlot::Gloves,
        GearSlot::Boots,
        GearSlot::Earrings,
        GearSlot::Necklace,
        GearSlot::Ring,
        GearSlot::LeftBracelet,
        GearSlot::RightBracelet,
        GearSlot::Charm,
    ];

    /// Slots counted toward the raid set bonus. The weapon is excluded.
    pub const RAID_SET: [GearSlot; 9] = [
        GearSlot::Helmet,
        GearSlot::Chest,
        GearSlot::Gloves,
        GearSlot::Boots,
        GearSlot::Earrings,
        GearSlot::Necklace,
        GearSlot::Ring,
        GearSlot::LeftBracelet,
        GearSlot::RightBracelet,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn slot_type(self) -> SlotType {
        match self {
            Self::Weapon => SlotType::Weapon,
            Self::Helmet | Self::Chest | Self::Gloves | Self::Boots => SlotType::Armor,
            _ => SlotType::Accessory,
        }
    }

    pub fn counts_toward_raid_set(self) -> bool {
        Self::RAID_SET.contains(&self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurpleKind {
    AttackSpeed,
    CastSpeed,
    CritDamage,
    AttackPercent,
    MaxHp,
}

impl PurpleKind {
    pub const ALL: [PurpleKind; 5] = [
        PurpleKind::AttackSpeed,
        PurpleKind::CastSpeed,
        PurpleKind::CritDamage,
        PurpleKind::AttackPercent,
        PurpleKind::MaxHp,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleRarity {
    Gold,
    Purple,
    Blue,
}

impl ModuleRarity {
    /// Number of affix sub-slots that contribute for this rarity.
    pub const fn active_affixes(self) -> usize {
        match self {
            Self::Gold => 3,
            Self::Purple => 2,
            Self::Blue => 1,
        }
    }
}

impl Default for ModuleRarity {
    fn default() -> Self {
        Self::Blue
    }
}
