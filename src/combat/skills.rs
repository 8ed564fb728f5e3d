//! Fixed skill kit for the rotation simulator.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    Basic,
    Skill,
    Special,
    Expertise,
    Ultimate,
    Summon,
    Proc,
}

impl SkillType {
    /// How strongly Mastery scales this damage type.
    pub const fn mastery_scale(self) -> f64 {
        match self {
            Self::Basic => 0.5,
            Self::Skill => 1.0,
            Self::Special => 1.0,
            Self::Expertise => 1.2,
            Self::Ultimate => 1.0,
            Self::Summon => 0.8,
            Self::Proc => 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Physical,
    Wind,
    Thunder,
}

impl Element {
    pub const fn is_elemental(self) -> bool {
        !matches!(self, Self::Physical)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Skill {
    pub key: &'static str,
    pub cooldown: f64,
    pub cast_time: f64,
    /// Percent of ATK per hit.
    pub motion_value: f64,
    /// Flat damage per hit.
    pub flat_damage: f64,
    pub hits: u32,
    pub element: Element,
    pub kind: SkillType,
    pub scales_with_aspd: bool,
    pub intent_cost: f64,
    pub intent_gain: f64,
    pub sigil_cost: f64,
    pub sigil_gain: f64,
    pub seed_gain: u32,
    /// False for skills only the simulator itself triggers.
    pub rotation_castable: bool,
}

const fn skill(key: &'static str, kind: SkillType, element: Element) -> Skill {
    Skill {
        key,
        cooldown: 0.0,
        cast_time: 1.0,
        motion_value: 0.0,
        flat_damage: 0.0,
        hits: 1,
        element,
        kind,
        scales_with_aspd: false,
        intent_cost: 0.0,
        intent_gain: 0.0,
        sigil_cost: 0.0,
        sigil_gain: 0.0,
        seed_gain: 0,
        rotation_castable: true,
    }
}

pub const BASIC_ATTACK: Skill = Skill {
    cast_time: 0.6,
    motion_value: 55.0,
    hits: 3,
    scales_with_aspd: true,
    intent_gain: 4.0,
    ..skill("basic_attack", SkillType::Basic, Element::Physical)
};

pub const GALE_SLASH: Skill = Skill {
    cast_time: 1.0,
    motion_value: 140.0,
    hits: 2,
    scales_with_aspd: true,
    intent_cost: 20.0,
    sigil_gain: 1.0,
    ..skill("gale_slash", SkillType::Skill, Element::Wind)
};

pub const GALE_SLASH_ENHANCED: Skill = Skill {
    cast_time: 1.0,
    motion_value: 320.0,
    hits: 3,
    scales_with_aspd: true,
    intent_cost: 30.0,
    sigil_gain: 2.0,
    rotation_castable: false,
    ..skill("gale_slash_enhanced", SkillType::Skill, Element::Wind)
};

pub const THUNDER_STRIKE: Skill = Skill {
    cooldown: 6.0,
    cast_time: 0.8,
    motion_value: 380.0,
    seed_gain: 1,
    ..skill("thunder_strike", SkillType::Special, Element::Thunder)
};

pub const LIGHTNING_FLASH: Skill = Skill {
    cooldown: 10.0,
    cast_time: 0.7,
    motion_value: 260.0,
    ..skill("lightning_flash", SkillType::Expertise, Element::Thunder)
};

/// Same-cast follow-up armed by [LIGHTNING_FLASH].
pub const LIGHTNING_AFTERIMAGE: Skill = Skill {
    cast_time: 0.0,
    motion_value: 150.0,
    rotation_castable: false,
    ..skill("lightning_afterimage", SkillType::Expertise, Element::Thunder)
};

/// Fires when Charge-Seeds reach [SEED_THRESHOLD]; always crits.
pub const THUNDERCLAP: Skill = Skill {
    cast_time: 0.8,
    motion_value: 900.0,
    rotation_castable: false,
    ..skill("thunderclap", SkillType::Special, Element::Thunder)
};

pub const SIGIL_RELEASE: Skill = Skill {
    cooldown: 2.0,
    cast_time: 0.8,
    motion_value: 260.0,
    sigil_cost: 2.0,
    ..skill("sigil_release", SkillType::Skill, Element::Wind)
};

pub const STORM_GATHER: Skill = Skill {
    cooldown: 12.0,
    cast_time: 0.5,
    sigil_gain: 2.0,
    ..skill("storm_gather", SkillType::Skill, Element::Wind)
};

pub const CENTERED_BREATH: Skill = Skill {
    cooldown: 15.0,
    cast_time: 0.5,
    intent_gain: 60.0,
    ..skill("centered_breath", SkillType::Skill, Element::Physical)
};

pub const WAR_CRY: Skill = Skill {
    cooldown: 30.0,
    cast_time: 0.5,
    ..skill("war_cry", SkillType::Skill, Element::Physical)
};

pub const VOLT_SURGE: Skill = Skill {
    cooldown: 60.0,
    cast_time: 1.2,
    motion_value: 600.0,
    ..skill("volt_surge", SkillType::Ultimate, Element::Thunder)
};

pub const THUNDER_HAWK: Skill = Skill {
    cooldown: 30.0,
    cast_time: 0.5,
    ..skill("thunder_hawk", SkillType::Summon, Element::Thunder)
};

/// ICD-gated proc after [ICD_PROC_TRIGGERS].
pub const STATIC_DISCHARGE: Skill = Skill {
    cast_time: 0.0,
    motion_value: 180.0,
    rotation_castable: false,
    ..skill("static_discharge", SkillType::Proc, Element::Thunder)
};

/// Fixed-interval proc accruing in real time.
pub const THUNDER_MARK: Skill = Skill {
    cast_time: 0.0,
    motion_value: 500.0,
    rotation_castable: false,
    ..skill("thunder_mark", SkillType::Proc, Element::Thunder)
};

pub const SKILLS: [Skill; 15] = [
    BASIC_ATTACK,
    GALE_SLASH,
    GALE_SLASH_ENHANCED,
    THUNDER_STRIKE,
    LIGHTNING_FLASH,
    LIGHTNING_AFTERIMAGE,
    THUNDERCLAP,
    SIGIL_RELEASE,
    STORM_GATHER,
    CENTERED_BREATH,
    WAR_CRY,
    VOLT_SURGE,
    THUNDER_HAWK,
    STATIC_DISCHARGE,
    THUNDER_MARK,
];

/// Built-in priority policy, top to bottom.
pub const PRIORITY: [&str; 10] = [
    "volt_surge",
    "war_cry",
    "thunder_hawk",
    "lightning_flash",
    "thunder_strike",
    "sigil_release",
    "storm_gather",
    "centered_breath",
    "gale_slash",
    "basic_attack",
];

/// Filler order when the requested skill cannot be cast.
pub const FILLERS: [&str; 4] = ["centered_breath", "sigil_release", "storm_gather", "basic_attack"];

/// Talents read by the simulator rather than the stat aggregator.
pub const COMBAT_TALENTS: [&str; 3] = ["blade_reservoir", "quickening", "double_edge"];

pub const INTENT_CAP: f64 = 100.0;
pub const RESERVOIR_INTENT_BONUS: f64 = 20.0;
pub const SIGIL_CAP: f64 = 4.0;
pub const INTENT_REGEN_PER_SEC: f64 = 2.0;
pub const SIGIL_REGEN_PER_SEC: f64 = 0.1;
pub const QUICKENING_REGEN_MULT: f64 = 1.5;
pub const SURGE_REGEN_MULT: f64 = 2.0;

/// Centered Breath is only worth casting below this much Blade-Intent.
pub const BREATH_INTENT_BELOW: f64 = 40.0;
/// Storm Gather is skipped while this many Sigils are held.
pub const GATHER_SIGILS_BELOW: f64 = 2.0;
pub const DOUBLE_EDGE_INTENT: f64 = 70.0;

pub const SEED_THRESHOLD: u32 = 3;
pub const GALE_STREAK_THRESHOLD: u32 = 3;

pub const WAR_CRY_DURATION: f64 = 10.0;
pub const WAR_CRY_ATTACK_PCT: f64 = 15.0;
pub const SURGE_DURATION: f64 = 15.0;
pub const SURGE_ASPD_PCT: f64 = 25.0;

pub const HAWK_LIFETIME: f64 = 12.0;
pub const HAWK_INTERVAL: f64 = 2.0;
pub const HAWK_MOTION_VALUE: f64 = 90.0;
/// Extra tick chance per unit of Luck rate.
pub const HAWK_LUCK_EXTRA: f64 = 0.5;

pub const ICD_PROC_TRIGGERS: [&str; 3] = ["thunder_strike", "gale_slash", "gale_slash_enhanced"];
pub const ICD_PROC_COOLDOWN: f64 = 4.0;
pub const ICD_PROC_CHANCE: f64 = 0.35;

pub const MARK_INTERVAL: f64 = 8.0;
pub const MARK_SEED: f64 = 4.0;

pub const LUCKY_STRIKE_MOTION_VALUE: f64 = 45.0;

pub fn find_skill(key: &str) -> Option<&'static Skill> {
    SKILLS.iter().find(|skill| skill.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_priority_and_filler_key_resolves() {
        for key in PRIORITY.iter().chain(FILLERS.iter()) {
            let skill = find_skill(key).unwrap_or_else(|| panic!("missing skill {key}"));
            assert!(skill.rotation_castable, "{key} must be castable");
        }
    }

    #[test]
    fn triggered_skills_are_not_rotation_castable() {
        for key in [
            "gale_slash_enhanced",
            "thunderclap",
            "lightning_afterimage",
            "static_discharge",
            "thunder_mark",
        ] {
            assert!(!find_skill(key).map(|s| s.rotation_castable).unwrap_or(true));
        }
    }

    #[test]
    fn basic_attack_has_no_resource_gate() {
        assert_eq!(BASIC_ATTACK.intent_cost, 0.0);
        assert_eq!(BASIC_ATTACK.sigil_cost, 0.0);
        assert_eq!(BASIC_ATTACK.cooldown, 0.0);
    }

    #[test]
    fn unknown_key_is_none() {
        assert!(find_skill("meteor").is_none());
    }
}
