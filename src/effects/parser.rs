//! Compiles talent and bond-exclusive text into [EffectClause] values.
//!
//! Recognized shapes (case-insensitive):
//! - `ASPD +N%`, `Attack Speed +N%`, `CSPD +N%`, `Cast Speed +N%`
//! - `Crit +N%`, `Luck +N%`, `Mastery +N%`, `Versatility +N%`, `Haste +N%`
//! - `Crit DMG +N%`, `Max HP +N%`, `Armor +N%`
//! - flat `Mastery +N`, `Armor +N` (and the other stat names)
//! - `Haste conversion +N%`, `Dream DMG +N%`, `Main stats +N`
//! - gate prefix `When STAT ≥ N: ...` (`:` `,` or plain whitespace after N)
//! - `When <condition>, Crit +N% and Luck +N%`
//!
//! Anything else compiles to no clause.

use std::sync::OnceLock;

use regex::Regex;

use super::{EffectClause, StatCondition};
use crate::data::types::Stat;

/// Result of compiling one talent text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledText {
    pub condition: Option<StatCondition>,
    pub clauses: Vec<EffectClause>,
}

fn gate_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*when\s+(?P<stat>[a-z][a-z ]*?)\s*(?:≥|>=)\s*(?P<min>\d+(?:\.\d+)?)(?:\s*[:,]\s*|\s+)(?P<rest>.+)$",
        )
        .expect("gate pattern is valid")
    })
}

fn conditional_pair_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)^\s*(?:when|while)\s+(?P<cond>.+?),\s*crit(?:ical)?\s*\+\s*(?P<crit>\d+(?:\.\d+)?)%\s*and\s*luck\s*\+\s*(?P<luck>\d+(?:\.\d+)?)%",
        )
        .expect("conditional pair pattern is valid")
    })
}

fn bonus_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?P<label>attack\s+speed|aspd|cast\s+speed|cspd|crit(?:ical)?\s+(?:dmg|damage)|crit(?:ical)?(?:\s+rate)?|luck|mastery|versatility|max\s+hp|armou?r|main\s+stats?|dream\s+(?:dmg|damage)|haste\s+conversion|haste|strength|agility|intellect)\s*\+\s*(?P<value>\d+(?:\.\d+)?)\s*(?P<pct>%)?",
        )
        .expect("bonus pattern is valid")
    })
}

fn gate_prefix_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)^\s*when\b[^,:]*?(?:≥|>=)").expect("gate prefix pattern is valid")
    })
}

/// Compile a talent description. A leading `When STAT ≥ N:` becomes the gate.
///
/// A gate that cannot be resolved (unknown stat, unreadable threshold)
/// compiles to nothing so the bonus is never applied ungated.
pub fn compile_talent_text(text: &str) -> CompiledText {
    if let Some(captures) = gate_regex().captures(text) {
        let stat = Stat::from_label(&captures["stat"]);
        let min = captures["min"].parse::<f64>().ok();
        if let (Some(stat), Some(min)) = (stat, min) {
            return CompiledText {
                condition: Some(StatCondition { stat, min }),
                clauses: scan_bonuses(&captures["rest"]),
            };
        }
        tracing::warn!(
            text,
            stat = &captures["stat"],
            "talent gate names an unknown stat; talent ignored"
        );
        return CompiledText::default();
    }
    if gate_prefix_regex().is_match(text) {
        tracing::warn!(text, "talent gate could not be read; talent ignored");
        return CompiledText::default();
    }
    CompiledText {
        condition: None,
        clauses: compile_bond_text(text),
    }
}

/// Compile a bond-exclusive line (no stat gate; may carry a conditional pair).
pub fn compile_bond_text(text: &str) -> Vec<EffectClause> {
    if let Some(captures) = conditional_pair_regex().captures(text) {
        let crit = captures["crit"].parse::<f64>().unwrap_or(0.0);
        let luck = captures["luck"].parse::<f64>().unwrap_or(0.0);
        return vec![EffectClause::ConditionalCritLuck {
            crit,
            luck,
            condition: captures["cond"].trim().to_string(),
        }];
    }
    scan_bonuses(text)
}

fn scan_bonuses(text: &str) -> Vec<EffectClause> {
    bonus_regex()
        .captures_iter(text)
        .filter_map(|captures| {
            let value = captures["value"].parse::<f64>().ok()?;
            let percent = captures.name("pct").is_some();
            clause_for(&captures["label"], value, percent)
        })
        .collect()
}

fn clause_for(label: &str, value: f64, percent: bool) -> Option<EffectClause> {
    let label: String = label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase();

    match label.as_str() {
        "attack speed" | "aspd" => Some(EffectClause::AttackSpeedPercent { value }),
        "cast speed" | "cspd" => Some(EffectClause::CastSpeedPercent { value }),
        "dream dmg" | "dream damage" => Some(EffectClause::DreamDamagePercent { value }),
        "main stat" | "main stats" if !percent => Some(EffectClause::MainStatFlat { value }),
        "main stat" | "main stats" => None,
        "haste conversion" => {
            let ratio = if percent { value / 100.0 } else { value };
            Some(EffectClause::HasteRatioBonus { value: ratio })
        }
        l if l.starts_with("crit") && (l.ends_with("dmg") || l.ends_with("damage")) => {
            Some(EffectClause::CritDamagePercent { value })
        }
        "max hp" if percent => Some(EffectClause::MaxHpPercent { value }),
        "armor" | "armour" if percent => Some(EffectClause::ArmorPercent { value }),
        other => {
            let stat = Stat::from_label(other)?;
            if percent && stat.is_core() {
                Some(EffectClause::StatPercentPoints { stat, value })
            } else if percent {
                None
            } else {
                Some(EffectClause::FlatStat { stat, value })
            }
        }
    }
}
