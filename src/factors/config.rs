use serde::{Deserialize, Serialize};

use crate::data::catalog::{ProjectionDef, ProjectionRow};

pub const FACTOR_SLOT_COUNT: usize = 10;
pub const MAX_GRADE: u8 = 10;
pub const MAX_BOND_LEVEL: u8 = 35;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactorAssignment {
    pub factor: String,
    pub grade: u8,
}

impl FactorAssignment {
    pub fn clamped_grade(&self) -> u8 {
        self.grade.clamp(1, MAX_GRADE)
    }
}

/// Psychoscope setup: one projection tree plus factor assignments and bond level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsychoscopeConfig {
    pub projection: Option<String>,
    /// Chosen side per branch pair, in row order.
    pub branches: Vec<Option<BranchSide>>,
    pub slots: [Option<FactorAssignment>; FACTOR_SLOT_COUNT],
    pub bond_level: u8,
}

/// Where a slot sits inside a projection's branch pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PairPosition {
    pair: usize,
    side: BranchSide,
    opposite: usize,
}

fn pair_position(projection: &ProjectionDef, slot: usize) -> Option<PairPosition> {
    projection
        .rows
        .iter()
        .filter_map(|row| match *row {
            ProjectionRow::BranchPair { left, right } => Some((left, right)),
            _ => None,
        })
        .enumerate()
        .find_map(|(pair, (left, right))| {
            if slot == left {
                Some(PairPosition {
                    pair,
                    side: BranchSide::Left,
                    opposite: right,
                })
            } else if slot == right {
                Some(PairPosition {
                    pair,
                    side: BranchSide::Right,
                    opposite: left,
                })
            } else {
                None
            }
        })
}

impl PsychoscopeConfig {
    pub fn new(projection: impl Into<String>) -> Self {
        Self {
            projection: Some(projection.into()),
            ..Self::default()
        }
    }

    pub fn assignment(&self, slot: usize) -> Option<&FactorAssignment> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Put `factor` at `grade` into `slot`. On a branch pair the opposite side
    /// is cleared. Returns false for an out-of-range slot.
    pub fn assign(
        &mut self,
        projection: &ProjectionDef,
        slot: usize,
        factor: impl Into<String>,
        grade: u8,
    ) -> bool {
        if slot >= FACTOR_SLOT_COUNT {
            return false;
        }
        if let Some(position) = pair_position(projection, slot) {
            if let Some(opposite) = self.slots.get_mut(position.opposite) {
                *opposite = None;
            }
            if self.branches.len() <= position.pair {
                self.branches.resize(position.pair + 1, None);
            }
            self.branches[position.pair] = Some(position.side);
        }
        self.slots[slot] = Some(FactorAssignment {
            factor: factor.into(),
            grade: grade.clamp(1, MAX_GRADE),
        });
        true
    }

    /// Slots that contribute, in row order. At a branch pair the left side
    /// wins when both are filled.
    pub fn active_slots(&self, projection: &ProjectionDef) -> Vec<usize> {
        let filled = |slot: usize| self.assignment(slot).is_some();
        projection
            .rows
            .iter()
            .filter_map(|row| match *row {
                ProjectionRow::BranchPair { left, right } => {
                    if filled(left) {
                        Some(left)
                    } else if filled(right) {
                        Some(right)
                    } else {
                        None
                    }
                }
                ProjectionRow::FactorSlot { slot } => filled(slot).then_some(slot),
                ProjectionRow::Root | ProjectionRow::Final => None,
            })
            .collect()
    }

    /// Branch pairs with both sides filled, as `(left, right)`.
    pub fn branch_conflicts(&self, projection: &ProjectionDef) -> Vec<(usize, usize)> {
        projection
            .rows
            .iter()
            .filter_map(|row| match *row {
                ProjectionRow::BranchPair { left, right }
                    if self.assignment(left).is_some() && self.assignment(right).is_some() =>
                {
                    Some((left, right))
                }
                _ => None,
            })
            .collect()
    }

    pub fn clamped_bond_level(&self) -> u8 {
        self.bond_level.min(MAX_BOND_LEVEL)
    }
}
