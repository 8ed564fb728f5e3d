//! Diminishing-returns conversion from raw stat points to percentages.

use crate::data::catalog::{Catalog, DrConstant};
use crate::data::types::Stat;

/// `base + 100·raw/(raw + constant)`, with `raw` clamped at zero.
pub fn diminish(constant: DrConstant, raw: f64) -> f64 {
    constant.base + display_diminish(constant, raw)
}

/// Same curve without the stat's base percentage.
pub fn display_diminish(constant: DrConstant, raw: f64) -> f64 {
    let raw = raw.max(0.0);
    let denom = raw + constant.constant;
    if denom <= 0.0 {
        return 0.0;
    }
    100.0 * raw / denom
}

/// Percentage for `stat` using the catalog's constants; unknown stats yield 0.
pub fn stat_percent(catalog: &Catalog, stat: Stat, raw: f64) -> f64 {
    catalog
        .dr(stat)
        .map(|constant| diminish(constant, raw))
        .unwrap_or(0.0)
}

pub fn display_percent(catalog: &Catalog, stat: Stat, raw: f64) -> f64 {
    catalog
        .dr(stat)
        .map(|constant| display_diminish(constant, raw))
        .unwrap_or(0.0)
}
