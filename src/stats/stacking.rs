use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackCategory {
    /// Raw points from gear, sigils, imagines, modules and base inputs.
    Base,
    /// Flat points added on top of the base (talents, factors, bond, raid buffs).
    Flat,
    /// Additive percent multiplier (`10.0` = ×1.10).
    Percent,
    /// Gain multiplier applied to the whole total last.
    Gain,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StackContribution<K> {
    pub key: K,
    pub category: StackCategory,
    pub value: f64,
}

impl<K> StackContribution<K> {
    pub fn base(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Base,
            value,
        }
    }

    pub fn flat(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Flat,
            value,
        }
    }

    pub fn percent(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Percent,
            value,
        }
    }

    pub fn gain(key: K, value: f64) -> Self {
        Self {
            key,
            category: StackCategory::Gain,
            value,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CategoryTotals {
    pub base: f64,
    pub flat: f64,
    pub percent: f64,
    pub gain: f64,
}

impl CategoryTotals {
    pub fn apply(&mut self, category: StackCategory, value: f64) {
        match category {
            StackCategory::Base => self.base += value,
            StackCategory::Flat => self.flat += value,
            StackCategory::Percent => self.percent += value,
            StackCategory::Gain => self.gain += value,
        }
    }

    /// `(base + flat) × (1 + percent/100) × (1 + gain/100)`
    pub fn compose(self) -> f64 {
        (self.base + self.flat) * (1.0 + self.percent / 100.0) * (1.0 + self.gain / 100.0)
    }
}

#[derive(Debug, Clone)]
pub struct StatStacking<K: Ord> {
    totals: BTreeMap<K, CategoryTotals>,
}

impl<K: Ord> Default for StatStacking<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> StatStacking<K> {
    pub fn new() -> Self {
        Self {
            totals: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, contribution: StackContribution<K>) {
        if contribution.value == 0.0 {
            return;
        }
        self.totals
            .entry(contribution.key)
            .or_default()
            .apply(contribution.category, contribution.value);
    }

    pub fn add_many<I>(&mut self, contributions: I)
    where
        I: IntoIterator<Item = StackContribution<K>>,
    {
        for contribution in contributions {
            self.add(contribution);
        }
    }

    pub fn totals_for(&self, key: &K) -> CategoryTotals {
        self.totals.get(key).copied().unwrap_or_default()
    }

    pub fn composed_for(&self, key: &K) -> f64 {
        self.totals_for(key).compose()
    }

    pub fn composed_values(&self) -> BTreeMap<&K, f64> {
        self.totals
            .iter()
            .map(|(key, totals)| (key, totals.compose()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_orders_flat_then_percent_then_gain() {
        let mut stacking = StatStacking::new();
        stacking.add_many([
            StackContribution::base("crit", 1000.0),
            StackContribution::flat("crit", 200.0),
            StackContribution::percent("crit", 10.0),
            StackContribution::percent("crit", 10.0),
            StackContribution::gain("crit", 12.0),
        ]);
        let expected = 1200.0 * 1.2 * 1.12;
        assert!((stacking.composed_for(&"crit") - expected).abs() < 1e-9);
    }

    #[test]
    fn negative_gain_shrinks_total() {
        let mut stacking = StatStacking::new();
        stacking.add(StackContribution::base("vers", 1000.0));
        stacking.add(StackContribution::gain("vers", -6.0));
        assert!((stacking.composed_for(&"vers") - 940.0).abs() < 1e-9);
    }

    #[test]
    fn missing_key_composes_to_zero() {
        let stacking: StatStacking<&str> = StatStacking::new();
        assert_eq!(stacking.composed_for(&"luck"), 0.0);
        assert!(stacking.composed_values().is_empty());
    }
}
