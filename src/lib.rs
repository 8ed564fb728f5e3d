//! Gear stat calculator, rotation simulator and loadout optimizer.
//!
//! The pipeline is `Loadout` → [stats::aggregate] → [stats::StatsResult] →
//! [combat::simulate]; [optimizer::optimize] searches loadouts by scoring
//! candidates through the same aggregator.

pub mod cli;
pub mod combat;
pub mod config;
pub mod data;
pub mod effects;
pub mod factors;
pub mod loadout;
pub mod optimizer;
pub mod parallel;
pub mod stats;
