//! Per-cast trace samples and the human-readable cast log.
//!
//! Each sample is taken after the cast resolves and the clock advances, so
//! `time` is the cast's end time.

use serde::{Deserialize, Serialize};

/// How much per-cast detail a simulation keeps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceMode {
    Off,
    /// One sample per cast.
    #[default]
    Samples,
    /// Samples plus a human-readable log line per cast.
    Full,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceSample {
    pub time: f64,
    pub skill: String,
    pub damage: f64,
    pub cumulative_damage: f64,
    pub intent: f64,
    pub sigils: f64,
    pub charge_seeds: u32,
    pub aspd: f64,
}

#[derive(Debug, Clone, Default)]
pub struct TraceCollector {
    mode: TraceMode,
    samples: Vec<TraceSample>,
    log: Vec<String>,
}

impl TraceCollector {
    pub fn new(mode: TraceMode) -> Self {
        Self {
            mode,
            samples: Vec::new(),
            log: Vec::new(),
        }
    }

    pub fn enabled(&self) -> bool {
        self.mode != TraceMode::Off
    }

    pub fn record(&mut self, sample: TraceSample) {
        if !self.enabled() {
            return;
        }
        if self.mode == TraceMode::Full {
            self.log.push(format!(
                "[{:>7.2}s] {:<22} {:>12.1} dmg  intent {:>5.1}  sigils {:.2}  seeds {}",
                sample.time,
                sample.skill,
                sample.damage,
                sample.intent,
                sample.sigils,
                sample.charge_seeds
            ));
        }
        self.samples.push(sample);
    }

    pub fn finish(self) -> (Vec<TraceSample>, Vec<String>) {
        (self.samples, self.log)
    }
}
