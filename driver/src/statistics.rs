use pddlstream_reorder::Stat;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Running success/overhead counts for one external, used to bias the
/// reorder DP toward streams that have historically been cheap and
/// reliable. Persisted to disk between solves so the estimate improves
/// across repeated runs against the same domain (spec §5 "Statistics").
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
pub struct ExternalStat {
    pub calls: u64,
    pub successes: u64,
    pub overhead_seconds: f64,
}

impl ExternalStat {
    fn record(&mut self, success: bool, elapsed_seconds: f64) {
        self.calls += 1;
        if success {
            self.successes += 1;
        }
        self.overhead_seconds += elapsed_seconds;
    }

    fn as_stat(&self) -> Stat {
        if self.calls == 0 {
            return Stat::default();
        }
        Stat {
            p_success: (self.successes as f64 / self.calls as f64).max(0.01),
            overhead: (self.overhead_seconds / self.calls as f64).max(1e-6),
        }
    }
}

/// Per-solve (optionally disk-backed) statistics table, keyed by external
/// name.
#[derive(Default, Serialize, Deserialize)]
pub struct Statistics {
    per_external: HashMap<Arc<str>, ExternalStat>,
}

impl Statistics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> anyhow::Result<Statistics> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    pub fn record(&mut self, external: Arc<str>, success: bool, elapsed_seconds: f64) {
        self.per_external.entry(external).or_default().record(success, elapsed_seconds);
    }

    pub fn stat_for(&self, external: &str) -> Stat {
        self.per_external.get(external).map(ExternalStat::as_stat).unwrap_or_default()
    }
}
