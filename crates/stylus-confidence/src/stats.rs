//! Calculator counters and per-component cache reports

use stylus_cache::CacheStats;

/// Counters kept by a [`crate::ConfidenceCalculator`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CalculatorStats {
    /// Breakdowns actually computed (cache misses)
    pub calculations: u64,
    /// Calls served from the breakdown cache
    pub cache_hits: u64,
    /// Calls that missed the breakdown cache
    pub cache_misses: u64,
    /// Calls through the normalized path
    pub normalized_calculations: u64,
    /// Normalized calls where the policy guard condition held
    pub floor_guard_triggers: u64,
}

impl CalculatorStats {
    /// Create new empty counters
    pub fn new() -> Self {
        Self::default()
    }

    /// Fraction of calls served from cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            0.0
        } else {
            self.cache_hits as f64 / total as f64
        }
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let lines = vec![
            "Confidence Calculator Summary".to_string(),
            "=============================".to_string(),
            format!("Calculations: {}", self.calculations),
            format!(
                "Cache: {} hits, {} misses ({:.1}% hit rate)",
                self.cache_hits,
                self.cache_misses,
                self.hit_rate() * 100.0
            ),
            format!("Normalized calculations: {}", self.normalized_calculations),
            format!("Floor guard triggers: {}", self.floor_guard_triggers),
        ];
        lines.join("\n")
    }
}

/// Cache counters of every component owned by a calculator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComponentCacheStats {
    /// Linguistic anchor results
    pub anchors: CacheStats,
    /// Context analysis results
    pub context: CacheStats,
    /// Domain classification results
    pub domain: CacheStats,
    /// Confidence breakdowns
    pub breakdowns: CacheStats,
}

impl ComponentCacheStats {
    /// Entries held across all caches
    pub fn total_entries(&self) -> u64 {
        self.anchors.entries + self.context.entries + self.domain.entries + self.breakdowns.entries
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec!["Cache Summary".to_string(), "=============".to_string()];
        for (name, stats) in [
            ("anchors", &self.anchors),
            ("context", &self.context),
            ("domain", &self.domain),
            ("breakdowns", &self.breakdowns),
        ] {
            lines.push(format!("  {}: {}", name, stats.summary()));
        }
        lines.push(format!("  Total entries: {}", self.total_entries()));
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_rate_and_reset() {
        let mut stats = CalculatorStats {
            calculations: 3,
            cache_hits: 1,
            cache_misses: 3,
            normalized_calculations: 2,
            floor_guard_triggers: 1,
        };
        assert_eq!(stats.hit_rate(), 0.25);
        assert!(stats.summary().contains("25.0% hit rate"));

        stats.reset();
        assert_eq!(stats, CalculatorStats::new());
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_component_summary() {
        let stats = ComponentCacheStats {
            anchors: CacheStats { hits: 1, misses: 1, entries: 1 },
            breakdowns: CacheStats { hits: 0, misses: 2, entries: 2 },
            ..ComponentCacheStats::default()
        };
        assert_eq!(stats.total_entries(), 3);
        let summary = stats.summary();
        assert!(summary.starts_with("Cache Summary"));
        assert!(summary.contains("breakdowns: 2 entries"));
    }
}
