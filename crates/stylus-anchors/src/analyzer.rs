//! Linguistic anchor analysis

use std::collections::BTreeMap;
use std::path::Path;
use std::time::Instant;

use stylus_cache::{content_hash, AnalysisCache, CacheConfig, CacheStats};
use stylus_domain::{char_to_byte_offset, ContentType, ExplanationFactor, FactorKind};
use tracing::{debug, info};

use crate::combine::{combine, distance_weight};
use crate::window::ContextWindow;
use crate::{
    AnchorAnalysis, AnchorConfig, AnchorError, AnchorMatch, AnchorStats, AnchorTable,
    AnchorType,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct AnalysisKey {
    text_hash: u64,
    position: usize,
    rule_type: Option<String>,
    content_type: Option<ContentType>,
}

/// Matches anchor patterns around a flagged position
///
/// Owns a compiled [`AnchorTable`] and a private result cache.
///
/// # Examples
///
/// ```
/// use stylus_anchors::LinguisticAnchors;
///
/// let anchors = LinguisticAnchors::builtin().unwrap();
/// let text = "Call `parse_config()` before you start.";
/// let analysis = anchors.analyze(text, 6, None, None);
/// assert!(analysis.total_reduction > 0.0);
/// assert!(analysis.net_effect < 0.0);
/// ```
#[derive(Debug)]
pub struct LinguisticAnchors {
    table: AnchorTable,
    cache: AnalysisCache<AnalysisKey, AnchorAnalysis>,
}

impl LinguisticAnchors {
    /// Compile a configuration with the default cache
    pub fn new(config: &AnchorConfig) -> Result<Self, AnchorError> {
        Self::with_cache_config(config, &CacheConfig::default())
    }

    /// Compile a configuration with a custom cache
    pub fn with_cache_config(
        config: &AnchorConfig,
        cache_config: &CacheConfig,
    ) -> Result<Self, AnchorError> {
        let table = AnchorTable::compile(config)?;
        info!(
            "Loaded anchor table: {} anchors, {} patterns",
            table.len(),
            table.pattern_count()
        );
        Ok(Self {
            table,
            cache: AnalysisCache::new(cache_config),
        })
    }

    /// Use the embedded default anchor table
    pub fn builtin() -> Result<Self, AnchorError> {
        Self::new(&AnchorConfig::builtin()?)
    }

    /// Load an anchor table from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, AnchorError> {
        Self::new(&AnchorConfig::from_file(path)?)
    }

    /// The compiled table
    pub fn table(&self) -> &AnchorTable {
        &self.table
    }

    /// Analyze the context of an error at `error_position` (a character offset)
    ///
    /// Positions past the end are clamped. Text without matches yields a
    /// zero-effect result.
    pub fn analyze(
        &self,
        text: &str,
        error_position: usize,
        rule_type: Option<&str>,
        content_type: Option<ContentType>,
    ) -> AnchorAnalysis {
        let key = AnalysisKey {
            text_hash: content_hash(text),
            position: error_position,
            rule_type: rule_type.map(str::to_string),
            content_type,
        };
        let (analysis, hit) = self.cache.get_or_insert_with(key, || {
            self.compute(text, error_position, rule_type, content_type)
        });
        if hit {
            debug!("Anchor cache hit at position {}", error_position);
        }
        analysis
    }

    fn compute(
        &self,
        text: &str,
        error_position: usize,
        rule_type: Option<&str>,
        content_type: Option<ContentType>,
    ) -> AnchorAnalysis {
        let started = Instant::now();
        let settings = self.table.settings();
        let offset = char_to_byte_offset(text, error_position);
        let window = ContextWindow::around(text, offset, settings.default_context_window);
        let haystack = window.as_str();
        let (exact_lo, exact_hi) = window.exact_range(settings.exact_match_buffer);

        let mut matches = Vec::new();
        let mut patterns_checked = 0;

        for anchor in self.table.anchors() {
            let multiplier = self.table.multiplier(anchor, rule_type, content_type);
            let mut claimed: Vec<(usize, usize)> = Vec::new();
            for pattern in &anchor.patterns {
                patterns_checked += 1;
                for found in pattern.regex.find_iter(haystack) {
                    let start = window.start() + found.start();
                    let end = window.start() + found.end();

                    let distance = if anchor.context_window == 0 {
                        if start > exact_hi || end < exact_lo {
                            continue;
                        }
                        0
                    } else if start <= offset && offset < end {
                        0
                    } else {
                        let last_byte = end.saturating_sub(1).max(start);
                        let d = window.distance_to(start).min(window.distance_to(last_byte));
                        if d > anchor.context_window {
                            continue;
                        }
                        d
                    };

                    // Overlapping hits of the same anchor count once
                    if claimed.iter().any(|&(s, e)| start < e && s < end) {
                        continue;
                    }
                    claimed.push((start, end));

                    let weight = distance_weight(
                        distance,
                        settings.distance_decay_factor,
                        settings.min_distance_effect,
                    );
                    matches.push(AnchorMatch {
                        anchor_type: anchor.anchor_type,
                        category: anchor.category.clone(),
                        name: anchor.name.clone(),
                        pattern: pattern.source.clone(),
                        matched_text: found.as_str().to_string(),
                        span: (start, end),
                        base_effect: anchor.effect,
                        distance_from_error: distance,
                        distance_weight: weight,
                        multiplier,
                        weighted_effect: anchor.effect * weight * multiplier,
                    });
                }
            }
        }

        matches.sort_by(|a, b| {
            a.anchor_type
                .cmp(&b.anchor_type)
                .then(b.weighted_effect.total_cmp(&a.weighted_effect))
        });

        let effects_of = |anchor_type: AnchorType| -> Vec<f64> {
            matches
                .iter()
                .filter(|m| m.anchor_type == anchor_type)
                .map(|m| m.weighted_effect)
                .collect()
        };
        let total_boost = combine(
            settings.combination_method,
            &effects_of(AnchorType::Boosting),
            settings.diminishing_factor,
            settings.min_effectiveness,
            settings.max_total_boost,
        );
        let total_reduction = combine(
            settings.combination_method,
            &effects_of(AnchorType::Reducing),
            settings.diminishing_factor,
            settings.min_effectiveness,
            settings.max_total_reduction,
        );

        let factors = matches
            .iter()
            .map(|m| {
                let kind = match m.anchor_type {
                    AnchorType::Boosting => FactorKind::AnchorBoost,
                    AnchorType::Reducing => FactorKind::AnchorReduction,
                };
                ExplanationFactor::new(
                    kind,
                    m.signed_effect(),
                    format!(
                        "'{}' ({}/{}, {} words away)",
                        m.matched_text, m.category, m.name, m.distance_from_error
                    ),
                )
            })
            .collect();

        let stats = AnchorStats {
            anchors_evaluated: self.table.len(),
            patterns_checked,
            window_words: window.word_count(),
            processing_time: started.elapsed(),
        };
        debug!(
            "Anchor analysis at {}: {} matches, boost {:.3}, reduction {:.3} in {:?}",
            error_position,
            matches.len(),
            total_boost,
            total_reduction,
            stats.processing_time
        );

        AnchorAnalysis {
            matches,
            total_boost,
            total_reduction,
            net_effect: total_boost - total_reduction,
            combination_method: settings.combination_method,
            rule_type: rule_type.map(str::to_string),
            content_type,
            factors,
            stats,
        }
    }

    /// Human-readable listing of the table, grouped by type and category
    pub fn anchor_summary(&self) -> String {
        let mut lines = vec![
            "Anchor Table Summary".to_string(),
            "====================".to_string(),
            format!(
                "Anchors: {} ({} patterns)",
                self.table.len(),
                self.table.pattern_count()
            ),
            format!(
                "Combination: {}",
                self.table.settings().combination_method.as_str()
            ),
        ];

        for anchor_type in [AnchorType::Boosting, AnchorType::Reducing] {
            let mut by_category: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
            for anchor in self.table.by_type(anchor_type) {
                by_category
                    .entry(anchor.category.as_str())
                    .or_default()
                    .push(anchor.name.as_str());
            }
            if by_category.is_empty() {
                continue;
            }
            lines.push(String::new());
            lines.push(format!("{}:", anchor_type));
            for (category, names) in by_category {
                lines.push(format!("  {}: {}", category, names.join(", ")));
            }
        }

        lines.join("\n")
    }

    /// Cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop cached analyses
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CombinationMethod;

    fn single_anchor(extra_settings: &str, effect: f64, window: Option<usize>) -> AnchorConfig {
        let window_line = window
            .map(|w| format!("context_window = {}", w))
            .unwrap_or_default();
        AnchorConfig::from_toml(&format!(
            r#"
            [settings]
            distance_decay_factor = 0.9
            min_distance_effect = 0.3
            {extra_settings}

            [[anchors]]
            type = "boosting"
            category = "generic_language"
            name = "marker"
            patterns = ['\bmarker\b']
            effect = {effect}
            {window_line}
            "#
        ))
        .unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_distance_zero_keeps_full_effect() {
        let anchors = LinguisticAnchors::new(&single_anchor("", 0.2, None)).unwrap();
        let analysis = anchors.analyze("one marker two", 4, None, None);
        assert_eq!(analysis.matches.len(), 1);
        let m = &analysis.matches[0];
        assert_eq!(m.distance_from_error, 0);
        assert!(approx(m.weighted_effect, 0.2));
    }

    #[test]
    fn test_distance_five_uses_decay() {
        let anchors = LinguisticAnchors::new(&single_anchor("", 0.2, None)).unwrap();
        let text = "error a b c d marker";
        let analysis = anchors.analyze(text, 0, None, None);
        let m = &analysis.matches[0];
        assert_eq!(m.distance_from_error, 5);
        assert!((m.weighted_effect - 0.2 * 0.9_f64.powi(5)).abs() < 1e-9);
        assert!(m.weighted_effect > 0.3 * 0.2);
    }

    #[test]
    fn test_no_matches_is_zero_effect() {
        let anchors = LinguisticAnchors::builtin().unwrap();
        let analysis = anchors.analyze("Plain words here.", 3, None, None);
        assert!(!analysis.has_matches());
        assert_eq!(analysis.net_effect, 0.0);
        assert_eq!(analysis.total_boost, 0.0);
        assert_eq!(analysis.total_reduction, 0.0);
    }

    #[test]
    fn test_match_outside_window_ignored() {
        let anchors = LinguisticAnchors::new(&single_anchor("", 0.2, Some(3))).unwrap();
        let text = "error a b c d marker";
        assert!(!anchors.analyze(text, 0, None, None).has_matches());
        assert!(anchors.analyze(text, 8, None, None).has_matches());
    }

    #[test]
    fn test_zero_window_requires_exact_buffer() {
        let config = single_anchor("exact_match_buffer = 5", 0.2, Some(0));
        let anchors = LinguisticAnchors::new(&config).unwrap();
        let text = "marker then a long stretch of words before error";
        let far = text.find("error").unwrap();
        assert!(!anchors.analyze(text, far, None, None).has_matches());
        let near = anchors.analyze(text, 2, None, None);
        assert_eq!(near.matches.len(), 1);
        assert_eq!(near.matches[0].distance_from_error, 0);
    }

    #[test]
    fn test_boost_cap() {
        let anchors = LinguisticAnchors::new(&single_anchor("", 0.25, None)).unwrap();
        let text = "marker marker marker marker";
        let analysis = anchors.analyze(text, 0, None, None);
        assert_eq!(analysis.matches.len(), 4);
        assert!(approx(analysis.total_boost, 0.30));
        assert!(approx(analysis.net_effect, 0.30));
    }

    #[test]
    fn test_combination_method_maximum() {
        let config = single_anchor("combination_method = \"maximum\"", 0.2, None);
        let anchors = LinguisticAnchors::new(&config).unwrap();
        let analysis = anchors.analyze("marker x marker", 0, None, None);
        assert_eq!(analysis.combination_method, CombinationMethod::Maximum);
        assert!(approx(analysis.total_boost, 0.2));
    }

    #[test]
    fn test_code_context_reduces() {
        let anchors = LinguisticAnchors::builtin().unwrap();
        let text = "Call `parse_config()` before you start.";
        let analysis = anchors.analyze(text, 6, None, None);
        assert!(analysis.reducing_matches().any(|m| m.category == "code_context"));
        assert!(analysis.total_reduction <= 0.35);
        assert!(analysis.net_effect < 0.0);
    }

    #[test]
    fn test_multipliers_applied() {
        let anchors = LinguisticAnchors::builtin().unwrap();
        let text = "The API returns JSON.";
        let plain = anchors.analyze(text, 4, None, None);
        let tuned = anchors.analyze(text, 4, Some("abbreviations"), Some(ContentType::Technical));
        let plain_acronym = plain.matches.iter().find(|m| m.name == "acronyms").unwrap();
        let tuned_acronym = tuned.matches.iter().find(|m| m.name == "acronyms").unwrap();
        assert_eq!(plain_acronym.multiplier, 1.0);
        assert!(approx(tuned_acronym.multiplier, 1.5 * 1.2));
        assert!(tuned.total_reduction >= plain.total_reduction);
    }

    #[test]
    fn test_cache_hit_on_repeat() {
        let anchors = LinguisticAnchors::builtin().unwrap();
        let text = "This is really very important stuff.";
        let first = anchors.analyze(text, 8, Some("wordiness"), None);
        let second = anchors.analyze(text, 8, Some("wordiness"), None);
        assert_eq!(first, second);
        let stats = anchors.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);

        anchors.clear_cache();
        assert_eq!(anchors.cache_stats().entries, 0);
    }

    #[test]
    fn test_position_past_end_is_clamped() {
        let anchors = LinguisticAnchors::builtin().unwrap();
        let analysis = anchors.analyze("It is really good", 10_000, None, None);
        assert!(analysis.boosting_matches().any(|m| m.name == "vague_intensifiers"));
    }

    #[test]
    fn test_factors_and_explanation() {
        let anchors = LinguisticAnchors::builtin().unwrap();
        let analysis = anchors.analyze("This is really bad, see [12].", 8, None, None);
        assert_eq!(analysis.factors.len(), analysis.matches.len());
        let text = analysis.explanation();
        assert!(text.starts_with("Linguistic anchors"));
        assert!(text.contains("really"));
    }

    #[test]
    fn test_stats_recorded() {
        let anchors = LinguisticAnchors::builtin().unwrap();
        let analysis = anchors.analyze("Some words to scan.", 0, None, None);
        assert_eq!(analysis.stats.anchors_evaluated, anchors.table().len());
        assert_eq!(analysis.stats.patterns_checked, anchors.table().pattern_count());
        assert_eq!(analysis.stats.window_words, 4);
    }

    #[test]
    fn test_anchor_summary() {
        let anchors = LinguisticAnchors::builtin().unwrap();
        let summary = anchors.anchor_summary();
        assert!(summary.contains("boosting:"));
        assert!(summary.contains("reducing:"));
        assert!(summary.contains("  code_context: inline_code, code_keywords"));
    }
}
