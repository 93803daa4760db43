//! Compiled label signals and label scoring

use std::collections::{BTreeSet, HashSet};

use regex::Regex;

use crate::lexicon::Signals;
use crate::{ClassifierConfig, ClassifierError};

/// Keywords and compiled patterns for one label
#[derive(Debug, Clone)]
pub(crate) struct CompiledSignals<L> {
    pub label: L,
    keywords: BTreeSet<String>,
    patterns: Vec<Regex>,
}

/// Score of one label against one text
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LabelScore {
    pub score: f64,
    pub indicators: Vec<String>,
}

impl<L: Copy> CompiledSignals<L> {
    /// Compile a built-in table plus any configured extras
    pub fn compile_all(
        table: &[Signals<L>],
        name: impl Fn(L) -> &'static str,
        config: &ClassifierConfig,
    ) -> Result<Vec<Self>, ClassifierError> {
        let mut compiled = Vec::with_capacity(table.len());
        for signals in table {
            let label_name = name(signals.label);
            let mut sources: Vec<&str> = signals.patterns.to_vec();
            if let Some(extra) = config.extra_patterns.get(label_name) {
                sources.extend(extra.iter().map(String::as_str));
            }

            let mut patterns = Vec::new();
            for source in sources {
                let regex = Regex::new(source).map_err(|e| ClassifierError::InvalidPattern {
                    label: label_name.to_string(),
                    pattern: source.to_string(),
                    message: e.to_string(),
                })?;
                patterns.push(regex);
            }

            let keywords = signals
                .keywords
                .iter()
                .map(|k| (*k).to_string())
                .chain(
                    config
                        .extra_keywords
                        .get(label_name)
                        .into_iter()
                        .flatten()
                        .map(|k| k.to_lowercase()),
                )
                .collect();

            compiled.push(Self {
                label: signals.label,
                keywords,
                patterns,
            });
        }
        Ok(compiled)
    }

    /// `keyword_weight × keyword_ratio + (1 - keyword_weight) × pattern_score`
    pub fn score(
        &self,
        words: &HashSet<String>,
        text: &str,
        config: &ClassifierConfig,
    ) -> LabelScore {
        let mut indicators: Vec<String> = self
            .keywords
            .iter()
            .filter(|k| words.contains(*k))
            .cloned()
            .collect();
        let keyword_ratio =
            (indicators.len() as f64 / config.keyword_saturation as f64).min(1.0);

        let mut pattern_hits = 0usize;
        for pattern in &self.patterns {
            let mut found = pattern.find_iter(text).peekable();
            if let Some(first) = found.peek() {
                let matched = first.as_str().trim().to_string();
                if !indicators.contains(&matched) {
                    indicators.push(matched);
                }
            }
            pattern_hits += found.count();
        }
        let pattern_score = (pattern_hits as f64 / config.pattern_saturation as f64).min(1.0);

        LabelScore {
            score: config.keyword_weight * keyword_ratio
                + (1.0 - config.keyword_weight) * pattern_score,
            indicators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{words, DOMAIN_SIGNALS};
    use stylus_domain::SubjectDomain;

    fn compiled(config: &ClassifierConfig) -> Vec<CompiledSignals<SubjectDomain>> {
        CompiledSignals::compile_all(DOMAIN_SIGNALS, |d| d.as_str(), config).unwrap()
    }

    fn score_of(domain: SubjectDomain, text: &str, config: &ClassifierConfig) -> LabelScore {
        let words: HashSet<String> = words(text).collect();
        compiled(config)
            .into_iter()
            .find(|s| s.label == domain)
            .unwrap()
            .score(&words, text, config)
    }

    #[test]
    fn test_keyword_ratio_saturates() {
        let config = ClassifierConfig::default();
        let text = "plaintiff defendant court statute contract liability";
        let score = score_of(SubjectDomain::Legal, text, &config);
        // six keywords saturate at five, no pattern hits
        assert!((score.score - 0.6).abs() < 1e-9);
        assert_eq!(score.indicators.len(), 6);
    }

    #[test]
    fn test_pattern_score() {
        let config = ClassifierConfig::default();
        let text = "Revenue grew 12% in Q3 to $4.5 million.";
        let score = score_of(SubjectDomain::Business, text, &config);
        // one keyword (revenue), three pattern hits
        assert!((score.score - (0.6 * 0.2 + 0.4)).abs() < 1e-9);
        assert!(score.indicators.contains(&"Q3".to_string()));
    }

    #[test]
    fn test_no_signal_scores_zero() {
        let config = ClassifierConfig::default();
        let score = score_of(SubjectDomain::Medical, "the cat sat on the mat", &config);
        assert_eq!(score.score, 0.0);
        assert!(score.indicators.is_empty());
    }

    #[test]
    fn test_extra_keywords_and_patterns() {
        let mut config = ClassifierConfig::default();
        config
            .extra_keywords
            .insert("medical".to_string(), vec!["Triage".to_string()]);
        config
            .extra_patterns
            .insert("medical".to_string(), vec![r"\bICD-\d+\b".to_string()]);
        let score = score_of(SubjectDomain::Medical, "triage coded as ICD-10", &config);
        assert!((score.score - (0.6 * 0.2 + 0.4 / 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_extra_pattern() {
        let mut config = ClassifierConfig::default();
        config
            .extra_patterns
            .insert("legal".to_string(), vec!["(unclosed".to_string()]);
        let err =
            CompiledSignals::compile_all(DOMAIN_SIGNALS, |d| d.as_str(), &config).unwrap_err();
        assert!(matches!(
            err,
            ClassifierError::InvalidPattern { ref label, .. } if label == "legal"
        ));
    }
}
