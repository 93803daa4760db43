//! Semantic coherence and discourse flow

use std::collections::{BTreeMap, BTreeSet};

use stylus_domain::{clamp_unit, mean, AnnotatedDocument, PartOfSpeech, SentenceSpan};

use crate::coreference::{candidates, is_resolvable_pronoun};
use crate::structure::find_discourse_markers;

/// Pronoun density above which text starts to read as unclear
const MAX_COMFORTABLE_PRONOUN_DENSITY: f64 = 0.15;

/// Coherence of the sentences around an error
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticCoherence {
    /// Overall coherence, in [0, 1]
    pub coherence_score: f64,
    /// Mean Jaccard overlap of entity sets in adjacent sentences
    pub topic_consistency: f64,
    /// Share of content lemmas that recur
    pub lexical_cohesion: f64,
    /// Share of pronouns with a nominal candidate nearby
    pub reference_clarity: f64,
    /// Entity lemmas appearing in more than one sentence
    pub repeated_entities: Vec<String>,
    /// Share of adjacent sentence pairs sharing a content lemma
    pub semantic_field_consistency: f64,
    /// Discourse marker coverage between sentences
    pub discourse_flow_score: f64,
    /// Pronouns with too many nearby candidates
    pub ambiguous_references: Vec<String>,
}

impl Default for SemanticCoherence {
    fn default() -> Self {
        Self {
            coherence_score: 0.5,
            topic_consistency: 1.0,
            lexical_cohesion: 0.0,
            reference_clarity: 1.0,
            repeated_entities: Vec::new(),
            semantic_field_consistency: 1.0,
            discourse_flow_score: 0.5,
            ambiguous_references: Vec::new(),
        }
    }
}

/// Windows used for reference checks
#[derive(Debug, Clone, Copy)]
pub struct ReferenceWindows {
    /// Lookback for clarity
    pub clarity: usize,
    /// Lookback for ambiguity
    pub ambiguity: usize,
    /// Candidates that make a reference ambiguous
    pub ambiguity_candidates: usize,
}

fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

fn is_content(pos: PartOfSpeech) -> bool {
    pos.is_nominal() || pos == PartOfSpeech::Verb || pos == PartOfSpeech::Adjective
}

/// Analyze coherence over a run of sentences
pub fn analyze_coherence(
    doc: &AnnotatedDocument,
    sentences: &[SentenceSpan],
    windows: ReferenceWindows,
) -> SemanticCoherence {
    if sentences.is_empty() {
        return SemanticCoherence::default();
    }

    let entity_sets: Vec<BTreeSet<String>> = sentences
        .iter()
        .map(|s| {
            doc.sentence_tokens(s)
                .iter()
                .filter(|t| t.pos.is_nominal())
                .map(|t| t.lemma.clone())
                .collect()
        })
        .collect();
    let content_sets: Vec<BTreeSet<String>> = sentences
        .iter()
        .map(|s| {
            doc.sentence_tokens(s)
                .iter()
                .filter(|t| is_content(t.pos))
                .map(|t| t.lemma.clone())
                .collect()
        })
        .collect();

    // Entity repetition
    let mut entity_sentences: BTreeMap<&str, usize> = BTreeMap::new();
    for set in &entity_sets {
        for lemma in set {
            *entity_sentences.entry(lemma.as_str()).or_insert(0) += 1;
        }
    }
    let repeated_entities: Vec<String> = entity_sentences
        .iter()
        .filter(|(_, &count)| count > 1)
        .map(|(lemma, _)| (*lemma).to_string())
        .collect();
    let multi_sentence = sentences.len() > 1;
    let repetition_score = if !multi_sentence {
        0.5
    } else if entity_sentences.is_empty() {
        0.0
    } else {
        (repeated_entities.len() as f64 / entity_sentences.len() as f64 * 2.0).min(1.0)
    };

    // Topic consistency and semantic field
    let (topic_consistency, semantic_field_consistency) = if multi_sentence {
        let overlaps: Vec<f64> = entity_sets.windows(2).map(|w| jaccard(&w[0], &w[1])).collect();
        let shared = content_sets
            .windows(2)
            .filter(|w| w[0].intersection(&w[1]).next().is_some())
            .count();
        (mean(&overlaps), shared as f64 / (sentences.len() - 1) as f64)
    } else {
        (1.0, 1.0)
    };

    // Lexical cohesion
    let mut lemma_counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut token_total = 0usize;
    let mut pronoun_total = 0usize;
    for s in sentences {
        for t in doc.sentence_tokens(s) {
            if t.is_punct() {
                continue;
            }
            token_total += 1;
            if t.pos == PartOfSpeech::Pronoun {
                pronoun_total += 1;
            }
            if is_content(t.pos) {
                *lemma_counts.entry(t.lemma.as_str()).or_insert(0) += 1;
            }
        }
    }
    let lexical_cohesion = if lemma_counts.is_empty() {
        0.0
    } else {
        lemma_counts.values().filter(|&&c| c > 1).count() as f64 / lemma_counts.len() as f64
    };

    // Pronoun density sanity bounds
    let pronoun_density = if token_total == 0 {
        0.0
    } else {
        pronoun_total as f64 / token_total as f64
    };
    let pronoun_score = if pronoun_density <= MAX_COMFORTABLE_PRONOUN_DENSITY {
        1.0
    } else {
        clamp_unit(1.0 - (pronoun_density - MAX_COMFORTABLE_PRONOUN_DENSITY) * 4.0)
    };

    // Discourse flow
    let marker_count: usize = sentences
        .iter()
        .map(|s| {
            let text = doc.text().get(s.start..s.end).unwrap_or_default().to_lowercase();
            find_discourse_markers(&text).len()
        })
        .sum();
    let marker_score = if multi_sentence {
        (marker_count as f64 / (sentences.len() - 1) as f64).min(1.0)
    } else {
        0.5
    };
    let discourse_flow_score =
        clamp_unit(0.5 * marker_score + 0.5 * topic_consistency.max(semantic_field_consistency));

    // Reference clarity and ambiguity
    let first = sentences[0].start_token;
    let last = sentences[sentences.len() - 1].end_token.min(doc.len());
    let mut pronouns = 0usize;
    let mut clear = 0usize;
    let mut ambiguous_references = Vec::new();
    for index in first..last {
        let token = &doc.tokens()[index];
        if !is_resolvable_pronoun(token) {
            continue;
        }
        pronouns += 1;
        if !candidates(doc, index, windows.clarity).is_empty() {
            clear += 1;
        }
        if candidates(doc, index, windows.ambiguity).len() >= windows.ambiguity_candidates {
            ambiguous_references.push(token.text.clone());
        }
    }
    let reference_clarity = if pronouns == 0 {
        1.0
    } else {
        clear as f64 / pronouns as f64
    };

    let coherence_score =
        clamp_unit(0.4 * repetition_score + 0.3 * pronoun_score + 0.3 * marker_score);

    SemanticCoherence {
        coherence_score,
        topic_consistency: clamp_unit(topic_consistency),
        lexical_cohesion: clamp_unit(lexical_cohesion),
        reference_clarity,
        repeated_entities,
        semantic_field_consistency: clamp_unit(semantic_field_consistency),
        discourse_flow_score,
        ambiguous_references,
    }
}
