//! Sentence structure analysis

use serde::{Deserialize, Serialize};
use stylus_domain::{AnnotatedDocument, DependencyLabel, PartOfSpeech, SentenceSpan};

use crate::lexicon::{
    contains_phrase, DiscourseFunction, IndicatorKind, DISCOURSE_MARKERS, FORMALITY_INDICATORS,
};

const TOKEN_NORM: f64 = 30.0;
const DEPTH_NORM: f64 = 6.0;
const CLAUSE_NORM: f64 = 4.0;
const SUBORDINATION_NORM: f64 = 3.0;

/// Phrase categories present in a sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhraseType {
    /// Noun phrase
    NounPhrase,
    /// Verb phrase
    VerbPhrase,
    /// Prepositional phrase
    PrepositionalPhrase,
    /// Adjectival phrase
    AdjectivalPhrase,
    /// Adverbial phrase
    AdverbialPhrase,
}

/// How clauses in a sentence are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoordinationType {
    /// Single clause
    #[default]
    None,
    /// Coordinated clauses or phrases (and, or, but)
    Coordinate,
    /// Subordinate clauses
    Subordinate,
    /// Both coordination and subordination
    Mixed,
}

/// A discourse marker found in a sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscourseMarker {
    /// Marker text
    pub text: String,
    /// Rhetorical function
    pub function: DiscourseFunction,
}

/// A formality indicator found in a sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormalityIndicator {
    /// Indicator text
    pub text: String,
    /// Indicator kind
    pub kind: IndicatorKind,
}

/// Structural profile of one sentence
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SentenceStructure {
    /// Average of four normalized complexity factors, in [0, 1]
    pub complexity_score: f64,
    /// Maximum dependency depth
    pub dependency_depth: usize,
    /// Finite-verb count used as a clause count
    pub clause_count: usize,
    /// Tokens in the sentence (punctuation excluded)
    pub token_count: usize,
    /// Adverbial and relative clause dependents
    pub subordinate_clause_count: usize,
    /// Phrase categories present
    pub phrase_types: Vec<PhraseType>,
    /// Discourse markers found
    pub discourse_markers: Vec<DiscourseMarker>,
    /// Formality indicators found
    pub formality_indicators: Vec<FormalityIndicator>,
    /// Passive subject or passive auxiliary present
    pub has_passive_voice: bool,
    /// A noun carries two or more modifiers
    pub has_complex_noun_phrases: bool,
    /// Any subordinate clause present
    pub has_subordinate_clauses: bool,
    /// How clauses are joined
    pub coordination_type: CoordinationType,
}

/// Discourse markers in lowercase text, grouped by function
pub fn find_discourse_markers(lower: &str) -> Vec<DiscourseMarker> {
    let mut found = Vec::new();
    for (function, words) in DISCOURSE_MARKERS {
        for word in words.iter() {
            if contains_phrase(lower, word) {
                found.push(DiscourseMarker {
                    text: (*word).to_string(),
                    function: *function,
                });
            }
        }
    }
    found
}

/// Formality indicators in lowercase text
pub fn find_formality_indicators(lower: &str) -> Vec<FormalityIndicator> {
    let mut found = Vec::new();
    for (kind, words) in FORMALITY_INDICATORS {
        for word in words.iter() {
            if contains_phrase(lower, word) {
                found.push(FormalityIndicator {
                    text: (*word).to_string(),
                    kind: *kind,
                });
            }
        }
    }
    found
}

/// Analyze the structure of one sentence
pub fn analyze_sentence(doc: &AnnotatedDocument, span: &SentenceSpan) -> SentenceStructure {
    let tokens = doc.sentence_tokens(span);
    if tokens.is_empty() {
        return SentenceStructure::default();
    }

    let token_count = tokens.iter().filter(|t| !t.is_punct()).count();
    let dependency_depth = doc.max_dependency_depth(span);

    let verbs = tokens.iter().filter(|t| t.pos == PartOfSpeech::Verb).count();
    let clause_count = if verbs == 0 && tokens.iter().any(|t| t.pos == PartOfSpeech::Auxiliary) {
        1
    } else {
        verbs
    };

    let subordinate_clause_count = tokens.iter().filter(|t| t.dep.is_subordinate_clause()).count();
    let has_subordinate_clauses = subordinate_clause_count > 0
        || tokens
            .iter()
            .any(|t| matches!(t.dep, DependencyLabel::ClausalComplement | DependencyLabel::Marker));
    let has_coordination = tokens.iter().any(|t| {
        matches!(
            t.dep,
            DependencyLabel::Conjunct | DependencyLabel::CoordinatingConjunction
        )
    });
    let coordination_type = match (has_coordination, has_subordinate_clauses) {
        (false, false) => CoordinationType::None,
        (true, false) => CoordinationType::Coordinate,
        (false, true) => CoordinationType::Subordinate,
        (true, true) => CoordinationType::Mixed,
    };

    let has_passive_voice = tokens.iter().any(|t| {
        matches!(
            t.dep,
            DependencyLabel::PassiveSubject | DependencyLabel::PassiveAuxiliary
        )
    });

    let has_complex_noun_phrases = (span.start_token..span.end_token).any(|head| {
        doc.tokens()[head].pos.is_nominal()
            && tokens
                .iter()
                .filter(|t| {
                    t.head == head
                        && matches!(
                            t.dep,
                            DependencyLabel::AdjectivalModifier
                                | DependencyLabel::Compound
                                | DependencyLabel::Possessive
                                | DependencyLabel::RelativeClause
                                | DependencyLabel::Preposition
                        )
                })
                .count()
                >= 2
    });

    let mut phrase_types = Vec::new();
    let mut note = |present: bool, phrase: PhraseType| {
        if present {
            phrase_types.push(phrase);
        }
    };
    note(
        tokens.iter().any(|t| t.pos.is_nominal() || t.pos == PartOfSpeech::Pronoun),
        PhraseType::NounPhrase,
    );
    note(tokens.iter().any(|t| t.pos.is_verbal()), PhraseType::VerbPhrase);
    note(tokens.iter().any(|t| t.pos == PartOfSpeech::Adposition), PhraseType::PrepositionalPhrase);
    note(tokens.iter().any(|t| t.pos == PartOfSpeech::Adjective), PhraseType::AdjectivalPhrase);
    note(tokens.iter().any(|t| t.pos == PartOfSpeech::Adverb), PhraseType::AdverbialPhrase);

    let factors = [
        token_count as f64 / TOKEN_NORM,
        dependency_depth as f64 / DEPTH_NORM,
        clause_count as f64 / CLAUSE_NORM,
        subordinate_clause_count as f64 / SUBORDINATION_NORM,
    ];
    let complexity_score = factors.iter().map(|f| f.min(1.0)).sum::<f64>() / factors.len() as f64;

    let lower = doc
        .text()
        .get(span.start..span.end)
        .unwrap_or_default()
        .to_lowercase();

    SentenceStructure {
        complexity_score,
        dependency_depth,
        clause_count,
        token_count,
        subordinate_clause_count,
        phrase_types,
        discourse_markers: find_discourse_markers(&lower),
        formality_indicators: find_formality_indicators(&lower),
        has_passive_voice,
        has_complex_noun_phrases,
        has_subordinate_clauses,
        coordination_type,
    }
}
