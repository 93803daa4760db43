//! Pronoun/antecedent resolution
//!
//! Candidates are nouns and proper nouns preceding a third-person pronoun
//! within a bounded lookback. Each is scored from a base value, minus a
//! distance penalty, plus bonuses for subject role, proper-noun status and
//! number/gender agreement. Clear disagreement costs as much as agreement earns.

use serde::{Deserialize, Serialize};
use stylus_domain::{
    clamp_unit, AnnotatedDocument, DependencyLabel, EntityType, PartOfSpeech, Token,
};

use crate::lexicon::PronounClass;

const BASE_SCORE: f64 = 0.5;
const DISTANCE_PENALTY_PER_TOKEN: f64 = 0.02;
const MAX_DISTANCE_PENALTY: f64 = 0.30;
const SUBJECT_BONUS: f64 = 0.15;
const PROPER_NOUN_BONUS: f64 = 0.10;
const AGREEMENT_BONUS: f64 = 0.15;
const DISAGREEMENT_PENALTY: f64 = 0.15;

const PERSON_NOUNS: &[&str] = &[
    "man", "woman", "boy", "girl", "father", "mother", "brother", "sister", "son", "daughter",
    "husband", "wife", "king", "queen", "doctor", "nurse", "author", "writer", "student",
    "manager", "engineer", "user", "customer", "person", "child", "friend", "patient",
];

/// Syntactic role of the pronoun in a resolved reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceRelation {
    /// The pronoun is a subject
    Subject,
    /// The pronoun is a direct, indirect or prepositional object
    Object,
    /// Possessive pronoun
    Possessive,
    /// Any other role
    Other,
}

impl ReferenceRelation {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceRelation::Subject => "subject",
            ReferenceRelation::Object => "object",
            ReferenceRelation::Possessive => "possessive",
            ReferenceRelation::Other => "other",
        }
    }

    fn of(token: &Token) -> Self {
        if token.dep == DependencyLabel::Possessive {
            ReferenceRelation::Possessive
        } else if token.dep.is_subject() {
            ReferenceRelation::Subject
        } else if token.dep.is_object() {
            ReferenceRelation::Object
        } else if PronounClass::is_possessive(&token.text) {
            ReferenceRelation::Possessive
        } else {
            ReferenceRelation::Other
        }
    }
}

/// A resolved pronoun
#[derive(Debug, Clone, PartialEq)]
pub struct CoreferenceMatch {
    /// Pronoun text
    pub pronoun: String,
    /// Token index of the pronoun
    pub pronoun_index: usize,
    /// Antecedent text
    pub antecedent: String,
    /// Token index of the antecedent
    pub antecedent_index: usize,
    /// Score of the chosen antecedent, in [0, 1]
    pub confidence: f64,
    /// Distance in tokens
    pub distance: usize,
    /// Syntactic role of the pronoun
    pub relationship_type: ReferenceRelation,
    /// Other candidates that also cleared the threshold
    pub competing_candidates: usize,
}

/// Whether a token is a resolvable (third-person) pronoun
pub(crate) fn is_resolvable_pronoun(token: &Token) -> bool {
    matches!(token.pos, PartOfSpeech::Pronoun | PartOfSpeech::Determiner)
        && PronounClass::from_text(&token.text).is_some()
}

/// Nominal tokens within `window` tokens before `index`
///
/// Compound modifiers are skipped so a multi-word name counts once.
pub(crate) fn candidates(doc: &AnnotatedDocument, index: usize, window: usize) -> Vec<usize> {
    let start = index.saturating_sub(window);
    (start..index.min(doc.len()))
        .filter(|&i| {
            let token = &doc.tokens()[i];
            token.pos.is_nominal() && token.dep != DependencyLabel::Compound
        })
        .collect()
}

fn looks_plural(token: &Token) -> bool {
    if token.pos == PartOfSpeech::ProperNoun {
        return false;
    }
    let lower = token.text.to_lowercase();
    (lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") && lower.len() > 3)
        || matches!(lower.as_str(), "people" | "children" | "men" | "women" | "data")
}

fn looks_personal(token: &Token) -> bool {
    token.entity == Some(EntityType::Person) || PERSON_NOUNS.contains(&token.lemma.as_str())
}

fn agrees(class: PronounClass, candidate: &Token) -> bool {
    let plural = looks_plural(candidate);
    match class {
        PronounClass::Plural => plural,
        PronounClass::Masculine | PronounClass::Feminine => {
            !plural && (looks_personal(candidate) || candidate.pos == PartOfSpeech::ProperNoun)
        }
        PronounClass::Neuter => !plural && !looks_personal(candidate),
    }
}

/// Score one antecedent candidate for the pronoun at `pronoun_index`
pub(crate) fn score_candidate(
    doc: &AnnotatedDocument,
    pronoun_index: usize,
    class: PronounClass,
    candidate_index: usize,
) -> f64 {
    let candidate = &doc.tokens()[candidate_index];
    let distance = pronoun_index.saturating_sub(candidate_index);

    let mut score = BASE_SCORE;
    score -= (distance as f64 * DISTANCE_PENALTY_PER_TOKEN).min(MAX_DISTANCE_PENALTY);
    if candidate.dep.is_subject() {
        score += SUBJECT_BONUS;
    }
    if candidate.pos == PartOfSpeech::ProperNoun {
        score += PROPER_NOUN_BONUS;
    }
    if agrees(class, candidate) {
        score += AGREEMENT_BONUS;
    } else {
        score -= DISAGREEMENT_PENALTY;
    }
    clamp_unit(score)
}

/// Resolve third-person pronouns among the tokens in `range`
///
/// First- and second-person pronouns are skipped. A pronoun is resolved when
/// its best candidate scores above `threshold`.
pub fn resolve(
    doc: &AnnotatedDocument,
    range: std::ops::Range<usize>,
    window: usize,
    threshold: f64,
) -> Vec<CoreferenceMatch> {
    let mut matches = Vec::new();
    let end = range.end.min(doc.len());

    for index in range.start..end {
        let token = &doc.tokens()[index];
        if !is_resolvable_pronoun(token) {
            continue;
        }
        let Some(class) = PronounClass::from_text(&token.text) else {
            continue;
        };

        let mut scored: Vec<(usize, f64)> = candidates(doc, index, window)
            .into_iter()
            .map(|c| (c, score_candidate(doc, index, class, c)))
            .filter(|&(_, score)| score > threshold)
            .collect();
        // Highest score first; ties go to the nearer candidate
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(b.0.cmp(&a.0)));

        if let Some(&(best, confidence)) = scored.first() {
            let antecedent = &doc.tokens()[best];
            matches.push(CoreferenceMatch {
                pronoun: token.text.clone(),
                pronoun_index: index,
                antecedent: antecedent.text.clone(),
                antecedent_index: best,
                confidence,
                distance: index - best,
                relationship_type: ReferenceRelation::of(token),
                competing_candidates: scored.len() - 1,
            });
        }
    }

    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use stylus_domain::{DependencyLabel as Dep, PartOfSpeech as Pos};

    fn tok(
        text: &str,
        idx: usize,
        start: usize,
        sentence: usize,
        pos: Pos,
        dep: Dep,
        head: usize,
    ) -> Token {
        Token::new(text, start, sentence, idx).with_pos(pos).with_dep(dep, head)
    }

    /// "Alice met the engineers. They liked her."
    fn sample() -> AnnotatedDocument {
        let tokens = vec![
            tok("Alice", 0, 0, 0, Pos::ProperNoun, Dep::NominalSubject, 1)
                .with_entity(EntityType::Person),
            tok("met", 1, 6, 0, Pos::Verb, Dep::Root, 1),
            tok("the", 2, 10, 0, Pos::Determiner, Dep::Determiner, 3),
            tok("engineers", 3, 14, 0, Pos::Noun, Dep::DirectObject, 1).with_lemma("engineer"),
            tok(".", 4, 23, 0, Pos::Punctuation, Dep::Punctuation, 1),
            tok("They", 5, 25, 1, Pos::Pronoun, Dep::NominalSubject, 6),
            tok("liked", 6, 30, 1, Pos::Verb, Dep::Root, 6),
            tok("her", 7, 36, 1, Pos::Pronoun, Dep::DirectObject, 6),
            tok(".", 8, 39, 1, Pos::Punctuation, Dep::Punctuation, 6),
        ];
        AnnotatedDocument::new("Alice met the engineers. They liked her.", tokens)
    }

    #[test]
    fn test_plural_pronoun_prefers_plural_noun() {
        let doc = sample();
        let matches = resolve(&doc, 0..doc.len(), 50, 0.3);
        let they = matches.iter().find(|m| m.pronoun == "They").unwrap();
        assert_eq!(they.antecedent, "engineers");
        assert_eq!(they.distance, 2);
        assert_eq!(they.relationship_type, ReferenceRelation::Subject);
    }

    #[test]
    fn test_feminine_pronoun_prefers_person() {
        let doc = sample();
        let matches = resolve(&doc, 0..doc.len(), 50, 0.3);
        let her = matches.iter().find(|m| m.pronoun == "her").unwrap();
        assert_eq!(her.antecedent, "Alice");
        assert_eq!(her.relationship_type, ReferenceRelation::Object);
        // 0.5 - 7*0.02 + subject + proper noun + agreement
        assert!((her.confidence - 0.76).abs() < 1e-9);
    }

    #[test]
    fn test_candidate_score_components() {
        let doc = sample();
        let engineers = score_candidate(&doc, 5, PronounClass::Plural, 3);
        assert!((engineers - (0.5 - 0.04 + 0.15)).abs() < 1e-9);
        // subject and proper noun, but singular
        let alice = score_candidate(&doc, 5, PronounClass::Plural, 0);
        assert!((alice - (0.5 - 0.10 + 0.15 + 0.10 - 0.15)).abs() < 1e-9);
    }

    #[test]
    fn test_first_person_skipped() {
        let tokens = vec![
            tok("Bob", 0, 0, 0, Pos::ProperNoun, Dep::NominalSubject, 1),
            tok("saw", 1, 4, 0, Pos::Verb, Dep::Root, 1),
            tok("me", 2, 8, 0, Pos::Pronoun, Dep::DirectObject, 1),
        ];
        let doc = AnnotatedDocument::new("Bob saw me", tokens);
        assert!(resolve(&doc, 0..doc.len(), 50, 0.3).is_empty());
    }

    #[test]
    fn test_threshold_filters_weak_candidates() {
        let doc = sample();
        assert!(resolve(&doc, 0..doc.len(), 50, 0.99).is_empty());
    }

    #[test]
    fn test_candidates_window() {
        let doc = sample();
        assert_eq!(candidates(&doc, 7, 50), vec![0, 3]);
        assert_eq!(candidates(&doc, 7, 4), vec![3]);
    }
}
