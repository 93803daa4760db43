//! Heuristic annotator
//!
//! Segments text with Unicode word boundaries, splits sentences on terminal
//! punctuation (ignoring common abbreviations), tags tokens from closed-class
//! lexicons and suffix rules, and attaches every token to a flat dependency
//! tree rooted at the first verb of its sentence.

use std::ops::Range;

use stylus_domain::{
    AnnotatedDocument, DependencyLabel, DocumentAnnotator, EntityType, PartOfSpeech, Token,
};
use unicode_segmentation::UnicodeSegmentation;

use crate::lexicon::{self, contains};
use crate::AnnotatorError;

/// Default maximum input size (bytes)
const DEFAULT_MAX_TEXT_LENGTH: usize = 1_000_000;

/// Model-free annotator suitable for driving the evidence layers
///
/// # Examples
///
/// ```
/// use stylus_nlp::HeuristicAnnotator;
/// use stylus_domain::{DependencyLabel, DocumentAnnotator};
///
/// let doc = HeuristicAnnotator::new().annotate("The team shipped the release.").unwrap();
/// let root = doc.tokens().iter().find(|t| t.dep == DependencyLabel::Root).unwrap();
/// assert_eq!(root.text, "shipped");
/// ```
#[derive(Debug, Clone)]
pub struct HeuristicAnnotator {
    max_text_length: usize,
}

impl HeuristicAnnotator {
    /// Create an annotator with the default size limit
    pub fn new() -> Self {
        Self {
            max_text_length: DEFAULT_MAX_TEXT_LENGTH,
        }
    }

    /// Create an annotator that rejects texts longer than `max_text_length` bytes
    pub fn with_max_text_length(max_text_length: usize) -> Self {
        Self { max_text_length }
    }

    /// Split text into tokens and assign sentence indices
    fn segment(&self, text: &str) -> Vec<Token> {
        let mut tokens: Vec<Token> = Vec::new();
        let mut sentence = 0;
        let mut pending_break = false;
        let mut newline_run = 0;

        for (start, segment) in text.split_word_bound_indices() {
            if segment.trim().is_empty() {
                newline_run += segment.matches('\n').count();
                if newline_run >= 2 && !tokens.is_empty() {
                    pending_break = true;
                }
                continue;
            }
            newline_run = 0;

            if pending_break {
                sentence += 1;
                pending_break = false;
            }

            let index = tokens.len();
            tokens.push(Token::new(segment, start, sentence, index));

            if matches!(segment, "." | "!" | "?") {
                let previous = index
                    .checked_sub(1)
                    .map(|i| tokens[i].lower())
                    .unwrap_or_default();
                if !(segment == "." && contains(lexicon::ABBREVIATIONS, &previous)) {
                    pending_break = true;
                }
            }
        }

        tokens
    }

    /// Assign parts of speech, lemmas and entity types
    fn tag(&self, tokens: &mut [Token], sentences: &[Range<usize>]) {
        for range in sentences {
            for i in range.clone() {
                tokens[i].pos = initial_tag(&tokens[i].text);
            }
            refine_tags(tokens, range.clone());
        }

        for i in 0..tokens.len() {
            let lemma = lemmatize(&tokens[i].lower(), tokens[i].pos);
            tokens[i].lemma = lemma;
        }

        tag_entities(tokens);
    }
}

impl Default for HeuristicAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentAnnotator for HeuristicAnnotator {
    type Error = AnnotatorError;

    fn annotate(&self, text: &str) -> Result<AnnotatedDocument, Self::Error> {
        if text.len() > self.max_text_length {
            return Err(AnnotatorError::TextTooLong(text.len(), self.max_text_length));
        }

        let mut tokens = self.segment(text);
        let sentences = sentence_ranges(&tokens);
        self.tag(&mut tokens, &sentences);
        for range in &sentences {
            parse_sentence(&mut tokens, range.clone());
        }

        Ok(AnnotatedDocument::new(text, tokens))
    }
}

fn sentence_ranges(tokens: &[Token]) -> Vec<Range<usize>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for i in 1..=tokens.len() {
        if i == tokens.len() || tokens[i].sentence != tokens[start].sentence {
            ranges.push(start..i);
            start = i;
        }
    }
    ranges
}

/// Context-free tag from lexicons, capitalization and suffixes
fn initial_tag(word: &str) -> PartOfSpeech {
    if !word.chars().any(char::is_alphanumeric) {
        let is_symbol = word.chars().any(|c| {
            matches!(
                c,
                '$' | '%' | '&' | '@' | '#' | '+' | '=' | '<' | '>' | '|' | '~' | '^' | '*' | '/'
                    | '\\'
            )
        });
        return if is_symbol {
            PartOfSpeech::Symbol
        } else {
            PartOfSpeech::Punctuation
        };
    }
    if word.chars().any(|c| c.is_ascii_digit())
        && word.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.')
    {
        return PartOfSpeech::Numeral;
    }

    let lower = word.to_lowercase().replace('’', "'");
    if lower.ends_with("n't") {
        return PartOfSpeech::Auxiliary;
    }
    let base = lower.split('\'').next().unwrap_or(lower.as_str());

    if contains(lexicon::PRONOUNS, base) || contains(lexicon::POSSESSIVE_PRONOUNS, base) {
        return PartOfSpeech::Pronoun;
    }
    if contains(lexicon::DETERMINERS, base) {
        return PartOfSpeech::Determiner;
    }
    if contains(lexicon::ADPOSITIONS, base) {
        return PartOfSpeech::Adposition;
    }
    if contains(lexicon::COORDINATORS, base) {
        return PartOfSpeech::CoordinatingConjunction;
    }
    if contains(lexicon::SUBORDINATORS, base) {
        return PartOfSpeech::SubordinatingConjunction;
    }
    if contains(lexicon::AUXILIARIES, base) {
        return PartOfSpeech::Auxiliary;
    }
    if contains(lexicon::PARTICLES, base) {
        return PartOfSpeech::Particle;
    }
    if contains(lexicon::INTERJECTIONS, base) {
        return PartOfSpeech::Interjection;
    }
    if contains(lexicon::ADVERBS, base) {
        return PartOfSpeech::Adverb;
    }
    if contains(lexicon::ADJECTIVES, base) {
        return PartOfSpeech::Adjective;
    }
    if contains(lexicon::COMMON_VERBS, base) {
        return PartOfSpeech::Verb;
    }
    if word.chars().next().is_some_and(char::is_uppercase) {
        return PartOfSpeech::ProperNoun;
    }

    let len = base.chars().count();
    if base.ends_with("ly") && len > 4 {
        PartOfSpeech::Adverb
    } else if len > 5 && lexicon::ADJECTIVE_SUFFIXES.iter().any(|s| base.ends_with(s)) {
        PartOfSpeech::Adjective
    } else if (base.ends_with("ing") && len > 5) || (base.ends_with("ed") && len > 4) {
        PartOfSpeech::Verb
    } else if ["ize", "ise", "ify"].iter().any(|s| base.ends_with(s)) && len > 5 {
        PartOfSpeech::Verb
    } else {
        PartOfSpeech::Noun
    }
}

/// Contextual corrections within a sentence
fn refine_tags(tokens: &mut [Token], range: Range<usize>) {
    let mut seen_verb = false;
    for i in range.clone() {
        let lower = tokens[i].lower();
        let prev = if i > range.start { Some(i - 1) } else { None };

        if tokens[i].pos == PartOfSpeech::Noun {
            if let Some(p) = prev {
                let prev_lower = tokens[p].lower();
                let after_subject_pronoun = tokens[p].pos == PartOfSpeech::Pronoun
                    && matches!(
                        prev_lower.as_str(),
                        "i" | "you" | "he" | "she" | "it" | "we" | "they" | "who" | "which"
                    );
                let after_verbal = matches!(
                    tokens[p].pos,
                    PartOfSpeech::Auxiliary | PartOfSpeech::Particle
                );
                let after_nominal_subject = !seen_verb
                    && tokens[p].pos.is_nominal()
                    && lower.ends_with('s')
                    && !lower.ends_with("ss");
                if after_subject_pronoun || after_verbal || after_nominal_subject {
                    tokens[i].pos = PartOfSpeech::Verb;
                }
            }
        }

        if lower == "that" {
            let next_is_verbal = i + 1 < range.end && tokens[i + 1].pos.is_verbal();
            if next_is_verbal {
                tokens[i].pos = PartOfSpeech::Pronoun;
            }
        }

        if tokens[i].pos.is_verbal() {
            seen_verb = true;
        }
    }
}

fn lemmatize(lower: &str, pos: PartOfSpeech) -> String {
    let irregular = match lower {
        "is" | "are" | "was" | "were" | "am" | "been" | "being" | "'s" | "'re" => Some("be"),
        "has" | "had" | "'ve" => Some("have"),
        "does" | "did" => Some("do"),
        "went" => Some("go"),
        "ran" => Some("run"),
        "wrote" => Some("write"),
        "took" => Some("take"),
        "gave" => Some("give"),
        "saw" => Some("see"),
        "came" => Some("come"),
        "found" => Some("find"),
        "thought" => Some("think"),
        "told" => Some("tell"),
        "said" => Some("say"),
        "got" => Some("get"),
        "knew" => Some("know"),
        "felt" => Some("feel"),
        "sent" => Some("send"),
        "children" => Some("child"),
        "people" => Some("person"),
        "men" => Some("man"),
        "women" => Some("woman"),
        _ => None,
    };
    if let Some(lemma) = irregular {
        return lemma.to_string();
    }

    let len = lower.chars().count();
    match pos {
        PartOfSpeech::Verb | PartOfSpeech::Auxiliary => {
            if lower.ends_with("ing") && len > 5 {
                undouble(&lower[..lower.len() - 3])
            } else if lower.ends_with("ied") && len > 4 {
                format!("{}y", &lower[..lower.len() - 3])
            } else if lower.ends_with("ed") && len > 4 {
                undouble(&lower[..lower.len() - 2])
            } else if lower.ends_with("ies") && len > 4 {
                format!("{}y", &lower[..lower.len() - 3])
            } else if lower.ends_with('s') && !lower.ends_with("ss") && len > 3 {
                lower[..lower.len() - 1].to_string()
            } else {
                lower.to_string()
            }
        }
        PartOfSpeech::Noun => {
            if lower.ends_with("ies") && len > 4 {
                format!("{}y", &lower[..lower.len() - 3])
            } else if ["ses", "xes", "ches", "shes"].iter().any(|s| lower.ends_with(s)) && len > 4 {
                lower[..lower.len() - 2].to_string()
            } else if lower.ends_with('s') && !lower.ends_with("ss") && len > 3 {
                lower[..lower.len() - 1].to_string()
            } else {
                lower.to_string()
            }
        }
        _ => lower.to_string(),
    }
}

/// "runn" -> "run", "stopp" -> "stop"; keeps "fall", "pass"
fn undouble(stem: &str) -> String {
    let mut tail = stem.chars().rev();
    let (Some(last), Some(before)) = (tail.next(), tail.next()) else {
        return stem.to_string();
    };
    let doubled = last == before
        && last.is_ascii_alphabetic()
        && !matches!(last, 'l' | 's' | 'f' | 'z' | 'e' | 'o');
    if doubled && tail.next().is_some() {
        if let Some((cut, _)) = stem.char_indices().last() {
            return stem[..cut].to_string();
        }
    }
    stem.to_string()
}

fn tag_entities(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        match tokens[i].pos {
            PartOfSpeech::ProperNoun => {
                let lower = tokens[i].lower();
                if contains(lexicon::HONORIFICS, &lower) {
                    continue;
                }
                let after_honorific = previous_word(tokens, i)
                    .map(|w| contains(lexicon::HONORIFICS, &w))
                    .unwrap_or(false);
                let entity = if after_honorific {
                    EntityType::Person
                } else if contains(lexicon::LOCATIONS, &lower) {
                    EntityType::Location
                } else if contains(lexicon::MONTHS, &lower) {
                    EntityType::Date
                } else if organization_chain(tokens, i) {
                    EntityType::Organization
                } else {
                    EntityType::Other
                };
                tokens[i].entity = Some(entity);
            }
            PartOfSpeech::Numeral => {
                let is_year = tokens[i].text.len() == 4
                    && tokens[i]
                        .text
                        .parse::<u32>()
                        .map(|y| (1000..=2100).contains(&y))
                        .unwrap_or(false);
                if is_year {
                    tokens[i].entity = Some(EntityType::Date);
                }
            }
            _ => {}
        }
    }
}

/// Previous word token, skipping an abbreviation period
fn previous_word(tokens: &[Token], i: usize) -> Option<String> {
    let mut j = i.checked_sub(1)?;
    if tokens[j].text == "." {
        j = j.checked_sub(1)?;
    }
    if tokens[j].sentence != tokens[i].sentence && tokens[j].text != "." {
        return None;
    }
    Some(tokens[j].lower())
}

/// Whether a run of proper nouns starting at `i` ends in an organization suffix
fn organization_chain(tokens: &[Token], i: usize) -> bool {
    let mut j = i;
    while j < tokens.len() && j < i + 4 {
        if contains(lexicon::ORGANIZATION_SUFFIXES, &tokens[j].lower()) {
            return true;
        }
        if j > i && tokens[j].pos != PartOfSpeech::ProperNoun {
            return false;
        }
        j += 1;
    }
    false
}

/// Attach every token of a sentence to a flat dependency tree
fn parse_sentence(tokens: &mut [Token], range: Range<usize>) {
    if range.is_empty() {
        return;
    }

    let root = range
        .clone()
        .find(|&i| tokens[i].pos == PartOfSpeech::Verb)
        .or_else(|| range.clone().find(|&i| tokens[i].pos == PartOfSpeech::Auxiliary))
        .or_else(|| range.clone().find(|&i| tokens[i].pos.is_nominal()))
        .unwrap_or(range.start);

    for i in range.clone() {
        tokens[i].dep = DependencyLabel::Other;
        tokens[i].head = root;
    }
    tokens[root].dep = DependencyLabel::Root;

    let root_is_passive = is_passive_verb(tokens, root, &range);
    let mut subject: Option<usize> = None;
    let mut objects_taken: Vec<usize> = Vec::new();

    for i in range.clone() {
        if i == root {
            continue;
        }
        let lower = tokens[i].lower();
        match tokens[i].pos {
            PartOfSpeech::Punctuation => {
                tokens[i].dep = DependencyLabel::Punctuation;
            }
            PartOfSpeech::Determiner | PartOfSpeech::Adjective | PartOfSpeech::Numeral => {
                if let Some(noun) = next_nominal(tokens, i, &range) {
                    tokens[i].head = noun;
                    tokens[i].dep = match tokens[i].pos {
                        PartOfSpeech::Determiner => DependencyLabel::Determiner,
                        PartOfSpeech::Adjective => DependencyLabel::AdjectivalModifier,
                        _ => DependencyLabel::Other,
                    };
                }
            }
            PartOfSpeech::Pronoun
                if contains(lexicon::POSSESSIVE_PRONOUNS, &lower)
                    && next_nominal(tokens, i, &range).is_some() =>
            {
                if let Some(noun) = next_nominal(tokens, i, &range) {
                    tokens[i].head = noun;
                    tokens[i].dep = DependencyLabel::Possessive;
                }
            }
            PartOfSpeech::Pronoun if is_relative(&lower) => {
                if let Some(verb) = next_verb(tokens, i, &range) {
                    tokens[i].head = verb;
                    tokens[i].dep = DependencyLabel::NominalSubject;
                }
            }
            PartOfSpeech::Noun | PartOfSpeech::ProperNoun | PartOfSpeech::Pronoun => {
                let next_is_nominal = i + 1 < range.end
                    && tokens[i + 1].pos.is_nominal()
                    && tokens[i].pos != PartOfSpeech::Pronoun;
                if next_is_nominal {
                    tokens[i].head = i + 1;
                    tokens[i].dep = DependencyLabel::Compound;
                } else if let Some(adp) = governing_adposition(tokens, i, &range) {
                    tokens[i].head = adp;
                    tokens[i].dep = DependencyLabel::PrepositionalObject;
                } else if i < root {
                    subject = Some(i);
                } else {
                    let verb = previous_verb(tokens, i, &range).unwrap_or(root);
                    if !objects_taken.contains(&verb) {
                        objects_taken.push(verb);
                        tokens[i].head = verb;
                        tokens[i].dep = DependencyLabel::DirectObject;
                    }
                }
            }
            PartOfSpeech::Verb => {
                tokens[i].dep = classify_clause(tokens, i, root, &range);
                if tokens[i].dep == DependencyLabel::RelativeClause {
                    if let Some(noun) = previous_nominal_before_relative(tokens, i, &range) {
                        tokens[i].head = noun;
                    }
                }
            }
            PartOfSpeech::Auxiliary => {
                let verb = next_verb(tokens, i, &range).filter(|&v| v <= i + 4);
                if let Some(verb) = verb {
                    tokens[i].head = verb;
                    let passive = contains(lexicon::BE_FORMS, &lower)
                        && participle_like(&tokens[verb].lower());
                    tokens[i].dep = if passive {
                        DependencyLabel::PassiveAuxiliary
                    } else {
                        DependencyLabel::Auxiliary
                    };
                } else {
                    tokens[i].dep = DependencyLabel::Auxiliary;
                }
            }
            PartOfSpeech::SubordinatingConjunction => {
                if let Some(verb) = next_verb(tokens, i, &range) {
                    tokens[i].head = verb;
                }
                tokens[i].dep = DependencyLabel::Marker;
            }
            PartOfSpeech::CoordinatingConjunction => {
                tokens[i].dep = DependencyLabel::CoordinatingConjunction;
            }
            PartOfSpeech::Adposition => {
                let head = (range.start..i)
                    .rev()
                    .find(|&j| tokens[j].pos.is_verbal() || tokens[j].pos.is_nominal())
                    .unwrap_or(root);
                tokens[i].head = head;
                tokens[i].dep = DependencyLabel::Preposition;
            }
            PartOfSpeech::Adverb | PartOfSpeech::Particle => {
                tokens[i].dep = DependencyLabel::AdverbialModifier;
            }
            _ => {}
        }
    }

    if let Some(subject) = subject {
        tokens[subject].head = root;
        tokens[subject].dep = if root_is_passive {
            DependencyLabel::PassiveSubject
        } else {
            DependencyLabel::NominalSubject
        };
    }
}

fn is_relative(lower: &str) -> bool {
    contains(lexicon::RELATIVE_PRONOUNS, lower) || lower == "that"
}

fn participle_like(lower: &str) -> bool {
    lower.ends_with("ed")
        || lower.ends_with("en")
        || matches!(
            lower,
            "made" | "done" | "sent" | "built" | "found" | "held" | "told" | "paid"
        )
}

fn is_passive_verb(tokens: &[Token], verb: usize, range: &Range<usize>) -> bool {
    if !participle_like(&tokens[verb].lower()) {
        return false;
    }
    let window_start = verb.saturating_sub(3).max(range.start);
    (window_start..verb).any(|j| {
        tokens[j].pos == PartOfSpeech::Auxiliary && contains(lexicon::BE_FORMS, &tokens[j].lower())
    })
}

fn classify_clause(
    tokens: &[Token],
    i: usize,
    root: usize,
    range: &Range<usize>,
) -> DependencyLabel {
    // Walk back to the previous verb; the nearest clause introducer decides.
    for j in (range.start..i).rev() {
        if j == root || tokens[j].pos == PartOfSpeech::Verb {
            break;
        }
        let lower = tokens[j].lower();
        if tokens[j].pos == PartOfSpeech::Pronoun && is_relative(&lower) {
            return DependencyLabel::RelativeClause;
        }
        if tokens[j].pos == PartOfSpeech::SubordinatingConjunction {
            return DependencyLabel::AdverbialClause;
        }
        if tokens[j].pos == PartOfSpeech::CoordinatingConjunction {
            return DependencyLabel::Conjunct;
        }
    }
    // A subordinate clause that precedes the root ("If it rains, ...")
    if i < root
        && (range.start..i).any(|j| tokens[j].pos == PartOfSpeech::SubordinatingConjunction)
    {
        return DependencyLabel::AdverbialClause;
    }
    DependencyLabel::ClausalComplement
}

fn next_nominal(tokens: &[Token], i: usize, range: &Range<usize>) -> Option<usize> {
    let end = range.end.min(i + 5);
    (i + 1..end)
        .take_while(|&j| !tokens[j].pos.is_verbal() && !tokens[j].is_punct())
        .find(|&j| tokens[j].pos.is_nominal())
}

fn next_verb(tokens: &[Token], i: usize, range: &Range<usize>) -> Option<usize> {
    (i + 1..range.end).find(|&j| tokens[j].pos == PartOfSpeech::Verb)
}

fn previous_verb(tokens: &[Token], i: usize, range: &Range<usize>) -> Option<usize> {
    (range.start..i).rev().find(|&j| tokens[j].pos == PartOfSpeech::Verb)
}

fn previous_nominal_before_relative(
    tokens: &[Token],
    i: usize,
    range: &Range<usize>,
) -> Option<usize> {
    let relative = (range.start..i)
        .rev()
        .find(|&j| tokens[j].pos == PartOfSpeech::Pronoun && is_relative(&tokens[j].lower()))?;
    (range.start..relative)
        .rev()
        .find(|&j| tokens[j].pos.is_nominal())
}

/// Adposition governing a nominal, skipping its determiners and modifiers
fn governing_adposition(tokens: &[Token], i: usize, range: &Range<usize>) -> Option<usize> {
    let start = i.saturating_sub(4).max(range.start);
    for j in (start..i).rev() {
        match tokens[j].pos {
            PartOfSpeech::Adposition => return Some(j),
            PartOfSpeech::Determiner
            | PartOfSpeech::Adjective
            | PartOfSpeech::Numeral
            | PartOfSpeech::Noun
            | PartOfSpeech::ProperNoun => continue,
            PartOfSpeech::Pronoun if contains(lexicon::POSSESSIVE_PRONOUNS, &tokens[j].lower()) => {
                continue
            }
            _ => return None,
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotate(text: &str) -> AnnotatedDocument {
        HeuristicAnnotator::new().annotate(text).unwrap()
    }

    fn token<'a>(doc: &'a AnnotatedDocument, text: &str) -> &'a Token {
        doc.tokens().iter().find(|t| t.text == text).unwrap()
    }

    #[test]
    fn test_sentence_splitting_respects_abbreviations() {
        let doc = annotate("Dr. Smith arrived. He sat down! Was it late?");
        assert_eq!(doc.sentences().len(), 3);
        assert_eq!(token(&doc, "Smith").sentence, 0);
        assert_eq!(token(&doc, "He").sentence, 1);
    }

    #[test]
    fn test_paragraph_break_splits_sentences() {
        let doc = annotate("Heading without period\n\nBody text here");
        assert_eq!(doc.sentences().len(), 2);
    }

    #[test]
    fn test_basic_tags() {
        let doc = annotate("Alice quickly wrote the report because she was busy.");
        assert_eq!(token(&doc, "Alice").pos, PartOfSpeech::ProperNoun);
        assert_eq!(token(&doc, "quickly").pos, PartOfSpeech::Adverb);
        assert_eq!(token(&doc, "wrote").pos, PartOfSpeech::Verb);
        assert_eq!(token(&doc, "the").pos, PartOfSpeech::Determiner);
        assert_eq!(token(&doc, "report").pos, PartOfSpeech::Noun);
        assert_eq!(token(&doc, "because").pos, PartOfSpeech::SubordinatingConjunction);
        assert_eq!(token(&doc, "she").pos, PartOfSpeech::Pronoun);
        assert_eq!(token(&doc, ".").pos, PartOfSpeech::Punctuation);
    }

    #[test]
    fn test_subject_and_object() {
        let doc = annotate("Alice wrote the report.");
        assert_eq!(token(&doc, "wrote").dep, DependencyLabel::Root);
        assert_eq!(token(&doc, "Alice").dep, DependencyLabel::NominalSubject);
        assert_eq!(token(&doc, "report").dep, DependencyLabel::DirectObject);
        assert_eq!(token(&doc, "the").dep, DependencyLabel::Determiner);
    }

    #[test]
    fn test_passive_voice() {
        let doc = annotate("The report was reviewed by the committee.");
        assert_eq!(token(&doc, "reviewed").dep, DependencyLabel::Root);
        assert_eq!(token(&doc, "was").dep, DependencyLabel::PassiveAuxiliary);
        assert_eq!(token(&doc, "report").dep, DependencyLabel::PassiveSubject);
        assert_eq!(token(&doc, "committee").dep, DependencyLabel::PrepositionalObject);
    }

    #[test]
    fn test_relative_and_adverbial_clauses() {
        let doc = annotate("Alice wrote the report which explained the results because she cared.");
        assert_eq!(token(&doc, "explained").dep, DependencyLabel::RelativeClause);
        assert_eq!(token(&doc, "cared").dep, DependencyLabel::AdverbialClause);
    }

    #[test]
    fn test_entities() {
        let doc = annotate("Dr. Jones joined Acme Corp in London in 2021.");
        assert_eq!(token(&doc, "Jones").entity, Some(EntityType::Person));
        assert_eq!(token(&doc, "Acme").entity, Some(EntityType::Organization));
        assert_eq!(token(&doc, "London").entity, Some(EntityType::Location));
        assert_eq!(token(&doc, "2021").entity, Some(EntityType::Date));
    }

    #[test]
    fn test_lemmas() {
        let doc = annotate("The libraries were running.");
        assert_eq!(token(&doc, "libraries").lemma, "library");
        assert_eq!(token(&doc, "were").lemma, "be");
        assert_eq!(token(&doc, "running").lemma, "run");
    }

    #[test]
    fn test_undouble_on_multibyte_stems() {
        assert_eq!(undouble("runn"), "run");
        assert_eq!(undouble("fall"), "fall");
        // 'ለ' is E1 88 88: equal trailing bytes, not a doubled letter
        assert_eq!(undouble("ሀለለ"), "ሀለለ");
        assert_eq!(lemmatize("ሀለለed", PartOfSpeech::Verb), "ሀለለ");
        assert_eq!(lemmatize("ሀለለing", PartOfSpeech::Verb), "ሀለለ");
    }

    #[test]
    fn test_non_ascii_verbs_annotate() {
        for text in ["They ሀለለing the plan.", "The team ሀለለed the release."] {
            let doc = annotate(text);
            assert_eq!(doc.sentences().len(), 1);
            assert!(doc.tokens().iter().all(|t| !t.lemma.is_empty()));
        }
    }

    #[test]
    fn test_contractions() {
        let doc = annotate("We don't know.");
        assert_eq!(token(&doc, "don't").pos, PartOfSpeech::Auxiliary);
    }

    #[test]
    fn test_text_too_long() {
        let annotator = HeuristicAnnotator::with_max_text_length(5);
        let result = annotator.annotate("far too long");
        assert!(matches!(result, Err(AnnotatorError::TextTooLong(12, 5))));
    }

    #[test]
    fn test_empty_text() {
        let doc = annotate("   ");
        assert!(doc.is_empty());
        assert!(doc.sentences().is_empty());
    }
}
