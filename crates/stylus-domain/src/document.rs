//! Annotated document model
//!
//! The core never tokenizes or tags text itself. It consumes an
//! [`AnnotatedDocument`] produced by a [`crate::DocumentAnnotator`].

use std::fmt;

/// Coarse part-of-speech tag (Universal Dependencies style)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    /// Common noun
    Noun,
    /// Proper noun
    ProperNoun,
    /// Pronoun
    Pronoun,
    /// Main verb
    Verb,
    /// Auxiliary verb (is, has, will, ...)
    Auxiliary,
    /// Adjective
    Adjective,
    /// Adverb
    Adverb,
    /// Preposition or postposition
    Adposition,
    /// Determiner
    Determiner,
    /// Coordinating conjunction (and, or, but)
    CoordinatingConjunction,
    /// Subordinating conjunction (because, although, if)
    SubordinatingConjunction,
    /// Number
    Numeral,
    /// Particle (to, not)
    Particle,
    /// Interjection
    Interjection,
    /// Punctuation
    Punctuation,
    /// Symbol
    Symbol,
    /// Anything else
    Other,
}

impl PartOfSpeech {
    /// Get the tag as a Universal Dependencies string
    pub fn as_str(&self) -> &'static str {
        match self {
            PartOfSpeech::Noun => "NOUN",
            PartOfSpeech::ProperNoun => "PROPN",
            PartOfSpeech::Pronoun => "PRON",
            PartOfSpeech::Verb => "VERB",
            PartOfSpeech::Auxiliary => "AUX",
            PartOfSpeech::Adjective => "ADJ",
            PartOfSpeech::Adverb => "ADV",
            PartOfSpeech::Adposition => "ADP",
            PartOfSpeech::Determiner => "DET",
            PartOfSpeech::CoordinatingConjunction => "CCONJ",
            PartOfSpeech::SubordinatingConjunction => "SCONJ",
            PartOfSpeech::Numeral => "NUM",
            PartOfSpeech::Particle => "PART",
            PartOfSpeech::Interjection => "INTJ",
            PartOfSpeech::Punctuation => "PUNCT",
            PartOfSpeech::Symbol => "SYM",
            PartOfSpeech::Other => "X",
        }
    }

    /// Parse a Universal Dependencies tag
    pub fn parse(s: &str) -> Option<Self> {
        let pos = match s.to_uppercase().as_str() {
            "NOUN" => PartOfSpeech::Noun,
            "PROPN" => PartOfSpeech::ProperNoun,
            "PRON" => PartOfSpeech::Pronoun,
            "VERB" => PartOfSpeech::Verb,
            "AUX" => PartOfSpeech::Auxiliary,
            "ADJ" => PartOfSpeech::Adjective,
            "ADV" => PartOfSpeech::Adverb,
            "ADP" => PartOfSpeech::Adposition,
            "DET" => PartOfSpeech::Determiner,
            "CCONJ" | "CONJ" => PartOfSpeech::CoordinatingConjunction,
            "SCONJ" => PartOfSpeech::SubordinatingConjunction,
            "NUM" => PartOfSpeech::Numeral,
            "PART" => PartOfSpeech::Particle,
            "INTJ" => PartOfSpeech::Interjection,
            "PUNCT" => PartOfSpeech::Punctuation,
            "SYM" => PartOfSpeech::Symbol,
            "X" => PartOfSpeech::Other,
            _ => return None,
        };
        Some(pos)
    }

    /// Nouns and proper nouns: the candidates for antecedents and entities
    pub fn is_nominal(&self) -> bool {
        matches!(self, PartOfSpeech::Noun | PartOfSpeech::ProperNoun)
    }

    /// Verbs and auxiliaries
    pub fn is_verbal(&self) -> bool {
        matches!(self, PartOfSpeech::Verb | PartOfSpeech::Auxiliary)
    }
}

/// Syntactic dependency relation to the head token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyLabel {
    /// Sentence root
    Root,
    /// Nominal subject
    NominalSubject,
    /// Passive nominal subject
    PassiveSubject,
    /// Direct object
    DirectObject,
    /// Indirect object
    IndirectObject,
    /// Determiner
    Determiner,
    /// Adjectival modifier
    AdjectivalModifier,
    /// Adverbial modifier
    AdverbialModifier,
    /// Prepositional modifier
    Preposition,
    /// Object of a preposition
    PrepositionalObject,
    /// Adverbial clause modifier
    AdverbialClause,
    /// Relative clause modifier
    RelativeClause,
    /// Clausal complement
    ClausalComplement,
    /// Conjunct
    Conjunct,
    /// Coordinating conjunction
    CoordinatingConjunction,
    /// Auxiliary
    Auxiliary,
    /// Passive auxiliary
    PassiveAuxiliary,
    /// Clause marker (subordinating conjunction)
    Marker,
    /// Compound modifier
    Compound,
    /// Possessive modifier
    Possessive,
    /// Punctuation
    Punctuation,
    /// Unclassified dependency
    Other,
}

impl DependencyLabel {
    /// Get the label in spaCy/ClearNLP notation
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyLabel::Root => "ROOT",
            DependencyLabel::NominalSubject => "nsubj",
            DependencyLabel::PassiveSubject => "nsubjpass",
            DependencyLabel::DirectObject => "dobj",
            DependencyLabel::IndirectObject => "iobj",
            DependencyLabel::Determiner => "det",
            DependencyLabel::AdjectivalModifier => "amod",
            DependencyLabel::AdverbialModifier => "advmod",
            DependencyLabel::Preposition => "prep",
            DependencyLabel::PrepositionalObject => "pobj",
            DependencyLabel::AdverbialClause => "advcl",
            DependencyLabel::RelativeClause => "relcl",
            DependencyLabel::ClausalComplement => "ccomp",
            DependencyLabel::Conjunct => "conj",
            DependencyLabel::CoordinatingConjunction => "cc",
            DependencyLabel::Auxiliary => "aux",
            DependencyLabel::PassiveAuxiliary => "auxpass",
            DependencyLabel::Marker => "mark",
            DependencyLabel::Compound => "compound",
            DependencyLabel::Possessive => "poss",
            DependencyLabel::Punctuation => "punct",
            DependencyLabel::Other => "dep",
        }
    }

    /// Parse a spaCy/ClearNLP label; unknown labels map to [`DependencyLabel::Other`]
    pub fn parse(s: &str) -> Self {
        match s {
            "ROOT" | "root" => DependencyLabel::Root,
            "nsubj" => DependencyLabel::NominalSubject,
            "nsubjpass" | "nsubj:pass" => DependencyLabel::PassiveSubject,
            "dobj" | "obj" => DependencyLabel::DirectObject,
            "iobj" | "dative" => DependencyLabel::IndirectObject,
            "det" => DependencyLabel::Determiner,
            "amod" => DependencyLabel::AdjectivalModifier,
            "advmod" => DependencyLabel::AdverbialModifier,
            "prep" => DependencyLabel::Preposition,
            "pobj" => DependencyLabel::PrepositionalObject,
            "advcl" => DependencyLabel::AdverbialClause,
            "relcl" | "acl:relcl" => DependencyLabel::RelativeClause,
            "ccomp" | "xcomp" => DependencyLabel::ClausalComplement,
            "conj" => DependencyLabel::Conjunct,
            "cc" => DependencyLabel::CoordinatingConjunction,
            "aux" => DependencyLabel::Auxiliary,
            "auxpass" | "aux:pass" => DependencyLabel::PassiveAuxiliary,
            "mark" => DependencyLabel::Marker,
            "compound" => DependencyLabel::Compound,
            "poss" => DependencyLabel::Possessive,
            "punct" => DependencyLabel::Punctuation,
            _ => DependencyLabel::Other,
        }
    }

    /// Subject relations (active or passive)
    pub fn is_subject(&self) -> bool {
        matches!(
            self,
            DependencyLabel::NominalSubject | DependencyLabel::PassiveSubject
        )
    }

    /// Object relations
    pub fn is_object(&self) -> bool {
        matches!(
            self,
            DependencyLabel::DirectObject
                | DependencyLabel::IndirectObject
                | DependencyLabel::PrepositionalObject
        )
    }

    /// Adverbial and relative clause dependents
    pub fn is_subordinate_clause(&self) -> bool {
        matches!(
            self,
            DependencyLabel::AdverbialClause | DependencyLabel::RelativeClause
        )
    }
}

impl fmt::Display for DependencyLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named-entity type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityType {
    /// People, including fictional
    Person,
    /// Companies, agencies, institutions
    Organization,
    /// Countries, cities, geographic locations
    Location,
    /// Absolute or relative dates
    Date,
    /// Any other entity
    Other,
}

/// A single annotated token
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// Surface text
    pub text: String,
    /// Lemma (lowercased base form)
    pub lemma: String,
    /// Coarse part of speech
    pub pos: PartOfSpeech,
    /// Dependency relation to `head`
    pub dep: DependencyLabel,
    /// Index of the syntactic head; a root points at itself
    pub head: usize,
    /// Named-entity type, if any
    pub entity: Option<EntityType>,
    /// Byte offset of the first byte in the document text
    pub start: usize,
    /// Byte offset one past the last byte
    pub end: usize,
    /// Index of the sentence that contains this token
    pub sentence: usize,
}

impl Token {
    /// Create a token with neutral annotations
    ///
    /// The lemma defaults to the lowercased text and the token is its own head.
    pub fn new(text: impl Into<String>, start: usize, sentence: usize, index: usize) -> Self {
        let text = text.into();
        let end = start + text.len();
        Self {
            lemma: text.to_lowercase(),
            text,
            pos: PartOfSpeech::Other,
            dep: DependencyLabel::Other,
            head: index,
            entity: None,
            start,
            end,
            sentence,
        }
    }

    /// Builder: set the part of speech
    pub fn with_pos(mut self, pos: PartOfSpeech) -> Self {
        self.pos = pos;
        self
    }

    /// Builder: set the dependency label and head
    pub fn with_dep(mut self, dep: DependencyLabel, head: usize) -> Self {
        self.dep = dep;
        self.head = head;
        self
    }

    /// Builder: set the lemma
    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = lemma.into();
        self
    }

    /// Builder: set the entity type
    pub fn with_entity(mut self, entity: EntityType) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Lowercased surface text
    pub fn lower(&self) -> String {
        self.text.to_lowercase()
    }

    /// Whether the token is punctuation
    pub fn is_punct(&self) -> bool {
        self.pos == PartOfSpeech::Punctuation
    }
}

/// A contiguous sentence inside a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentenceSpan {
    /// Sentence index
    pub index: usize,
    /// First token index
    pub start_token: usize,
    /// One past the last token index
    pub end_token: usize,
    /// Byte offset of the first token
    pub start: usize,
    /// Byte offset one past the last token
    pub end: usize,
}

impl SentenceSpan {
    /// Number of tokens in the sentence
    pub fn token_count(&self) -> usize {
        self.end_token - self.start_token
    }

    /// Whether the byte offset falls inside the sentence
    pub fn contains_offset(&self, offset: usize) -> bool {
        offset >= self.start && offset < self.end
    }
}

/// A document annotated by an external NLP pipeline
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnnotatedDocument {
    text: String,
    tokens: Vec<Token>,
    sentences: Vec<SentenceSpan>,
}

impl AnnotatedDocument {
    /// Create a document from text and tokens
    ///
    /// Sentence spans are derived from consecutive runs of equal
    /// `Token::sentence` values; spans are renumbered in document order.
    pub fn new(text: impl Into<String>, mut tokens: Vec<Token>) -> Self {
        let mut sentences: Vec<SentenceSpan> = Vec::new();
        let mut current: Option<usize> = None;

        for idx in 0..tokens.len() {
            let raw_sentence = tokens[idx].sentence;
            if current != Some(raw_sentence) {
                current = Some(raw_sentence);
                sentences.push(SentenceSpan {
                    index: sentences.len(),
                    start_token: idx,
                    end_token: idx + 1,
                    start: tokens[idx].start,
                    end: tokens[idx].end,
                });
            }
            if let Some(span) = sentences.last_mut() {
                span.end_token = idx + 1;
                span.end = span.end.max(tokens[idx].end);
                tokens[idx].sentence = span.index;
            }
        }

        Self {
            text: text.into(),
            tokens,
            sentences,
        }
    }

    /// A document with text but no annotations
    pub fn empty(text: impl Into<String>) -> Self {
        Self::new(text, Vec::new())
    }

    /// The original text
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All tokens in document order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Sentence spans in document order
    pub fn sentences(&self) -> &[SentenceSpan] {
        &self.sentences
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the document has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Tokens of a sentence
    pub fn sentence_tokens(&self, sentence: &SentenceSpan) -> &[Token] {
        let end = sentence.end_token.min(self.tokens.len());
        let start = sentence.start_token.min(end);
        &self.tokens[start..end]
    }

    /// Index of the token at a byte offset
    ///
    /// Offsets between tokens resolve to the next token; offsets past the
    /// end resolve to the last token.
    pub fn token_index_at(&self, offset: usize) -> Option<usize> {
        if self.tokens.is_empty() {
            return None;
        }
        let next = self.tokens.iter().position(|t| t.end > offset);
        Some(next.unwrap_or(self.tokens.len() - 1))
    }

    /// Sentence containing a byte offset
    ///
    /// Out-of-range offsets degrade to the nearest sentence boundary.
    pub fn sentence_for_offset(&self, offset: usize) -> Option<&SentenceSpan> {
        if let Some(span) = self.sentences.iter().find(|s| s.contains_offset(offset)) {
            return Some(span);
        }
        self.sentences.iter().min_by_key(|s| {
            if offset < s.start {
                s.start - offset
            } else {
                offset.saturating_sub(s.end)
            }
        })
    }

    /// Depth of a token in the dependency tree (root = 0)
    ///
    /// Malformed head links (out of range or cyclic) stop the walk.
    pub fn dependency_depth(&self, index: usize) -> usize {
        let mut depth = 0;
        let mut current = index;
        while let Some(token) = self.tokens.get(current) {
            if token.head == current || token.head >= self.tokens.len() {
                break;
            }
            depth += 1;
            if depth > self.tokens.len() {
                break;
            }
            current = token.head;
        }
        depth
    }

    /// Maximum dependency depth within a sentence
    pub fn max_dependency_depth(&self, sentence: &SentenceSpan) -> usize {
        (sentence.start_token..sentence.end_token.min(self.tokens.len()))
            .map(|idx| self.dependency_depth(idx))
            .max()
            .unwrap_or(0)
    }
}

/// Convert a character offset into a byte offset, clamped to the text
pub fn char_to_byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(byte, _)| byte)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AnnotatedDocument {
        // "Alice runs. She smiles."
        let tokens = vec![
            Token::new("Alice", 0, 0, 0)
                .with_pos(PartOfSpeech::ProperNoun)
                .with_dep(DependencyLabel::NominalSubject, 1),
            Token::new("runs", 6, 0, 1)
                .with_pos(PartOfSpeech::Verb)
                .with_dep(DependencyLabel::Root, 1),
            Token::new(".", 10, 0, 2)
                .with_pos(PartOfSpeech::Punctuation)
                .with_dep(DependencyLabel::Punctuation, 1),
            Token::new("She", 12, 1, 3)
                .with_pos(PartOfSpeech::Pronoun)
                .with_dep(DependencyLabel::NominalSubject, 4),
            Token::new("smiles", 16, 1, 4)
                .with_pos(PartOfSpeech::Verb)
                .with_dep(DependencyLabel::Root, 4),
            Token::new(".", 22, 1, 5)
                .with_pos(PartOfSpeech::Punctuation)
                .with_dep(DependencyLabel::Punctuation, 4),
        ];
        AnnotatedDocument::new("Alice runs. She smiles.", tokens)
    }

    #[test]
    fn test_sentence_spans() {
        let doc = sample();
        assert_eq!(doc.sentences().len(), 2);
        assert_eq!(doc.sentences()[0].token_count(), 3);
        assert_eq!(doc.sentences()[1].start, 12);
        assert_eq!(doc.sentences()[1].end, 23);
    }

    #[test]
    fn test_sentence_for_offset_out_of_range() {
        let doc = sample();
        assert_eq!(doc.sentence_for_offset(13).map(|s| s.index), Some(1));
        // Past the end degrades to the last sentence
        assert_eq!(doc.sentence_for_offset(500).map(|s| s.index), Some(1));
        // Gap between sentences resolves to the nearest one
        assert_eq!(doc.sentence_for_offset(11).map(|s| s.index), Some(0));
    }

    #[test]
    fn test_token_index_at() {
        let doc = sample();
        assert_eq!(doc.token_index_at(0), Some(0));
        assert_eq!(doc.token_index_at(7), Some(1));
        assert_eq!(doc.token_index_at(11), Some(3));
        assert_eq!(doc.token_index_at(1000), Some(5));
        assert_eq!(AnnotatedDocument::empty("x").token_index_at(0), None);
    }

    #[test]
    fn test_dependency_depth() {
        let doc = sample();
        assert_eq!(doc.dependency_depth(1), 0);
        assert_eq!(doc.dependency_depth(0), 1);
        assert_eq!(doc.max_dependency_depth(&doc.sentences()[0]), 1);
    }

    #[test]
    fn test_dependency_depth_cycle_terminates() {
        let tokens = vec![
            Token::new("a", 0, 0, 0).with_dep(DependencyLabel::Other, 1),
            Token::new("b", 2, 0, 1).with_dep(DependencyLabel::Other, 0),
        ];
        let doc = AnnotatedDocument::new("a b", tokens);
        assert!(doc.dependency_depth(0) <= 3);
    }

    #[test]
    fn test_char_to_byte_offset() {
        assert_eq!(char_to_byte_offset("héllo", 2), 3);
        assert_eq!(char_to_byte_offset("abc", 10), 3);
    }

    #[test]
    fn test_pos_round_trip_names() {
        assert_eq!(PartOfSpeech::parse("propn"), Some(PartOfSpeech::ProperNoun));
        assert_eq!(PartOfSpeech::ProperNoun.as_str(), "PROPN");
        assert_eq!(DependencyLabel::parse("acl:relcl"), DependencyLabel::RelativeClause);
        assert!(DependencyLabel::parse("advcl").is_subordinate_clause());
    }
}
