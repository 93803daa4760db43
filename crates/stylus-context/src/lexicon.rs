//! Discourse marker and formality indicator word lists

use serde::{Deserialize, Serialize};

/// Rhetorical function of a discourse marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscourseFunction {
    /// moreover, furthermore, in addition
    Addition,
    /// however, nevertheless, on the other hand
    Contrast,
    /// therefore, because, as a result
    Causation,
    /// then, meanwhile, subsequently
    Temporal,
    /// for example, for instance, such as
    Exemplification,
    /// in conclusion, overall, to summarize
    Conclusion,
    /// indeed, in fact, notably
    Emphasis,
}

impl DiscourseFunction {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscourseFunction::Addition => "addition",
            DiscourseFunction::Contrast => "contrast",
            DiscourseFunction::Causation => "causation",
            DiscourseFunction::Temporal => "temporal",
            DiscourseFunction::Exemplification => "exemplification",
            DiscourseFunction::Conclusion => "conclusion",
            DiscourseFunction::Emphasis => "emphasis",
        }
    }
}

/// Kind of formality indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    /// utilize, facilitate, demonstrate
    FormalVerb,
    /// methodology, framework, implementation
    FormalNoun,
    /// with respect to, in accordance with
    AcademicPhrase,
    /// arguably, it appears that
    Hedging,
    /// specifically, precisely, respectively
    Precision,
}

impl IndicatorKind {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            IndicatorKind::FormalVerb => "formal_verb",
            IndicatorKind::FormalNoun => "formal_noun",
            IndicatorKind::AcademicPhrase => "academic_phrase",
            IndicatorKind::Hedging => "hedging",
            IndicatorKind::Precision => "precision",
        }
    }
}

pub(crate) const DISCOURSE_MARKERS: &[(DiscourseFunction, &[&str])] = &[
    (
        DiscourseFunction::Addition,
        &[
            "moreover", "furthermore", "additionally", "in addition", "besides", "likewise",
            "similarly", "also",
        ],
    ),
    (
        DiscourseFunction::Contrast,
        &[
            "however", "nevertheless", "nonetheless", "on the other hand", "conversely", "although",
            "whereas", "in contrast", "yet",
        ],
    ),
    (
        DiscourseFunction::Causation,
        &[
            "therefore", "thus", "hence", "consequently", "accordingly", "as a result", "because",
            "since",
        ],
    ),
    (
        DiscourseFunction::Temporal,
        &[
            "then", "meanwhile", "subsequently", "afterwards", "previously", "eventually",
            "finally", "first", "next",
        ],
    ),
    (
        DiscourseFunction::Exemplification,
        &["for example", "for instance", "such as", "namely", "e.g.", "to illustrate"],
    ),
    (
        DiscourseFunction::Conclusion,
        &["in conclusion", "overall", "to summarize", "in summary", "ultimately", "in short"],
    ),
    (
        DiscourseFunction::Emphasis,
        &["indeed", "in fact", "notably", "importantly", "certainly", "above all"],
    ),
];

pub(crate) const FORMALITY_INDICATORS: &[(IndicatorKind, &[&str])] = &[
    (
        IndicatorKind::FormalVerb,
        &[
            "utilize", "facilitate", "demonstrate", "constitute", "ascertain", "endeavor",
            "commence", "obtain", "indicate",
        ],
    ),
    (
        IndicatorKind::FormalNoun,
        &[
            "methodology", "framework", "implementation", "analysis", "hypothesis", "paradigm",
            "criteria", "assessment",
        ],
    ),
    (
        IndicatorKind::AcademicPhrase,
        &[
            "with respect to", "in accordance with", "it is evident that", "in terms of",
            "with regard to", "the extent to which",
        ],
    ),
    (
        IndicatorKind::Hedging,
        &[
            "arguably", "it appears that", "it seems that", "presumably", "to some extent",
            "potentially", "may suggest",
        ],
    ),
    (
        IndicatorKind::Precision,
        &[
            "specifically", "precisely", "respectively", "approximately", "in particular",
            "exclusively",
        ],
    ),
];

/// Whether `phrase` occurs in `haystack` (both lowercase) on word boundaries
pub(crate) fn contains_phrase(haystack: &str, phrase: &str) -> bool {
    haystack.match_indices(phrase).any(|(start, _)| {
        let end = start + phrase.len();
        let before_ok = haystack[..start]
            .chars()
            .next_back()
            .map_or(true, |c| !c.is_alphanumeric());
        let after_ok = haystack[end..]
            .chars()
            .next()
            .map_or(true, |c| !c.is_alphanumeric());
        before_ok && after_ok
    })
}

/// Third-person pronoun classes used for agreement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PronounClass {
    Neuter,
    Masculine,
    Feminine,
    Plural,
}

impl PronounClass {
    /// Classify a resolvable pronoun; first and second person return `None`
    pub(crate) fn from_text(text: &str) -> Option<Self> {
        let class = match text.to_lowercase().as_str() {
            "it" | "its" | "itself" => PronounClass::Neuter,
            "he" | "him" | "his" | "himself" => PronounClass::Masculine,
            "she" | "her" | "hers" | "herself" => PronounClass::Feminine,
            "they" | "them" | "their" | "theirs" | "themselves" => PronounClass::Plural,
            _ => return None,
        };
        Some(class)
    }

    pub(crate) fn is_possessive(text: &str) -> bool {
        matches!(
            text.to_lowercase().as_str(),
            "its" | "his" | "her" | "hers" | "their" | "theirs"
        )
    }
}
