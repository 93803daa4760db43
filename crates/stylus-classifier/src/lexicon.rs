//! Built-in keyword and pattern tables

use stylus_domain::{ContentType, SubjectDomain};

/// Keywords (lowercase single words) and regex patterns for one label
pub(crate) struct Signals<L: 'static> {
    pub label: L,
    pub keywords: &'static [&'static str],
    pub patterns: &'static [&'static str],
}

pub(crate) const CONTENT_TYPE_SIGNALS: &[Signals<ContentType>] = &[
    Signals {
        label: ContentType::Technical,
        keywords: &[
            "function", "parameter", "configuration", "server", "database", "api", "algorithm",
            "module", "interface", "protocol", "implementation", "variable", "compile", "deploy",
            "library", "latency", "endpoint", "query", "cache", "thread", "memory", "request",
        ],
        patterns: &[
            r"\b[A-Za-z_][A-Za-z0-9_]*\(\)",
            r"`[^`]+`",
            r"(?i)\b\d+(\.\d+)?\s?(ms|kb|mb|gb|tb|ghz|mhz)\b",
            r"\bv?\d+\.\d+(\.\d+)?\b",
            r"\b[A-Z]{2,5}s?\b",
        ],
    },
    Signals {
        label: ContentType::Narrative,
        keywords: &[
            "said", "walked", "looked", "felt", "remembered", "smiled", "suddenly", "night",
            "morning", "heart", "whispered", "eyes", "room", "door", "home", "never", "ago",
            "laughed", "turned", "knew",
        ],
        patterns: &[
            r#""[^"]{2,}""#,
            r"(?i)\b(he|she|they|i) (said|asked|replied|whispered|shouted)\b",
            r"(?i)\b(once upon a time|years ago|that night|the next day|long ago)\b",
        ],
    },
    Signals {
        label: ContentType::Procedural,
        keywords: &[
            "step", "first", "next", "then", "finally", "click", "select", "enter", "install",
            "run", "open", "press", "ensure", "follow", "configure", "choose", "repeat", "save",
        ],
        patterns: &[
            r"(?m)^\s*\d+[.)]\s",
            r"(?m)^\s*[-*•]\s",
            r"(?i)\b(step \d+|make sure|be sure to|in order to|before you begin)\b",
            r"(?im)^\s*(click|select|open|run|enter|type|press|go to|install)\b",
        ],
    },
];

pub(crate) const DOMAIN_SIGNALS: &[Signals<SubjectDomain>] = &[
    Signals {
        label: SubjectDomain::Programming,
        keywords: &[
            "code", "function", "variable", "compiler", "debug", "repository", "commit", "api",
            "runtime", "syntax", "library", "framework", "class", "method", "bug", "deploy",
            "git", "rust", "python", "javascript", "struct", "crate",
        ],
        patterns: &[
            r"\b[A-Za-z_][A-Za-z0-9_]*\(\)",
            r"`[^`]+`",
            r"\b(fn|def|class|import|return|const|let|pub)\s+[A-Za-z_]",
            r"(?i)\b(pull request|stack trace|null pointer|unit tests?)\b",
        ],
    },
    Signals {
        label: SubjectDomain::Medical,
        keywords: &[
            "patient", "patients", "diagnosis", "treatment", "symptom", "symptoms", "clinical",
            "dose", "therapy", "physician", "disease", "chronic", "acute", "prescription",
            "hospital", "surgery", "medication", "dosage",
        ],
        patterns: &[
            r"(?i)\b\d+\s?(mg|ml|mcg|mmhg)\b",
            r"(?i)\b(clinical trials?|side effects?|blood pressure|heart rate)\b",
            r"(?i)\b[a-z]+itis\b",
        ],
    },
    Signals {
        label: SubjectDomain::Legal,
        keywords: &[
            "plaintiff", "defendant", "court", "statute", "contract", "liability", "hereby",
            "whereas", "pursuant", "jurisdiction", "clause", "breach", "tort", "counsel",
            "agreement", "herein", "party", "parties", "shall",
        ],
        patterns: &[
            r"§\s?\d+",
            r"(?i)\b(pursuant to|in accordance with|notwithstanding|the parties agree)\b",
            r"\b\d+\s+U\.S\.C\.",
            r"\bv\.\s+[A-Z]",
        ],
    },
    Signals {
        label: SubjectDomain::Business,
        keywords: &[
            "revenue", "market", "customer", "customers", "strategy", "stakeholder", "profit",
            "quarter", "investment", "growth", "budget", "sales", "roi", "kpi", "margin",
            "shareholder", "shareholders", "quarterly",
        ],
        patterns: &[
            r"\$\s?\d[\d,]*(\.\d+)?\s?(k|m|million|billion)?\b",
            r"\bQ[1-4]\b",
            r"\b\d+(\.\d+)?%",
        ],
    },
    Signals {
        label: SubjectDomain::Academic,
        keywords: &[
            "hypothesis", "research", "study", "analysis", "methodology", "findings",
            "literature", "theory", "empirical", "significant", "participants", "data",
            "evidence", "journal", "abstract", "scholars",
        ],
        patterns: &[
            r"\([A-Z][A-Za-z]+( et al\.)?,? \d{4}\)",
            r"\bet al\.",
            r"\bp\s?[<=]\s?0?\.\d+",
        ],
    },
    Signals {
        label: SubjectDomain::Creative,
        keywords: &[
            "story", "character", "poem", "imagine", "dream", "whispered", "silence", "shadow",
            "heart", "soul", "moonlight", "wandered", "mystery", "magic", "beauty", "stars",
        ],
        patterns: &[
            r#""[^"]{2,}""#,
            r"(?i)\bonce upon a time\b",
            r"(?i)\b(like a|as if)\b",
        ],
    },
];

/// Default confidence modifier per subject domain
pub(crate) const DOMAIN_BASE_MODIFIERS: &[(SubjectDomain, f64)] = &[
    (SubjectDomain::Programming, 0.05),
    (SubjectDomain::Medical, 0.06),
    (SubjectDomain::Legal, 0.07),
    (SubjectDomain::Business, 0.03),
    (SubjectDomain::Academic, 0.06),
    (SubjectDomain::Creative, -0.05),
    (SubjectDomain::General, 0.0),
];

pub(crate) const FORMAL_MARKERS: &[&str] = &[
    "therefore", "furthermore", "moreover", "consequently", "nevertheless", "thus", "hence",
    "whereby", "herein", "utilize", "facilitate", "demonstrate", "regarding", "subsequently",
    "accordingly", "notwithstanding", "shall", "pursuant", "wherein", "thereby",
];

pub(crate) const INFORMAL_MARKERS: &[&str] = &[
    "gonna", "wanna", "gotta", "kinda", "sorta", "yeah", "yep", "nope", "ok", "okay", "cool",
    "awesome", "stuff", "guys", "lol", "btw", "hey", "wow", "basically", "totally", "super",
];

/// Contractions, excluding possessive `'s` on ordinary nouns
pub(crate) const CONTRACTION_PATTERN: &str =
    r"(?i)\b[a-z]+(n't|'re|'ve|'ll|'m|'d)\b|\b(it|that|there|here|what|who|he|she|let)'s\b";

/// Lowercase words of a text, apostrophes and hyphens kept inside words
pub(crate) fn words(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .map(|w| w.trim_matches(|c| c == '\'' || c == '-'))
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
}
