//! Closed-class word lists for heuristic tagging

pub(crate) const PRONOUNS: &[&str] = &[
    "i", "me", "myself", "you", "yourself", "yourselves", "he", "him", "himself", "she",
    "herself", "it", "itself", "we", "us", "ourselves", "they", "them", "themselves", "mine",
    "yours", "hers", "ours", "theirs", "who", "whom", "which", "someone", "something",
    "everyone", "everything", "nobody", "nothing", "anyone", "anything",
];

pub(crate) const POSSESSIVE_PRONOUNS: &[&str] =
    &["my", "your", "his", "her", "its", "our", "their", "whose"];

pub(crate) const RELATIVE_PRONOUNS: &[&str] = &["who", "whom", "which", "whose"];

pub(crate) const DETERMINERS: &[&str] = &[
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "some", "any", "no",
    "all", "both", "either", "neither", "another", "such", "many", "much", "several", "few",
];

pub(crate) const ADPOSITIONS: &[&str] = &[
    "in", "on", "at", "by", "for", "with", "from", "to", "of", "about", "into", "through",
    "over", "under", "between", "among", "during", "before", "after", "against", "within",
    "without", "upon", "via", "per", "across", "toward", "towards", "onto", "like", "near",
    "behind", "beyond", "despite", "throughout",
];

pub(crate) const COORDINATORS: &[&str] = &["and", "or", "but", "nor", "yet", "so"];

pub(crate) const SUBORDINATORS: &[&str] = &[
    "because", "although", "though", "while", "if", "unless", "whereas", "whenever", "once",
    "since", "until", "when", "where",
];

pub(crate) const AUXILIARIES: &[&str] = &[
    "is", "are", "was", "were", "be", "been", "being", "am", "has", "have", "had", "do", "does",
    "did", "will", "would", "shall", "should", "can", "could", "may", "might", "must", "'s",
    "'re", "'ve", "'ll", "'d",
];

pub(crate) const BE_FORMS: &[&str] = &["is", "are", "was", "were", "be", "been", "being", "am"];

pub(crate) const PARTICLES: &[&str] = &["not", "n't"];

pub(crate) const ADVERBS: &[&str] = &[
    "very", "really", "quite", "too", "also", "just", "often", "never", "always", "then",
    "however", "therefore", "moreover", "thus", "hence", "furthermore", "nevertheless",
    "meanwhile", "finally", "first", "next", "later", "soon", "now", "here", "there", "still",
    "already", "again", "indeed", "consequently", "additionally", "instead", "otherwise",
];

pub(crate) const ADJECTIVES: &[&str] = &[
    "good", "bad", "new", "old", "big", "small", "large", "important", "red", "blue", "green",
    "high", "low", "long", "short", "great", "little", "own", "other", "same", "different",
    "early", "late", "young", "clear", "simple", "main", "major", "dark", "cold", "warm",
];

pub(crate) const ADJECTIVE_SUFFIXES: &[&str] = &[
    "able", "ible", "ful", "ous", "ive", "ical", "less", "ish", "ary",
];

pub(crate) const COMMON_VERBS: &[&str] = &[
    "install", "run", "click", "open", "create", "add", "remove", "configure", "select",
    "ensure", "check", "use", "make", "set", "enter", "save", "type", "press", "follow", "read",
    "write", "go", "see", "note", "say", "said", "get", "got", "take", "took", "give", "gave",
    "know", "knew", "think", "thought", "find", "found", "tell", "told", "ask", "work", "seem",
    "feel", "felt", "leave", "left", "call", "deliver", "comply", "provide", "return",
    "walked", "ran", "went", "came", "come", "saw", "looked", "smiled", "wrote", "sent",
    "shall", "download", "restart", "verify", "copy", "paste", "navigate", "choose", "start",
];

pub(crate) const INTERJECTIONS: &[&str] =
    &["oh", "wow", "hey", "ouch", "hmm", "yes", "yeah", "ok", "okay"];

pub(crate) const HONORIFICS: &[&str] = &["mr", "mrs", "ms", "dr", "prof", "sir", "madam", "miss"];

pub(crate) const ORGANIZATION_SUFFIXES: &[&str] = &[
    "inc", "corp", "corporation", "ltd", "llc", "company", "co", "group", "university",
    "institute", "foundation", "agency",
];

pub(crate) const LOCATIONS: &[&str] = &[
    "london", "paris", "berlin", "tokyo", "york", "california", "texas", "europe", "asia",
    "africa", "america", "canada", "china", "india", "germany", "france", "japan", "boston",
    "chicago", "seattle",
];

pub(crate) const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "june", "july", "august", "september",
    "october", "november", "december", "monday", "tuesday", "wednesday", "thursday",
    "friday", "saturday", "sunday",
];

/// Abbreviations whose trailing period does not end a sentence
pub(crate) const ABBREVIATIONS: &[&str] = &[
    "dr", "mr", "mrs", "ms", "prof", "sr", "jr", "inc", "ltd", "corp", "co", "llc", "e.g",
    "i.e", "vs", "etc", "approx", "u.s", "u.k", "p.m", "a.m", "st", "ave", "dept", "fig", "no",
];

pub(crate) fn contains(list: &[&str], word: &str) -> bool {
    list.contains(&word)
}
