//! Classification labels - the three axes describing a passage

/// Structural genre of a passage
///
/// There is exactly one canonical content-type classification in the
/// workspace (produced by the domain classifier). `General` is the fallback
/// when no genre signal is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContentType {
    /// Reference or explanatory technical prose
    Technical,
    /// Story-like prose
    Narrative,
    /// Step-by-step instructions
    Procedural,
    /// No dominant genre
    General,
}

impl ContentType {
    /// All labels that can win a classification
    pub const CANDIDATES: [ContentType; 3] = [
        ContentType::Technical,
        ContentType::Narrative,
        ContentType::Procedural,
    ];

    /// Get the label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Technical => "technical",
            ContentType::Narrative => "narrative",
            ContentType::Procedural => "procedural",
            ContentType::General => "general",
        }
    }

    /// Parse a label from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "technical" => Some(ContentType::Technical),
            "narrative" => Some(ContentType::Narrative),
            "procedural" => Some(ContentType::Procedural),
            "general" => Some(ContentType::General),
            _ => None,
        }
    }
}

impl std::str::FromStr for ContentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid content type: {}", s))
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subject-matter field of a passage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SubjectDomain {
    /// Software and programming
    Programming,
    /// Medicine and health
    Medical,
    /// Law and contracts
    Legal,
    /// Business and finance
    Business,
    /// Scholarly writing
    Academic,
    /// Fiction and creative writing
    Creative,
    /// No specific field
    General,
}

impl SubjectDomain {
    /// All labels that can win a classification
    pub const CANDIDATES: [SubjectDomain; 6] = [
        SubjectDomain::Programming,
        SubjectDomain::Medical,
        SubjectDomain::Legal,
        SubjectDomain::Business,
        SubjectDomain::Academic,
        SubjectDomain::Creative,
    ];

    /// Get the label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectDomain::Programming => "programming",
            SubjectDomain::Medical => "medical",
            SubjectDomain::Legal => "legal",
            SubjectDomain::Business => "business",
            SubjectDomain::Academic => "academic",
            SubjectDomain::Creative => "creative",
            SubjectDomain::General => "general",
        }
    }

    /// Parse a label from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "programming" => Some(SubjectDomain::Programming),
            "medical" => Some(SubjectDomain::Medical),
            "legal" => Some(SubjectDomain::Legal),
            "business" => Some(SubjectDomain::Business),
            "academic" => Some(SubjectDomain::Academic),
            "creative" => Some(SubjectDomain::Creative),
            "general" => Some(SubjectDomain::General),
            _ => None,
        }
    }
}

impl std::str::FromStr for SubjectDomain {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid subject domain: {}", s))
    }
}

impl std::fmt::Display for SubjectDomain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Register of a passage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormalityLevel {
    /// Score above 0.65
    Formal,
    /// Score between 0.35 and 0.65
    Neutral,
    /// Score below 0.35
    Informal,
}

impl FormalityLevel {
    /// Bucket a formality score in [0, 1]
    pub fn from_score(score: f64) -> Self {
        if score > 0.65 {
            FormalityLevel::Formal
        } else if score < 0.35 {
            FormalityLevel::Informal
        } else {
            FormalityLevel::Neutral
        }
    }

    /// Get the label as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            FormalityLevel::Formal => "formal",
            FormalityLevel::Neutral => "neutral",
            FormalityLevel::Informal => "informal",
        }
    }
}

impl std::fmt::Display for FormalityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_parse() {
        assert_eq!(ContentType::parse(" Technical "), Some(ContentType::Technical));
        assert_eq!("procedural".parse::<ContentType>(), Ok(ContentType::Procedural));
        assert!("poetry".parse::<ContentType>().is_err());
    }

    #[test]
    fn test_subject_domain_names() {
        for domain in SubjectDomain::CANDIDATES {
            assert_eq!(SubjectDomain::parse(domain.as_str()), Some(domain));
        }
    }

    #[test]
    fn test_formality_buckets() {
        assert_eq!(FormalityLevel::from_score(0.9), FormalityLevel::Formal);
        assert_eq!(FormalityLevel::from_score(0.65), FormalityLevel::Neutral);
        assert_eq!(FormalityLevel::from_score(0.35), FormalityLevel::Neutral);
        assert_eq!(FormalityLevel::from_score(0.1), FormalityLevel::Informal);
    }
}
