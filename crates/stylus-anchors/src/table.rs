//! Compiled anchor table

use regex::Regex;
use std::collections::{BTreeMap, HashMap};

use stylus_domain::ContentType;

use crate::{AnchorConfig, AnchorError, AnchorSettings, AnchorType, MultiplierTable};

/// A pattern and its compiled form
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Source text of the pattern
    pub source: String,
    /// Compiled regex
    pub regex: Regex,
}

/// An anchor ready for matching
#[derive(Debug, Clone)]
pub struct CompiledAnchor {
    /// Boosting or reducing
    pub anchor_type: AnchorType,
    /// Category
    pub category: String,
    /// Name
    pub name: String,
    /// Compiled patterns, in declaration order
    pub patterns: Vec<CompiledPattern>,
    /// Base effect
    pub effect: f64,
    /// Maximum word distance (0 = exact offset only)
    pub context_window: usize,
    /// Description
    pub description: String,
}

impl CompiledAnchor {
    /// `category/name`
    pub fn id(&self) -> String {
        format!("{}/{}", self.category, self.name)
    }

    fn multiplier_from(&self, entries: Option<&BTreeMap<String, f64>>) -> f64 {
        let Some(entries) = entries else {
            return 1.0;
        };
        let specific = format!("{}.{}", self.category, self.name);
        entries
            .get(&specific)
            .or_else(|| entries.get(&self.category))
            .copied()
            .unwrap_or(1.0)
    }
}

/// Flat, strongly typed anchor table
///
/// Built once from an [`AnchorConfig`]; every regex is compiled up front so
/// analysis never parses pattern strings.
#[derive(Debug, Clone)]
pub struct AnchorTable {
    settings: AnchorSettings,
    anchors: Vec<CompiledAnchor>,
    index: HashMap<(AnchorType, String, String), usize>,
    rule_multipliers: MultiplierTable,
    content_multipliers: BTreeMap<ContentType, BTreeMap<String, f64>>,
}

impl AnchorTable {
    /// Validate and compile a configuration
    pub fn compile(config: &AnchorConfig) -> Result<Self, AnchorError> {
        config.validate()?;

        let mut anchors = Vec::with_capacity(config.anchors.len());
        let mut index = HashMap::new();
        for spec in &config.anchors {
            let mut patterns = Vec::with_capacity(spec.patterns.len());
            for source in &spec.patterns {
                let regex = Regex::new(source).map_err(|e| AnchorError::InvalidPattern {
                    anchor: spec.id(),
                    pattern: source.clone(),
                    message: e.to_string(),
                })?;
                patterns.push(CompiledPattern {
                    source: source.clone(),
                    regex,
                });
            }
            index.insert(
                (spec.anchor_type, spec.category.clone(), spec.name.clone()),
                anchors.len(),
            );
            anchors.push(CompiledAnchor {
                anchor_type: spec.anchor_type,
                category: spec.category.clone(),
                name: spec.name.clone(),
                patterns,
                effect: spec.effect,
                context_window: spec
                    .context_window
                    .unwrap_or(config.settings.default_context_window),
                description: spec.description.clone(),
            });
        }

        let mut content_multipliers = BTreeMap::new();
        for (key, entries) in &config.content_multipliers {
            let content_type = ContentType::parse(key)
                .ok_or_else(|| AnchorError::UnknownMultiplierKey(key.clone()))?;
            content_multipliers.insert(content_type, entries.clone());
        }

        Ok(Self {
            settings: config.settings.clone(),
            anchors,
            index,
            rule_multipliers: config.rule_multipliers.clone(),
            content_multipliers,
        })
    }

    /// Global settings
    pub fn settings(&self) -> &AnchorSettings {
        &self.settings
    }

    /// All anchors in declaration order
    pub fn anchors(&self) -> &[CompiledAnchor] {
        &self.anchors
    }

    /// Look up one anchor
    pub fn get(
        &self,
        anchor_type: AnchorType,
        category: &str,
        name: &str,
    ) -> Option<&CompiledAnchor> {
        self.index
            .get(&(anchor_type, category.to_string(), name.to_string()))
            .map(|&i| &self.anchors[i])
    }

    /// Anchors of one type
    pub fn by_type(&self, anchor_type: AnchorType) -> impl Iterator<Item = &CompiledAnchor> {
        self.anchors.iter().filter(move |a| a.anchor_type == anchor_type)
    }

    /// Number of anchors
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// True when the table has no anchors
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Number of compiled patterns
    pub fn pattern_count(&self) -> usize {
        self.anchors.iter().map(|a| a.patterns.len()).sum()
    }

    /// Combined rule-type and content-type multiplier for an anchor
    ///
    /// A `category.name` entry takes precedence over a `category` entry;
    /// missing entries count as 1.0.
    pub fn multiplier(
        &self,
        anchor: &CompiledAnchor,
        rule_type: Option<&str>,
        content_type: Option<ContentType>,
    ) -> f64 {
        let rule = rule_type
            .map(|r| anchor.multiplier_from(self.rule_multipliers.get(r)))
            .unwrap_or(1.0);
        let content = content_type
            .map(|c| anchor.multiplier_from(self.content_multipliers.get(&c)))
            .unwrap_or(1.0);
        rule * content
    }
}
