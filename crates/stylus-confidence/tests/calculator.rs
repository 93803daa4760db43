//! End-to-end confidence calculations over the three layers

use proptest::prelude::*;
use stylus_confidence::{
    CalculatorConfig, ConfidenceCalculator, EvidenceLayer, NormalizationOptions,
    ReliabilitySource,
};
use stylus_domain::{ContentType, FactorKind};
use stylus_nlp::{HeuristicAnnotator, StaticAnnotator};

const GUIDE: &str = "Open the terminal and run `cargo build`. \
                     The binary was placed in the target folder by the compiler.";

fn calculator() -> ConfidenceCalculator<HeuristicAnnotator> {
    ConfidenceCalculator::new(HeuristicAnnotator::new()).unwrap()
}

#[test]
fn test_identical_calls_are_served_from_cache() {
    let calc = calculator();
    let position = GUIDE.find("placed").unwrap();

    let first = calc.calculate_confidence(GUIDE, position, Some("passive_voice"), None, 0.5);
    let anchor_lookups = calc.cache_stats().anchors.misses;
    let second = calc.calculate_confidence(GUIDE, position, Some("passive_voice"), None, 0.5);

    assert_eq!(first, second);
    let stats = calc.stats();
    assert_eq!(stats.calculations, 1);
    assert_eq!(stats.cache_hits, 1);
    // the analyzers were not consulted again
    assert_eq!(calc.cache_stats().anchors.misses, anchor_lookups);
    assert_eq!(calc.cache_stats().anchors.hits, 0);
}

#[test]
fn test_strong_reliable_evidence_hits_floor() {
    let calc = calculator();
    let b = calc.calculate_normalized_confidence(
        GUIDE,
        5,
        Some("wordiness"),
        Some(ContentType::Technical),
        0.2,
        NormalizationOptions::default()
            .with_rule_reliability(0.9)
            .with_evidence_score(0.9),
    );

    let provenance = b.normalization.as_ref().unwrap();
    assert!(!provenance.content_type_detected);
    assert_eq!(provenance.reliability_source, ReliabilitySource::Supplied);
    assert!((provenance.evidence_weight.unwrap() - 0.65).abs() < 1e-12);
    assert!(provenance.floor_guard_triggered);
    assert!(provenance.final_confidence >= 0.75);
    assert!(b.factors.iter().any(|f| f.kind == FactorKind::PolicyGuard));

    let stats = calc.stats();
    assert_eq!(stats.normalized_calculations, 1);
    assert_eq!(stats.floor_guard_triggers, 1);
}

#[test]
fn test_weak_evidence_does_not_trigger_guard() {
    let calc = calculator();
    let b = calc.calculate_normalized_confidence(
        GUIDE,
        5,
        Some("wordiness"),
        None,
        0.2,
        NormalizationOptions::default().with_evidence_score(0.3),
    );
    let provenance = b.normalization.as_ref().unwrap();
    assert_eq!(provenance.reliability_source, ReliabilitySource::Table);
    assert!(!provenance.floor_guard_triggered);
    assert!(!provenance.floor_guard_raised);
    assert_eq!(calc.stats().floor_guard_triggers, 0);
}

#[test]
fn test_failing_annotator_only_weakens_context_layer() {
    let calc = ConfidenceCalculator::new(StaticAnnotator::failing("model not loaded")).unwrap();
    let b = calc.calculate_confidence(GUIDE, 10, None, None, 0.5);

    assert_eq!(b.layers.len(), 3);
    let context = b.layer(EvidenceLayer::ContextAnalysis).unwrap();
    assert_eq!(context.weighted_score, 0.0);
    assert_eq!(context.self_confidence, 0.0);
    assert!(b.explanation().contains("model not loaded"));
}

#[test]
fn test_non_ascii_verbs_yield_a_result() {
    let calc = calculator();
    for text in ["The team ሀለለed the release.", "They ሀለለing the plan."] {
        // byte 10 falls inside a three-byte character
        for position in [4, 10] {
            let b = calc.calculate_confidence(text, position, None, None, 0.5);
            assert_eq!(b.layers.len(), 3);
            assert!((0.0..=1.0).contains(&b.final_confidence));
        }
    }
}

#[test]
fn test_anchor_file_from_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("anchors.toml");
    std::fs::write(
        &path,
        r#"
[[anchors]]
type = "reducing"
category = "legal_register"
name = "terms_of_art"
patterns = ['(?i)\b(?:herein|thereof|notwithstanding)\b']
effect = 0.15
"#,
    )
    .unwrap();

    let config = CalculatorConfig {
        anchor_file: Some(path),
        ..CalculatorConfig::default()
    };
    let calc = ConfidenceCalculator::with_config(HeuristicAnnotator::new(), config).unwrap();
    assert_eq!(calc.anchors().table().len(), 1);

    let b = calc.calculate_confidence("Notwithstanding the above, we agree.", 0, None, None, 0.5);
    let anchors = b.layer(EvidenceLayer::LinguisticAnchors).unwrap();
    assert!((anchors.raw_score + 0.15).abs() < 1e-9);
    assert!((anchors.weighted_score + 0.06).abs() < 1e-9);
    assert_eq!(anchors.metadata.get("matches"), Some(&1.0));
    assert!((anchors.self_confidence - 0.7).abs() < 1e-12);
}

#[test]
fn test_missing_anchor_file_fails_construction() {
    let config = CalculatorConfig {
        anchor_file: Some("/nonexistent/anchors.toml".into()),
        ..CalculatorConfig::default()
    };
    assert!(ConfidenceCalculator::with_config(HeuristicAnnotator::new(), config).is_err());
}

#[test]
fn test_stats_summary_after_reset() {
    let calc = calculator();
    calc.calculate_confidence(GUIDE, 0, None, None, 0.5);
    calc.calculate_confidence(GUIDE, 0, None, None, 0.5);
    assert!(calc.stats().summary().contains("50.0% hit rate"));

    calc.reset_stats();
    assert_eq!(calc.stats().calculations, 0);
    assert_eq!(calc.cache_stats().breakdowns.hits, 0);
}

const SAMPLES: [&str; 4] = [
    GUIDE,
    "Hey, it's gonna be fine, don't worry!",
    "The plaintiff filed a motion. The court denied it.",
    "",
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    /// Property: final confidence stays in [0, 1] for any input
    #[test]
    fn test_final_confidence_bounded(
        sample in 0usize..SAMPLES.len(),
        position in 0usize..200,
        base in 0.0f64..=1.0,
        evidence in proptest::option::of(0.0f64..=1.0),
    ) {
        let calc = calculator();
        let text = SAMPLES[sample];
        let b = calc.calculate_confidence(text, position, None, None, base);
        prop_assert!((0.0..=1.0).contains(&b.final_confidence));
        prop_assert!((0.0..=1.0).contains(&b.layer_agreement));
        prop_assert!((0.0..=1.0).contains(&b.confidence_certainty));

        let options = NormalizationOptions { rule_reliability: None, evidence_score: evidence };
        let n = calc.calculate_normalized_confidence(
            text,
            position,
            Some("plurals"),
            None,
            base,
            options,
        );
        prop_assert!((0.0..=1.0).contains(&n.effective_confidence()));
    }
}
