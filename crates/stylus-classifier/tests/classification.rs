use stylus_classifier::{ClassifierConfig, DomainClassifier};
use stylus_domain::{ContentType, FactorKind, SubjectDomain};

const INSTALL_GUIDE: &str = "1. Open the terminal and install the package.\n\
                             2. Select the target folder, then press Enter.\n\
                             3. Make sure to save your settings before you run the tool.";

#[test]
fn test_procedural_steps() {
    let classifier = DomainClassifier::new().unwrap();
    let analysis = classifier.classify(INSTALL_GUIDE);

    assert_eq!(analysis.content_type.content_type, ContentType::Procedural);
    assert!(analysis.content_type.confidence > 0.5);
    let expected = 0.04 * analysis.content_type.confidence;
    assert!((analysis.content_type_modifier - expected).abs() < 1e-12);
    assert!(analysis
        .content_type
        .all_scores
        .iter()
        .any(|(label, _)| *label == ContentType::Narrative));
}

#[test]
fn test_explanation_sections() {
    let classifier = DomainClassifier::new().unwrap();
    let analysis = classifier.classify(INSTALL_GUIDE);
    let text = analysis.explanation();

    assert!(text.starts_with("Domain classification"));
    assert!(text.contains("procedural"));
    for kind in [FactorKind::ContentType, FactorKind::Domain, FactorKind::Formality] {
        assert!(analysis.factors.iter().any(|f| f.kind == kind));
    }
}

#[test]
fn test_configured_keywords_shift_domain() {
    let text = "The sommelier paired the vintage with a tannic varietal.";
    let plain = DomainClassifier::new().unwrap().classify(text);
    assert_eq!(plain.domain.domain, SubjectDomain::General);

    let config = ClassifierConfig::from_toml(
        r#"
        [extra_keywords]
        creative = ["sommelier", "vintage", "tannic", "varietal"]
        "#,
    )
    .unwrap();
    let tuned = DomainClassifier::with_config(config).unwrap().classify(text);
    assert_eq!(tuned.domain.domain, SubjectDomain::Creative);
    // creative writing carries a negative base modifier
    assert!(tuned.domain_confidence_modifier < 0.0);
}

#[test]
fn test_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("classifier.toml");
    let mut config = ClassifierConfig::default();
    config.secondary_ratio = 0.6;
    std::fs::write(&path, config.to_toml().unwrap()).unwrap();

    let loaded = ClassifierConfig::from_file(&path).unwrap();
    assert_eq!(loaded, config);
    assert!(DomainClassifier::with_config(loaded).is_ok());
}
