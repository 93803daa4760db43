//! Loading anchor tables from disk and analyzing with them

use std::io::Write;

use stylus_anchors::{AnchorError, AnchorType, LinguisticAnchors};
use stylus_domain::ContentType;

const LEGAL_TABLE: &str = r#"
[settings]
max_total_reduction = 0.25

[[anchors]]
type = "reducing"
category = "legal_register"
name = "terms_of_art"
patterns = ['(?i)\b(?:herein|thereof|notwithstanding)\b']
effect = 0.15

[[anchors]]
type = "boosting"
category = "redundancy"
name = "doublets"
patterns = ['(?i)\b(?:null and void|cease and desist)\b']
effect = 0.1

[rule_multipliers.passive_voice]
legal_register = 2.0
"#;

fn write_table(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_table_from_file_drives_analysis() {
    let file = write_table(LEGAL_TABLE);
    let anchors = LinguisticAnchors::from_file(file.path()).unwrap();
    assert_eq!(anchors.table().len(), 2);

    let text = "Notwithstanding the above, the contract is null and void.";
    let analysis = anchors.analyze(text, 0, Some("passive_voice"), Some(ContentType::General));

    let reducing: Vec<_> = analysis.reducing_matches().collect();
    assert_eq!(reducing.len(), 1);
    assert!((reducing[0].weighted_effect - 0.30).abs() < 1e-9);
    // capped by the table's own max_total_reduction
    assert!((analysis.total_reduction - 0.25).abs() < 1e-9);

    let boosting: Vec<_> = analysis.boosting_matches().collect();
    assert_eq!(boosting.len(), 1);
    assert_eq!(boosting[0].anchor_type, AnchorType::Boosting);
    assert!(boosting[0].distance_from_error > 0);
    assert!(analysis.net_effect < 0.0);
}

#[test]
fn test_bad_regex_in_file_fails_at_load() {
    let file = write_table(&LEGAL_TABLE.replace(r"(?i)\b(?:herein", r"(?i)\b(?:herein["));
    let err = LinguisticAnchors::from_file(file.path()).unwrap_err();
    assert!(matches!(err, AnchorError::InvalidPattern { .. }));
}

#[test]
fn test_unknown_multiplier_category_fails_at_load() {
    let table = format!("{}\n[rule_multipliers.wordiness]\nemphasis = 1.1\n", LEGAL_TABLE);
    let file = write_table(&table);
    let err = LinguisticAnchors::from_file(file.path()).unwrap_err();
    assert!(matches!(err, AnchorError::UnknownAnchor(_)));
}
