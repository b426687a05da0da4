//! Config loading tests.

use decision_labs_core::{
    airplane::MixRule,
    config::LabConfig,
    convergence::DistributionSpec,
    error::LabError,
};

const SHIPPED: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../data/lab_config.json");

#[test]
fn shipped_config_matches_builtin_defaults() {
    let loaded = LabConfig::load(SHIPPED).expect("load shipped config");
    assert_eq!(loaded, LabConfig::default());
}

#[test]
fn defaults_are_valid() {
    LabConfig::default().validate().expect("defaults validate");
}

#[test]
fn optional_fields_fall_back_to_defaults() {
    let json = r#"{
        "airplane": { "p_showup": 0.9, "p_couple": 0.1 },
        "convergence": { "distribution": { "family": "binomial", "n": 4, "p": 0.5 }, "n": 800 }
    }"#;
    let config = LabConfig::from_json(json).unwrap();

    assert_eq!(config.airplane.params.nr_samples, 5000);
    assert_eq!(config.airplane.params.seed, 1317);
    assert_eq!(config.airplane.params.rule, MixRule::Masked);
    assert_eq!(config.airplane.overbooked_at, 3);
    assert_eq!(config.convergence.distribution, DistributionSpec::Binomial { n: 4, p: 0.5 });
    assert_eq!(config.convergence.params.sample_every_n, 100);
    assert_eq!(config.convergence.params.nr_repetitions, 3);
    assert_eq!(config.convergence.params.seed, 1377);
    assert!(config.ranking.items.is_empty());
}

#[test]
fn out_of_range_probability_in_config_is_rejected() {
    let json = r#"{
        "airplane": { "p_showup": 1.2, "p_couple": 0.6, "rule": "overlay" },
        "convergence": { "distribution": { "family": "poisson", "lam": 1.0 }, "n": 10 }
    }"#;
    assert!(matches!(
        LabConfig::from_json(json),
        Err(LabError::InvalidProbability { name: "p_showup", .. })
    ));
}

#[test]
fn unknown_family_in_config_is_a_parse_error() {
    let json = r#"{
        "airplane": { "p_showup": 0.8, "p_couple": 0.6 },
        "convergence": { "distribution": { "family": "gaussian", "mu": 0.0 }, "n": 10 }
    }"#;
    assert!(matches!(LabConfig::from_json(json), Err(LabError::Serialization(_))));
}

#[test]
fn missing_file_names_the_path() {
    let err = LabConfig::load("/definitely/not/here.json").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.json"), "{err}");
}
