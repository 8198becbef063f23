//! Property-based tests for the vigil engine.
//!
//! This module uses proptest to verify invariants that should hold for all
//! inputs:
//!
//! - the quality score stays within [0, 100] for arbitrary check sets
//! - the pass rate identity `passed / total * 100` holds exactly
//! - anomaly output never contains a severity inversion
//! - detection never panics on arbitrary numeric collections

use proptest::prelude::*;
use std::time::Duration;
use vigil_engine::engine::DataQualityCheck;
use vigil_engine::prelude::*;

fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Info),
        Just(Severity::Minor),
        Just(Severity::Major),
        Just(Severity::Critical),
    ]
}

fn arb_rule_type() -> impl Strategy<Value = RuleType> {
    prop_oneof![
        Just(RuleType::Completeness),
        Just(RuleType::Accuracy),
        Just(RuleType::Consistency),
        Just(RuleType::Validity),
        Just(RuleType::Uniqueness),
        Just(RuleType::Timeliness),
        Just(RuleType::ReferentialIntegrity),
        Just(RuleType::BusinessRule),
    ]
}

prop_compose! {
    fn arb_check()(
        rule_type in arb_rule_type(),
        severity in arb_severity(),
        passed in any::<bool>(),
        id in "[a-z]{1,8}",
    ) -> DataQualityCheck {
        DataQualityCheck {
            rule_id: id.clone(),
            rule_name: format!("rule {id}"),
            rule_type,
            severity,
            field_path: "field".to_string(),
            passed,
            failure_details: (!passed).then(|| "failed".to_string()),
            error_message: None,
            execution_time: Duration::from_micros(1),
        }
    }
}

proptest! {
    #[test]
    fn quality_score_stays_within_bounds(checks in prop::collection::vec(arb_check(), 0..64)) {
        let metrics = ScoreAggregator::compute_metrics(&checks);
        let score = ScoreAggregator::compute_score(&metrics);
        prop_assert!((0.0..=100.0).contains(&score), "score {score} out of bounds");
    }

    #[test]
    fn pass_rate_identity_holds(checks in prop::collection::vec(arb_check(), 0..64)) {
        let metrics = ScoreAggregator::compute_metrics(&checks);
        prop_assert_eq!(metrics.total_checks, checks.len());
        prop_assert_eq!(metrics.passed_checks + metrics.failed_checks, metrics.total_checks);

        if metrics.total_checks == 0 {
            prop_assert_eq!(metrics.pass_rate, 0.0);
        } else {
            let expected =
                metrics.passed_checks as f64 / metrics.total_checks as f64 * 100.0;
            let expected = (expected * 100.0).round() / 100.0;
            prop_assert_eq!(metrics.pass_rate, expected);
        }
    }

    #[test]
    fn checks_by_type_covers_every_check(checks in prop::collection::vec(arb_check(), 0..64)) {
        let metrics = ScoreAggregator::compute_metrics(&checks);
        let counted: usize = metrics.checks_by_type.values().sum();
        prop_assert_eq!(counted, checks.len());
    }

    #[test]
    fn anomaly_output_has_no_severity_inversions(
        values in prop::collection::vec(-1e6f64..1e6, 0..40),
        scalar in -1e6f64..1e6,
    ) {
        let detector = AnomalyDetector::default();
        let record = DataRecord::new()
            .with_field("amounts", values)
            .with_field("price", scalar)
            .with_field("percentage", scalar);

        let anomalies = detector.detect(&record);
        for pair in anomalies.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
        }
    }

    #[test]
    fn detection_never_panics_on_odd_numbers(
        values in prop::collection::vec(
            prop_oneof![
                any::<f64>(),
                Just(f64::NAN),
                Just(f64::INFINITY),
                Just(f64::NEG_INFINITY),
            ],
            0..32,
        ),
    ) {
        let detector = AnomalyDetector::default();
        let record = DataRecord::new().with_field("readings", values);
        // Must not panic, and ordering must hold even for degenerate input.
        let anomalies = detector.detect(&record);
        for pair in anomalies.windows(2) {
            prop_assert!(pair[0].severity >= pair[1].severity);
        }
    }

    #[test]
    fn classifier_is_monotonic(a in -10.0f64..20.0, b in -10.0f64..20.0) {
        let classifier = SeverityClassifier::default();
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classifier.classify(low) <= classifier.classify(high));
    }

    #[test]
    fn issues_match_failed_checks(checks in prop::collection::vec(arb_check(), 0..64)) {
        let failed = checks.iter().filter(|check| !check.passed).count();
        let issues = IssueReporter::build_issues(&checks);
        prop_assert_eq!(issues.len(), failed);

        let recommendations = IssueReporter::build_recommendations(&issues);
        let unique: std::collections::BTreeSet<&String> = recommendations.iter().collect();
        prop_assert_eq!(unique.len(), recommendations.len(), "recommendations must be deduplicated");
    }
}
