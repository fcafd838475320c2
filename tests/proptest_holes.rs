//! Property tests for hole matching and point-in-polygon.

mod proptest_helpers;

use haloxml::diagnostics::{DiagnosticCode, Diagnostics};
use haloxml::model::pip;
use haloxml::model::Vertex;
use proptest::prelude::*;

use proptest_helpers::{build_layer, expected_owner, layer_plans, proptest_config};

proptest! {
    #![proptest_config(proptest_config())]

    #[test]
    fn matching_leaves_only_positives(plans in layer_plans()) {
        let mut layer = build_layer(&plans);
        let mut report = Diagnostics::new();
        let summary = layer.match_negative(&mut report).expect("match");

        let negatives = plans.iter().filter(|s| s.negative).count();
        let positives = plans.len() - negatives;

        prop_assert!(!layer.contains_negative());
        prop_assert_eq!(layer.regions.len(), positives);
        prop_assert_eq!(summary.matched + summary.discarded, negatives);
        prop_assert_eq!(
            report.with_code(DiagnosticCode::UnmatchedNegativeRegion).count(),
            summary.discarded
        );
    }

    #[test]
    fn holes_go_to_first_containing_positive(plans in layer_plans()) {
        let mut layer = build_layer(&plans);
        layer.match_negative(&mut Diagnostics::new()).expect("match");

        let mut expected = vec![0usize; layer.regions.len()];
        for plan in plans.iter().filter(|s| s.negative) {
            if let Some(owner) = expected_owner(&plans, plan.cell) {
                expected[owner] += 1;
            }
        }
        let actual: Vec<usize> = layer.regions.iter().map(|r| r.holes().len()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn positive_order_is_preserved(plans in layer_plans()) {
        let mut layer = build_layer(&plans);
        layer.match_negative(&mut Diagnostics::new()).expect("match");

        let expected: Vec<Vertex> = plans
            .iter()
            .filter(|s| !s.negative)
            .map(|s| proptest_helpers::plan_region(s).raw_vertices()[0])
            .collect();
        let actual: Vec<Vertex> = layer.regions.iter().map(|r| r.raw_vertices()[0]).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn second_run_changes_nothing(plans in layer_plans()) {
        let mut layer = build_layer(&plans);
        layer.match_negative(&mut Diagnostics::new()).expect("first match");
        let before: Vec<usize> = layer.regions.iter().map(|r| r.holes().len()).collect();

        let mut report = Diagnostics::new();
        let summary = layer.match_negative(&mut report).expect("second match");

        prop_assert_eq!(summary.matched, 0);
        prop_assert_eq!(summary.discarded, 0);
        prop_assert!(report.is_clean());
        let after: Vec<usize> = layer.regions.iter().map(|r| r.holes().len()).collect();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn points_inside_rectangle_are_contained(
        x0 in -1000.0f64..1000.0,
        y0 in -1000.0f64..1000.0,
        w in 1.0f64..500.0,
        h in 1.0f64..500.0,
        fx in 0.01f64..0.99,
        fy in 0.01f64..0.99,
    ) {
        let ring = [
            Vertex::new(x0, y0),
            Vertex::new(x0, y0 + h),
            Vertex::new(x0 + w, y0 + h),
            Vertex::new(x0 + w, y0),
            Vertex::new(x0, y0),
        ];
        prop_assert!(pip::contains(Vertex::new(x0 + fx * w, y0 + fy * h), &ring));
        prop_assert!(!pip::contains(Vertex::new(x0 + w + 1.0, y0 + fy * h), &ring));
        prop_assert!(!pip::contains(Vertex::new(x0 + fx * w, y0 - 1.0), &ring));
    }
}
