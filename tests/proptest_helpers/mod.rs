#![allow(dead_code)]

use haloxml::model::{Layer, LineColor, Region, ShapeKind, Vertex};
use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Width of a grid cell; positive rectangles never cross cell borders.
pub const CELL: f64 = 100.0;

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// One generated region: which grid cell it sits in, and whether it is a
/// hole. Holes in a cell without a positive rectangle stay unmatched.
#[derive(Clone, Debug)]
pub struct RegionPlan {
    pub cell: u8,
    pub negative: bool,
    /// Inset of the rectangle from its cell border, in `[1, 40)`.
    pub inset: f64,
}

pub fn region_plan() -> BoxedStrategy<RegionPlan> {
    (0u8..6, any::<bool>(), 1.0f64..40.0)
        .prop_map(|(cell, negative, inset)| RegionPlan {
            cell,
            negative,
            inset,
        })
        .boxed()
}

pub fn layer_plans() -> BoxedStrategy<Vec<RegionPlan>> {
    prop::collection::vec(region_plan(), 0..24).boxed()
}

/// The rectangle of a region plan. Positives sit `inset / 4` (below 10)
/// from the cell border and negatives `inset + 10`, so a hole always lies
/// strictly inside any positive of the same cell.
pub fn plan_region(plan: &RegionPlan) -> Region {
    let origin = f64::from(plan.cell) * CELL;
    let inset = if plan.negative {
        plan.inset + 10.0
    } else {
        plan.inset / 4.0
    };
    Region::new(
        ShapeKind::Rectangle,
        vec![
            Vertex::new(origin + inset, inset),
            Vertex::new(origin + CELL - inset, CELL - inset),
        ],
    )
    .negative(plan.negative)
}

pub fn build_layer(plans: &[RegionPlan]) -> Layer {
    let mut layer = Layer::new("Generated", LineColor::new(0, 128, 255));
    layer.regions = plans.iter().map(plan_region).collect();
    layer
}

/// Index among the positives of the first positive plan in `cell`.
pub fn expected_owner(plans: &[RegionPlan], cell: u8) -> Option<usize> {
    plans
        .iter()
        .filter(|s| !s.negative)
        .position(|s| s.cell == cell)
}
