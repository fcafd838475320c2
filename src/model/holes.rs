//! Reconciliation of negative regions into holes.
//!
//! Halo does not record which positive region a negative region cuts a hole
//! in. The owner is recovered geometrically: each negative region's
//! representative point is tested against every positive region with area,
//! in declaration order, and the first polygon containing it wins.

use super::layer::Layer;
use super::pip::{self, Bounds};
use super::region::Region;
use super::vertex::Vertex;
use crate::diagnostics::{Diagnostic, DiagnosticCode, DiagnosticContext, Diagnostics};
use crate::error::HaloError;

/// Outcome counts of one [`match_holes`] run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchSummary {
    /// Negative regions attached as holes.
    pub matched: usize,
    /// Negative regions dropped because no owner was found.
    pub discarded: usize,
}

/// A positive region with area that may own holes.
struct Candidate<'a> {
    /// Index among the layer's positive regions.
    position: usize,
    bounds: Bounds,
    ring: &'a [Vertex],
}

/// Where a negative region ends up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Assignment {
    Owner(usize),
    Unmatched,
    NoArea,
}

/// Attaches each negative region of `layer` to the first positive region
/// (in declaration order) whose polygon contains its representative point,
/// then leaves only the positive regions at the top level.
///
/// Negative regions without an owner, and negative rulers or pins, are
/// dropped with a warning naming their original index. Running this on a
/// layer without negative regions does nothing.
///
/// # Errors
/// Returns [`HaloError::HoleOnRegionWithoutArea`] if an owner turns out not
/// to have area. The layer then holds its positive regions and the holes
/// attached so far.
pub fn match_holes(layer: &mut Layer, report: &mut Diagnostics) -> Result<MatchSummary, HaloError> {
    if !layer.contains_negative() {
        return Ok(MatchSummary::default());
    }

    let assignments = assign_owners(&layer.regions);

    let regions = std::mem::take(&mut layer.regions);
    let mut positives = Vec::with_capacity(regions.len());
    let mut negatives = Vec::new();
    for (index, region) in regions.into_iter().enumerate() {
        if region.is_negative() {
            negatives.push((index, region));
        } else {
            positives.push(region);
        }
    }

    let outcome = attach_holes(&mut positives, negatives, &assignments, &layer.name, report);
    layer.regions = positives;

    if let Ok(summary) = &outcome {
        log::debug!(
            "layer '{}': attached {} hole(s), discarded {} negative region(s)",
            layer.name,
            summary.matched,
            summary.discarded
        );
    }
    outcome
}

/// Finds the owner of each negative region, in negative order.
fn assign_owners(regions: &[Region]) -> Vec<Assignment> {
    let mut candidates = Vec::new();
    let mut probes = Vec::new();
    let mut position = 0;

    for region in regions {
        if region.is_negative() {
            probes.push(region);
            continue;
        }
        if region.has_area() {
            let ring = region.vertices();
            if let Some(bounds) = Bounds::of(ring) {
                candidates.push(Candidate {
                    position,
                    bounds,
                    ring,
                });
            }
        }
        position += 1;
    }

    probes
        .into_iter()
        .map(|region| {
            if !region.has_area() {
                return Assignment::NoArea;
            }
            let Some(point) = region.representative_point() else {
                return Assignment::Unmatched;
            };
            candidates
                .iter()
                .find(|c| c.bounds.contains(point) && pip::contains(point, c.ring))
                .map_or(Assignment::Unmatched, |c| Assignment::Owner(c.position))
        })
        .collect()
}

fn attach_holes(
    positives: &mut [Region],
    negatives: Vec<(usize, Region)>,
    assignments: &[Assignment],
    layer_name: &str,
    report: &mut Diagnostics,
) -> Result<MatchSummary, HaloError> {
    let mut summary = MatchSummary::default();

    for ((index, region), assignment) in negatives.into_iter().zip(assignments.iter().copied()) {
        let context = DiagnosticContext::Region {
            layer: layer_name.to_string(),
            index,
        };
        match assignment {
            Assignment::Owner(position) => {
                positives[position].add_hole(region)?;
                summary.matched += 1;
            }
            Assignment::Unmatched => {
                report.add(Diagnostic::warning(
                    DiagnosticCode::UnmatchedNegativeRegion,
                    format!(
                        "Did not find a matching positive region for region {index} in layer {layer_name}"
                    ),
                    context,
                ));
                summary.discarded += 1;
            }
            Assignment::NoArea => {
                report.add(Diagnostic::warning(
                    DiagnosticCode::NegativeRegionWithoutArea,
                    format!(
                        "Negative {} region {index} in layer {layer_name} has no area and cannot be a hole",
                        region.kind()
                    ),
                    context,
                ));
                summary.discarded += 1;
            }
        }
    }

    Ok(summary)
}
