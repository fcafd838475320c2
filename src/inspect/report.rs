//! Inspect report types and terminal formatting.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

/// The result of inspecting an annotations document.
#[derive(Clone, Debug, Serialize)]
pub struct InspectReport {
    /// Whether negative regions were matched to holes before counting.
    pub matched: bool,
    /// One entry per layer, in document order.
    pub layers: Vec<LayerSummary>,
}

/// Counts for a single layer.
#[derive(Clone, Debug, Serialize)]
pub struct LayerSummary {
    pub name: String,
    /// Line color as `[r, g, b]`.
    pub color: [u8; 3],
    pub visible: bool,
    /// Top-level regions.
    pub regions: usize,
    /// Top-level regions still marked negative.
    pub negative: usize,
    /// Holes attached to top-level regions.
    pub holes: usize,
    /// Top-level regions per shape kind.
    pub kinds: BTreeMap<String, usize>,
}

impl InspectReport {
    /// Total number of top-level regions.
    pub fn region_count(&self) -> usize {
        self.layers.iter().map(|l| l.regions).sum()
    }

    /// Total number of attached holes.
    pub fn hole_count(&self) -> usize {
        self.layers.iter().map(|l| l.holes).sum()
    }
}

impl fmt::Display for InspectReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "╭─────────────────────────────────────────────────────────────╮")?;
        writeln!(f, "│                 Halo Annotations Report                     │")?;
        writeln!(f, "╰─────────────────────────────────────────────────────────────╯")?;
        writeln!(f)?;

        writeln!(
            f,
            "  Layers: {}   Regions: {}   Holes: {}{}",
            format_number(self.layers.len()),
            format_number(self.region_count()),
            format_number(self.hole_count()),
            if self.matched { "" } else { "   (negatives not matched)" }
        )?;

        for layer in &self.layers {
            writeln!(f)?;
            let header = format!(
                "{} (rgb {},{},{}{})",
                layer.name,
                layer.color[0],
                layer.color[1],
                layer.color[2],
                if layer.visible { "" } else { ", hidden" }
            );
            let rule = "─".repeat(57usize.saturating_sub(header.chars().count()));
            writeln!(f, "┌─ {} {}", header, rule)?;
            writeln!(f, "│   Regions:  {:>8}", format_number(layer.regions))?;
            if layer.negative > 0 {
                writeln!(f, "│   Negative: {:>8}", format_number(layer.negative))?;
            }
            writeln!(f, "│   Holes:    {:>8}", format_number(layer.holes))?;
            for (kind, count) in &layer.kinds {
                writeln!(f, "│     {:<10} {:>6}", kind, format_number(*count))?;
            }
            writeln!(f, "└{}", "─".repeat(60))?;
        }

        Ok(())
    }
}

/// Format a number with thousands separators.
fn format_number(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}
