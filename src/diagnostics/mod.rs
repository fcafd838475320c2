//! Diagnostics collected while reading, reconciling and exporting
//! annotations.
//!
//! Operations that can recover from bad input take a `&mut Diagnostics`
//! and record what they repaired or dropped, instead of only logging it:
//! - polygons that did not close and were closed
//! - negative regions no positive region contains
//! - shapes that cannot be exported

mod report;

pub use report::{Diagnostic, DiagnosticCode, DiagnosticContext, Diagnostics, Severity};
