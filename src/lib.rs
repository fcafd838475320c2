//! Haloxml: reader and writer for Halo `.annotations` files.
//!
//! Halo stores each drawn shape as a flat region record, and stores holes
//! as separate "negative" regions next to the shape they cut into. This
//! crate parses those files into a layered model, normalizes every shape
//! kind to a canonical vertex ring, reattaches negative regions as holes of
//! the positive region that contains them, and writes the result back as
//! Halo XML or as GeoJSON.
//!
//! # Modules
//!
//! - [`model`]: Layers, regions, geometry normalization and hole matching
//! - [`diagnostics`]: Recoverable problems collected during processing
//! - [`inspect`]: Per-layer summaries of a document
//! - [`error`]: Error types for haloxml operations

pub mod diagnostics;
pub mod error;
pub mod inspect;
pub mod model;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::json;

use diagnostics::Diagnostics;
use model::io_geojson::{EndcapPolicy, GeoJsonOptions};

pub use error::HaloError;

/// The haloxml CLI application.
#[derive(Parser)]
#[command(name = "haloxml")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Summarize the layers and regions of an annotations file.
    Inspect(InspectArgs),
    /// Convert an annotations file to GeoJSON or back to Halo XML.
    Convert(ConvertArgs),
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Input `.annotations` file.
    input: PathBuf,

    /// Count negative regions as they are stored instead of matching them
    /// to holes first.
    #[arg(long)]
    no_match: bool,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input `.annotations` file.
    input: PathBuf,

    /// Output file. An extension is added if missing.
    output: PathBuf,

    /// Output format ('geojson' or 'annotations').
    #[arg(long, default_value = "geojson")]
    to: String,

    /// Keep negative regions as separate regions instead of matching them
    /// to holes.
    #[arg(long)]
    no_match: bool,

    /// Export endcapped polygons as open line strings (GeoJSON only).
    #[arg(long)]
    open_endcaps: bool,

    /// Treat warnings as errors (exit non-zero if any warnings).
    #[arg(long, env = "HALOXML_STRICT")]
    strict: bool,
}

/// Run the haloxml CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), HaloError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            println!("haloxml {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Reader and writer for Halo .annotations files.");
            println!();
            println!("Run 'haloxml --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), HaloError> {
    if !matches!(args.output.as_str(), "text" | "json") {
        return Err(HaloError::UnsupportedFormat(format!(
            "'{}' (supported: text, json)",
            args.output
        )));
    }

    let mut doc = model::io_halo_xml::read_halo_xml(&args.input)?;
    let mut report = Diagnostics::new();
    doc.audit_geometry(&mut report);
    if !args.no_match {
        doc.match_negative(&mut report)?;
    }

    let summary = inspect::inspect_annotations(&doc, !args.no_match);
    match args.output.as_str() {
        "json" => {
            let issues: Vec<_> = report
                .issues
                .iter()
                .map(|issue| {
                    json!({
                        "severity": format!("{:?}", issue.severity),
                        "code": format!("{:?}", issue.code),
                        "message": issue.message,
                        "context": issue.context.to_string(),
                    })
                })
                .collect();
            let value = json!({ "summary": summary, "issues": issues });
            let text = serde_json::to_string_pretty(&value).map_err(|source| {
                HaloError::GeoJsonWrite {
                    path: PathBuf::from("<stdout>"),
                    source,
                }
            })?;
            println!("{}", text);
        }
        _ => {
            print!("{}", summary);
            if !report.is_clean() {
                println!();
                print!("{}", report);
            }
        }
    }

    Ok(())
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), HaloError> {
    let endcaps = if args.open_endcaps {
        EndcapPolicy::OpenPolyline
    } else {
        EndcapPolicy::AlwaysClose
    };

    let to_geojson = match args.to.as_str() {
        "geojson" => true,
        "annotations" | "halo" | "halo-xml" => false,
        other => {
            return Err(HaloError::UnsupportedFormat(format!(
                "'{}' (supported: geojson, annotations)",
                other
            )));
        }
    };

    let mut doc = model::io_halo_xml::read_halo_xml(&args.input)?;
    let mut report = Diagnostics::new();
    doc.audit_geometry(&mut report);
    if !args.no_match {
        doc.match_negative(&mut report)?;
    }

    let written = if to_geojson {
        let opts = GeoJsonOptions {
            match_negative: false,
            endcaps,
        };
        model::io_geojson::write_geojson(&args.output, &doc, &opts, &mut report)?
    } else {
        model::io_halo_xml::write_halo_xml(&args.output, &doc)?
    };

    finish(report, args.strict)?;
    println!(
        "Converted {} -> {} ({} regions)",
        args.input.display(),
        written.display(),
        doc.region_count()
    );
    Ok(())
}

/// Forward diagnostics to the log and decide the exit status.
fn finish(report: Diagnostics, strict: bool) -> Result<(), HaloError> {
    for issue in &report.issues {
        log::warn!("{}", issue);
    }

    if strict && !report.is_clean() {
        return Err(HaloError::DiagnosticsFailed {
            warning_count: report.issues.len(),
            report,
        });
    }
    Ok(())
}
