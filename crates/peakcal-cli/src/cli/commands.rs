use super::CliError;
use super::helpers::format_coefficient_row;
use anyhow::Context;
use peakcal_core::domain::{PeakcalError, PropagationMode};
use peakcal_core::reference::MaterialId;
use peakcal_core::request::{load_request, render_human_summary, run_request, write_report_json};
use std::path::PathBuf;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub(super) enum PropagationArg {
    /// Single derivative from the last material evaluated
    Faithful,
    /// Per-layer derivatives summed in quadrature
    Corrected,
}

impl From<PropagationArg> for PropagationMode {
    fn from(value: PropagationArg) -> Self {
        match value {
            PropagationArg::Faithful => Self::Faithful,
            PropagationArg::Corrected => Self::Corrected,
        }
    }
}

#[derive(clap::Args)]
pub(super) struct EstimateArgs {
    /// Calibration request (JSON)
    request: PathBuf,

    /// Thickness error propagation, overriding the request's config
    #[arg(long, value_enum)]
    propagation: Option<PropagationArg>,

    /// Also write the JSON report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the JSON report instead of the human summary
    #[arg(long)]
    json: bool,
}

#[derive(clap::Args)]
pub(super) struct AttenuationArgs {
    /// Calibration request (JSON) providing the attenuation tables
    request: PathBuf,

    /// Material identifier (case-insensitive)
    #[arg(long)]
    material: String,

    /// Photon energies in keV
    #[arg(long = "energy", required = true, num_args = 1..)]
    energies: Vec<f64>,
}

pub(super) fn run_estimate_command(args: EstimateArgs) -> Result<i32, CliError> {
    let request = load_request(&args.request).map_err(PeakcalError::from)?;
    debug!(
        request = %args.request.display(),
        peaks = request.peaks.len(),
        "loaded calibration request"
    );
    let report = run_request(&request, args.propagation.map(PropagationMode::from))?;

    if let Some(report_path) = &args.report {
        write_report_json(&report, report_path)?;
        debug!(report = %report_path.display(), "wrote JSON report");
    }

    if args.json {
        let rendered = serde_json::to_string_pretty(&report)
            .context("failed to render calibration report as JSON")?;
        println!("{}", rendered);
    } else {
        println!("{}", render_human_summary(&report));
        if let Some(report_path) = &args.report {
            println!("JSON report: {}", report_path.display());
        }
    }

    Ok(0)
}

pub(super) fn run_attenuation_command(args: AttenuationArgs) -> Result<i32, CliError> {
    let request = load_request(&args.request).map_err(PeakcalError::from)?;
    let reference = request.reference_data().map_err(PeakcalError::from)?;
    let material = MaterialId::parse(&args.material).map_err(PeakcalError::from)?;

    println!("Mass attenuation coefficients for '{}':", material);
    for energy in args.energies {
        let coefficient = reference
            .coefficient_for(material.as_str(), energy)
            .map_err(PeakcalError::from)?;
        println!("{}", format_coefficient_row(energy, coefficient));
    }

    Ok(0)
}
