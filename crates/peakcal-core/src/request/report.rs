use crate::domain::{CorrectedLine, PeakcalError, PeakcalResult, PropagationMode};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakReport {
    pub label: String,
    pub peak_energy: f64,
    pub peak_energy_error: f64,
    pub lines: Vec<CorrectedLine>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationReport {
    pub propagation: PropagationMode,
    pub peaks: Vec<PeakReport>,
}

pub fn render_human_summary(report: &CalibrationReport) -> String {
    let mut lines = Vec::with_capacity(report.peaks.len() + 1);
    lines.push(format!(
        "Thickness error propagation: {}",
        report.propagation
    ));
    for peak in &report.peaks {
        lines.push(format!(
            "{}: The weighted peak energy is {:.3} ± {:.3} keV.",
            peak.label, peak.peak_energy, peak.peak_energy_error
        ));
    }
    lines.join("\n")
}

pub fn write_report_json(report: &CalibrationReport, path: &Path) -> PeakcalResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| {
            PeakcalError::io_system(
                "IO.REPORT_DIRECTORY",
                format!(
                    "failed to create report directory '{}': {}",
                    parent.display(),
                    source
                ),
            )
        })?;
    }

    let rendered = serde_json::to_string_pretty(report).map_err(|source| {
        PeakcalError::internal(
            "SYS.REPORT_SERIALIZE",
            format!("failed to serialize report: {source}"),
        )
    })?;
    fs::write(path, rendered).map_err(|source| {
        PeakcalError::io_system(
            "IO.REPORT_WRITE",
            format!("failed to write report '{}': {}", path.display(), source),
        )
    })
}
