//! Batch estimation of several peaks that share one set of reference data.

mod model;
mod report;

pub use model::{CalibrationRequest, PeakRequest, TableDocument};
pub use report::{CalibrationReport, PeakReport, render_human_summary, write_report_json};

use crate::domain::{PeakcalError, PeakcalResult, PropagationMode};
use crate::pipeline::estimate_peak;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RequestLoadError {
    #[error("failed to read calibration request '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse calibration request '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

impl From<RequestLoadError> for PeakcalError {
    fn from(error: RequestLoadError) -> Self {
        match &error {
            RequestLoadError::Read { .. } => {
                PeakcalError::io_system("IO.REQUEST_READ", error.to_string())
            }
            RequestLoadError::Parse { .. } => {
                PeakcalError::input_validation("INPUT.REQUEST_PARSE", error.to_string())
            }
        }
    }
}

pub fn load_request(request_path: impl AsRef<Path>) -> Result<CalibrationRequest, RequestLoadError> {
    let request_path = request_path.as_ref();
    let source = fs::read_to_string(request_path).map_err(|source| RequestLoadError::Read {
        path: request_path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&source).map_err(|source| RequestLoadError::Parse {
        path: request_path.to_path_buf(),
        source,
    })
}

/// Estimates every peak in the request. Reference data is built once; the
/// first failing peak aborts the run.
pub fn run_request(
    request: &CalibrationRequest,
    propagation_override: Option<PropagationMode>,
) -> PeakcalResult<CalibrationReport> {
    if request.peaks.is_empty() {
        return Err(PeakcalError::input_validation(
            "INPUT.NO_PEAKS",
            "calibration request does not contain any peaks",
        ));
    }

    let propagation = propagation_override.unwrap_or(request.config.propagation);
    let reference = request.reference_data()?;

    let mut peaks = Vec::with_capacity(request.peaks.len());
    for (index, peak) in request.peaks.iter().enumerate() {
        let label = peak.display_label(index);
        let estimation = estimate_peak(&peak.lines, &peak.layers, &reference, propagation)
            .map_err(|error| PeakcalError::for_peak(&label, &error))?;

        info!(
            peak = %label,
            peak_energy_kev = estimation.estimate.peak_energy_kev,
            peak_energy_error_kev = estimation.estimate.peak_energy_error_kev,
            "weighted peak energy"
        );
        peaks.push(PeakReport {
            label,
            peak_energy: estimation.estimate.peak_energy_kev,
            peak_energy_error: estimation.estimate.peak_energy_error_kev,
            lines: estimation.corrected_lines,
        });
    }

    Ok(CalibrationReport { propagation, peaks })
}

#[cfg(test)]
mod tests {
    use super::{CalibrationRequest, RequestLoadError, load_request, run_request};
    use crate::domain::{PeakcalError, PeakcalErrorCategory, PropagationMode};
    use std::fs;
    use tempfile::TempDir;

    const REQUEST: &str = r#"
    {
      "densities": { "al": 2.6989 },
      "attenuationTables": {
        "al": { "points": [[100.0, 0.01], [1000.0, 0.001]] }
      },
      "peaks": [
        {
          "label": "housing check",
          "lines": [{ "energy": 100.0, "intensity": 100.0, "intensityError": 0.0 }],
          "layers": [{ "material": "al", "thickness": 1.0, "thicknessError": 0.0 }]
        },
        {
          "lines": [
            { "energy": 50.0, "intensity": 60.0 },
            { "energy": 50.0, "intensity": 40.0 }
          ]
        }
      ]
    }
    "#;

    fn request() -> CalibrationRequest {
        serde_json::from_str(REQUEST).expect("request should parse")
    }

    #[test]
    fn run_request_estimates_every_peak() {
        let report = run_request(&request(), None).expect("report");
        assert_eq!(report.propagation, PropagationMode::Faithful);
        assert_eq!(report.peaks.len(), 2);

        assert_eq!(report.peaks[0].label, "housing check");
        assert_eq!(report.peaks[0].peak_energy, 100.0);
        assert_eq!(report.peaks[0].peak_energy_error, 0.0);
        assert!((report.peaks[0].lines[0].intensity - 99.731).abs() < 1.0e-3);

        assert_eq!(report.peaks[1].label, "peak 2");
        assert_eq!(report.peaks[1].peak_energy, 50.0);
        assert_eq!(report.peaks[1].lines.len(), 2);
    }

    #[test]
    fn propagation_override_wins_over_document_config() {
        let report = run_request(&request(), Some(PropagationMode::Corrected)).expect("report");
        assert_eq!(report.propagation, PropagationMode::Corrected);
    }

    #[test]
    fn failing_peak_is_labelled_in_the_error() {
        let mut request = request();
        request.peaks[1].layers.push(crate::domain::MaterialLayer::new("w", 1.0, 0.0));

        let error = run_request(&request, None).expect_err("unknown material");
        assert_eq!(error.placeholder(), "INPUT.UNKNOWN_MATERIAL");
        assert_eq!(error.message(), "peak 'peak 2': material 'w' has no density entry");
    }

    #[test]
    fn request_without_peaks_is_rejected() {
        let mut request = request();
        request.peaks.clear();
        let error = run_request(&request, None).expect_err("no peaks");
        assert_eq!(error.placeholder(), "INPUT.NO_PEAKS");
    }

    #[test]
    fn load_request_distinguishes_read_and_parse_failures() {
        let temp = TempDir::new().expect("tempdir should be created");
        let missing = temp.path().join("missing.json");
        let error = load_request(&missing).expect_err("missing file");
        assert!(matches!(error, RequestLoadError::Read { .. }));
        assert_eq!(
            PeakcalError::from(error).category(),
            PeakcalErrorCategory::IoSystemError
        );

        let malformed = temp.path().join("malformed.json");
        fs::write(&malformed, "{ \"peaks\": [ }").expect("fixture write");
        let error = load_request(&malformed).expect_err("malformed file");
        assert!(matches!(error, RequestLoadError::Parse { .. }));
        assert_eq!(
            PeakcalError::from(error).placeholder(),
            "INPUT.REQUEST_PARSE"
        );

        let valid = temp.path().join("request.json");
        fs::write(&valid, REQUEST).expect("fixture write");
        let loaded = load_request(&valid).expect("valid request");
        assert_eq!(loaded.peaks.len(), 2);
    }
}
