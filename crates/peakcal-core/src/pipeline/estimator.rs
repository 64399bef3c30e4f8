use super::correction::correct_lines;
use crate::domain::{
    CorrectedLine, DegenerateReason, EmissionLine, EstimationError, EstimationResult,
    MaterialLayer, PeakEstimate, PropagationMode,
};
use crate::numerics::{quadrature_sum, stable_sum};
use crate::reference::MaterialSource;
use tracing::debug;

/// Peak estimate together with the corrected lines it was computed from.
#[derive(Debug, Clone, PartialEq)]
pub struct PeakEstimation {
    pub estimate: PeakEstimate,
    pub corrected_lines: Vec<CorrectedLine>,
}

/// Intensity-weighted mean energy with first-order error propagation.
///
/// Energies are taken relative to the first line before summing. The shift
/// cancels in both the mean and `∂peak/∂I_i`, and keeps the result exact when
/// all lines share one energy.
pub fn weighted_peak_energy(lines: &[CorrectedLine]) -> EstimationResult<PeakEstimate> {
    let Some(first) = lines.first() else {
        return Err(EstimationError::DegenerateInput {
            reason: DegenerateReason::NoLines,
        });
    };
    let reference_energy = first.energy_kev;

    let intensities: Vec<f64> = lines.iter().map(|line| line.intensity).collect();
    let shifted_energies: Vec<f64> = lines
        .iter()
        .map(|line| line.energy_kev - reference_energy)
        .collect();

    let total_intensity = stable_sum(&intensities);
    if total_intensity == 0.0 {
        return Err(EstimationError::DegenerateInput {
            reason: DegenerateReason::ZeroTotalIntensity,
        });
    }
    let moments: Vec<f64> = shifted_energies
        .iter()
        .zip(&intensities)
        .map(|(shifted, intensity)| shifted * intensity)
        .collect();
    let shifted_moment = stable_sum(&moments);

    let shifted_mean = shifted_moment / total_intensity;
    let peak_energy_kev = reference_energy + shifted_mean;

    // ∂peak/∂I_i = (x_i - mean) / ΣI. ΣI is never squared: it can be far below
    // 1e-162 behind thick housing. Zero-error lines contribute exactly zero.
    let error_terms: Vec<f64> = lines
        .iter()
        .zip(&shifted_energies)
        .map(|(line, &shifted)| {
            if line.intensity_error == 0.0 {
                return 0.0;
            }
            let partial = (shifted - shifted_mean) / total_intensity;
            line.intensity_error * partial
        })
        .collect();
    let peak_energy_error_kev = quadrature_sum(&error_terms);

    Ok(PeakEstimate {
        peak_energy_kev,
        peak_energy_error_kev,
    })
}

pub fn estimate_peak<S>(
    lines: &[EmissionLine],
    layers: &[MaterialLayer],
    source: &S,
    mode: PropagationMode,
) -> EstimationResult<PeakEstimation>
where
    S: MaterialSource + ?Sized,
{
    if lines.is_empty() {
        return Err(EstimationError::DegenerateInput {
            reason: DegenerateReason::NoLines,
        });
    }

    let corrected_lines = correct_lines(lines, layers, source, mode)?;
    let estimate = weighted_peak_energy(&corrected_lines)?;
    debug!(
        line_count = lines.len(),
        layer_count = layers.len(),
        peak_energy_kev = estimate.peak_energy_kev,
        peak_energy_error_kev = estimate.peak_energy_error_kev,
        "estimated weighted peak energy"
    );

    Ok(PeakEstimation {
        estimate,
        corrected_lines,
    })
}

/// Estimates the energy of a peak formed by `lines` seen through `layers`.
pub fn estimate_peak_energy<S>(
    lines: &[EmissionLine],
    layers: &[MaterialLayer],
    source: &S,
    mode: PropagationMode,
) -> EstimationResult<PeakEstimate>
where
    S: MaterialSource + ?Sized,
{
    estimate_peak(lines, layers, source, mode).map(|estimation| estimation.estimate)
}
