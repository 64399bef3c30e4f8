use super::layers::{LayerAttenuation, attenuate};
use crate::domain::{CorrectedLine, EmissionLine, EstimationResult, MaterialLayer, PropagationMode};
use crate::numerics::quadrature_sum;
use crate::reference::MaterialSource;
use tracing::debug;

/// Applies an already evaluated layer model to one line.
///
/// The incident-intensity term and the thickness term are independent and
/// combined in quadrature.
pub fn correct_line(
    line: &EmissionLine,
    attenuation: &LayerAttenuation,
    mode: PropagationMode,
) -> EstimationResult<CorrectedLine> {
    line.validate()?;

    let transmission = attenuation.transmission;
    let intensity = line.intensity * transmission;
    let intensity_term = transmission * line.intensity_error;
    let thickness_term = match mode {
        PropagationMode::Faithful => attenuation
            .last_evaluated
            .map(|effective| {
                line.intensity
                    * -effective.linear_attenuation()
                    * transmission
                    * attenuation.thickness_error_cm
            })
            .unwrap_or(0.0),
        PropagationMode::Corrected => {
            let per_layer: Vec<f64> = attenuation
                .layers
                .iter()
                .map(|layer| {
                    line.intensity
                        * layer.linear_attenuation()
                        * transmission
                        * layer.thickness_error_cm
                })
                .collect();
            quadrature_sum(&per_layer)
        }
    };
    let intensity_error = quadrature_sum(&[intensity_term, thickness_term]);

    debug!(
        energy_kev = line.energy_kev,
        transmission,
        thickness_error_cm = attenuation.thickness_error_cm,
        intensity,
        intensity_error,
        %mode,
        "corrected emission line"
    );

    Ok(CorrectedLine {
        energy_kev: line.energy_kev,
        intensity,
        intensity_error,
    })
}

/// Evaluates the layer stack at each line's energy and corrects the line,
/// preserving input order (equal-energy lines stay distinct).
pub fn correct_lines<S>(
    lines: &[EmissionLine],
    layers: &[MaterialLayer],
    source: &S,
    mode: PropagationMode,
) -> EstimationResult<Vec<CorrectedLine>>
where
    S: MaterialSource + ?Sized,
{
    lines
        .iter()
        .map(|line| {
            line.validate()?;
            let attenuation = attenuate(line.energy_kev, layers, source)?;
            correct_line(line, &attenuation, mode)
        })
        .collect()
}
