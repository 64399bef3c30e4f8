pub mod errors;

pub use errors::{
    DegenerateReason, EstimationError, EstimationResult, ReferenceEntry, PeakcalError,
    PeakcalErrorCategory, PeakcalResult,
};

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// How the housing-thickness uncertainty is carried into a line's corrected
/// intensity error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PropagationMode {
    /// One derivative `-μ·ρ` taken from the last material evaluated, multiplied
    /// by the quadrature sum of every layer's thickness error.
    #[default]
    Faithful,
    /// Each layer contributes its own `μ_k·ρ_k·σ_k` term, summed in quadrature.
    Corrected,
}

impl PropagationMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Faithful => "faithful",
            Self::Corrected => "corrected",
        }
    }
}

impl Display for PropagationMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimatorConfig {
    #[serde(default)]
    pub propagation: PropagationMode,
}

/// One spectral line contributing to the observed peak, before attenuation.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmissionLine {
    #[serde(rename = "energy")]
    pub energy_kev: f64,
    pub intensity: f64,
    #[serde(default)]
    pub intensity_error: f64,
}

impl EmissionLine {
    pub const fn new(energy_kev: f64, intensity: f64, intensity_error: f64) -> Self {
        Self {
            energy_kev,
            intensity,
            intensity_error,
        }
    }

    pub fn validate(&self) -> EstimationResult<()> {
        if !(self.energy_kev.is_finite() && self.energy_kev > 0.0) {
            return Err(EstimationError::domain(
                "emission line energy (keV)",
                self.energy_kev,
            ));
        }
        if !(self.intensity.is_finite() && self.intensity > 0.0) {
            return Err(EstimationError::invalid_measurement(
                "incident relative intensity",
                self.intensity,
            ));
        }
        if !(self.intensity_error.is_finite() && self.intensity_error >= 0.0) {
            return Err(EstimationError::invalid_measurement(
                "incident intensity error",
                self.intensity_error,
            ));
        }
        Ok(())
    }
}

/// One layer of housing material. Layers of the same material stay separate
/// entries; their thickness errors are independent.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialLayer {
    pub material: String,
    #[serde(rename = "thickness")]
    pub thickness_mm: f64,
    #[serde(rename = "thicknessError", default)]
    pub thickness_error_mm: f64,
}

impl MaterialLayer {
    pub fn new(material: impl Into<String>, thickness_mm: f64, thickness_error_mm: f64) -> Self {
        Self {
            material: material.into(),
            thickness_mm,
            thickness_error_mm,
        }
    }

    /// Infinite thickness is accepted and means total attenuation.
    pub fn validate(&self) -> EstimationResult<()> {
        if self.thickness_mm.is_nan() || self.thickness_mm < 0.0 {
            return Err(EstimationError::invalid_measurement(
                "layer thickness (mm)",
                self.thickness_mm,
            ));
        }
        if !(self.thickness_error_mm.is_finite() && self.thickness_error_mm >= 0.0) {
            return Err(EstimationError::invalid_measurement(
                "layer thickness error (mm)",
                self.thickness_error_mm,
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CorrectedLine {
    #[serde(rename = "energy")]
    pub energy_kev: f64,
    pub intensity: f64,
    pub intensity_error: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakEstimate {
    #[serde(rename = "peakEnergy")]
    pub peak_energy_kev: f64,
    #[serde(rename = "peakEnergyError")]
    pub peak_energy_error_kev: f64,
}
