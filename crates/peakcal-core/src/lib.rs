//! Weighted peak-energy estimation for detector gain calibration.
//!
//! A histogram peak is modelled as a blend of emission lines, each attenuated by
//! the detector housing before it reaches the crystal. The crate interpolates
//! mass attenuation coefficients in log-log space, applies Beer-Lambert
//! attenuation across a layer stack, and returns the intensity-weighted peak
//! energy with first-order uncertainty propagation.

pub mod attenuation;
pub mod common;
pub mod domain;
pub mod numerics;
pub mod pipeline;
pub mod reference;
pub mod request;

pub use attenuation::{AttenuationTable, EnergyUnit};
pub use domain::{
    CorrectedLine, EmissionLine, EstimationError, EstimationResult, EstimatorConfig,
    MaterialLayer, PeakEstimate, PeakcalError, PeakcalResult, PropagationMode,
};
pub use pipeline::{estimate_peak, estimate_peak_energy};
pub use reference::{DensityRegistry, MaterialId, MaterialSource, ReferenceData};
