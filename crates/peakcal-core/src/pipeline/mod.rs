mod correction;
mod estimator;
mod layers;

pub use correction::{correct_line, correct_lines};
pub use estimator::{PeakEstimation, estimate_peak, estimate_peak_energy, weighted_peak_energy};
pub use layers::{EffectiveAttenuation, LayerAttenuation, LayerContribution, attenuate};
