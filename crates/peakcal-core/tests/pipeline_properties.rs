use peakcal_core::domain::{
    DegenerateReason, EmissionLine, EstimationError, EstimationResult, MaterialLayer,
    ReferenceEntry, PropagationMode,
};
use peakcal_core::pipeline::{attenuate, estimate_peak, estimate_peak_energy};
use peakcal_core::reference::{MaterialId, MaterialSource};

/// Power-law material source, `μ(E) = scale · E^exponent`.
struct PowerLawSource {
    materials: Vec<(&'static str, f64, f64, f64)>,
}

impl PowerLawSource {
    fn housing() -> Self {
        Self {
            materials: vec![("al", 2.6989, 2.0e4, -2.9), ("mylar", 1.39, 1.5e3, -2.6)],
        }
    }

    fn find(&self, material: &MaterialId) -> Option<&(&'static str, f64, f64, f64)> {
        self.materials
            .iter()
            .find(|(name, ..)| *name == material.as_str())
    }
}

impl MaterialSource for PowerLawSource {
    fn density(&self, material: &MaterialId) -> EstimationResult<f64> {
        self.find(material)
            .map(|(_, density, ..)| *density)
            .ok_or_else(|| {
                EstimationError::unknown_material(material.as_str(), ReferenceEntry::Density)
            })
    }

    fn attenuation_coefficient(
        &self,
        material: &MaterialId,
        energy_kev: f64,
    ) -> EstimationResult<f64> {
        let (_, _, scale, exponent) = self.find(material).ok_or_else(|| {
            EstimationError::unknown_material(material.as_str(), ReferenceEntry::AttenuationTable)
        })?;
        Ok(scale * energy_kev.powf(*exponent))
    }
}

#[test]
fn pipeline_accepts_any_material_source() {
    let source = PowerLawSource::housing();
    let lines = [
        EmissionLine::new(22.163, 29.3, 0.4),
        EmissionLine::new(21.990, 15.5, 0.3),
        EmissionLine::new(24.943, 7.9, 0.2),
    ];
    let layers = [
        MaterialLayer::new("Mylar", 0.1, 0.01),
        MaterialLayer::new("Al", 0.2, 0.02),
    ];

    let estimation =
        estimate_peak(&lines, &layers, &source, PropagationMode::Corrected).expect("estimate");
    assert_eq!(estimation.corrected_lines.len(), 3);
    for (line, corrected) in lines.iter().zip(&estimation.corrected_lines) {
        assert_eq!(corrected.energy_kev, line.energy_kev);
        assert!(corrected.intensity < line.intensity);
        assert!(corrected.intensity_error > 0.0);
    }

    // Attenuation falls with energy, so the corrected centroid sits above the
    // unattenuated one.
    let bare = estimate_peak_energy(&lines, &[], &source, PropagationMode::Corrected)
        .expect("bare estimate");
    assert!(estimation.estimate.peak_energy_kev > bare.peak_energy_kev);
    assert!(estimation.estimate.peak_energy_kev < 24.943);
}

#[test]
fn layer_model_with_empty_stack_is_identity() {
    let source = PowerLawSource::housing();
    for energy in [1.0, 17.5, 662.0] {
        let model = attenuate(energy, &[], &source).expect("model");
        assert_eq!(model.transmission, 1.0);
        assert_eq!(model.thickness_error_cm, 0.0);
    }
}

#[test]
fn layer_errors_surface_before_any_averaging() {
    let source = PowerLawSource::housing();
    let lines = [EmissionLine::new(22.163, 29.3, 0.4)];

    let error = estimate_peak_energy(
        &lines,
        &[MaterialLayer::new("kapton", 0.05, 0.0)],
        &source,
        PropagationMode::Faithful,
    )
    .expect_err("unknown material");
    assert_eq!(
        error,
        EstimationError::unknown_material("kapton", ReferenceEntry::Density)
    );

    let error = estimate_peak_energy(
        &lines,
        &[MaterialLayer::new("al", -0.1, 0.0)],
        &source,
        PropagationMode::Faithful,
    )
    .expect_err("negative thickness");
    assert!(matches!(error, EstimationError::InvalidMeasurement { .. }));
}

#[test]
fn fully_attenuated_peak_is_degenerate() {
    let source = PowerLawSource::housing();
    let error = estimate_peak_energy(
        &[EmissionLine::new(5.9, 100.0, 1.0), EmissionLine::new(6.49, 20.0, 0.5)],
        &[MaterialLayer::new("al", f64::INFINITY, 0.0)],
        &source,
        PropagationMode::Faithful,
    )
    .expect_err("no intensity survives");
    assert_eq!(
        error,
        EstimationError::DegenerateInput {
            reason: DegenerateReason::ZeroTotalIntensity
        }
    );
}
