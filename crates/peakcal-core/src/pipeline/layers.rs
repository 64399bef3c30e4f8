use crate::common::constants::mm_to_cm;
use crate::domain::{EstimationResult, MaterialLayer};
use crate::reference::{MaterialId, MaterialSource};
use std::collections::BTreeMap;

/// One housing layer evaluated at a single photon energy.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerContribution {
    pub material: MaterialId,
    pub attenuation_coefficient: f64,
    pub density: f64,
    pub thickness_cm: f64,
    pub thickness_error_cm: f64,
}

impl LayerContribution {
    /// Linear attenuation coefficient `μ·ρ` in 1/cm.
    pub fn linear_attenuation(&self) -> f64 {
        self.attenuation_coefficient * self.density
    }

    pub fn transmission(&self) -> f64 {
        (-self.linear_attenuation() * self.thickness_cm).exp()
    }
}

/// `(μ, ρ)` of a material as used for the single-derivative thickness term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveAttenuation {
    pub attenuation_coefficient: f64,
    pub density: f64,
}

impl EffectiveAttenuation {
    pub fn linear_attenuation(&self) -> f64 {
        self.attenuation_coefficient * self.density
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerAttenuation {
    pub energy_kev: f64,
    /// Beer-Lambert product over every layer.
    pub transmission: f64,
    /// Quadrature sum of all layer thickness errors, in cm.
    pub thickness_error_cm: f64,
    pub layers: Vec<LayerContribution>,
    /// Material evaluated last; `None` for an empty stack.
    pub last_evaluated: Option<EffectiveAttenuation>,
}

impl LayerAttenuation {
    pub fn unattenuated(energy_kev: f64) -> Self {
        Self {
            energy_kev,
            transmission: 1.0,
            thickness_error_cm: 0.0,
            layers: Vec::new(),
            last_evaluated: None,
        }
    }
}

/// Evaluates the layer stack at `energy_kev`.
///
/// Layers are grouped by material in order of first appearance; each material
/// is looked up once, then every layer of it is applied. The last group
/// processed supplies [`LayerAttenuation::last_evaluated`].
pub fn attenuate<S>(
    energy_kev: f64,
    layers: &[MaterialLayer],
    source: &S,
) -> EstimationResult<LayerAttenuation>
where
    S: MaterialSource + ?Sized,
{
    let mut groups: Vec<(MaterialId, Vec<&MaterialLayer>)> = Vec::new();
    let mut group_index: BTreeMap<MaterialId, usize> = BTreeMap::new();
    for layer in layers {
        layer.validate()?;
        let material = MaterialId::parse(&layer.material)?;
        match group_index.get(&material) {
            Some(&index) => groups[index].1.push(layer),
            None => {
                group_index.insert(material.clone(), groups.len());
                groups.push((material, vec![layer]));
            }
        }
    }

    let mut model = LayerAttenuation::unattenuated(energy_kev);
    let mut thickness_variance = 0.0;

    for (material, members) in groups {
        let density = source.density(&material)?;
        let attenuation_coefficient = source.attenuation_coefficient(&material, energy_kev)?;

        for layer in members {
            let contribution = LayerContribution {
                material: material.clone(),
                attenuation_coefficient,
                density,
                thickness_cm: mm_to_cm(layer.thickness_mm),
                thickness_error_cm: mm_to_cm(layer.thickness_error_mm),
            };
            model.transmission *= contribution.transmission();
            thickness_variance += contribution.thickness_error_cm.powi(2);
            model.layers.push(contribution);
        }

        model.last_evaluated = Some(EffectiveAttenuation {
            attenuation_coefficient,
            density,
        });
    }

    model.thickness_error_cm = thickness_variance.sqrt();
    Ok(model)
}

#[cfg(test)]
mod tests {
    use super::{EffectiveAttenuation, attenuate};
    use crate::attenuation::AttenuationTable;
    use crate::domain::{EstimationError, MaterialLayer, ReferenceEntry};
    use crate::reference::ReferenceData;

    fn reference() -> ReferenceData {
        ReferenceData::new()
            .with_material(
                "al",
                2.6989,
                AttenuationTable::new([(100.0, 0.01), (1000.0, 0.001)]).expect("al"),
            )
            .expect("al")
            .with_material(
                "be",
                1.848,
                AttenuationTable::new([(100.0, 0.13), (1000.0, 0.056)]).expect("be"),
            )
            .expect("be")
    }

    #[test]
    fn empty_stack_transmits_everything_without_thickness_error() {
        let model = attenuate(59.5, &[], &reference()).expect("model");
        assert_eq!(model.transmission, 1.0);
        assert_eq!(model.thickness_error_cm, 0.0);
        assert!(model.layers.is_empty());
        assert_eq!(model.last_evaluated, None);
    }

    #[test]
    fn single_layer_follows_beer_lambert() {
        let layers = [MaterialLayer::new("al", 1.0, 0.0)];
        let model = attenuate(100.0, &layers, &reference()).expect("model");

        let expected = (-0.01_f64 * 2.6989 * 0.1).exp();
        assert!((model.transmission - expected).abs() < 1.0e-15);
        assert!((model.transmission - 0.99731).abs() < 1.0e-5);
        assert_eq!(model.thickness_error_cm, 0.0);
    }

    #[test]
    fn stacked_layers_multiply_and_errors_add_in_quadrature() {
        let layers = [
            MaterialLayer::new("al", 0.5, 0.3),
            MaterialLayer::new("be", 0.2, 0.0),
            MaterialLayer::new("Al", 0.5, 0.4),
        ];
        let model = attenuate(100.0, &layers, &reference()).expect("model");

        let expected = (-0.01_f64 * 2.6989 * 0.05).exp().powi(2) * (-0.13_f64 * 1.848 * 0.02).exp();
        assert!((model.transmission - expected).abs() < 1.0e-14);
        assert!((model.thickness_error_cm - 0.05).abs() < 1.0e-15);
        assert_eq!(model.layers.len(), 3);
        // Both aluminium layers are applied before beryllium.
        assert_eq!(model.layers[1].material.as_str(), "al");
        assert_eq!(model.layers[2].material.as_str(), "be");
    }

    #[test]
    fn last_evaluated_material_is_last_distinct_material_to_appear() {
        let layers = [
            MaterialLayer::new("be", 0.2, 0.01),
            MaterialLayer::new("al", 1.0, 0.01),
            MaterialLayer::new("be", 0.2, 0.01),
        ];
        let model = attenuate(100.0, &layers, &reference()).expect("model");
        assert_eq!(
            model.last_evaluated,
            Some(EffectiveAttenuation {
                attenuation_coefficient: 0.01,
                density: 2.6989,
            })
        );
    }

    #[test]
    fn unknown_material_is_reported() {
        let layers = [MaterialLayer::new("pb", 1.0, 0.0)];
        let error = attenuate(100.0, &layers, &reference()).expect_err("pb is unknown");
        assert_eq!(
            error,
            EstimationError::unknown_material("pb", ReferenceEntry::Density)
        );
    }

    #[test]
    fn infinite_thickness_attenuates_completely() {
        let layers = [MaterialLayer::new("al", f64::INFINITY, 0.0)];
        let model = attenuate(100.0, &layers, &reference()).expect("model");
        assert_eq!(model.transmission, 0.0);
    }
}
