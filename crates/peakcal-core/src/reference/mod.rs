//! Reference data shared read-only by every estimation run: attenuation
//! tables and material densities, keyed by normalised material identifier.

use crate::attenuation::AttenuationTable;
use crate::domain::{EstimationError, EstimationResult, ReferenceEntry};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Material identifier, trimmed and ASCII lower-cased so that `"Al"` and
/// `" al "` name the same entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(String);

impl MaterialId {
    pub fn parse(raw: &str) -> EstimationResult<Self> {
        let normalized = raw.trim();
        if normalized.is_empty() {
            return Err(EstimationError::unknown_material(
                raw,
                ReferenceEntry::Density,
            ));
        }
        Ok(Self(normalized.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for MaterialId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of per-material physical data for the layer model.
pub trait MaterialSource {
    /// Density in g/cm³.
    fn density(&self, material: &MaterialId) -> EstimationResult<f64>;

    /// Mass attenuation coefficient in cm²/g at `energy_kev`.
    fn attenuation_coefficient(
        &self,
        material: &MaterialId,
        energy_kev: f64,
    ) -> EstimationResult<f64>;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DensityRegistry {
    densities: BTreeMap<MaterialId, f64>,
}

impl DensityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, material: &str, density: f64) -> EstimationResult<()> {
        if !(density.is_finite() && density > 0.0) {
            return Err(EstimationError::invalid_measurement(
                "material density (g/cm3)",
                density,
            ));
        }
        let material = MaterialId::parse(material)?;
        if self.densities.contains_key(&material) {
            return Err(EstimationError::duplicate_material(
                material.as_str(),
                ReferenceEntry::Density,
            ));
        }
        self.densities.insert(material, density);
        Ok(())
    }

    pub fn get(&self, material: &MaterialId) -> Option<f64> {
        self.densities.get(material).copied()
    }

    pub fn contains(&self, material: &MaterialId) -> bool {
        self.densities.contains_key(material)
    }

    pub fn len(&self) -> usize {
        self.densities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }
}

/// Attenuation tables plus density registry, loaded once per session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceData {
    tables: BTreeMap<MaterialId, AttenuationTable>,
    densities: DensityRegistry,
}

impl ReferenceData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a table. Identifiers that normalise to an existing entry are
    /// rejected rather than replaced.
    pub fn insert_table(&mut self, material: &str, table: AttenuationTable) -> EstimationResult<()> {
        let material = MaterialId::parse(material)?;
        if self.tables.contains_key(&material) {
            return Err(EstimationError::duplicate_material(
                material.as_str(),
                ReferenceEntry::AttenuationTable,
            ));
        }
        self.tables.insert(material, table);
        Ok(())
    }

    pub fn insert_density(&mut self, material: &str, density: f64) -> EstimationResult<()> {
        self.densities.insert(material, density)
    }

    pub fn with_material(
        mut self,
        material: &str,
        density: f64,
        table: AttenuationTable,
    ) -> EstimationResult<Self> {
        self.insert_density(material, density)?;
        self.insert_table(material, table)?;
        Ok(self)
    }

    pub fn table(&self, material: &MaterialId) -> EstimationResult<&AttenuationTable> {
        self.tables.get(material).ok_or_else(|| {
            EstimationError::unknown_material(material.as_str(), ReferenceEntry::AttenuationTable)
        })
    }

    pub fn densities(&self) -> &DensityRegistry {
        &self.densities
    }

    /// Materials that have both a density and an attenuation table.
    pub fn complete_materials(&self) -> impl Iterator<Item = &MaterialId> {
        self.tables
            .keys()
            .filter(|material| self.densities.contains(material))
    }

    /// Convenience lookup by raw identifier.
    pub fn coefficient_for(&self, material: &str, energy_kev: f64) -> EstimationResult<f64> {
        self.attenuation_coefficient(&MaterialId::parse(material)?, energy_kev)
    }
}

impl MaterialSource for ReferenceData {
    fn density(&self, material: &MaterialId) -> EstimationResult<f64> {
        self.densities.get(material).ok_or_else(|| {
            EstimationError::unknown_material(material.as_str(), ReferenceEntry::Density)
        })
    }

    fn attenuation_coefficient(
        &self,
        material: &MaterialId,
        energy_kev: f64,
    ) -> EstimationResult<f64> {
        self.table(material)?.coefficient_at(energy_kev)
    }
}
