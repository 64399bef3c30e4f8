use crate::attenuation::{AttenuationTable, EnergyUnit};
use crate::domain::{EmissionLine, EstimationResult, EstimatorConfig, MaterialLayer};
use crate::reference::ReferenceData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDocument {
    #[serde(default)]
    pub energy_unit: EnergyUnit,
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeakRequest {
    #[serde(default)]
    pub label: Option<String>,
    pub lines: Vec<EmissionLine>,
    #[serde(default)]
    pub layers: Vec<MaterialLayer>,
}

impl PeakRequest {
    /// Explicit label, or `peak <n>` counting from one.
    pub fn display_label(&self, index: usize) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("peak {}", index + 1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationRequest {
    #[serde(default)]
    pub config: EstimatorConfig,
    #[serde(default)]
    pub densities: BTreeMap<String, f64>,
    #[serde(default)]
    pub attenuation_tables: BTreeMap<String, TableDocument>,
    #[serde(default)]
    pub peaks: Vec<PeakRequest>,
}

impl CalibrationRequest {
    pub fn reference_data(&self) -> EstimationResult<ReferenceData> {
        let mut reference = ReferenceData::new();
        for (material, density) in &self.densities {
            reference.insert_density(material, *density)?;
        }
        for (material, document) in &self.attenuation_tables {
            let table =
                AttenuationTable::with_unit(document.points.iter().copied(), document.energy_unit)?;
            reference.insert_table(material, table)?;
        }
        Ok(reference)
    }
}
