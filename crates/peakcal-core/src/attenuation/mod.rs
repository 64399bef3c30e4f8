//! Mass attenuation coefficient lookup for a single material.
//!
//! Coefficients fall off roughly as a power law in photon energy between
//! absorption edges, so the table is interpolated linearly in `ln μ` against
//! `ln E`. Points outside the tabulated range are extrapolated along the
//! nearest end segment in log-log space.

use crate::common::constants::KEV_PER_MEV;
use crate::domain::{EstimationError, EstimationResult};
use crate::numerics::interpolate_linear_extrapolated;
use serde::{Deserialize, Serialize};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
pub enum EnergyUnit {
    #[default]
    #[serde(rename = "keV", alias = "kev")]
    KeV,
    #[serde(rename = "MeV", alias = "mev")]
    MeV,
}

impl EnergyUnit {
    pub const fn kev_per_unit(self) -> f64 {
        match self {
            Self::KeV => 1.0,
            Self::MeV => KEV_PER_MEV,
        }
    }
}

/// Tabulated `(energy keV, μ/ρ cm²/g)` pairs for one material, with the log
/// axes precomputed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct AttenuationTable {
    energies_kev: Vec<f64>,
    coefficients: Vec<f64>,
    log_energies: Vec<f64>,
    log_coefficients: Vec<f64>,
}

impl AttenuationTable {
    /// Builds a table from points whose energies are already in keV.
    pub fn new(points: impl IntoIterator<Item = (f64, f64)>) -> EstimationResult<Self> {
        Self::with_unit(points, EnergyUnit::KeV)
    }

    pub fn with_unit(
        points: impl IntoIterator<Item = (f64, f64)>,
        unit: EnergyUnit,
    ) -> EstimationResult<Self> {
        let (energies_kev, coefficients): (Vec<f64>, Vec<f64>) = points
            .into_iter()
            .map(|(energy, coefficient)| (energy * unit.kev_per_unit(), coefficient))
            .unzip();
        Self::from_columns(energies_kev, coefficients)
    }

    pub fn from_columns(energies_kev: Vec<f64>, coefficients: Vec<f64>) -> EstimationResult<Self> {
        if energies_kev.len() != coefficients.len() {
            return Err(EstimationError::invalid_table(format!(
                "{} energies but {} coefficients",
                energies_kev.len(),
                coefficients.len()
            )));
        }
        if energies_kev.len() < 2 {
            return Err(EstimationError::invalid_table(format!(
                "at least two points are required, found {}",
                energies_kev.len()
            )));
        }

        if let Some(&energy) = energies_kev
            .iter()
            .find(|energy| !(energy.is_finite() && **energy > 0.0))
        {
            return Err(EstimationError::domain("tabulated energy (keV)", energy));
        }
        if let Some(&coefficient) = coefficients
            .iter()
            .find(|coefficient| !(coefficient.is_finite() && **coefficient > 0.0))
        {
            return Err(EstimationError::domain(
                "tabulated attenuation coefficient",
                coefficient,
            ));
        }

        if let Some(index) = energies_kev
            .windows(2)
            .position(|window| window[1] < window[0])
        {
            return Err(EstimationError::invalid_table(format!(
                "energies must be non-decreasing, {} keV follows {} keV",
                energies_kev[index + 1],
                energies_kev[index]
            )));
        }

        let log_energies = energies_kev.iter().map(|energy| energy.ln()).collect();
        let log_coefficients = coefficients
            .iter()
            .map(|coefficient| coefficient.ln())
            .collect();

        Ok(Self {
            energies_kev,
            coefficients,
            log_energies,
            log_coefficients,
        })
    }

    /// Number of tabulated points; never below two.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.energies_kev.len()
    }

    pub fn energies_kev(&self) -> &[f64] {
        &self.energies_kev
    }

    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Mass attenuation coefficient at `energy_kev`, in the table's units.
    ///
    /// Exact at tabulated energies; at a repeated (edge) energy the first entry
    /// is returned.
    pub fn coefficient_at(&self, energy_kev: f64) -> EstimationResult<f64> {
        if !(energy_kev.is_finite() && energy_kev > 0.0) {
            return Err(EstimationError::domain("photon energy (keV)", energy_kev));
        }

        let node = self.energies_kev.partition_point(|energy| *energy < energy_kev);
        if self.energies_kev.get(node) == Some(&energy_kev) {
            return Ok(self.coefficients[node]);
        }

        let log_coefficient = interpolate_linear_extrapolated(
            energy_kev.ln(),
            &self.log_energies,
            &self.log_coefficients,
        )
        .ok_or_else(|| EstimationError::invalid_table("log-log grid rejected by interpolator"))?;
        let coefficient = log_coefficient.exp();

        trace!(energy_kev, coefficient, "interpolated mass attenuation coefficient");
        Ok(coefficient)
    }
}
