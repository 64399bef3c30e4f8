//! Unit conversions shared by the attenuation and layer models.
//!
//! Layer thicknesses arrive in millimetres while mass attenuation coefficients
//! are tabulated in cm²/g, and reference tables are commonly published in MeV.

pub const MM_PER_CM: f64 = 10.0;
pub const KEV_PER_MEV: f64 = 1_000.0;

pub const fn mm_to_cm(millimetres: f64) -> f64 {
    millimetres / MM_PER_CM
}
