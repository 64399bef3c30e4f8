use std::error::Error;
use std::fmt::{Display, Formatter};

pub type PeakcalResult<T> = Result<T, PeakcalError>;
pub type EstimationResult<T> = Result<T, EstimationError>;

/// Failure class of a run; fixes the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeakcalErrorCategory {
    InputValidationError,
    IoSystemError,
    ComputationError,
    InternalError,
}

impl PeakcalErrorCategory {
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::InputValidationError => 2,
            Self::IoSystemError => 3,
            Self::ComputationError => 4,
            Self::InternalError => 5,
        }
    }

    pub const fn rust_category(self) -> &'static str {
        match self {
            Self::InputValidationError => "InputValidationError",
            Self::IoSystemError => "IoSystemError",
            Self::ComputationError => "ComputationError",
            Self::InternalError => "InternalError",
        }
    }
}

/// Workspace-wide error carried out to the CLI: a category that fixes the
/// process exit code, a stable diagnostic placeholder, and a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeakcalError {
    category: PeakcalErrorCategory,
    placeholder: &'static str,
    message: String,
}

impl PeakcalError {
    pub fn new(
        category: PeakcalErrorCategory,
        placeholder: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            category,
            placeholder,
            message: message.into(),
        }
    }

    pub fn input_validation(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(
            PeakcalErrorCategory::InputValidationError,
            placeholder,
            message,
        )
    }

    pub fn io_system(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PeakcalErrorCategory::IoSystemError, placeholder, message)
    }

    pub fn internal(placeholder: &'static str, message: impl Into<String>) -> Self {
        Self::new(PeakcalErrorCategory::InternalError, placeholder, message)
    }

    /// Wraps an estimation failure, prefixing the message with the peak it
    /// belongs to.
    pub fn for_peak(label: &str, error: &EstimationError) -> Self {
        Self::new(
            error.category(),
            error.placeholder(),
            format!("peak '{label}': {error}"),
        )
    }

    pub const fn category(&self) -> PeakcalErrorCategory {
        self.category
    }

    pub const fn placeholder(&self) -> &'static str {
        self.placeholder
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn exit_code(&self) -> i32 {
        self.category.exit_code()
    }

    pub fn diagnostic_line(&self) -> String {
        format!("ERROR: [{}] {}", self.placeholder, self.message)
    }

    pub fn fatal_exit_line(&self) -> String {
        format!("FATAL EXIT CODE: {}", self.exit_code())
    }
}

impl Display for PeakcalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}",
            self.category.rust_category(),
            self.placeholder,
            self.message
        )
    }
}

impl Error for PeakcalError {}

impl From<EstimationError> for PeakcalError {
    fn from(error: EstimationError) -> Self {
        Self::new(error.category(), error.placeholder(), error.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceEntry {
    Density,
    AttenuationTable,
}

impl Display for ReferenceEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Density => f.write_str("density entry"),
            Self::AttenuationTable => f.write_str("attenuation table"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DegenerateReason {
    NoLines,
    ZeroTotalIntensity,
}

impl Display for DegenerateReason {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoLines => f.write_str("no emission lines supplied"),
            Self::ZeroTotalIntensity => {
                f.write_str("total corrected intensity is zero (peak fully attenuated)")
            }
        }
    }
}

/// Failures of the estimation pipeline itself. Every variant is an input
/// problem; nothing here is transient.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    #[error("log-space interpolation is undefined for {quantity} = {value}")]
    Domain { quantity: &'static str, value: f64 },
    #[error("material '{material}' has no {missing}")]
    UnknownMaterial {
        material: String,
        missing: ReferenceEntry,
    },
    #[error("degenerate input: {reason}")]
    DegenerateInput { reason: DegenerateReason },
    #[error("invalid {quantity} = {value}")]
    InvalidMeasurement { quantity: &'static str, value: f64 },
    #[error("invalid attenuation table: {reason}")]
    InvalidTable { reason: String },
    #[error("material '{material}' has more than one {entry}")]
    DuplicateMaterial {
        material: String,
        entry: ReferenceEntry,
    },
}

impl EstimationError {
    pub fn domain(quantity: &'static str, value: f64) -> Self {
        Self::Domain { quantity, value }
    }

    pub fn unknown_material(material: impl Into<String>, missing: ReferenceEntry) -> Self {
        Self::UnknownMaterial {
            material: material.into(),
            missing,
        }
    }

    pub fn invalid_measurement(quantity: &'static str, value: f64) -> Self {
        Self::InvalidMeasurement { quantity, value }
    }

    pub fn invalid_table(reason: impl Into<String>) -> Self {
        Self::InvalidTable {
            reason: reason.into(),
        }
    }

    pub fn duplicate_material(material: impl Into<String>, entry: ReferenceEntry) -> Self {
        Self::DuplicateMaterial {
            material: material.into(),
            entry,
        }
    }

    pub const fn category(&self) -> PeakcalErrorCategory {
        match self {
            Self::DegenerateInput { .. } => PeakcalErrorCategory::ComputationError,
            _ => PeakcalErrorCategory::InputValidationError,
        }
    }

    pub const fn placeholder(&self) -> &'static str {
        match self {
            Self::Domain { .. } => "INPUT.DOMAIN",
            Self::UnknownMaterial { .. } => "INPUT.UNKNOWN_MATERIAL",
            Self::DegenerateInput { .. } => "RUN.DEGENERATE_INPUT",
            Self::InvalidMeasurement { .. } => "INPUT.INVALID_MEASUREMENT",
            Self::InvalidTable { .. } => "INPUT.INVALID_TABLE",
            Self::DuplicateMaterial { .. } => "INPUT.DUPLICATE_MATERIAL",
        }
    }
}
