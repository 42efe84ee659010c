use serde::{Deserialize, Serialize};

use crate::error::{MatchError, Result};

// Constants

// Tolerances
pub const LATTICE_TOLERANCE: f64 = 1e-10; // Minimum |a x b| / (|a| |b|) of a usable lattice

// Angles
pub const FULL_TURN_DEGREES: f64 = 360.0;

/// Parameters of a matching run.
///
/// Every field is required; in particular there is no default angular resolution, since the
/// step size trades search time against how closely the relative rotation can be resolved.
///
/// ```toml
/// max_supercell_size = 100
/// max_error = 0.01
/// angle_step_degrees = 1.0
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Upper bound on the rationalized supercell multiplicities.
    pub max_supercell_size: u32,
    /// Relative tolerance on the rationalized area ratio, in (0, 1).
    pub max_error: f64,
    /// Resolution of the rotation sweep over [0°, 360°).
    pub angle_step_degrees: f64,
}

impl MatchConfig {
    pub fn new(max_supercell_size: u32, max_error: f64, angle_step_degrees: f64) -> Self {
        MatchConfig {
            max_supercell_size,
            max_error,
            angle_step_degrees,
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(s: &str) -> Result<Self> {
        let config: MatchConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        validate_max_supercell_size(self.max_supercell_size)
            .and_then(|_| validate_max_error(self.max_error))
            .and_then(|_| validate_angle_step(self.angle_step_degrees))
            .map_err(|e| match e {
                MatchError::InvalidInput(msg) => MatchError::Config(msg),
                other => other,
            })
    }
}

pub(crate) fn validate_max_supercell_size(max_supercell_size: u32) -> Result<()> {
    if max_supercell_size == 0 {
        return Err(MatchError::invalid_input(
            "max_supercell_size must be at least 1",
        ));
    }
    Ok(())
}

pub(crate) fn validate_max_error(max_error: f64) -> Result<()> {
    if !max_error.is_finite() || max_error <= 0.0 || max_error >= 1.0 {
        return Err(MatchError::invalid_input(format!(
            "max_error must lie in (0, 1), got {max_error}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_angle_step(step_degrees: f64) -> Result<()> {
    if !step_degrees.is_finite() || step_degrees <= 0.0 || step_degrees > FULL_TURN_DEGREES {
        return Err(MatchError::invalid_input(format!(
            "angle step must lie in (0, {FULL_TURN_DEGREES}] degrees, got {step_degrees}"
        )));
    }
    Ok(())
}
