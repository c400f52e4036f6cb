use thiserror::Error;

/// Step sizes used for central-difference derivatives.
///
/// The step for parameter `j` is `relative·|p_j|` when `p_j` is nonzero and
/// `zero` otherwise, so a parameter sitting exactly at zero is still
/// perturbed. The zero step is absolute and does not adapt to the scale of
/// the parameter; parameters that are naturally many orders of magnitude
/// away from 1 may need a custom value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepConfig {
    relative: f64,
    zero: f64,
}

/// Errors that can occur when validating a step config.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StepConfigError {
    #[error("relative step must be finite and positive")]
    Relative,

    #[error("zero step must be finite and positive")]
    Zero,
}

impl Default for StepConfig {
    fn default() -> Self {
        // Known-good values, unwrap is safe
        Self::new(1e-5, 1e-9).unwrap()
    }
}

impl StepConfig {
    /// Creates a new config with validated step sizes.
    ///
    /// # Errors
    ///
    /// Returns an error if either step is non-positive or non-finite.
    pub fn new(relative: f64, zero: f64) -> Result<Self, StepConfigError> {
        if !relative.is_finite() || relative <= 0.0 {
            return Err(StepConfigError::Relative);
        }
        if !zero.is_finite() || zero <= 0.0 {
            return Err(StepConfigError::Zero);
        }

        Ok(Self { relative, zero })
    }

    /// Returns the relative step factor.
    #[must_use]
    pub fn relative(&self) -> f64 {
        self.relative
    }

    /// Returns the step used for parameters equal to zero.
    #[must_use]
    pub fn zero(&self) -> f64 {
        self.zero
    }

    /// Returns the step for a parameter with value `param`.
    #[must_use]
    pub fn step(&self, param: f64) -> f64 {
        if param == 0.0 {
            self.zero
        } else {
            self.relative * param.abs()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn default_steps() {
        let config = StepConfig::default();
        assert_relative_eq!(config.step(2.0), 2e-5);
        assert_relative_eq!(config.step(-300.0), 3e-3);
        assert_relative_eq!(config.step(0.0), 1e-9);
    }

    #[test]
    fn rejects_bad_steps() {
        assert_eq!(StepConfig::new(0.0, 1e-9), Err(StepConfigError::Relative));
        assert_eq!(StepConfig::new(f64::NAN, 1e-9), Err(StepConfigError::Relative));
        assert_eq!(StepConfig::new(1e-5, -1.0), Err(StepConfigError::Zero));
        assert_eq!(StepConfig::new(1e-5, f64::INFINITY), Err(StepConfigError::Zero));
    }
}
