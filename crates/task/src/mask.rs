use crate::Error;

/// Fixed/free flags for each fit parameter.
///
/// A fixed parameter gets a zero derivative, so it contributes nothing to the
/// gradient or Hessian. Keeping its value unchanged during a fit is up to the
/// fitter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterMask {
    fixed: Vec<bool>,
}

impl ParameterMask {
    /// Creates an all-free mask for `n` parameters.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            fixed: vec![false; n],
        }
    }

    /// Resizes the mask to `n` parameters and frees all of them.
    pub fn reset(&mut self, n: usize) {
        self.fixed.clear();
        self.fixed.resize(n, false);
    }

    /// Returns the number of parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fixed.len()
    }

    /// Returns true if the mask covers no parameters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fixed.is_empty()
    }

    /// Returns whether parameter `i` is fixed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParamIndex`] if `i` is out of range.
    pub fn get(&self, i: usize) -> Result<bool, Error> {
        self.fixed.get(i).copied().ok_or(Error::ParamIndex {
            index: i,
            nparams: self.len(),
        })
    }

    /// Fixes or frees parameter `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParamIndex`] if `i` is out of range.
    pub fn set(&mut self, i: usize, fixed: bool) -> Result<(), Error> {
        let nparams = self.len();
        let flag = self
            .fixed
            .get_mut(i)
            .ok_or(Error::ParamIndex { index: i, nparams })?;
        *flag = fixed;
        Ok(())
    }

    /// Sets all flags at once; `None` frees every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `flags` does not have one entry
    /// per parameter.
    pub fn set_all(&mut self, flags: Option<&[bool]>) -> Result<(), Error> {
        match flags {
            Some(flags) if flags.len() != self.len() => Err(Error::LengthMismatch {
                expected: self.len(),
                actual: flags.len(),
            }),
            Some(flags) => {
                self.fixed.copy_from_slice(flags);
                Ok(())
            }
            None => {
                self.fixed.fill(false);
                Ok(())
            }
        }
    }

    /// Returns the flags as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.fixed
    }

    /// Returns the number of fixed parameters.
    #[must_use]
    pub fn fixed_count(&self) -> usize {
        self.fixed.iter().filter(|&&f| f).count()
    }
}
