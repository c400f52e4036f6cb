//! Statistics derived from a finished fit.
//!
//! All of these read the fitter's inverse Hessian and residuum at its
//! current parameters. With `n` data points and `p` parameters the degrees
//! of freedom are `n − p`; when `n ≤ p` the divisions are still carried out
//! and yield infinite or NaN values.

use log::warn;
use lsfit_core::{Fitter, packed};

use crate::{Error, FitTask};

impl<F: Fitter, D: ?Sized> FitTask<'_, F, D> {
    /// Returns the standard errors of all parameters.
    ///
    /// `error_i = sqrt(H⁻¹[i,i]·s)` with `s = 1` when `use_variance_covariance`
    /// is false, which is right if the residuals were already weighted by
    /// `1/σ`. Otherwise `s = residuum/(n − p)`, estimating the variance from
    /// the residuum.
    ///
    /// Fixed parameters get a zero error when the fitter reports a zero
    /// diagonal for them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] without a model,
    /// [`Error::NoInverseHessian`] if the fitter cannot provide the inverse
    /// Hessian and [`Error::NoResiduum`] if `use_variance_covariance` is set
    /// and the fitter has no residuum.
    pub fn param_errors(&mut self, use_variance_covariance: bool) -> Result<Vec<f64>, Error> {
        let n = self.n_params();
        let scale = self.error_scale(use_variance_covariance)?;
        let inv = self.inverse_hessian()?;
        Ok((0..n)
            .map(|i| (packed::get(inv, i, i) * scale).sqrt())
            .collect())
    }

    /// Returns the standard error of parameter `i`.
    ///
    /// See [`param_errors`](Self::param_errors).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] without a model and
    /// [`Error::ParamIndex`] if `i` is out of range, otherwise the same errors
    /// as [`param_errors`](Self::param_errors).
    pub fn param_error(&mut self, i: usize, use_variance_covariance: bool) -> Result<f64, Error> {
        self.problem.require_configured()?;
        let nparams = self.n_params();
        if i >= nparams {
            return Err(Error::ParamIndex { index: i, nparams });
        }
        let scale = self.error_scale(use_variance_covariance)?;
        let inv = self.inverse_hessian()?;
        Ok((packed::get(inv, i, i) * scale).sqrt())
    }

    /// Returns the packed parameter correlation matrix.
    ///
    /// `c[i,j] = H⁻¹[i,j]/(sqrt(H⁻¹[i,i])·sqrt(H⁻¹[j,j]))` with the diagonal
    /// set to exactly 1.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] without a model and
    /// [`Error::NoInverseHessian`] if the fitter cannot provide the inverse
    /// Hessian.
    pub fn correlations(&mut self) -> Result<Vec<f64>, Error> {
        let n = self.n_params();
        let inv = self.inverse_hessian()?;

        let mut corr = vec![0.0; packed::len(n)];
        for i in 0..n {
            let sii = packed::get(inv, i, i).sqrt();
            for j in 0..i {
                let sjj = packed::get(inv, j, j).sqrt();
                *packed::get_mut(&mut corr, i, j) = packed::get(inv, i, j) / (sii * sjj);
            }
            *packed::get_mut(&mut corr, i, i) = 1.0;
        }
        Ok(corr)
    }

    /// Returns `chi = sqrt(residuum/(n − p))`.
    ///
    /// It is close to 1 for a good fit when the residuals are weighted by
    /// `1/σ`; with other weighting it is only a relative measure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] without a model and
    /// [`Error::NoResiduum`] if the fitter has no residuum.
    pub fn chi(&self) -> Result<f64, Error> {
        Ok(self.variance()?.sqrt())
    }

    /// Residuum per degree of freedom.
    fn variance(&self) -> Result<f64, Error> {
        self.problem.require_configured()?;
        let residuum = self
            .fitter_ref()
            .and_then(Fitter::residuum)
            .ok_or(Error::NoResiduum)?;
        let dof = self.n_data() as f64 - self.n_params() as f64;
        Ok(residuum / dof)
    }

    fn error_scale(&self, use_variance_covariance: bool) -> Result<f64, Error> {
        if use_variance_covariance {
            self.variance()
        } else {
            self.problem.require_configured()?;
            Ok(1.0)
        }
    }

    /// Loads the fitter's inverse Hessian into the workspace matrix.
    fn inverse_hessian(&mut self) -> Result<&[f64], Error> {
        self.problem.require_configured()?;
        let matrix = &mut self.problem.workspace.matrix;
        let available = self
            .fitter
            .as_mut()
            .is_some_and(|fitter| fitter.inverse_hessian(matrix));
        if !available {
            warn!("inverse Hessian is not available");
            return Err(Error::NoInverseHessian);
        }
        Ok(&self.problem.workspace.matrix)
    }
}
