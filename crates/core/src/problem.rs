use thiserror::Error;

/// A model evaluation failed at one data point.
///
/// The failing point aborts the whole residuum or gradient pass, so this
/// carries only the index where it happened.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("model evaluation failed at data point {index}")]
pub struct EvalError {
    /// Index of the data point that failed.
    pub index: usize,
}

impl EvalError {
    /// Creates an error for the data point `index`.
    #[must_use]
    pub fn at(index: usize) -> Self {
        Self { index }
    }
}

/// Defines a weighted least-squares problem an optimizer can minimize.
///
/// A problem maps a parameter vector to the sum of squared residuals and
/// supplies the gradient and Gauss–Newton Hessian of that sum. Optimizers
/// call these methods at trial parameters; the problem never keeps its own
/// copy of "current" parameters.
///
/// Both methods take `&mut self` so implementations can reuse scratch
/// buffers between calls.
pub trait LeastSquaresProblem {
    /// Returns the number of parameters the problem expects.
    fn n_params(&self) -> usize;

    /// Computes the sum of squared (weighted) residuals at `params`.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] for the first data point whose evaluation fails.
    fn residuum(&mut self, params: &[f64]) -> Result<f64, EvalError>;

    /// Computes the gradient `Jᵀr` and the packed Hessian approximation `JᵀJ`
    /// at `params`.
    ///
    /// `gradient` has length `n_params()` and `hessian` has length
    /// [`packed::len`](crate::packed::len)`(n_params())`. Both are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError`] for the first data point whose evaluation fails.
    /// The output buffers hold no meaningful values in that case.
    fn gradient(
        &mut self,
        params: &[f64],
        gradient: &mut [f64],
        hessian: &mut [f64],
    ) -> Result<(), EvalError>;
}
