use crate::{EvalError, LeastSquaresProblem};

/// An iterative optimizer that minimizes a [`LeastSquaresProblem`].
///
/// The fitter owns the parameter vector. Callers seed it with
/// [`set_params`](Fitter::set_params), run [`fit`](Fitter::fit) and read the
/// result back with [`params`](Fitter::params). The problem is passed to each
/// call rather than stored, so the same fitter can be driven by whichever
/// problem currently owns it.
///
/// Implementations are expected to leave parameters whose derivatives are
/// identically zero (fixed parameters) untouched.
pub trait Fitter {
    /// Returns the number of parameters.
    fn n_params(&self) -> usize;

    /// Sets the number of parameters.
    ///
    /// This invalidates any previous fit results. Parameter values need not
    /// be preserved.
    fn set_n_params(&mut self, n: usize);

    /// Returns the current parameter values.
    fn params(&self) -> &[f64];

    /// Sets the parameter values used as the starting point of the next fit.
    ///
    /// # Panics
    ///
    /// Implementations may panic if `params.len() != self.n_params()`.
    fn set_params(&mut self, params: &[f64]);

    /// Minimizes the problem starting from the current parameters.
    ///
    /// Returns `true` if the optimizer terminated normally. This says nothing
    /// about the quality of convergence.
    fn fit(&mut self, problem: &mut dyn LeastSquaresProblem) -> bool;

    /// Evaluates the residuum of the problem at the current parameters.
    ///
    /// # Errors
    ///
    /// Passes on the problem's [`EvalError`] if the evaluation failed.
    fn eval_residuum(&mut self, problem: &mut dyn LeastSquaresProblem) -> Result<f64, EvalError>;

    /// Returns the residuum found by the last fit or evaluation, if any.
    fn residuum(&self) -> Option<f64>;

    /// Writes the packed inverse Hessian at the current parameters to `out`.
    ///
    /// Returns `false` if it is not available, e.g. because no fit was
    /// performed or the Hessian is singular.
    fn inverse_hessian(&mut self, out: &mut [f64]) -> bool;
}
