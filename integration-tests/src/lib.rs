//! Test support for exercising fit tasks end to end.

use lsfit_core::{EvalError, Fitter, LeastSquaresProblem, packed};

const MAX_ITERATIONS: usize = 200;
const MAX_LAMBDA: f64 = 1e10;

/// A small Levenberg–Marquardt fitter used by the integration tests.
///
/// Parameters with a zero Hessian diagonal are treated as fixed: their step
/// is zero and their rows of the inverse Hessian are reported as zero.
#[derive(Debug, Default)]
pub struct GaussNewton {
    params: Vec<f64>,
    residuum: Option<f64>,
    hessian: Option<Vec<f64>>,
}

impl GaussNewton {
    /// Runs damped Gauss–Newton iterations from the current parameters.
    fn iterate(&mut self, problem: &mut dyn LeastSquaresProblem) -> Option<f64> {
        let n = self.params.len();
        let mut gradient = vec![0.0; n];
        let mut hessian = vec![0.0; packed::len(n)];
        let mut sum = problem.residuum(&self.params).ok()?;
        let mut lambda = 1e-3;

        for _ in 0..MAX_ITERATIONS {
            if sum == 0.0 {
                break;
            }
            problem
                .gradient(&self.params, &mut gradient, &mut hessian)
                .ok()?;

            let Some(trial_sum) = self.damped_step(problem, &gradient, &hessian, sum, &mut lambda)
            else {
                break;
            };
            let converged = sum - trial_sum <= 1e-12 * sum;
            sum = trial_sum;
            if converged {
                break;
            }
        }

        problem
            .gradient(&self.params, &mut gradient, &mut hessian)
            .ok()?;
        self.hessian = Some(hessian);
        Some(sum)
    }

    /// Raises the damping until a step does not increase the residuum.
    ///
    /// Accepts the step and returns the new residuum, or `None` once the
    /// damping limit is reached.
    fn damped_step(
        &mut self,
        problem: &mut dyn LeastSquaresProblem,
        gradient: &[f64],
        hessian: &[f64],
        sum: f64,
        lambda: &mut f64,
    ) -> Option<f64> {
        let n = self.params.len();
        while *lambda < MAX_LAMBDA {
            let mut a = hessian.to_vec();
            for i in 0..n {
                let d = packed::get_mut(&mut a, i, i);
                *d = if *d == 0.0 { 1.0 } else { *d * (1.0 + *lambda) };
            }

            if packed::cholesky_decompose(&mut a, n) {
                let mut step = gradient.to_vec();
                packed::cholesky_solve(&a, &mut step, n);
                let trial: Vec<f64> = self.params.iter().zip(&step).map(|(p, s)| p - s).collect();

                if let Ok(trial_sum) = problem.residuum(&trial) {
                    if trial_sum <= sum {
                        self.params = trial;
                        *lambda = (*lambda / 10.0).max(1e-12);
                        return Some(trial_sum);
                    }
                }
            }
            *lambda *= 10.0;
        }
        None
    }
}

impl Fitter for GaussNewton {
    fn n_params(&self) -> usize {
        self.params.len()
    }

    fn set_n_params(&mut self, n: usize) {
        self.params = vec![0.0; n];
        self.residuum = None;
        self.hessian = None;
    }

    fn params(&self) -> &[f64] {
        &self.params
    }

    fn set_params(&mut self, params: &[f64]) {
        self.params.copy_from_slice(params);
    }

    fn fit(&mut self, problem: &mut dyn LeastSquaresProblem) -> bool {
        self.hessian = None;
        self.residuum = self.iterate(problem);
        self.residuum.is_some()
    }

    fn eval_residuum(&mut self, problem: &mut dyn LeastSquaresProblem) -> Result<f64, EvalError> {
        let residuum = problem.residuum(&self.params);
        self.residuum = residuum.ok();
        residuum
    }

    fn residuum(&self) -> Option<f64> {
        self.residuum
    }

    fn inverse_hessian(&mut self, out: &mut [f64]) -> bool {
        let Some(hessian) = &self.hessian else {
            return false;
        };
        let n = self.params.len();
        let fixed: Vec<bool> = (0..n).map(|i| packed::get(hessian, i, i) == 0.0).collect();

        out.copy_from_slice(hessian);
        for (i, _) in fixed.iter().enumerate().filter(|(_, f)| **f) {
            *packed::get_mut(out, i, i) = 1.0;
        }
        if !packed::cholesky_invert(out, n) {
            return false;
        }
        for (i, _) in fixed.iter().enumerate().filter(|(_, f)| **f) {
            for j in 0..n {
                *packed::get_mut(out, i, j) = 0.0;
            }
        }
        true
    }
}
