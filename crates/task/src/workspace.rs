use lsfit_core::packed;

use crate::StepConfig;

/// Per-task scratch buffers.
///
/// Nothing in here carries meaning from one call to the next. The buffers
/// are sized to the number of parameters by an explicit [`resize`] call
/// whenever a model is attached.
///
/// [`resize`]: Workspace::resize
#[derive(Debug, Clone, Default)]
pub(crate) struct Workspace {
    /// Central-difference step per parameter.
    pub(crate) h: Vec<f64>,

    /// Perturbable copy of the parameters.
    pub(crate) mparam: Vec<f64>,

    /// Derivatives of the current data point's residual.
    pub(crate) diff: Vec<f64>,

    /// Packed matrix, used for the inverse Hessian.
    pub(crate) matrix: Vec<f64>,
}

impl Workspace {
    /// Sizes all buffers for `n` parameters; `n = 0` releases them.
    pub(crate) fn resize(&mut self, n: usize) {
        if n == 0 {
            *self = Self::default();
            return;
        }
        self.h.resize(n, 0.0);
        self.mparam.resize(n, 0.0);
        self.diff.resize(n, 0.0);
        self.matrix.resize(packed::len(n), 0.0);
    }

    /// Copies `params` into `mparam` and computes the steps.
    pub(crate) fn prepare(&mut self, params: &[f64], step: &StepConfig) {
        self.mparam.copy_from_slice(params);
        for (h, &p) in self.h.iter_mut().zip(params) {
            *h = step.step(p);
        }
    }
}
