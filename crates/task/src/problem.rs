//! The least-squares problem a fit task hands to its fitter.

mod gradient;
mod residuum;


use log::trace;
use lsfit_core::{EvalError, LeastSquaresProblem};

use crate::{
    Error, ModelKind, ParameterMask, StepConfig,
    model::Model,
    workspace::Workspace,
};

/// Model, mask and scratch space of a fit task.
///
/// Kept separate from the fitter so the task can lend it to the fitter
/// mutably while the fitter itself is borrowed.
pub(crate) struct TaskProblem<'a, D: ?Sized> {
    pub(crate) nparam: usize,
    pub(crate) model: Option<Model<'a, D>>,
    pub(crate) mask: ParameterMask,
    pub(crate) workspace: Workspace,
    pub(crate) step: StepConfig,
}

impl<'a, D: ?Sized> TaskProblem<'a, D> {
    pub(crate) fn new() -> Self {
        Self {
            nparam: 0,
            model: None,
            mask: ParameterMask::default(),
            workspace: Workspace::default(),
            step: StepConfig::default(),
        }
    }

    /// Replaces the model and sizes everything for `nparam` parameters.
    pub(crate) fn attach(&mut self, nparam: usize, model: Model<'a, D>) {
        self.nparam = nparam;
        self.model = Some(model);
        self.mask.reset(nparam);
        self.workspace.resize(nparam);
    }

    /// Drops the model and releases the scratch buffers.
    pub(crate) fn detach(&mut self) {
        self.nparam = 0;
        self.model = None;
        self.mask.reset(0);
        self.workspace.resize(0);
    }

    pub(crate) fn n_data(&self) -> usize {
        self.model.as_ref().map_or(0, Model::n_data)
    }

    pub(crate) fn kind(&self) -> Option<ModelKind> {
        self.model.as_ref().map(Model::kind)
    }

    pub(crate) fn model_mut(&mut self) -> Result<&mut Model<'a, D>, Error> {
        self.model.as_mut().ok_or(Error::NotConfigured)
    }

    pub(crate) fn require_configured(&self) -> Result<(), Error> {
        if self.model.is_none() {
            return Err(Error::NotConfigured);
        }
        Ok(())
    }

    pub(crate) fn require_ready(&self) -> Result<(), Error> {
        self.require_configured()?;
        if self.n_data() == 0 {
            return Err(Error::NoData);
        }
        Ok(())
    }
}

impl<D: ?Sized> LeastSquaresProblem for TaskProblem<'_, D> {
    fn n_params(&self) -> usize {
        self.nparam
    }

    fn residuum(&mut self, params: &[f64]) -> Result<f64, EvalError> {
        let Some(model) = &self.model else {
            return Ok(0.0);
        };
        let sum = residuum::residuum(model, params)?;
        trace!("residuum {sum} at {params:?}");
        Ok(sum)
    }

    fn gradient(
        &mut self,
        params: &[f64],
        gradient: &mut [f64],
        hessian: &mut [f64],
    ) -> Result<(), EvalError> {
        let Self {
            model,
            mask,
            workspace,
            step,
            ..
        } = self;

        gradient.fill(0.0);
        hessian.fill(0.0);
        let Some(model) = model else {
            return Ok(());
        };

        workspace.prepare(params, step);
        gradient::gradient(model, mask.as_slice(), workspace, params, gradient, hessian)?;
        trace!("gradient {gradient:?} at {params:?}");
        Ok(())
    }
}
