//! The fit task orchestrator.

#[cfg(test)]
mod tests;

use log::{debug, warn};
use lsfit_core::{Fitter, PointXY};

use crate::{
    Error, ModelKind, ParameterMask, StepConfig,
    model::{DerivativeFn, Model, PointModel, VectorArrayModel, VectorModel},
    problem::TaskProblem,
};

/// Lifecycle of a fit task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No model is attached.
    Empty,

    /// A model is attached but there are no data.
    Configured,

    /// A model and at least one data point are attached.
    Ready,
}

/// A least-squares fit of a model to borrowed data.
///
/// The task owns the model functions, the fixed-parameter mask and scratch
/// space; the data are borrowed for `'a` and the parameter values live in
/// the fitter `F`. `D` is the data type handed to vector models and can be
/// left at `()` when only point models are used.
///
/// # Fitter binding
///
/// The task keeps the fitter's parameter count in sync with the attached
/// model. Calling [`Fitter::set_n_params`] on the fitter obtained from
/// [`fitter`](FitTask::fitter) breaks that binding; set parameter values only.
pub struct FitTask<'a, F, D: ?Sized = ()> {
    pub(crate) fitter: Option<F>,
    pub(crate) problem: TaskProblem<'a, D>,
}

impl<F: Fitter + Default, D: ?Sized> Default for FitTask<'_, F, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, F: Fitter + Default, D: ?Sized> FitTask<'a, F, D> {
    /// Creates an empty task; the fitter is created on first use.
    #[must_use]
    pub fn new() -> Self {
        Self {
            fitter: None,
            problem: TaskProblem::new(),
        }
    }

    /// Returns the fitter, creating it if necessary.
    ///
    /// Use it to set starting parameter values and to read the fitted ones.
    pub fn fitter(&mut self) -> &mut F {
        ensure_fitter(&mut self.fitter, self.problem.nparam)
    }

    /// Runs the fitter on the attached model and data.
    ///
    /// Returns the fitter's verdict: `true` if it terminated normally. The
    /// fitted parameters are available from [`fitter`](Self::fitter).
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] if no model is attached and
    /// [`Error::NoData`] if there are no data.
    pub fn fit(&mut self) -> Result<bool, Error> {
        self.problem.require_ready()?;
        let fitter = ensure_fitter(&mut self.fitter, self.problem.nparam);

        debug!(
            "fitting {} parameters to {} data points",
            self.problem.nparam,
            self.problem.n_data()
        );
        let ok = fitter.fit(&mut self.problem);
        if ok {
            debug!("fit finished, residuum {:?}", fitter.residuum());
        } else {
            warn!("fitter terminated abnormally");
        }
        Ok(ok)
    }

    /// Evaluates the residuum at the fitter's current parameters.
    ///
    /// The evaluation goes through the fitter, so it is exactly the
    /// objective the fitter minimizes. Returns 0 when no data are attached.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] if no model is attached and
    /// [`Error::Eval`] with the index of the failing data point if the model
    /// fails to evaluate.
    pub fn eval_residuum(&mut self) -> Result<f64, Error> {
        self.problem.require_configured()?;
        let fitter = ensure_fitter(&mut self.fitter, self.problem.nparam);
        Ok(fitter.eval_residuum(&mut self.problem)?)
    }
}

impl<'a, F: Fitter, D: ?Sized> FitTask<'a, F, D> {
    /// Creates an empty task driven by `fitter`.
    #[must_use]
    pub fn with_fitter(fitter: F) -> Self {
        Self {
            fitter: Some(fitter),
            problem: TaskProblem::new(),
        }
    }

    /// Returns the fitter if it has been created.
    #[must_use]
    pub fn fitter_ref(&self) -> Option<&F> {
        self.fitter.as_ref()
    }

    /// Returns the lifecycle state.
    #[must_use]
    pub fn state(&self) -> State {
        match (&self.problem.model, self.problem.n_data()) {
            (None, _) => State::Empty,
            (Some(_), 0) => State::Configured,
            (Some(_), _) => State::Ready,
        }
    }

    /// Returns the number of parameters of the attached model.
    #[must_use]
    pub fn n_params(&self) -> usize {
        self.problem.nparam
    }

    /// Returns the number of attached data points.
    #[must_use]
    pub fn n_data(&self) -> usize {
        self.problem.n_data()
    }

    /// Returns the kind of the attached model.
    #[must_use]
    pub fn model_kind(&self) -> Option<ModelKind> {
        self.problem.kind()
    }

    /// Returns the step sizes used for numerical derivatives.
    #[must_use]
    pub fn step_config(&self) -> StepConfig {
        self.problem.step
    }

    /// Sets the step sizes used for numerical derivatives.
    pub fn set_step_config(&mut self, step: StepConfig) {
        self.problem.step = step;
    }

    /// Attaches a point model `f(x, params)` with `nparams` parameters.
    ///
    /// Any previously attached model and its data are dropped, and all
    /// parameters become free.
    ///
    /// # Errors
    ///
    /// Returns an error if `nparams` is 0 or exceeds
    /// [`MAX_VARARG_PARAMS`](crate::MAX_VARARG_PARAMS).
    pub fn set_point_function<P>(&mut self, nparams: usize, function: P) -> Result<(), Error>
    where
        P: Fn(f64, &[f64]) -> Option<f64> + 'a,
    {
        check_n_params(ModelKind::Point, nparams)?;
        let model = PointModel::new(Box::new(function));
        self.attach(nparams, Model::Point(model));
        Ok(())
    }

    /// Sets the weight function `w(x, params)` of the point model.
    ///
    /// # Errors
    ///
    /// Returns an error unless a point model is attached.
    pub fn set_point_weight<W>(&mut self, weight: W) -> Result<(), Error>
    where
        W: Fn(f64, &[f64]) -> f64 + 'a,
    {
        self.point_model("point weight")?.set_weight(Box::new(weight));
        Ok(())
    }

    /// Attaches the `(x, y)` points fitted by the point model.
    ///
    /// Weight data set for previous points are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error unless a point model is attached.
    pub fn set_point_data(&mut self, data: &'a [PointXY]) -> Result<(), Error> {
        self.point_model("point data")?.set_data(data);
        Ok(())
    }

    /// Attaches per-point weights `1/σ_i` (unsquared) for the point model.
    ///
    /// # Errors
    ///
    /// Returns an error unless a point model is attached, or if `weights`
    /// does not have one entry per data point.
    pub fn set_weight_data(&mut self, weights: &'a [f64]) -> Result<(), Error> {
        self.point_model("weight data")?.set_weight_data(weights)
    }

    /// Attaches a vector model `f(i, data, params)` with `nparams`
    /// parameters, returning the weighted difference for data point `i`.
    ///
    /// Any previously attached model and its data are dropped, and all
    /// parameters become free.
    ///
    /// # Errors
    ///
    /// Returns an error if `nparams` is 0 or exceeds
    /// [`MAX_VARARG_PARAMS`](crate::MAX_VARARG_PARAMS).
    pub fn set_vector_function<V>(&mut self, nparams: usize, function: V) -> Result<(), Error>
    where
        V: Fn(usize, &D, &[f64]) -> Option<f64> + 'a,
    {
        check_n_params(ModelKind::Vector, nparams)?;
        let model = VectorModel::new(Box::new(function));
        self.attach(nparams, Model::Vector(model));
        Ok(())
    }

    /// Attaches a vector-array model with any number of parameters and,
    /// optionally, analytic derivatives.
    ///
    /// Analytic derivatives are trusted as given; they are never checked
    /// against numerical ones.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoParams`] if `nparams` is 0.
    pub fn set_vector_array_function<V>(
        &mut self,
        nparams: usize,
        function: V,
        derivative: Option<DerivativeFn<'a, D>>,
    ) -> Result<(), Error>
    where
        V: Fn(usize, &D, &[f64]) -> Option<f64> + 'a,
    {
        check_n_params(ModelKind::VectorArray, nparams)?;
        let model = VectorArrayModel::new(Box::new(function), derivative);
        self.attach(nparams, Model::VectorArray(model));
        Ok(())
    }

    /// Attaches the data of a vector or vector-array model.
    ///
    /// # Errors
    ///
    /// Returns an error unless a vector or vector-array model is attached.
    pub fn set_vector_data(&mut self, data: &'a D, ndata: usize) -> Result<(), Error> {
        match self.problem.model_mut()? {
            Model::Vector(m) => m.set_data(data, ndata),
            Model::VectorArray(m) => m.set_data(data, ndata),
            Model::Point(_) => {
                return Err(Error::WrongModel {
                    active: ModelKind::Point,
                    requested: "vector data",
                });
            }
        }
        Ok(())
    }

    /// Detaches the model and data and releases the scratch space.
    pub fn clear(&mut self) {
        debug!("clearing fit task");
        self.problem.detach();
        if let Some(fitter) = &mut self.fitter {
            fitter.set_n_params(0);
        }
    }

    /// Returns the fixed-parameter mask.
    #[must_use]
    pub fn mask(&self) -> &ParameterMask {
        &self.problem.mask
    }

    /// Fixes or frees parameter `i`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParamIndex`] if `i` is out of range.
    pub fn set_fixed_param(&mut self, i: usize, fixed: bool) -> Result<(), Error> {
        self.problem.mask.set(i, fixed)
    }

    /// Returns whether parameter `i` is fixed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParamIndex`] if `i` is out of range.
    pub fn fixed_param(&self, i: usize) -> Result<bool, Error> {
        self.problem.mask.get(i)
    }

    /// Sets all fixed flags at once; `None` frees every parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LengthMismatch`] if `flags` does not have one entry
    /// per parameter.
    pub fn set_fixed_params(&mut self, flags: Option<&[bool]>) -> Result<(), Error> {
        self.problem.mask.set_all(flags)
    }

    /// Returns the fixed flags of all parameters.
    #[must_use]
    pub fn fixed_params(&self) -> &[bool] {
        self.problem.mask.as_slice()
    }

    /// Returns the number of fixed parameters.
    #[must_use]
    pub fn fixed_count(&self) -> usize {
        self.problem.mask.fixed_count()
    }

    fn attach(&mut self, nparams: usize, model: Model<'a, D>) {
        debug!("attaching {} model with {nparams} parameters", model.kind());
        self.problem.attach(nparams, model);
        if let Some(fitter) = &mut self.fitter {
            fitter.set_n_params(nparams);
        }
    }

    fn point_model(&mut self, requested: &'static str) -> Result<&mut PointModel<'a>, Error> {
        match self.problem.model_mut()? {
            Model::Point(m) => Ok(m),
            other => Err(Error::WrongModel {
                active: other.kind(),
                requested,
            }),
        }
    }
}

fn ensure_fitter<F: Fitter + Default>(fitter: &mut Option<F>, nparams: usize) -> &mut F {
    fitter.get_or_insert_with(|| {
        let mut fitter = F::default();
        fitter.set_n_params(nparams);
        fitter
    })
}

fn check_n_params(kind: ModelKind, nparams: usize) -> Result<(), Error> {
    if nparams == 0 {
        return Err(Error::NoParams);
    }
    match kind.max_params() {
        Some(max) if nparams > max => Err(Error::TooManyParams {
            kind,
            nparams,
            max,
        }),
        _ => Ok(()),
    }
}
