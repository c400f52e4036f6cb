use approx::assert_relative_eq;
use lsfit_core::{EvalError, Fitter, LeastSquaresProblem, PointXY};

use crate::{Error, ModelKind, StepConfig};

use super::{FitTask, State};

/// A fitter that only evaluates the residuum and reports canned statistics.
#[derive(Debug, Default)]
struct MockFitter {
    params: Vec<f64>,
    n_params_calls: Vec<usize>,
    fit_calls: usize,
    residuum: Option<f64>,
    inverse: Option<Vec<f64>>,
}

impl Fitter for MockFitter {
    fn n_params(&self) -> usize {
        self.params.len()
    }

    fn set_n_params(&mut self, n: usize) {
        self.params = vec![0.0; n];
        self.n_params_calls.push(n);
        self.residuum = None;
    }

    fn params(&self) -> &[f64] {
        &self.params
    }

    fn set_params(&mut self, params: &[f64]) {
        self.params.copy_from_slice(params);
    }

    fn fit(&mut self, problem: &mut dyn LeastSquaresProblem) -> bool {
        self.fit_calls += 1;
        self.eval_residuum(problem).is_ok()
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
        match &self.inverse {
            Some(inverse) => {
                out.copy_from_slice(inverse);
                true
            }
            None => false,
        }
    }
}

fn line_data() -> Vec<PointXY> {
    (0..5)
        .map(|i| PointXY::new(f64::from(i), 3.0 + 2.0 * f64::from(i)))
        .collect()
}

fn line(x: f64, p: &[f64]) -> Option<f64> {
    Some(p[0] + p[1] * x)
}

#[test]
fn new_task_is_empty() {
    let mut task: FitTask<'_, MockFitter> = FitTask::new();

    assert_eq!(task.state(), State::Empty);
    assert_eq!(task.n_params(), 0);
    assert_eq!(task.model_kind(), None);
    assert!(task.fitter_ref().is_none());
    assert_eq!(task.fit(), Err(Error::NotConfigured));
    assert_eq!(task.eval_residuum(), Err(Error::NotConfigured));
}

#[test]
fn lifecycle() {
    let data = line_data();
    let mut task: FitTask<'_, MockFitter> = FitTask::new();

    task.set_point_function(2, line).unwrap();
    assert_eq!(task.state(), State::Configured);
    assert_eq!(task.model_kind(), Some(ModelKind::Point));
    assert_eq!(task.fit(), Err(Error::NoData));

    task.set_point_data(&data).unwrap();
    assert_eq!(task.state(), State::Ready);
    assert_eq!(task.n_data(), 5);

    task.fitter().set_params(&[3.0, 2.0]);
    assert_eq!(task.fit(), Ok(true));
    assert_eq!(task.fitter().fit_calls, 1);

    task.clear();
    assert_eq!(task.state(), State::Empty);
    assert_eq!(task.n_params(), 0);
    assert_eq!(task.fitter().n_params(), 0);
}

#[test]
fn lazy_fitter_gets_param_count() {
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(3, |_, p| Some(p[0] + p[1] + p[2]))
        .unwrap();

    assert!(task.fitter_ref().is_none());
    assert_eq!(task.fitter().n_params(), 3);
}

#[test]
fn injected_fitter_follows_model() {
    let mut task: FitTask<'_, MockFitter> = FitTask::with_fitter(MockFitter::default());
    task.set_point_function(2, line).unwrap();
    task.set_vector_array_function(9, |_, _: &(), _| Some(0.0), None)
        .unwrap();

    let fitter = task.fitter_ref().unwrap();
    assert_eq!(fitter.n_params_calls, vec![2, 9]);
    assert_eq!(fitter.n_params(), 9);
}

#[test]
fn param_count_limits() {
    let mut task: FitTask<'_, MockFitter> = FitTask::new();

    assert_eq!(task.set_point_function(0, line), Err(Error::NoParams));
    assert_eq!(
        task.set_point_function(7, line),
        Err(Error::TooManyParams {
            kind: ModelKind::Point,
            nparams: 7,
            max: 6
        })
    );
    assert!(matches!(
        task.set_vector_function(7, |_, _, _| Some(0.0)),
        Err(Error::TooManyParams {
            kind: ModelKind::Vector,
            ..
        })
    ));
    assert_eq!(task.state(), State::Empty);

    task.set_vector_array_function(40, |_, _, _| Some(0.0), None)
        .unwrap();
    assert_eq!(task.n_params(), 40);
}

#[test]
fn rejected_setter_leaves_task_unchanged() {
    let data = line_data();
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(2, line).unwrap();
    task.set_point_data(&data).unwrap();
    task.set_fixed_param(0, true).unwrap();

    assert!(task.set_point_function(8, line).is_err());

    assert_eq!(task.state(), State::Ready);
    assert_eq!(task.n_params(), 2);
    assert_eq!(task.fixed_params(), &[true, false]);
}

#[test]
fn switching_models_drops_data() {
    let data = line_data();
    let mut task: FitTask<'_, MockFitter, [PointXY]> = FitTask::new();
    task.set_point_function(2, line).unwrap();
    task.set_point_data(&data).unwrap();
    assert_eq!(task.n_data(), 5);

    task.set_vector_function(2, |i, pts: &[PointXY], p: &[f64]| {
        Some(p[0] + p[1] * pts[i].x - pts[i].y)
    })
    .unwrap();

    assert_eq!(task.n_data(), 0);
    assert_eq!(task.state(), State::Configured);
    assert_eq!(
        task.set_point_data(&data),
        Err(Error::WrongModel {
            active: ModelKind::Vector,
            requested: "point data"
        })
    );
    assert!(task.set_point_weight(|_, _| 1.0).is_err());

    task.set_vector_data(&data, data.len()).unwrap();
    assert_eq!(task.n_data(), 5);

    task.set_point_function(2, line).unwrap();
    assert_eq!(task.n_data(), 0);
    assert_eq!(
        task.set_vector_data(&data, data.len()),
        Err(Error::WrongModel {
            active: ModelKind::Point,
            requested: "vector data"
        })
    );
}

#[test]
fn data_without_model() {
    let data = line_data();
    let mut task: FitTask<'_, MockFitter, [PointXY]> = FitTask::new();

    assert_eq!(task.set_point_data(&data), Err(Error::NotConfigured));
    assert_eq!(
        task.set_vector_data(&data, data.len()),
        Err(Error::NotConfigured)
    );
    assert_eq!(task.set_fixed_param(0, true), Err(Error::ParamIndex { index: 0, nparams: 0 }));
}

#[test]
fn weight_data_length_is_checked() {
    let data = line_data();
    let weights = [1.0; 4];
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(2, line).unwrap();
    task.set_point_data(&data).unwrap();

    assert_eq!(
        task.set_weight_data(&weights),
        Err(Error::LengthMismatch {
            expected: 5,
            actual: 4
        })
    );
}

#[test]
fn weight_data_scale_residuum() {
    let data = line_data();
    let weights = [2.0; 5];
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(2, line).unwrap();
    task.set_point_data(&data).unwrap();
    task.fitter().set_params(&[3.0, 1.0]);
    let unweighted = task.eval_residuum().unwrap();

    task.set_weight_data(&weights).unwrap();
    let weighted = task.eval_residuum().unwrap();

    assert_relative_eq!(unweighted, 30.0);
    assert_relative_eq!(weighted, 120.0);
}

#[test]
fn fixed_params() {
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(3, |_, p| Some(p[0] + p[1] + p[2]))
        .unwrap();

    task.set_fixed_param(1, true).unwrap();
    assert_eq!(task.fixed_param(1), Ok(true));
    assert_eq!(task.fixed_param(0), Ok(false));
    assert_eq!(task.fixed_count(), 1);
    assert_eq!(
        task.fixed_param(3),
        Err(Error::ParamIndex {
            index: 3,
            nparams: 3
        })
    );

    task.set_fixed_params(Some(&[true, true, false])).unwrap();
    assert_eq!(task.fixed_params(), &[true, true, false]);
    assert_eq!(task.mask().fixed_count(), 2);

    task.set_fixed_params(None).unwrap();
    assert_eq!(task.fixed_count(), 0);

    task.set_fixed_param(2, true).unwrap();
    task.set_point_function(3, |_, p| Some(p[0] * p[1] * p[2]))
        .unwrap();
    assert_eq!(task.fixed_count(), 0);
}

#[test]
fn eval_residuum_goes_through_fitter() {
    let data = line_data();
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(2, line).unwrap();
    assert_eq!(task.eval_residuum(), Ok(0.0));

    task.set_point_data(&data).unwrap();
    task.fitter().set_params(&[3.0, 1.0]);

    assert_eq!(task.eval_residuum(), Ok(30.0));
    assert_eq!(task.fitter().residuum(), Some(30.0));
}

#[test]
fn eval_residuum_failure() {
    let data = line_data();
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(2, |x, p| (x < 3.0).then(|| p[0] + p[1] * x))
        .unwrap();
    task.set_point_data(&data).unwrap();

    assert_eq!(
        task.eval_residuum(),
        Err(Error::Eval(EvalError { index: 3 }))
    );
    assert_eq!(task.fitter().residuum(), None);
    assert_eq!(task.fit(), Ok(false));
}

#[test]
fn step_config_is_kept() {
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    let step = StepConfig::new(1e-6, 1e-8).unwrap();
    task.set_step_config(step);
    task.set_point_function(1, |_, p| Some(p[0])).unwrap();

    assert_eq!(task.step_config(), step);
}

// ---------------------------------------------------------------------------
// Post-fit statistics
// ---------------------------------------------------------------------------

/// A two-parameter task with 6 points and canned fitter results.
fn stats_task(data: &[PointXY], residuum: f64, inverse: Vec<f64>) -> FitTask<'_, MockFitter> {
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(2, line).unwrap();
    task.set_point_data(data).unwrap();
    let fitter = task.fitter();
    fitter.residuum = Some(residuum);
    fitter.inverse = Some(inverse);
    task
}

fn six_points() -> Vec<PointXY> {
    (0..6).map(|i| PointXY::new(f64::from(i), 0.0)).collect()
}

#[test]
fn param_errors_without_scaling() {
    let data = six_points();
    let mut task = stats_task(&data, 8.0, vec![4.0, 1.0, 9.0]);

    let errors = task.param_errors(false).unwrap();

    assert_eq!(errors, vec![2.0, 3.0]);
    assert_eq!(task.param_error(1, false), Ok(3.0));
}

#[test]
fn param_errors_scaled_by_variance() {
    let data = six_points();
    // residuum/(6 − 2) = 2
    let mut task = stats_task(&data, 8.0, vec![4.0, 1.0, 9.0]);

    let errors = task.param_errors(true).unwrap();

    assert_relative_eq!(errors[0], 2.0 * 2.0_f64.sqrt());
    assert_relative_eq!(errors[1], 3.0 * 2.0_f64.sqrt());
    assert_relative_eq!(task.chi().unwrap(), 2.0_f64.sqrt());
}

#[test]
fn param_error_index_is_checked() {
    let data = six_points();
    let mut task = stats_task(&data, 8.0, vec![4.0, 1.0, 9.0]);

    assert_eq!(
        task.param_error(2, false),
        Err(Error::ParamIndex {
            index: 2,
            nparams: 2
        })
    );
}

#[test]
fn correlations_are_normalized() {
    let data = six_points();
    let mut task = stats_task(&data, 8.0, vec![4.0, -3.0, 9.0]);

    let corr = task.correlations().unwrap();

    assert_eq!(corr.len(), 3);
    assert_eq!(corr[0], 1.0);
    assert_relative_eq!(corr[1], -0.5);
    assert_eq!(corr[2], 1.0);
}

#[test]
fn zero_degrees_of_freedom_are_not_guarded() {
    let data = six_points();
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    task.set_point_function(2, line).unwrap();
    task.set_point_data(&data[..2]).unwrap();
    let fitter = task.fitter();
    fitter.residuum = Some(1.0);
    fitter.inverse = Some(vec![1.0, 0.0, 1.0]);

    assert!(task.chi().unwrap().is_infinite());
    assert!(task.param_errors(true).unwrap()[0].is_infinite());
}

#[test]
fn stats_need_fitter_results() {
    let data = six_points();
    let mut task: FitTask<'_, MockFitter> = FitTask::new();
    assert_eq!(task.chi(), Err(Error::NotConfigured));
    assert_eq!(task.param_error(0, false), Err(Error::NotConfigured));
    assert_eq!(task.param_errors(false), Err(Error::NotConfigured));

    task.set_point_function(2, line).unwrap();
    task.set_point_data(&data).unwrap();
    assert_eq!(task.param_errors(false), Err(Error::NoInverseHessian));
    assert_eq!(task.correlations(), Err(Error::NoInverseHessian));
    assert_eq!(task.chi(), Err(Error::NoResiduum));

    task.fitter().inverse = Some(vec![1.0, 0.0, 1.0]);
    assert!(task.param_errors(false).is_ok());
    assert_eq!(task.param_errors(true), Err(Error::NoResiduum));
}
