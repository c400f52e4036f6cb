//! Least-squares fit tasks.
//!
//! A [`FitTask`] adapts a caller-supplied model function and data to the
//! [`LeastSquaresProblem`] interface an optimizer understands, then drives an
//! external [`Fitter`] over it. The task
//!
//! - accepts the model in one of three forms: a point function `f(x, p)`
//!   evaluated against `(x, y)` data, a vector function returning the
//!   weighted difference for data point `i` directly, or a vector-array
//!   function that may also supply analytic derivatives
//! - computes the gradient and Gauss–Newton Hessian by central differences
//!   unless analytic derivatives are available
//! - keeps a fixed/free mask over the parameters
//! - derives parameter errors, correlations and chi after a fit
//!
//! The task never owns the data or the parameter values. Data are borrowed
//! for the lifetime `'a`, parameter values live in the fitter and are
//! reached through [`FitTask::fitter`].
//!
//! # Example
//!
//! ```ignore
//! use lsfit_core::PointXY;
//! use lsfit_task::FitTask;
//!
//! let data: Vec<PointXY> = (0..5).map(|i| PointXY::new(i as f64, 3.0 + 2.0 * i as f64)).collect();
//!
//! let mut task: FitTask<'_, MyFitter> = FitTask::new();
//! task.set_point_function(2, |x, p| Some(p[0] + p[1] * x))?;
//! task.set_point_data(&data)?;
//! task.fitter().set_params(&[1.0, 1.0]);
//! assert!(task.fit()?);
//! let errors = task.param_errors(true)?;
//! ```
//!
//! [`LeastSquaresProblem`]: lsfit_core::LeastSquaresProblem
//! [`Fitter`]: lsfit_core::Fitter

mod config;
mod error;
mod mask;
mod model;
mod problem;
mod stats;
mod task;
mod workspace;

pub use config::{StepConfig, StepConfigError};
pub use error::Error;
pub use mask::ParameterMask;
pub use model::{
    DerivativeFn, MAX_VARARG_PARAMS, ModelKind, PointFn, VectorFn, WeightFn,
};
pub use task::{FitTask, State};
