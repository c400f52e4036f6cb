//! Core traits and types for least-squares fitting.
//!
//! This crate defines the seams between a fit task and the optimizer that
//! drives it:
//!
//! - [`LeastSquaresProblem`]: residuum and gradient/Hessian callbacks the
//!   optimizer evaluates at trial parameters
//! - [`Fitter`]: the optimizer itself, which owns the parameter vector
//! - [`EvalError`]: a failed evaluation at one data point
//! - [`PointXY`]: an `(x, y)` data point
//! - [`packed`]: symmetric matrices stored as their packed lower triangle

mod fitter;
mod point;
mod problem;

pub mod packed;

pub use fitter::Fitter;
pub use point::PointXY;
pub use problem::{EvalError, LeastSquaresProblem};
