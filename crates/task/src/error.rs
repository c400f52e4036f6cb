use thiserror::Error;

use lsfit_core::EvalError;

use crate::ModelKind;

/// Errors reported by a [`FitTask`](crate::FitTask).
///
/// Contract violations leave the task unchanged.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error("no model function is attached")]
    NotConfigured,

    #[error("no data are attached")]
    NoData,

    #[error("a model needs at least one parameter")]
    NoParams,

    #[error("{kind} models take at most {max} parameters, got {nparams}")]
    TooManyParams {
        kind: ModelKind,
        nparams: usize,
        max: usize,
    },

    #[error("cannot set {requested} while a {active} model is active")]
    WrongModel {
        active: ModelKind,
        requested: &'static str,
    },

    #[error("parameter index {index} out of range for {nparams} parameters")]
    ParamIndex { index: usize, nparams: usize },

    #[error("expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Eval(#[from] EvalError),

    #[error("inverse Hessian is not available")]
    NoInverseHessian,

    #[error("residuum is not available")]
    NoResiduum,
}
