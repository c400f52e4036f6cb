//! The three forms a model function can take.
//!
//! | form | call | data | derivatives |
//! | --- | --- | --- | --- |
//! | point | `f(x, p) -> y` | `&[PointXY]` | central differences |
//! | vector | `f(i, data, p) -> w·(y_model − y)` | any `&D` | central differences |
//! | vector-array | same as vector | any `&D` | analytic if supplied |
//!
//! Point and vector models take at most [`MAX_VARARG_PARAMS`] parameters.
//! Every function receives the parameters as a slice of length `nparam`.

use std::fmt;

mod point;
mod vector;
mod vector_array;

pub(crate) use point::PointModel;
pub(crate) use vector::VectorModel;
pub(crate) use vector_array::VectorArrayModel;

/// Maximum number of parameters of point and vector models.
pub const MAX_VARARG_PARAMS: usize = 6;

/// Point model: `f(x, params)`, `None` on failure.
pub type PointFn<'a> = Box<dyn Fn(f64, &[f64]) -> Option<f64> + 'a>;

/// Point weight: `w(x, params)`, multiplies the residual `f(x) − y`.
pub type WeightFn<'a> = Box<dyn Fn(f64, &[f64]) -> f64 + 'a>;

/// Vector model: weighted difference for data point `i`, `None` on failure.
pub type VectorFn<'a, D> = Box<dyn Fn(usize, &D, &[f64]) -> Option<f64> + 'a>;

/// Analytic derivatives of a vector-array model at data point `i`.
///
/// Called as `derivative(i, data, fixed, diff, params)`; it fills `diff[j]`
/// with the derivative of the weighted difference by parameter `j` and
/// returns `false` on failure. Entries of fixed parameters may be left as
/// they are.
pub type DerivativeFn<'a, D> = Box<dyn Fn(usize, &D, &[bool], &mut [f64], &[f64]) -> bool + 'a>;

/// Identifies which form of model is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Point,
    Vector,
    VectorArray,
}

impl ModelKind {
    /// Returns the maximum number of parameters this kind accepts.
    #[must_use]
    pub fn max_params(self) -> Option<usize> {
        match self {
            Self::Point | Self::Vector => Some(MAX_VARARG_PARAMS),
            Self::VectorArray => None,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Point => "point",
            Self::Vector => "vector",
            Self::VectorArray => "vector-array",
        })
    }
}

/// The attached model, exactly one form at a time.
///
/// Replacing the value drops the previous form's functions and data.
pub(crate) enum Model<'a, D: ?Sized> {
    Point(PointModel<'a>),
    Vector(VectorModel<'a, D>),
    VectorArray(VectorArrayModel<'a, D>),
}

impl<D: ?Sized> Model<'_, D> {
    pub(crate) fn kind(&self) -> ModelKind {
        match self {
            Self::Point(_) => ModelKind::Point,
            Self::Vector(_) => ModelKind::Vector,
            Self::VectorArray(_) => ModelKind::VectorArray,
        }
    }

    pub(crate) fn n_data(&self) -> usize {
        match self {
            Self::Point(m) => m.n_data(),
            Self::Vector(m) => m.n_data(),
            Self::VectorArray(m) => m.n_data(),
        }
    }

    /// Weighted residual of data point `i` at `params`.
    pub(crate) fn residual(&self, i: usize, params: &[f64]) -> Option<f64> {
        match self {
            Self::Point(m) => m.residual(i, params),
            Self::Vector(m) => m.residual(i, params),
            Self::VectorArray(m) => m.residual(i, params),
        }
    }
}
