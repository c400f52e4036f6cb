use lsfit_core::PointXY;

use crate::Error;

use super::{PointFn, WeightFn};

/// A model `f(x, p)` fitted to `(x, y)` points.
///
/// The residual of point `i` is `w_i·(f(x_i, p) − y_i)`, where `w_i` is the
/// product of the optional weight function and the optional per-point weight
/// data.
pub(crate) struct PointModel<'a> {
    func: PointFn<'a>,
    weight: Option<WeightFn<'a>>,
    data: &'a [PointXY],
    weight_data: Option<&'a [f64]>,
}

impl<'a> PointModel<'a> {
    pub(crate) fn new(func: PointFn<'a>) -> Self {
        Self {
            func,
            weight: None,
            data: &[],
            weight_data: None,
        }
    }

    pub(crate) fn n_data(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn set_weight(&mut self, weight: WeightFn<'a>) {
        self.weight = Some(weight);
    }

    /// Attaches data points, dropping weight data sized for the old points.
    pub(crate) fn set_data(&mut self, data: &'a [PointXY]) {
        self.data = data;
        self.weight_data = None;
    }

    pub(crate) fn set_weight_data(&mut self, weight_data: &'a [f64]) -> Result<(), Error> {
        if weight_data.len() != self.data.len() {
            return Err(Error::LengthMismatch {
                expected: self.data.len(),
                actual: weight_data.len(),
            });
        }
        self.weight_data = Some(weight_data);
        Ok(())
    }

    /// Combined weight of point `i` at `params`.
    pub(crate) fn weight(&self, i: usize, params: &[f64]) -> f64 {
        let w = self
            .weight
            .as_ref()
            .map_or(1.0, |weight| weight(self.data[i].x, params));
        self.weight_data.map_or(w, |wd| w * wd[i])
    }

    /// Unweighted model value at point `i`.
    pub(crate) fn value(&self, i: usize, params: &[f64]) -> Option<f64> {
        (self.func)(self.data[i].x, params)
    }

    pub(crate) fn observed(&self, i: usize) -> f64 {
        self.data[i].y
    }

    pub(crate) fn residual(&self, i: usize, params: &[f64]) -> Option<f64> {
        let v = self.value(i, params)?;
        Some(self.weight(i, params) * (v - self.observed(i)))
    }
}
