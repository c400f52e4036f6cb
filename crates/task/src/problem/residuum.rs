use log::debug;
use lsfit_core::EvalError;

use crate::model::Model;

/// Sum of squared weighted residuals over all data points.
///
/// The first failing point aborts the sum.
pub(super) fn residuum<D: ?Sized>(model: &Model<'_, D>, params: &[f64]) -> Result<f64, EvalError> {
    let mut sum = 0.0;
    for i in 0..model.n_data() {
        let Some(r) = model.residual(i, params) else {
            debug!("{} model failed at data point {i}", model.kind());
            return Err(EvalError::at(i));
        };
        sum += r * r;
    }
    Ok(sum)
}
