use super::{DerivativeFn, VectorFn};

/// A vector model with any number of parameters and optional analytic
/// derivatives.
pub(crate) struct VectorArrayModel<'a, D: ?Sized> {
    func: VectorFn<'a, D>,
    derivative: Option<DerivativeFn<'a, D>>,
    data: Option<&'a D>,
    ndata: usize,
}

impl<'a, D: ?Sized> VectorArrayModel<'a, D> {
    pub(crate) fn new(func: VectorFn<'a, D>, derivative: Option<DerivativeFn<'a, D>>) -> Self {
        Self {
            func,
            derivative,
            data: None,
            ndata: 0,
        }
    }

    pub(crate) fn n_data(&self) -> usize {
        self.ndata
    }

    pub(crate) fn set_data(&mut self, data: &'a D, ndata: usize) {
        self.data = Some(data);
        self.ndata = ndata;
    }

    pub(crate) fn has_derivative(&self) -> bool {
        self.derivative.is_some()
    }

    pub(crate) fn residual(&self, i: usize, params: &[f64]) -> Option<f64> {
        (self.func)(i, self.data?, params)
    }

    /// Fills `diff` with analytic derivatives at data point `i`.
    ///
    /// Returns `None` if there is no derivative function or it failed.
    pub(crate) fn derivative(
        &self,
        i: usize,
        fixed: &[bool],
        diff: &mut [f64],
        params: &[f64],
    ) -> Option<()> {
        let derivative = self.derivative.as_ref()?;
        derivative(i, self.data?, fixed, diff, params).then_some(())
    }
}
