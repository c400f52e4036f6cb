use super::VectorFn;

/// A model returning the weighted difference for each data point directly.
pub(crate) struct VectorModel<'a, D: ?Sized> {
    func: VectorFn<'a, D>,
    data: Option<&'a D>,
    ndata: usize,
}

impl<'a, D: ?Sized> VectorModel<'a, D> {
    pub(crate) fn new(func: VectorFn<'a, D>) -> Self {
        Self {
            func,
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

    pub(crate) fn residual(&self, i: usize, params: &[f64]) -> Option<f64> {
        (self.func)(i, self.data?, params)
    }
}
