/// A data point with abscissa `x` and observed value `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointXY {
    pub x: f64,
    pub y: f64,
}

impl PointXY {
    /// Creates a new point.
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for PointXY {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}
