/// One point of a per-attempt trend line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrendPoint {
    pub attempt: f64,
    pub value: f64,
}

impl TrendPoint {
    pub fn new(attempt: f64, value: f64) -> Self {
        Self { attempt, value }
    }
}

impl From<(f64, f64)> for TrendPoint {
    fn from(v: (f64, f64)) -> Self {
        TrendPoint {
            attempt: v.0,
            value: v.1,
        }
    }
}

impl From<TrendPoint> for (f64, f64) {
    fn from(p: TrendPoint) -> Self {
        (p.attempt, p.value)
    }
}
