//! Per-course rating ledger.

/// Submitted ratings and their arithmetic mean.
///
/// The mean is recomputed from the full list on every addition, so it never
/// drifts the way an incremental running average can.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingLedger {
    values: Vec<f64>,
    average: f64,
}

impl RatingLedger {
    /// Append a rating and return the new average.
    pub fn add(&mut self, value: f64) -> f64 {
        self.values.push(value);
        self.recompute();
        self.average
    }

    /// Mean of all ratings, `0.0` when there are none.
    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn recompute(&mut self) {
        self.average = if self.values.is_empty() {
            0.0
        } else {
            self.values.iter().sum::<f64>() / self.values.len() as f64
        };
    }
}
