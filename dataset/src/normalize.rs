use encoding::FeatureRecord;

use crate::error::{DatasetError, Result};

const LOWER: f64 = -1.0;
const UPPER: f64 = 1.0;

/// Min-max map from the observed evaluation range onto `[-1, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinMaxScaler {
    min: i32,
    max: i32,
}

impl MinMaxScaler {
    pub fn fit(records: &[FeatureRecord]) -> Result<Self> {
        let min = records.iter().map(|r| r.evaluation).min().ok_or(DatasetError::EmptyTable)?;
        let max = records.iter().map(|r| r.evaluation).max().ok_or(DatasetError::EmptyTable)?;

        if min == max {
            return Err(DatasetError::DegenerateRange(min));
        }

        Ok(Self { min, max })
    }

    #[inline(always)]
    pub fn transform(&self, evaluation: i32) -> f64 {
        let span = f64::from(self.max) - f64::from(self.min);
        let scaled = (f64::from(evaluation) - f64::from(self.min)) / span;
        LOWER + scaled * (UPPER - LOWER)
    }

    pub fn bounds(&self) -> (i32, i32) {
        (self.min, self.max)
    }
}

/// Fits on `records` and returns the scaler with one scaled value per record.
pub fn normalize(records: &[FeatureRecord]) -> Result<(MinMaxScaler, Vec<f64>)> {
    let scaler = MinMaxScaler::fit(records)?;
    let scaled = records.iter().map(|r| scaler.transform(r.evaluation)).collect();
    Ok((scaler, scaled))
}
