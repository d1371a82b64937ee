use ndarray::Zip;
use thiserror::Error;

use crate::sample::Sample;

/// Distance reported when two samples cannot be compared. Far above any
/// realistic threshold, so such pairs never group.
pub const NO_COMPARISON: f64 = 1_000_000.0;

#[derive(Error, Debug, PartialEq)]
pub enum DistanceError {
    #[error("no sample data for {0}")]
    MissingData(String),
    #[error("shape mismatch between {left_path} {left:?} and {right_path} {right:?}")]
    ShapeMismatch {
        left_path: String,
        left: Vec<usize>,
        right_path: String,
        right: Vec<usize>,
    },
    #[error("empty sample data for {0}")]
    EmptyData(String),
}

/// Mean squared error between two samples.
///
/// The sum of squared differences is divided by `height * width`, not by
/// the number of channels as well.
pub fn try_mse(a: &Sample, b: &Sample) -> Result<f64, DistanceError> {
    let lhs = a
        .data
        .as_ref()
        .ok_or_else(|| DistanceError::MissingData(a.path().to_string()))?;
    let rhs = b
        .data
        .as_ref()
        .ok_or_else(|| DistanceError::MissingData(b.path().to_string()))?;

    if lhs.shape() != rhs.shape() {
        return Err(DistanceError::ShapeMismatch {
            left_path: a.path().to_string(),
            left: lhs.shape().to_vec(),
            right_path: b.path().to_string(),
            right: rhs.shape().to_vec(),
        });
    }

    let area = lhs.shape()[0] * lhs.shape()[1];
    if area == 0 {
        return Err(DistanceError::EmptyData(a.path().to_string()));
    }

    let err = Zip::from(lhs).and(rhs).fold(0.0, |acc, &x, &y| {
        let d = f64::from(x) - f64::from(y);
        acc + d * d
    });

    Ok(err / area as f64)
}

/// [`try_mse`] with the failure cases mapped to [`NO_COMPARISON`].
pub fn mse(a: &Sample, b: &Sample) -> f64 {
    match try_mse(a, b) {
        Ok(err) => err,
        Err(e) => {
            log::debug!("{e}");
            NO_COMPARISON
        }
    }
}
