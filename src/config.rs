use thiserror::Error;

pub const DEFAULT_SAMPLE_SIZE: u32 = 50;
pub const DEFAULT_THRESHOLD: f64 = 20.0;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("sample size must be at least 1 pixel")]
    ZeroSampleSize,
    #[error("threshold must be a positive finite number (got {0})")]
    InvalidThreshold(f64),
}

/// Settings shared by the sample extractor and the clusterer.
///
/// `sample_size` is the side length of the square comparison sample and
/// `threshold` the MSE below which two samples count as duplicates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Config {
    pub sample_size: u32,
    pub threshold: f64,
}

impl Config {
    pub fn new(sample_size: u32, threshold: f64) -> Result<Self, ConfigError> {
        let config = Config {
            sample_size,
            threshold,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_size == 0 {
            return Err(ConfigError::ZeroSampleSize);
        }
        if !self.threshold.is_finite() || self.threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(self.threshold));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sample_size: DEFAULT_SAMPLE_SIZE,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_is_valid() {
        let config = Config::default();
        assert_eq!(config.sample_size, 50);
        assert_eq!(config.threshold, 20.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_sample_size_rejected() {
        assert_eq!(Config::new(0, 20.0), Err(ConfigError::ZeroSampleSize));
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-1.0)]
    #[case::infinite(f64::INFINITY)]
    fn test_bad_threshold_rejected(#[case] threshold: f64) {
        assert_eq!(
            Config::new(50, threshold),
            Err(ConfigError::InvalidThreshold(threshold))
        );
    }

    #[test]
    fn test_nan_threshold_rejected() {
        assert!(matches!(
            Config::new(50, f64::NAN),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }
}
