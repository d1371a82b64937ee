use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::sample::Sample;

const CACHE_FILE_NAME: &str = "samples.bin";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("failed to read cache {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write cache {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cache is corrupt: {0}")]
    Corrupt(#[source] bincode::Error),
    #[error("cache entry {path} has invalid shape {shape:?}")]
    InvalidSample { path: String, shape: Vec<usize> },
    #[error("failed to encode samples: {0}")]
    Encode(#[source] bincode::Error),
}

pub fn serialize(samples: &[Sample]) -> Result<Vec<u8>, CacheError> {
    bincode::serialize(samples).map_err(CacheError::Encode)
}

/// Decodes a sample list, rejecting arrays that are not `h x w x 3`.
pub fn deserialize(bytes: &[u8]) -> Result<Vec<Sample>, CacheError> {
    let samples = bincode::deserialize::<Vec<Sample>>(bytes).map_err(CacheError::Corrupt)?;

    for sample in &samples {
        if let Some(data) = &sample.data {
            let shape = data.shape();
            if shape[0] == 0 || shape[1] == 0 || shape[2] != 3 {
                return Err(CacheError::InvalidSample {
                    path: sample.path().to_string(),
                    shape: shape.to_vec(),
                });
            }
        }
    }

    Ok(samples)
}

/// Samples persisted under a cache directory so images are not decoded
/// again on the next run.
pub struct SampleCache {
    cache_dir: PathBuf,
}

impl SampleCache {
    pub fn new(cache_dir: &Path) -> Self {
        SampleCache {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    pub fn file_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE_NAME)
    }

    /// Loads the cached samples. A missing cache file loads as empty.
    pub fn load(&self) -> Result<Vec<Sample>, CacheError> {
        let path = self.file_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut buffer = Vec::new();
        File::open(&path)
            .and_then(|mut file| file.read_to_end(&mut buffer))
            .map_err(|source| CacheError::Read {
                path: path.clone(),
                source,
            })?;

        let samples = deserialize(&buffer)?;
        log::info!("{} samples are loaded from cache.", samples.len());
        Ok(samples)
    }

    pub fn save(&self, samples: &[Sample]) -> Result<(), CacheError> {
        let encoded = serialize(samples)?;
        let path = self.file_path();

        fs::create_dir_all(&self.cache_dir)
            .and_then(|_| File::create(&path))
            .and_then(|mut file| file.write_all(&encoded))
            .map_err(|source| CacheError::Write {
                path: path.clone(),
                source,
            })?;

        log::info!("{} samples are saved to {:?}.", samples.len(), path);
        Ok(())
    }
}
