use std::{
    collections::HashMap,
    fs::{self, File},
    io::BufReader,
    path::{Path, PathBuf},
};

use image::{imageops::FilterType, ImageFormat, ImageReader};
use indicatif::ProgressBar;
use ndarray::Array3;
use thiserror::Error;
use walkdir::WalkDir;

use crate::config::Config;
use crate::sample::Sample;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),
}

/// Turns image files into fixed-size comparison samples.
pub struct SampleExtractor {
    sample_size: u32,
}

impl SampleExtractor {
    const FILTER: FilterType = FilterType::CatmullRom;

    pub fn new(config: &Config) -> Self {
        SampleExtractor {
            sample_size: config.sample_size,
        }
    }

    fn expected_shape(&self) -> [usize; 3] {
        let size = self.sample_size as usize;
        [size, size, 3]
    }

    /// Recursively lists the files under `root` whose content sniffs as a
    /// decodable image other than gif.
    pub fn list_images(&self, root: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root.is_dir() {
            return Err(ScanError::NotADirectory(root.to_path_buf()));
        }

        let mut image_paths = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("skipping unreadable entry: {e}");
                    continue;
                }
            };
            // Path::is_file follows symlinks, unlike entry.file_type().
            if entry.path().is_file() && is_comparable_image(entry.path()) {
                image_paths.push(entry.into_path());
            }
        }

        log::info!("{} images found under {:?}.", image_paths.len(), root);
        Ok(image_paths)
    }

    /// Builds the sample of one file. Unreadable or undecodable files give
    /// an invalid sample instead of an error.
    pub fn extract(&self, image_path: &Path) -> Sample {
        let path = image_path.to_string_lossy().into_owned();
        match fs::read(image_path) {
            Ok(bytes) => self.extract_from_bytes(path, &bytes),
            Err(e) => {
                log::warn!("failed to read {path}: {e}");
                Sample::invalid(path)
            }
        }
    }

    pub fn extract_from_bytes(&self, path: impl Into<String>, bytes: &[u8]) -> Sample {
        let path = path.into();
        let image = match image::load_from_memory(bytes) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("failed to decode {path}: {e}");
                return Sample::invalid(path);
            }
        };

        // to_rgb8 expands grey and drops alpha, leaving exactly 3 channels.
        let resized = image::imageops::resize(
            &image.to_rgb8(),
            self.sample_size,
            self.sample_size,
            Self::FILTER,
        );
        let (width, height) = resized.dimensions();

        match Array3::from_shape_vec((height as usize, width as usize, 3), resized.into_raw()) {
            Ok(data) => Sample::new(path, data),
            Err(e) => {
                log::warn!("failed to shape sample for {path}: {e}");
                Sample::invalid(path)
            }
        }
    }

    /// Builds one sample per path, in order, reusing `cached` samples whose
    /// path matches and whose array has the configured size.
    ///
    /// Paths that are not valid UTF-8 are always rebuilt: their lossy string
    /// form is not unique, so it cannot key the cache.
    pub fn extract_all(&self, image_paths: &[PathBuf], cached: &[Sample]) -> Vec<Sample> {
        let expected = self.expected_shape();
        let cached_map: HashMap<&str, &Sample> = cached
            .iter()
            .filter(|s| s.data.as_ref().is_some_and(|d| d.shape() == expected))
            .map(|s| (s.path(), s))
            .collect();

        let mut samples: Vec<Option<Sample>> = Vec::with_capacity(image_paths.len());
        let mut pending = Vec::new();
        for (i, image_path) in image_paths.iter().enumerate() {
            let cached_sample = image_path.to_str().and_then(|key| cached_map.get(key));
            match cached_sample {
                Some(sample) => samples.push(Some((*sample).clone())),
                None => {
                    samples.push(None);
                    pending.push(i);
                }
            }
        }

        if !cached_map.is_empty() {
            log::info!(
                "{} of {} samples reused from cache.",
                image_paths.len() - pending.len(),
                image_paths.len()
            );
        }

        let bar = ProgressBar::new(pending.len() as u64);
        for i in pending {
            samples[i] = Some(self.extract(&image_paths[i]));
            bar.inc(1);
        }
        bar.finish();

        samples.into_iter().flatten().collect()
    }
}

// Sniffs the content only; the extension is ignored.
fn is_comparable_image(path: &Path) -> bool {
    let format = File::open(path)
        .and_then(|file| ImageReader::new(BufReader::new(file)).with_guessed_format())
        .ok()
        .and_then(|reader| reader.format());

    match format {
        Some(ImageFormat::Gif) | None => false,
        Some(_) => true,
    }
}
