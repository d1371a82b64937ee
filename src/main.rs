use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};

use simdupe::cache::SampleCache;
use simdupe::config::{Config, DEFAULT_SAMPLE_SIZE, DEFAULT_THRESHOLD};
use simdupe::export::export_samples;
use simdupe::sample_extract::SampleExtractor;
use simdupe::similar_images::SimilarImages;
use simdupe::{DuplicateGroup, Sample};

/// Find visually similar images in a folder, or between two folders.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Folder to search for duplicates.
    #[arg(short = 't', long)]
    target_dir_path: PathBuf,

    /// Folder to match the target folder against instead of itself.
    #[arg(short = 'c', long)]
    comp_dir_path: Option<PathBuf>,

    /// Largest MSE still counted as a duplicate (exclusive).
    #[arg(short = 'r', long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f64,

    /// Side length of the comparison sample in pixels.
    #[arg(short = 'p', long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    sample_size: u32,

    /// Folder holding the sample cache.
    #[arg(short = 'a', long)]
    cache_dir_path: Option<PathBuf>,

    /// Also write the samples as comma-separated rows to this file.
    #[arg(short = 'e', long)]
    export_path: Option<PathBuf>,
}

fn load_cached(cache: Option<&SampleCache>) -> Vec<Sample> {
    let Some(cache) = cache else {
        return Vec::new();
    };
    match cache.load() {
        Ok(samples) => samples,
        Err(e) => {
            log::warn!("{e}; rebuilding samples from images");
            Vec::new()
        }
    }
}

fn extract_dir(
    extractor: &SampleExtractor,
    dir: &Path,
    cached: &[Sample],
) -> anyhow::Result<Vec<Sample>> {
    let image_paths = extractor
        .list_images(dir)
        .with_context(|| format!("failed to list images in {:?}", dir))?;
    Ok(extractor.extract_all(&image_paths, cached))
}

fn print_groups(groups: &[DuplicateGroup]) {
    if groups.is_empty() {
        println!("No duplicates found.");
        return;
    }
    println!("Found {} duplicate group(s):", groups.len());
    for (i, group) in groups.iter().enumerate() {
        println!(" Group {}:", i + 1);
        for path in group.paths() {
            println!("   {}", path);
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config = Config::new(args.sample_size, args.threshold)?;

    let cache = args.cache_dir_path.as_deref().map(SampleCache::new);
    let cached = load_cached(cache.as_ref());

    let extractor = SampleExtractor::new(&config);
    let mut target_samples = extract_dir(&extractor, &args.target_dir_path, &cached)?;
    let comp_samples = match &args.comp_dir_path {
        Some(comp_dir) => Some(extract_dir(&extractor, comp_dir, &cached)?),
        None => None,
    };

    let mut all_samples: Vec<Sample> = target_samples.clone();
    all_samples.extend(comp_samples.iter().flatten().cloned());

    if let Some(cache) = &cache {
        cache
            .save(&all_samples)
            .with_context(|| format!("failed to save cache to {:?}", cache.file_path()))?;
    }
    if let Some(export_path) = &args.export_path {
        export_samples(export_path, &all_samples)
            .with_context(|| format!("failed to export samples to {:?}", export_path))?;
    }

    let comp = SimilarImages::new(config.threshold);
    let groups = match &comp_samples {
        Some(comp_samples) => comp.cluster_against(&mut target_samples, comp_samples),
        None => comp.cluster(&mut target_samples),
    };
    log::info!(
        "{} group(s) under threshold {}.",
        groups.len(),
        comp.threshold()
    );

    print_groups(&groups);

    Ok(())
}
