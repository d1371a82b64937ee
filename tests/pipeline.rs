use std::path::Path;

use image::{Rgb, RgbImage};
use simdupe::cache::SampleCache;
use simdupe::sample_extract::SampleExtractor;
use simdupe::similar_images::SimilarImages;
use simdupe::{Config, DuplicateGroup};

fn write_image(path: &Path, colour: [u8; 3]) {
    let mut img = RgbImage::from_pixel(80, 60, Rgb(colour));
    // A small edit that should not break the match.
    img.put_pixel(3, 3, Rgb([colour[0].wrapping_add(1), colour[1], colour[2]]));
    img.save(path).unwrap();
}

fn file_names(group: &DuplicateGroup) -> Vec<String> {
    group
        .paths()
        .iter()
        .map(|p| {
            Path::new(p)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .into_owned()
        })
        .collect()
}

#[test]
fn test_finds_duplicates_in_one_folder() {
    let dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("a_red.png"), [200, 10, 10]);
    write_image(&dir.path().join("b_blue.png"), [10, 10, 200]);
    write_image(&dir.path().join("c_red_copy.png"), [200, 10, 10]);
    RgbImage::from_pixel(80, 60, Rgb([200, 10, 10]))
        .save(dir.path().join("d_red.gif"))
        .unwrap();
    std::fs::write(dir.path().join("e_broken.png"), b"\x89PNG\r\n\x1a\nbroken").unwrap();

    let config = Config::default();
    let extractor = SampleExtractor::new(&config);
    let paths = extractor.list_images(dir.path()).unwrap();
    // The gif is excluded; the broken png still sniffs as png.
    assert_eq!(paths.len(), 4);

    let mut samples = extractor.extract_all(&paths, &[]);
    assert_eq!(samples.len(), 4);
    assert_eq!(samples.iter().filter(|s| !s.is_valid()).count(), 1);

    let groups = SimilarImages::new(config.threshold).cluster(&mut samples);
    assert!(samples.is_empty());
    assert_eq!(groups.len(), 1);
    assert_eq!(file_names(&groups[0]), vec!["a_red.png", "c_red_copy.png"]);
}

#[test]
fn test_matches_between_two_folders() {
    let source_dir = tempfile::tempdir().unwrap();
    let target_dir = tempfile::tempdir().unwrap();
    write_image(&source_dir.path().join("red.png"), [200, 10, 10]);
    write_image(&source_dir.path().join("green.png"), [10, 200, 10]);
    write_image(&target_dir.path().join("blue.png"), [10, 10, 200]);
    write_image(&target_dir.path().join("red_edit.bmp"), [200, 10, 10]);

    let config = Config::default();
    let extractor = SampleExtractor::new(&config);
    let source_paths = extractor.list_images(source_dir.path()).unwrap();
    let target_paths = extractor.list_images(target_dir.path()).unwrap();
    let mut source = extractor.extract_all(&source_paths, &[]);
    let target = extractor.extract_all(&target_paths, &[]);

    let groups = SimilarImages::new(config.threshold).cluster_against(&mut source, &target);
    assert!(source.is_empty());
    assert_eq!(target.len(), 2);
    assert_eq!(groups.len(), 1);
    assert_eq!(file_names(&groups[0]), vec!["red.png", "red_edit.bmp"]);
}

#[test]
fn test_cached_samples_give_same_groups() {
    let dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();
    write_image(&dir.path().join("one.png"), [50, 60, 70]);
    write_image(&dir.path().join("two.png"), [50, 60, 70]);

    let config = Config::default();
    let extractor = SampleExtractor::new(&config);
    let paths = extractor.list_images(dir.path()).unwrap();
    let fresh = extractor.extract_all(&paths, &[]);

    let cache = SampleCache::new(cache_dir.path());
    cache.save(&fresh).unwrap();
    let loaded = cache.load().unwrap();
    assert_eq!(loaded, fresh);

    let mut samples = extractor.extract_all(&paths, &loaded);
    assert_eq!(samples, fresh);
    let groups = SimilarImages::new(config.threshold).cluster(&mut samples);
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].len(), 2);
}
