//! Near-duplicate image search by mean squared error over small colour
//! samples.

pub mod cache;
pub mod config;
pub mod distance;
pub mod export;
pub mod sample;
pub mod sample_extract;
pub mod similar_images;

pub use config::Config;
pub use sample::{DuplicateGroup, Sample};
