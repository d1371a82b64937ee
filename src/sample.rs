use ndarray::Array3;
use serde::{Deserialize, Serialize};

/// One image reduced to a small `height x width x 3` colour array.
///
/// `data` is `None` when the image could not be read or decoded. Such a
/// sample still takes part in clustering but never matches anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    path: String,
    pub data: Option<Array3<u8>>,
}

impl Sample {
    pub fn new(path: impl Into<String>, data: Array3<u8>) -> Self {
        Sample {
            path: path.into(),
            data: Some(data),
        }
    }

    pub fn invalid(path: impl Into<String>) -> Self {
        Sample {
            path: path.into(),
            data: None,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_valid(&self) -> bool {
        self.data.is_some()
    }

    /// `(height, width)` of the array, if any.
    pub fn dims(&self) -> Option<(usize, usize)> {
        self.data.as_ref().map(|d| {
            let shape = d.shape();
            (shape[0], shape[1])
        })
    }
}

/// Samples judged to be near-duplicates of the first member (the anchor).
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    members: Vec<Sample>,
}

impl DuplicateGroup {
    pub(crate) fn new(anchor: Sample) -> Self {
        DuplicateGroup {
            members: vec![anchor],
        }
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.members.push(sample);
    }

    pub fn anchor(&self) -> &Sample {
        &self.members[0]
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn paths(&self) -> Vec<&str> {
        self.members.iter().map(Sample::path).collect()
    }
}
