use std::collections::VecDeque;

use crate::distance::try_mse;
use crate::sample::{DuplicateGroup, Sample};

/// Greedy MSE clustering of samples against a fixed threshold.
#[derive(Debug)]
pub struct SimilarImages {
    threshold: f64,
}

impl SimilarImages {
    pub fn new(threshold: f64) -> SimilarImages {
        SimilarImages { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    // Pairs that cannot be compared never match, whatever the threshold.
    fn is_duplicate(&self, anchor: &Sample, candidate: &Sample) -> bool {
        match try_mse(anchor, candidate) {
            Ok(err) => err < self.threshold,
            Err(e) => {
                log::debug!("{e}");
                false
            }
        }
    }

    /// Groups the samples of one collection, draining it.
    ///
    /// The first remaining sample becomes the anchor and every later sample
    /// closer than the threshold to that anchor joins its group, in order.
    /// Members are only measured against the anchor, so two members of a
    /// group can be further apart than the threshold. Anchors without a
    /// match are dropped.
    pub fn cluster(&self, samples: &mut Vec<Sample>) -> Vec<DuplicateGroup> {
        let mut queue: VecDeque<Sample> = samples.drain(..).collect();
        let mut groups = Vec::new();

        while let Some(anchor) = queue.pop_front() {
            let mut group = DuplicateGroup::new(anchor);
            let mut rest = VecDeque::with_capacity(queue.len());

            for candidate in queue.drain(..) {
                if self.is_duplicate(group.anchor(), &candidate) {
                    group.push(candidate);
                } else {
                    rest.push_back(candidate);
                }
            }
            queue = rest;

            if group.len() >= 2 {
                log::debug!(
                    "{} has {} near-duplicate(s)",
                    group.anchor().path(),
                    group.len() - 1
                );
                groups.push(group);
            }
        }

        groups
    }

    /// Matches every sample of `source` against `target`, draining `source`.
    ///
    /// Each source sample is paired with the first target sample closer
    /// than the threshold. `target` is left untouched and one of its samples
    /// may pair with several source samples.
    pub fn cluster_against(
        &self,
        source: &mut Vec<Sample>,
        target: &[Sample],
    ) -> Vec<DuplicateGroup> {
        let mut groups = Vec::new();

        for sample in source.drain(..) {
            let matched = target
                .iter()
                .find(|candidate| self.is_duplicate(&sample, candidate));

            if let Some(candidate) = matched {
                let mut group = DuplicateGroup::new(sample);
                group.push(candidate.clone());
                groups.push(group);
            }
        }

        groups
    }
}
