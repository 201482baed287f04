use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::{
    error::FilterError,
    table::Record,
    units::{Radius, Unit},
};

/// Drops every candidate with at least one anchor inside the radius.
pub fn filter<'a>(
    candidates: &'a [Record],
    anchors: &[Record],
    radius: f64,
    unit: Unit,
) -> Result<Vec<&'a Record>, FilterError> {
    Ok(ExclusionFilter::new(Radius::new(radius, unit)?).run(candidates, anchors))
}

#[derive(Clone)]
pub struct ExclusionFilter {
    radius: Radius,
    parallel: bool,
    progress: Option<ProgressBar>,
}

impl ExclusionFilter {
    pub fn new(radius: Radius) -> Self {
        Self {
            radius,
            parallel: false,
            progress: None,
        }
    }

    /// Shard candidates across the rayon pool. Output order is unchanged.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn progress(mut self, pb: ProgressBar) -> Self {
        self.progress = Some(pb);
        self
    }

    pub fn radius(&self) -> Radius {
        self.radius
    }

    /// Keeps candidates in their original order.
    pub fn run<'a>(&self, candidates: &'a [Record], anchors: &[Record]) -> Vec<&'a Record> {
        let keep = |c: &&'a Record| {
            let excluded = self.is_excluded(c, anchors);
            if let Some(pb) = &self.progress {
                pb.inc(1);
            }
            !excluded
        };

        let kept: Vec<&'a Record> = if self.parallel {
            candidates.par_iter().filter(keep).collect()
        } else {
            candidates.iter().filter(keep).collect()
        };

        if let Some(pb) = &self.progress {
            pb.finish();
        }
        kept
    }

    /// Stops at the first anchor within range.
    pub fn is_excluded(&self, candidate: &Record, anchors: &[Record]) -> bool {
        let unit = self.radius.unit();
        anchors
            .iter()
            .any(|a| self.radius.contains(candidate.point.distance(&a.point, unit)))
    }

    /// The closest anchor to `candidate` as (index, distance in the radius
    /// unit), or None when there are no anchors.
    pub fn nearest(&self, candidate: &Record, anchors: &[Record]) -> Option<(usize, f64)> {
        let unit = self.radius.unit();
        anchors
            .iter()
            .map(|a| candidate.point.distance(&a.point, unit))
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
    }
}
