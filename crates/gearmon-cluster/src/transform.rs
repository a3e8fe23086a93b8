use gearmon_types::JobMap;

/// Caller-supplied hook applied to each host's job map after parsing and
/// before aggregation.
///
/// Typical uses are renaming functions for display or dropping entries the
/// operator does not care about. The transform never sees worker buckets.
pub trait JobTransform: Send + Sync {
    fn transform(&self, jobs: JobMap) -> JobMap;
}

impl<F> JobTransform for F
where
    F: Fn(JobMap) -> JobMap + Send + Sync,
{
    fn transform(&self, jobs: JobMap) -> JobMap {
        self(jobs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gearmon_types::JobStatus;

    #[test]
    fn test_closure_as_transform() {
        let upper = |jobs: JobMap| -> JobMap {
            jobs.into_iter()
                .map(|(name, status)| (name.to_uppercase(), status))
                .collect()
        };

        let mut jobs = JobMap::new();
        jobs.insert("resize".to_string(), JobStatus::new(1, 0, 1));

        let out = JobTransform::transform(&upper, jobs);
        assert!(out.contains_key("RESIZE"));
        assert!(!out.contains_key("resize"));
    }
}
