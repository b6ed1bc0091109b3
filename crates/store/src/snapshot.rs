//! Per-perspective bucket snapshots.
//!
//! A snapshot holds every bucket list of one perspective. Reloads swap
//! whole snapshots; nothing ever mutates an individual list in place.

use worklink_core::{Bucket, Job};

/// Creator-side bucket lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatorJobs {
    pub waiting: Vec<Job>,
    pub in_progress: Vec<Job>,
    pub done: Vec<Job>,
}

/// Executor-side bucket lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutorJobs {
    pub new: Vec<Job>,
    pub waiting: Vec<Job>,
    pub in_progress: Vec<Job>,
    pub done: Vec<Job>,
}

impl CreatorJobs {
    /// The list for `bucket`, or `None` for the executor-only `New`.
    pub fn bucket(&self, bucket: Bucket) -> Option<&[Job]> {
        match bucket {
            Bucket::New => None,
            Bucket::Waiting => Some(&self.waiting),
            Bucket::InProgress => Some(&self.in_progress),
            Bucket::Done => Some(&self.done),
        }
    }

    /// First bucket containing `id`, scanning in the fixed creator order.
    pub fn locate(&self, id: &str) -> Option<Bucket> {
        locate(id, worklink_core::bucket::CREATOR_BUCKETS, |b| self.bucket(b))
    }
}

impl ExecutorJobs {
    pub fn bucket(&self, bucket: Bucket) -> Option<&[Job]> {
        match bucket {
            Bucket::New => Some(&self.new),
            Bucket::Waiting => Some(&self.waiting),
            Bucket::InProgress => Some(&self.in_progress),
            Bucket::Done => Some(&self.done),
        }
    }

    /// First bucket containing `id`, scanning in the fixed executor order.
    pub fn locate(&self, id: &str) -> Option<Bucket> {
        locate(id, worklink_core::bucket::EXECUTOR_BUCKETS, |b| {
            self.bucket(b)
        })
    }
}

fn locate<'a>(
    id: &str,
    order: &[Bucket],
    bucket: impl Fn(Bucket) -> Option<&'a [Job]>,
) -> Option<Bucket> {
    order.iter().copied().find(|&b| {
        bucket(b)
            .map(|jobs| jobs.iter().any(|j| j.id == id))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn job(id: &str) -> Job {
        Job {
            id: id.to_string(),
            job_type: "repair".into(),
            subtype: None,
            profession: "plumber".into(),
            description: String::new(),
            price: Decimal::new(100, 0),
            image_urls: vec![],
            location: None,
            starts_at: None,
            ends_at: None,
            creator_id: "creator-1".into(),
            executor_id: None,
            provider_ids: vec![],
            comment: None,
            history: vec![],
        }
    }

    #[test]
    fn locate_finds_first_matching_bucket() {
        let jobs = CreatorJobs {
            waiting: vec![job("a")],
            in_progress: vec![job("b")],
            done: vec![],
        };
        assert_eq!(jobs.locate("a"), Some(Bucket::Waiting));
        assert_eq!(jobs.locate("b"), Some(Bucket::InProgress));
        assert_eq!(jobs.locate("missing"), None);
    }

    #[test]
    fn creator_snapshot_has_no_new_bucket() {
        let jobs = CreatorJobs::default();
        assert!(jobs.bucket(Bucket::New).is_none());
    }

    #[test]
    fn executor_locate_scans_new_first() {
        let jobs = ExecutorJobs {
            new: vec![job("x")],
            waiting: vec![job("x")],
            in_progress: vec![],
            done: vec![],
        };
        // A duplicated id would violate bucket exclusivity; the scan
        // order still makes the result deterministic.
        assert_eq!(jobs.locate("x"), Some(Bucket::New));
    }
}
