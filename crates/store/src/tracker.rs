//! Bucket-transition detection for job detail views.
//!
//! [`JobLocationTracker`] is a pure state machine: feed it the bucket a
//! job was found in after each store update and it reports whether the
//! job moved, vanished, or stayed put. It never writes to the store.
//!
//! [`watch_job`] wires a tracker to a live [`JobStore`], forwarding
//! transitions to an `mpsc` channel until the job vanishes, the store
//! closes, or the caller cancels.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc};
use tokio_util::sync::CancellationToken;
use worklink_core::{Bucket, JobId, Perspective};

use crate::store::JobStore;

/// Outcome of feeding one observation to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerUpdate {
    /// Same bucket as before (or tracking already cleared).
    Unchanged,
    /// The job moved between buckets of the tracked perspective.
    Moved { from: Bucket, to: Bucket },
    /// The job vanished from every bucket; tracking is now cleared.
    Removed,
}

/// A bucket-to-bucket move, as delivered by [`watch_job`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BucketTransition {
    pub from: Bucket,
    pub to: Bucket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackState {
    /// Tracking started but the job has not been seen in any bucket yet
    /// (initial bucket not supplied, first scan pending).
    Pending,
    /// Last known bucket.
    In(Bucket),
    /// Terminal: the job vanished from all buckets of the perspective.
    Untracked,
}

/// Derived read-side state machine for one job under one perspective.
#[derive(Debug)]
pub struct JobLocationTracker {
    perspective: Perspective,
    job_id: JobId,
    state: TrackState,
}

impl JobLocationTracker {
    /// Start tracking. `initial` is the bucket the detail view was
    /// opened from; pass `None` to infer it from the first observation.
    pub fn new(perspective: Perspective, job_id: impl Into<JobId>, initial: Option<Bucket>) -> Self {
        Self {
            perspective,
            job_id: job_id.into(),
            state: match initial {
                Some(bucket) => TrackState::In(bucket),
                None => TrackState::Pending,
            },
        }
    }

    pub fn perspective(&self) -> Perspective {
        self.perspective
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Last known bucket, or `None` before the first sighting and after
    /// the job vanished.
    pub fn current_bucket(&self) -> Option<Bucket> {
        match self.state {
            TrackState::In(bucket) => Some(bucket),
            _ => None,
        }
    }

    /// Whether the terminal untracked state has been reached.
    pub fn is_tracking(&self) -> bool {
        self.state != TrackState::Untracked
    }

    /// Feed the result of a bucket scan (`located` = first bucket of
    /// the perspective containing the job, in fixed scan order).
    pub fn observe(&mut self, located: Option<Bucket>) -> TrackerUpdate {
        match (self.state, located) {
            (TrackState::Untracked, _) => TrackerUpdate::Unchanged,
            // First sighting fixes the initial bucket without emitting
            // a false transition into it.
            (TrackState::Pending, Some(bucket)) => {
                self.state = TrackState::In(bucket);
                TrackerUpdate::Unchanged
            }
            // Not loaded yet; keep waiting for the first sighting.
            (TrackState::Pending, None) => TrackerUpdate::Unchanged,
            (TrackState::In(current), Some(bucket)) if bucket == current => {
                TrackerUpdate::Unchanged
            }
            (TrackState::In(current), Some(bucket)) => {
                self.state = TrackState::In(bucket);
                TrackerUpdate::Moved {
                    from: current,
                    to: bucket,
                }
            }
            (TrackState::In(_), None) => {
                self.state = TrackState::Untracked;
                TrackerUpdate::Removed
            }
        }
    }
}

/// Buffer capacity for the transition channel.
const TRANSITION_CHANNEL_CAPACITY: usize = 16;

/// Drive a [`JobLocationTracker`] from live store updates.
///
/// Spawns a task that re-scans the store after every update of the
/// tracked perspective and forwards each [`BucketTransition`] to the
/// returned channel. The task exits when the job vanishes from all
/// buckets, the store closes, the receiver is dropped, or `cancel` is
/// triggered.
pub fn watch_job(
    store: Arc<JobStore>,
    perspective: Perspective,
    job_id: impl Into<JobId>,
    initial: Option<Bucket>,
    cancel: CancellationToken,
) -> mpsc::Receiver<BucketTransition> {
    let (tx, rx) = mpsc::channel(TRANSITION_CHANNEL_CAPACITY);
    let job_id = job_id.into();

    tokio::spawn(async move {
        let mut tracker = JobLocationTracker::new(perspective, job_id.clone(), initial);
        let mut updates = store.subscribe();

        // Observe the state already loaded before the first update.
        let located = store.locate_job(perspective, &job_id).await;
        if !apply(&mut tracker, located, &tx).await {
            return;
        }

        loop {
            let update = tokio::select! {
                _ = cancel.cancelled() => return,
                update = updates.recv() => update,
            };

            match update {
                Ok(update) if update.perspective != perspective => continue,
                Ok(_) => {}
                // Missed updates are harmless: the next scan reads the
                // current snapshot, not the missed intermediate ones.
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(job_id = %job_id, skipped, "Tracker lagged behind store updates");
                }
                Err(broadcast::error::RecvError::Closed) => return,
            }

            if !store.is_open().await {
                return;
            }

            let located = store.locate_job(perspective, &job_id).await;
            if !apply(&mut tracker, located, &tx).await {
                return;
            }
        }
    });

    rx
}

/// Feed one observation; returns `false` when the watch task should end.
async fn apply(
    tracker: &mut JobLocationTracker,
    located: Option<Bucket>,
    tx: &mpsc::Sender<BucketTransition>,
) -> bool {
    match tracker.observe(located) {
        TrackerUpdate::Unchanged => true,
        TrackerUpdate::Moved { from, to } => {
            tracing::debug!(
                job_id = %tracker.job_id(),
                perspective = %tracker.perspective(),
                %from,
                %to,
                "Tracked job moved between buckets",
            );
            tx.send(BucketTransition { from, to }).await.is_ok()
        }
        TrackerUpdate::Removed => {
            tracing::debug!(
                job_id = %tracker.job_id(),
                perspective = %tracker.perspective(),
                "Tracked job vanished from all buckets",
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn supplied_initial_bucket_is_current() {
        let tracker =
            JobLocationTracker::new(Perspective::Creator, "job-1", Some(Bucket::Waiting));
        assert_eq!(tracker.current_bucket(), Some(Bucket::Waiting));
        assert!(tracker.is_tracking());
    }

    #[test]
    fn first_sighting_does_not_emit_transition() {
        let mut tracker = JobLocationTracker::new(Perspective::Creator, "job-1", None);
        assert_eq!(
            tracker.observe(Some(Bucket::Waiting)),
            TrackerUpdate::Unchanged
        );
        assert_eq!(tracker.current_bucket(), Some(Bucket::Waiting));
    }

    #[test]
    fn move_emits_exactly_one_transition() {
        let mut tracker =
            JobLocationTracker::new(Perspective::Creator, "job-1", Some(Bucket::Waiting));

        assert_eq!(
            tracker.observe(Some(Bucket::Waiting)),
            TrackerUpdate::Unchanged
        );
        assert_eq!(
            tracker.observe(Some(Bucket::InProgress)),
            TrackerUpdate::Moved {
                from: Bucket::Waiting,
                to: Bucket::InProgress,
            }
        );
        assert_eq!(
            tracker.observe(Some(Bucket::InProgress)),
            TrackerUpdate::Unchanged
        );
    }

    #[test]
    fn vanishing_clears_tracking_without_false_transition() {
        let mut tracker =
            JobLocationTracker::new(Perspective::Executor, "job-1", Some(Bucket::New));

        assert_eq!(tracker.observe(None), TrackerUpdate::Removed);
        assert!(!tracker.is_tracking());
        assert_eq!(tracker.current_bucket(), None);

        // Terminal: even a reappearance is ignored.
        assert_eq!(
            tracker.observe(Some(Bucket::Waiting)),
            TrackerUpdate::Unchanged
        );
        assert!(!tracker.is_tracking());
    }

    #[test]
    fn pending_then_absent_keeps_waiting() {
        let mut tracker = JobLocationTracker::new(Perspective::Creator, "job-1", None);
        assert_eq!(tracker.observe(None), TrackerUpdate::Unchanged);
        assert!(tracker.is_tracking());
        assert_eq!(
            tracker.observe(Some(Bucket::Done)),
            TrackerUpdate::Unchanged
        );
        assert_eq!(tracker.current_bucket(), Some(Bucket::Done));
    }
}
