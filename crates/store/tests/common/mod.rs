//! In-memory mock of the job gateway for store tests.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use tokio::sync::{Mutex, Semaphore};
use worklink_core::{Bucket, Job, Perspective};
use worklink_gateway::{CompletionOptions, GatewayError, JobGateway};

pub type BucketKey = (Perspective, Bucket);

/// Configurable fake gateway: per-bucket responses, mutation recording,
/// injected failures, and an optional gate that blocks the first N
/// bucket fetches (for in-flight / teardown races).
pub struct MockJobGateway {
    buckets: Mutex<HashMap<BucketKey, Result<Vec<Job>, String>>>,
    point_jobs: Mutex<HashMap<String, Job>>,
    list_calls: Mutex<Vec<BucketKey>>,
    mutations: Mutex<Vec<String>>,
    mutation_error: Mutex<Option<String>>,
    membership: Mutex<Result<bool, String>>,
    gate: Mutex<Option<Gate>>,
}

struct Gate {
    semaphore: Arc<Semaphore>,
    remaining: usize,
}

impl MockJobGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            buckets: Mutex::new(HashMap::new()),
            point_jobs: Mutex::new(HashMap::new()),
            list_calls: Mutex::new(Vec::new()),
            mutations: Mutex::new(Vec::new()),
            mutation_error: Mutex::new(None),
            membership: Mutex::new(Ok(false)),
            gate: Mutex::new(None),
        })
    }

    pub async fn set_bucket(&self, perspective: Perspective, bucket: Bucket, jobs: Vec<Job>) {
        self.buckets
            .lock()
            .await
            .insert((perspective, bucket), Ok(jobs));
    }

    pub async fn fail_bucket(&self, perspective: Perspective, bucket: Bucket, message: &str) {
        self.buckets
            .lock()
            .await
            .insert((perspective, bucket), Err(message.to_string()));
    }

    pub async fn set_point_job(&self, job: Job) {
        self.point_jobs.lock().await.insert(job.id.clone(), job);
    }

    pub async fn fail_mutations(&self, message: &str) {
        *self.mutation_error.lock().await = Some(message.to_string());
    }

    pub async fn set_membership(&self, result: Result<bool, String>) {
        *self.membership.lock().await = result;
    }

    /// Block the next `count` bucket fetches until permits are added to
    /// the returned semaphore.
    pub async fn gate_next_lists(&self, count: usize) -> Arc<Semaphore> {
        let semaphore = Arc::new(Semaphore::new(0));
        *self.gate.lock().await = Some(Gate {
            semaphore: semaphore.clone(),
            remaining: count,
        });
        semaphore
    }

    pub async fn list_call_count(&self) -> usize {
        self.list_calls.lock().await.len()
    }

    pub async fn recorded_mutations(&self) -> Vec<String> {
        self.mutations.lock().await.clone()
    }

    async fn record_mutation(&self, action: String) -> Result<(), GatewayError> {
        if let Some(message) = self.mutation_error.lock().await.clone() {
            return Err(api_error(&message));
        }
        self.mutations.lock().await.push(action);
        Ok(())
    }
}

fn api_error(message: &str) -> GatewayError {
    GatewayError::Api {
        status: 500,
        message: message.to_string(),
    }
}

#[async_trait]
impl JobGateway for MockJobGateway {
    async fn list_jobs(
        &self,
        perspective: Perspective,
        bucket: Bucket,
    ) -> Result<Vec<Job>, GatewayError> {
        self.list_calls.lock().await.push((perspective, bucket));

        let blocked = {
            let mut gate = self.gate.lock().await;
            match gate.as_mut() {
                Some(g) if g.remaining > 0 => {
                    g.remaining -= 1;
                    Some(g.semaphore.clone())
                }
                _ => None,
            }
        };
        if let Some(semaphore) = blocked {
            semaphore.acquire().await.unwrap().forget();
        }

        match self.buckets.lock().await.get(&(perspective, bucket)) {
            Some(Ok(jobs)) => Ok(jobs.clone()),
            Some(Err(message)) => Err(api_error(message)),
            None => Ok(Vec::new()),
        }
    }

    async fn get_job(&self, id: &str) -> Result<Job, GatewayError> {
        self.point_jobs
            .lock()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::Api {
                status: 404,
                message: format!("job {id} not found"),
            })
    }

    async fn delete_job(&self, id: &str) -> Result<(), GatewayError> {
        self.record_mutation(format!("delete:{id}")).await
    }

    async fn close_job(&self, id: &str) -> Result<(), GatewayError> {
        self.record_mutation(format!("close:{id}")).await
    }

    async fn mark_done(&self, id: &str, _options: &CompletionOptions) -> Result<(), GatewayError> {
        self.record_mutation(format!("done:{id}")).await
    }

    async fn assign_executor(&self, id: &str, executor_id: &str) -> Result<(), GatewayError> {
        self.record_mutation(format!("assign:{id}:{executor_id}"))
            .await
    }

    async fn unassign_executor(&self, id: &str) -> Result<(), GatewayError> {
        self.record_mutation(format!("unassign:{id}")).await
    }

    async fn nominate_provider(&self, id: &str) -> Result<(), GatewayError> {
        self.record_mutation(format!("nominate:{id}")).await
    }

    async fn withdraw_provider(&self, id: &str) -> Result<(), GatewayError> {
        self.record_mutation(format!("withdraw:{id}")).await
    }

    async fn is_provider_in_job(&self, _id: &str) -> Result<bool, GatewayError> {
        match self.membership.lock().await.as_ref() {
            Ok(answer) => Ok(*answer),
            Err(message) => Err(api_error(message)),
        }
    }
}

/// Minimal job record for tests.
pub fn job(id: &str) -> Job {
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
