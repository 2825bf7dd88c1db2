mod cloud_tasks_queue;

use async_trait::async_trait;

pub use cloud_tasks_queue::CloudTasksQueue;

/// A deferred HTTP callback: POSTed to `url` once `schedule_time`
/// (seconds since epoch) has passed.
#[derive(Debug, Clone)]
pub struct HttpTask {
    pub url: String,
    pub body: Vec<u8>,
    pub schedule_time: i64,
}

#[async_trait]
pub trait TaskQueue: Send + Sync {
    async fn enqueue_http_task(&self, task: HttpTask) -> Result<(), anyhow::Error>;
}
