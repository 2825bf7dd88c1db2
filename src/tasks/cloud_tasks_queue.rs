use crate::configuration::TaskQueueSettings;
use crate::tasks::{HttpTask, TaskQueue};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

pub struct CloudTasksQueue {
    http_client: reqwest::Client,
    base_url: String,
    queue_path: String,
    auth_token: Secret<String>,
}

impl CloudTasksQueue {
    pub fn new(configuration: &TaskQueueSettings) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder().build()?;
        Ok(Self {
            http_client,
            base_url: configuration.base_url.clone(),
            queue_path: configuration.queue_path(),
            auth_token: configuration.auth_token.clone(),
        })
    }
}

#[async_trait]
impl TaskQueue for CloudTasksQueue {
    async fn enqueue_http_task(&self, task: HttpTask) -> Result<(), anyhow::Error> {
        let request_body = serde_json::json!({
            "task": {
                "httpRequest": {
                    "httpMethod": "POST",
                    "url": task.url,
                    "headers": { "Content-Type": "application/json" },
                    "body": base64::encode(&task.body),
                },
                "scheduleTime": { "seconds": task.schedule_time },
            }
        });

        self.http_client
            .post(format!("{}/{}/tasks", self.base_url, self.queue_path))
            .bearer_auth(self.auth_token.expose_secret())
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
