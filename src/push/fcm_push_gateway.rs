use crate::configuration::PushGatewaySettings;
use crate::push::{FailureKind, MulticastSummary, PushGateway, PushMessage, SendOutcome};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};

pub struct FcmPushGateway {
    http_client: reqwest::Client,
    base_url: String,
    api_key: Secret<String>,
    android_channel_id: String,
}

impl FcmPushGateway {
    pub fn new(configuration: &PushGatewaySettings) -> Result<Self, reqwest::Error> {
        let http_client = reqwest::Client::builder()
            .timeout(configuration.timeout())
            .build()?;
        Ok(Self {
            http_client,
            base_url: configuration.base_url.clone(),
            api_key: configuration.api_key.clone(),
            android_channel_id: configuration.android_channel_id.clone(),
        })
    }
}

#[derive(serde::Deserialize)]
struct FcmResponse {
    results: Vec<FcmResult>,
}

#[derive(serde::Deserialize)]
struct FcmResult {
    error: Option<String>,
}

#[async_trait]
impl PushGateway for FcmPushGateway {
    async fn send_multicast(
        &self,
        tokens: &[String],
        message: &PushMessage,
    ) -> Result<MulticastSummary, anyhow::Error> {
        let request_body = serde_json::json!({
            "registration_ids": tokens,
            "priority": "high",
            "notification": {
                "title": message.title,
                "body": message.body,
                "android_channel_id": self.android_channel_id,
                "sound": "default",
                "badge": "1",
            },
            "data": message.data,
        });

        let response = self
            .http_client
            .post(format!("{}/fcm/send", self.base_url))
            .header(
                reqwest::header::AUTHORIZATION,
                format!("key={}", self.api_key.expose_secret()),
            )
            .json(&request_body)
            .send()
            .await?
            .error_for_status()?
            .json::<FcmResponse>()
            .await?;

        let outcomes = response
            .results
            .into_iter()
            .map(|result| match result.error.as_deref() {
                None => SendOutcome::Delivered,
                Some("NotRegistered") => SendOutcome::Failed(FailureKind::Unregistered),
                Some("InvalidRegistration") => SendOutcome::Failed(FailureKind::InvalidToken),
                Some(other) => SendOutcome::Failed(FailureKind::Other(other.to_string())),
            })
            .collect();
        Ok(MulticastSummary { outcomes })
    }
}
