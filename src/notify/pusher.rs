//! Pusher Channels integration via REST API (no SDK dependency)

use super::EventPublisher;
use crate::utils::{AppError, AppResult};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use md5::Md5;
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct PusherConfig {
    pub app_id: String,
    pub key: String,
    pub secret: String,
    pub cluster: String,
}

#[derive(Clone)]
pub struct PusherPublisher {
    config: PusherConfig,
    client: reqwest::Client,
}

impl PusherPublisher {
    pub fn new(config: PusherConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn sign(&self, data: &str) -> AppResult<String> {
        let mut mac = HmacSha256::new_from_slice(self.config.secret.as_bytes())
            .map_err(|_| AppError::internal("Pusher secret HMAC key error"))?;
        mac.update(data.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }
}

#[async_trait]
impl EventPublisher for PusherPublisher {
    async fn publish(
        &self,
        channel: &str,
        event: &str,
        payload: &serde_json::Value,
    ) -> AppResult<()> {
        let body = serde_json::json!({
            "name": event,
            "channel": channel,
            "data": payload.to_string(),
        })
        .to_string();

        let body_md5 = hex::encode(Md5::digest(body.as_bytes()));
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let path = format!("/apps/{}/events", self.config.app_id);

        // Query params must be sorted by key in the signed string
        let query = format!(
            "auth_key={}&auth_timestamp={}&auth_version=1.0&body_md5={}",
            self.config.key, timestamp, body_md5
        );
        let to_sign = format!("POST\n{path}\n{query}");
        let signature = self.sign(&to_sign)?;

        let url = format!(
            "https://api-{}.pusher.com{path}?{query}&auth_signature={signature}",
            self.config.cluster
        );

        let resp = self
            .client
            .post(url)
            .header(http::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Pusher publish: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::upstream(format!(
                "Pusher publish failed ({status}): {text}"
            )));
        }
        Ok(())
    }

    /// Sign `socket_id:channel_name`, returning the auth token the client
    /// hands back to Pusher
    fn authorize_channel(&self, socket_id: &str, channel: &str) -> AppResult<String> {
        let signature = self.sign(&format!("{socket_id}:{channel}"))?;
        Ok(format!("{}:{signature}", self.config.key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher() -> PusherPublisher {
        PusherPublisher::new(PusherConfig {
            app_id: "12345".to_string(),
            key: "test-key".to_string(),
            secret: "test-secret".to_string(),
            cluster: "eu".to_string(),
        })
    }

    #[test]
    fn test_channel_auth_is_deterministic() {
        let p = publisher();
        let a = p.authorize_channel("81920.1234", "private-staff").unwrap();
        let b = p.authorize_channel("81920.1234", "private-staff").unwrap();
        assert_eq!(a, b);
        assert!(a.starts_with("test-key:"));
        // hex HMAC-SHA256 is 64 chars
        assert_eq!(a.len(), "test-key:".len() + 64);
    }

    #[test]
    fn test_channel_auth_varies_by_socket() {
        let p = publisher();
        let a = p.authorize_channel("1.1", "private-staff").unwrap();
        let b = p.authorize_channel("1.2", "private-staff").unwrap();
        assert_ne!(a, b);
    }
}
