//! Stripe integration via REST API (no SDK dependency)

use super::{PaymentGateway, PaymentIntent, RefundOutcome};
use crate::utils::{AppError, AppResult};
use async_trait::async_trait;

const API_BASE: &str = "https://api.stripe.com/v1";

#[derive(Clone)]
pub struct StripeGateway {
    secret_key: String,
    client: reqwest::Client,
}

impl StripeGateway {
    pub fn new(secret_key: String) -> Self {
        Self {
            secret_key,
            client: reqwest::Client::new(),
        }
    }

    fn parse_intent(resp: &serde_json::Value) -> AppResult<PaymentIntent> {
        let id = resp["id"]
            .as_str()
            .ok_or_else(|| AppError::upstream(format!("Stripe intent response: {resp}")))?;
        Ok(PaymentIntent {
            id: id.to_string(),
            amount: resp["amount"].as_i64().unwrap_or(0),
            currency: resp["currency"].as_str().unwrap_or("usd").to_string(),
            status: resp["status"].as_str().unwrap_or("unknown").to_string(),
            client_secret: resp["client_secret"].as_str().map(String::from),
        })
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(
        &self,
        amount_cents: i64,
        currency: &str,
        metadata: &[(&str, String)],
    ) -> AppResult<PaymentIntent> {
        let amount = amount_cents.to_string();
        let mut form: Vec<(String, String)> = vec![
            ("amount".to_string(), amount),
            ("currency".to_string(), currency.to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        for (key, value) in metadata {
            form.push((format!("metadata[{key}]"), value.clone()));
        }

        let resp: serde_json::Value = self
            .client
            .post(format!("{API_BASE}/payment_intents"))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Stripe create_intent: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Stripe create_intent: {e}")))?;

        Self::parse_intent(&resp)
    }

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        let resp: serde_json::Value = self
            .client
            .get(format!("{API_BASE}/payment_intents/{intent_id}"))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Stripe retrieve_intent: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Stripe retrieve_intent: {e}")))?;

        Self::parse_intent(&resp)
    }

    async fn refund(&self, intent_id: &str) -> AppResult<RefundOutcome> {
        let resp: serde_json::Value = self
            .client
            .post(format!("{API_BASE}/refunds"))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&[("payment_intent", intent_id)])
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Stripe refund: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Stripe refund: {e}")))?;

        if resp["id"].as_str().is_some() {
            return Ok(RefundOutcome::Refunded);
        }

        // "charge_already_refunded" means a previous attempt went through
        let code = resp["error"]["code"].as_str().unwrap_or("");
        if code == "charge_already_refunded" {
            return Ok(RefundOutcome::AlreadyRefunded);
        }

        Err(AppError::upstream(format!("Stripe refund failed: {resp}")))
    }

    async fn search_intents(&self, key: &str, value: &str) -> AppResult<Vec<PaymentIntent>> {
        let query = format!("metadata['{key}']:'{value}' AND status:'succeeded'");
        let resp: serde_json::Value = self
            .client
            .get(format!("{API_BASE}/payment_intents/search"))
            .basic_auth(&self.secret_key, None::<&str>)
            .query(&[("query", query.as_str())])
            .send()
            .await
            .map_err(|e| AppError::upstream(format!("Stripe search_intents: {e}")))?
            .json()
            .await
            .map_err(|e| AppError::upstream(format!("Stripe search_intents: {e}")))?;

        let mut intents = Vec::new();
        if let Some(rows) = resp["data"].as_array() {
            for row in rows {
                intents.push(Self::parse_intent(row)?);
            }
        }
        Ok(intents)
    }
}
