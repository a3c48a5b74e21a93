use serde::{Deserialize, Serialize};

/// The envelope Paystack wraps around every API response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaystackResponse<T> {
    pub status: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitializeTransaction {
    /// In the currency's smallest unit
    pub amount: i64,
    pub email: String,
    pub reference: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionAuthorization {
    pub authorization_url: String,
    pub access_code: String,
    pub reference: String,
}

/// A webhook notification, e.g. `charge.success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub data: WebhookData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reference: String,
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub gateway_response: Option<String>,
}

impl WebhookEvent {
    /// The payment outcome this event reports. Paystack puts it in `data.status`; older `charge.*` events without a
    /// status fall back to the event name suffix.
    pub fn outcome(&self) -> &str {
        if !self.data.status.is_empty() {
            return self.data.status.as_str();
        }
        self.event.rsplit('.').next().unwrap_or_default()
    }
}
