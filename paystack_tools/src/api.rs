use std::sync::Arc;

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::PaystackConfig,
    data_objects::{InitializeTransaction, PaystackResponse, TransactionAuthorization},
    PaystackApiError,
};

#[derive(Clone)]
pub struct PaystackApi {
    config: PaystackConfig,
    client: Arc<Client>,
}

impl PaystackApi {
    pub fn new(config: PaystackConfig) -> Result<Self, PaystackApiError> {
        let mut headers = HeaderMap::with_capacity(2);
        let bearer = format!("Bearer {}", config.secret_key.reveal());
        let mut val = HeaderValue::from_str(&bearer).map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        val.set_sensitive(true);
        headers.insert(AUTHORIZATION, val);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()
            .map_err(|e| PaystackApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub fn config(&self) -> &PaystackConfig {
        &self.config
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Sends a request and unwraps Paystack's `{status, message, data}` envelope.
    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PaystackApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PaystackApiError::RestRequestError(e.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PaystackApiError::RestResponseError(e.to_string()))?;
            return Err(PaystackApiError::QueryError { status, message });
        }
        trace!("REST query successful. {}", response.status());
        let envelope = response
            .json::<PaystackResponse<T>>()
            .await
            .map_err(|e| PaystackApiError::JsonError(e.to_string()))?;
        if !envelope.status {
            return Err(PaystackApiError::Declined(envelope.message));
        }
        envelope.data.ok_or(PaystackApiError::EmptyResponse)
    }

    /// Asks Paystack for a checkout session for `amount` minor units, tagged with our own `reference`.
    pub async fn initialize_transaction(
        &self,
        amount: i64,
        email: &str,
        reference: &str,
    ) -> Result<TransactionAuthorization, PaystackApiError> {
        let body = InitializeTransaction { amount, email: email.to_string(), reference: reference.to_string() };
        debug!("Initializing Paystack transaction {reference} for {amount}");
        let result = self
            .rest_query::<TransactionAuthorization, InitializeTransaction>(
                Method::POST,
                "/transaction/initialize",
                Some(body),
            )
            .await?;
        info!("Paystack transaction {reference} initialized");
        Ok(result)
    }
}
