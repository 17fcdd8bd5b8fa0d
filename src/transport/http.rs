use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use reqwest::header::{HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::config::settings::{AuthConfig, BodyEncoding, ClientConfig, SettingsConfig};
use crate::observability::metrics::get_metrics;
use crate::resilience::retry::RetrySettings;
use crate::transport::{QueryPayload, Transport, TransportError, TransportResult};

/// reqwest-backed transport talking to the console backend.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    body_encoding: BodyEncoding,
    auth: Option<AuthConfig>,
    retry: RetrySettings,
}

impl HttpTransport {
    pub fn new(settings: &SettingsConfig, auth: Option<AuthConfig>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(settings.timeout_ms()))
            .build()?;
        Ok(Self::with_client(client, settings, auth))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.settings, config.auth.clone())
    }

    /// Use an already built client, e.g. one shared with other callers.
    pub fn with_client(client: Client, settings: &SettingsConfig, auth: Option<AuthConfig>) -> Self {
        Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            body_encoding: settings.body_encoding,
            auth,
            retry: RetrySettings::from(settings.retry.as_ref()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_header(&self) -> Result<Option<(HeaderName, HeaderValue)>, TransportError> {
        let Some(auth) = &self.auth else {
            return Ok(None);
        };
        let secret = auth
            .value
            .resolve()
            .map_err(|err| TransportError::Auth(format!("{:#}", err)))?;
        let value = format!("{}{}", auth.prefix.as_deref().unwrap_or_default(), secret);

        let name = HeaderName::from_bytes(auth.header.as_bytes())
            .map_err(|err| TransportError::Auth(format!("header '{}': {}", auth.header, err)))?;
        let mut value = HeaderValue::from_str(&value)
            .map_err(|err| TransportError::Auth(format!("header '{}' value: {}", auth.header, err)))?;
        value.set_sensitive(true);
        Ok(Some((name, value)))
    }

    fn build_request(
        &self,
        method: &Method,
        path: &str,
        payload: &QueryPayload,
    ) -> Result<RequestBuilder, TransportError> {
        let mut request = self.client.request(method.clone(), self.url(path));

        if let Some((name, value)) = self.auth_header()? {
            request = request.header(name, value);
        }

        let request = if *method == Method::POST {
            match self.body_encoding {
                BodyEncoding::Form => request.form(&form_pairs(payload)?),
                BodyEncoding::Json => request.json(payload),
            }
        } else {
            request.query(&form_pairs(payload)?)
        };
        Ok(request)
    }

    async fn send_once(&self, method: &Method, path: &str, payload: &QueryPayload) -> TransportResult {
        let request = self.build_request(method, path, payload)?;
        let response = request.send().await?;
        read_response(response).await
    }

    async fn execute(&self, method: Method, path: &str, payload: &QueryPayload) -> TransportResult {
        let metrics = get_metrics().await;
        let start = Instant::now();
        metrics.requests.with_label_values(&[method.as_str(), path]).inc();
        debug!("{} {} fields: {:?}", method, path, payload.keys().collect::<Vec<_>>());

        let result = self
            .retry
            .run_with_retry(
                || self.send_once(&method, path, payload),
                TransportError::is_retryable,
            )
            .await;

        metrics
            .request_duration
            .with_label_values(&[method.as_str(), path])
            .observe(start.elapsed().as_secs_f64());
        match &result {
            Ok(_) => info!("{} {} succeeded in {:?}", method, path, start.elapsed()),
            Err(err) => {
                metrics
                    .request_failures
                    .with_label_values(&[method.as_str(), path, err.reason()])
                    .inc();
                warn!("{} {} failed: {}", method, path, err);
            }
        }
        result
    }
}

impl Transport for HttpTransport {
    fn get(&self, path: &str, payload: &QueryPayload) -> impl Future<Output = TransportResult> + Send {
        self.execute(Method::GET, path, payload)
    }

    fn post(&self, path: &str, payload: &QueryPayload) -> impl Future<Output = TransportResult> + Send {
        self.execute(Method::POST, path, payload)
    }

    fn delete(&self, path: &str, payload: &QueryPayload) -> impl Future<Output = TransportResult> + Send {
        self.execute(Method::DELETE, path, payload)
    }
}

/// Flatten a payload into urlencoded pairs. Nulls are skipped, arrays become
/// repeated keys, nested objects have no flat form and are rejected.
fn form_pairs(payload: &QueryPayload) -> Result<Vec<(&str, String)>, TransportError> {
    let mut pairs = Vec::with_capacity(payload.len());
    for (key, value) in payload {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(scalar) = scalar_to_string(key, item)? {
                        pairs.push((key.as_str(), scalar));
                    }
                }
            }
            other => {
                if let Some(scalar) = scalar_to_string(key, other)? {
                    pairs.push((key.as_str(), scalar));
                }
            }
        }
    }
    Ok(pairs)
}

fn scalar_to_string(key: &str, value: &Value) -> Result<Option<String>, TransportError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.to_owned())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Array(_) | Value::Object(_) => Err(TransportError::Encode(format!(
            "field '{}' is nested and cannot be form encoded",
            key
        ))),
    }
}

async fn read_response(response: Response) -> TransportResult {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(TransportError::Status { status, body });
    }
    Ok(parse_body(body))
}

/// JSON when the body is JSON, the raw text otherwise, `Null` when empty.
fn parse_body(body: String) -> Value {
    if body.trim().is_empty() {
        return Value::Null;
    }
    match serde_json::from_str(&body) {
        Ok(value) => value,
        Err(_) => Value::String(body),
    }
}
