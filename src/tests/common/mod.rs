// tests/common/mod.rs
use std::collections::VecDeque;
use std::future::{ready, Future};
use std::sync::Mutex;

use reqwest::Method;
use serde_json::Value;

use crate::config::settings::{AuthConfig, SettingsConfig};
use crate::transport::{QueryPayload, Transport, TransportResult};

/// One call observed by `RecordingTransport`.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: Method,
    pub path: String,
    pub payload: QueryPayload,
}

/// Transport double: records every call and answers with scripted results
/// in order, `Value::Null` once the script runs out.
#[derive(Default)]
pub struct RecordingTransport {
    calls: Mutex<Vec<RecordedCall>>,
    responses: Mutex<VecDeque<TransportResult>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond_with(self, result: TransportResult) -> Self {
        self.responses.lock().unwrap().push_back(result);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, method: Method, path: &str, payload: &QueryPayload) -> TransportResult {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            path: path.to_owned(),
            payload: payload.clone(),
        });
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}

impl Transport for RecordingTransport {
    fn get(&self, path: &str, payload: &QueryPayload) -> impl Future<Output = TransportResult> + Send {
        ready(self.record(Method::GET, path, payload))
    }

    fn post(&self, path: &str, payload: &QueryPayload) -> impl Future<Output = TransportResult> + Send {
        ready(self.record(Method::POST, path, payload))
    }

    fn delete(&self, path: &str, payload: &QueryPayload) -> impl Future<Output = TransportResult> + Send {
        ready(self.record(Method::DELETE, path, payload))
    }
}

/// `{"k": "v", ...}` literal to payload.
pub fn payload(value: Value) -> QueryPayload {
    value.as_object().cloned().expect("payload literal must be an object")
}

pub fn settings_for(base_url: &str) -> SettingsConfig {
    let mut settings = SettingsConfig::new(base_url);
    settings.timeout_ms = Some(2000);
    settings
}

pub fn bearer_auth(value: &str) -> AuthConfig {
    serde_yaml::from_str(&format!(
        "prefix: \"Bearer \"\nvalue:\n  value: {}\n",
        value
    ))
    .expect("auth literal")
}
