use std::future::Future;

use crate::config::endpoints::EndpointRegistry;
use crate::transport::{QueryPayload, Transport, TransportResult};

/// Client for the console's token endpoints.
///
/// Every operation issues one request through the transport and hands back
/// the transport's own future untouched, so failures surface exactly as the
/// transport produced them.
#[derive(Debug, Clone)]
pub struct TokenApiClient<T> {
    transport: T,
    endpoints: EndpointRegistry,
}

impl<T: Transport> TokenApiClient<T> {
    pub fn new(transport: T, endpoints: EndpointRegistry) -> Self {
        Self { transport, endpoints }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn endpoints(&self) -> &EndpointRegistry {
        &self.endpoints
    }

    /// `POST LIST` with the query/filter payload.
    pub fn list<'a>(&'a self, payload: &'a QueryPayload) -> impl Future<Output = TransportResult> + Send + 'a {
        self.transport.post(&self.endpoints.list, payload)
    }

    /// `POST CREATE` with the new-token descriptor.
    pub fn create<'a>(&'a self, payload: &'a QueryPayload) -> impl Future<Output = TransportResult> + Send + 'a {
        self.transport.post(&self.endpoints.create, payload)
    }

    /// `DELETE DELETE` with the token identifier.
    pub fn delete_token<'a>(&'a self, payload: &'a QueryPayload) -> impl Future<Output = TransportResult> + Send + 'a {
        self.transport.delete(&self.endpoints.delete, payload)
    }

    /// `POST CURL`; resolves to the curl command text for the token.
    pub fn copy_curl<'a>(&'a self, payload: &'a QueryPayload) -> impl Future<Output = TransportResult> + Send + 'a {
        self.transport.post(&self.endpoints.curl, payload)
    }

    /// `POST UPDATE_STATUS` with the identifier and the new status.
    pub fn update_token_status<'a>(&'a self, payload: &'a QueryPayload) -> impl Future<Output = TransportResult> + Send + 'a {
        self.transport.post(&self.endpoints.update_status, payload)
    }
}
