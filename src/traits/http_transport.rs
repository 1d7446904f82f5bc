use async_trait::async_trait;

use crate::errors::TransportError;
use crate::structs::outbound_request::OutboundRequest;
use crate::structs::raw_response::RawResponse;

/// Performs the actual POST. Status codes are returned as-is; only failures to
/// get any response at all are errors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post(&self, request: OutboundRequest) -> Result<RawResponse, TransportError>;
}
