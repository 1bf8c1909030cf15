//! Request sending. The engine only sees `Transport`; the browser build uses
//! `GlooTransport` on top of `fetch`.

use async_trait::async_trait;
use contracts::shared::error::SyncError;
use contracts::shared::http::{HttpRequest, HttpResponse, Method, JSON_CONTENT_TYPE};
use gloo_net::http::Request;

/// Delivers one request and returns whatever the server answered, 2xx or not.
/// `Err` is reserved for requests that got no answer at all.
#[async_trait(?Send)]
pub trait Transport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GlooTransport;

#[async_trait(?Send)]
impl Transport for GlooTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, SyncError> {
        let builder = match request.method {
            Method::Post => Request::post(&request.url),
            Method::Put => Request::put(&request.url),
            Method::Delete => Request::delete(&request.url),
        };

        let sent = match request.body {
            Some(body) => {
                builder
                    .header("content-type", JSON_CONTENT_TYPE)
                    .body(body)
                    .map_err(|e| SyncError::Network(format!("Failed to build request: {}", e)))?
                    .send()
                    .await
            }
            None => builder.send().await,
        };
        let response =
            sent.map_err(|e| SyncError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SyncError::Network(format!("Failed to read response: {}", e)))?;
        Ok(HttpResponse::new(status, body))
    }
}
