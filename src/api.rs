//! Browser transport for the Mavigo API, built on `fetch` via gloo-net.

use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder};
use mavigo_core::{ApiRequest, ApiResponse, ApiTransport, ClientConfig, Method, TransportError};
use tracing::debug;

pub struct GlooTransport {
    config: ClientConfig,
}

impl GlooTransport {
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    fn builder(&self, request: &ApiRequest) -> RequestBuilder {
        let url = self.config.url_for(&request.path);
        let builder = match request.method {
            Method::Get => Request::get(&url),
            Method::Post => Request::post(&url),
            Method::Put => Request::put(&url),
            Method::Patch => Request::patch(&url),
            Method::Delete => Request::delete(&url),
        };
        let builder = builder.header("accept", "application/json");
        match request.bearer.as_deref() {
            Some(token) => builder.header("authorization", &format!("Bearer {token}")),
            None => builder,
        }
    }
}

fn network_error(error: gloo_net::Error) -> TransportError {
    TransportError(error.to_string())
}

#[async_trait(?Send)]
impl ApiTransport for GlooTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let builder = self.builder(&request);
        debug!(method = request.method.as_str(), path = %request.path, "fetch");

        let response = match request.body.as_ref() {
            Some(body) => {
                builder
                    .header("content-type", "application/json")
                    .body(body.to_string())
                    .map_err(network_error)?
                    .send()
                    .await
            }
            None => builder.send().await,
        }
        .map_err(network_error)?;

        let status = response.status();
        let body = response.text().await.map_err(network_error)?;
        Ok(ApiResponse { status, body })
    }
}
