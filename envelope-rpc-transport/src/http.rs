use envelope_rpc::{Transport, TransportError};
use reqwest::header::CONTENT_TYPE;

/// Posts a request as a json body and returns the response body.
///
/// Non-2xx statuses are transport errors; the body of such a response is not decoded.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
}

impl HttpTransport {
    /// A transport posting to `url` with a default client.
    pub fn new(url: &str) -> crate::Result<Self> {
        Ok(Self::with_client(url, reqwest::Client::builder().build()?))
    }

    /// A transport posting to `url` with a client you configured.
    pub fn with_client(url: &str, client: reqwest::Client) -> Self {
        Self {
            url: url.to_string(),
            client,
        }
    }

    async fn exchange(&self, request: &str) -> crate::Result<String> {
        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .body(request.to_string())
            .send()
            .await?
            .error_for_status()?;
        log::trace!("{} answered {}", self.url, response.status());
        Ok(response.text().await?)
    }
}

impl Transport for HttpTransport {
    fn remote_call(&mut self, request: &str) -> Result<String, TransportError> {
        let runtime = crate::call_runtime()?;
        Ok(runtime.block_on(self.exchange(request))?)
    }
}
