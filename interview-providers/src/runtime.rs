use crate::error::HttpStatusError;
use crate::request::HttpRequest;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Turns a non-2xx reply into an [`HttpStatusError`].
    pub fn error_for_status(self) -> anyhow::Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(HttpStatusError::new(self.status, &self.body).into())
        }
    }
}

pub async fn execute(req: &HttpRequest) -> anyhow::Result<HttpResponse> {
    // Without an explicit timeout a broken endpoint stalls the interview turn.
    let client = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60))
        .build()
        .context("build http client")?;

    let mut headers = HeaderMap::new();
    for (k, v) in &req.headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .with_context(|| format!("invalid header name: {k}"))?;
        let value =
            HeaderValue::from_str(v).with_context(|| format!("invalid header value for {k}"))?;
        headers.insert(name, value);
    }

    let builder = client
        .post(&req.url)
        .headers(headers)
        .body(req.json.clone());

    let resp = builder.send().await.context("http request failed")?;
    let status = resp.status().as_u16();
    let body = resp
        .bytes()
        .await
        .context("failed reading response body")?
        .to_vec();

    Ok(HttpResponse { status, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn post(url: String) -> HttpRequest {
        HttpRequest::post_json(url, &serde_json::json!({})).with_bearer("k")
    }

    #[tokio::test]
    async fn executes_and_returns_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer k"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .mount(&server)
            .await;

        let resp = execute(&post(format!("{}/v1/chat/completions", server.uri())))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, b"ok");
    }

    #[tokio::test]
    async fn error_for_status_carries_http_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let resp = execute(&post(server.uri())).await.unwrap();
        let err = resp.error_for_status().unwrap_err();
        let status = err.downcast_ref::<HttpStatusError>().unwrap();
        assert_eq!(status.status, 429);
        assert_eq!(status.body, "slow down");
    }
}
