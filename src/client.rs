//! HTTP adapter for the three backend endpoints. Normalizes responses and
//! failures into the crate [`Error`] shape; never retries.

use std::path::Path;
use std::time::Duration;

use reqwest::multipart;

use crate::api::{AnalyzeResponse, AnalyzeUrlRequest, AskRequest};
use crate::config::Config;
use crate::error::Error;

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(BackendClient {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST `/analyze_url` and return the summary text.
    pub async fn analyze_url(&self, url: &str) -> Result<String, Error> {
        tracing::debug!(url, "submitting URL for analysis");
        let response = self
            .http
            .post(self.endpoint("/analyze_url"))
            .json(&AnalyzeUrlRequest { url: url.to_string() })
            .send()
            .await?;
        Self::extract_summary(response).await
    }

    /// POST `/analyze_pdf` as a multipart form (field `file`) and return
    /// the summary text. The original filename is preserved in the part.
    pub async fn analyze_pdf(&self, path: &Path) -> Result<String, Error> {
        tracing::debug!(path = %path.display(), "submitting PDF for analysis");
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let part = multipart::Part::bytes(bytes)
            .file_name(filename)
            .mime_str("application/pdf")?;
        let form = multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.endpoint("/analyze_pdf"))
            .multipart(form)
            .send()
            .await?;
        Self::extract_summary(response).await
    }

    /// POST `/ask` and hand back the raw response for streaming after
    /// status validation. The body carries blank-line separated frames.
    pub async fn ask(&self, question: &str) -> Result<reqwest::Response, Error> {
        tracing::debug!("submitting chat question");
        let response = self
            .http
            .post(self.endpoint("/ask"))
            .json(&AskRequest { question: question.to_string() })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| format!("backend returned HTTP {status}"));
            tracing::warn!(%status, "ask request rejected");
            return Err(Error::Transport { status: Some(status.as_u16()), message });
        }
        Ok(response)
    }

    /// Normalize an analyze response: non-2xx and error-bodied 2xx both
    /// surface the server-supplied message when one is present.
    async fn extract_summary(response: reqwest::Response) -> Result<String, Error> {
        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<AnalyzeResponse>()
                .await
                .ok()
                .and_then(|body| body.error)
                .unwrap_or_else(|| format!("backend returned HTTP {status}"));
            tracing::warn!(%status, "analysis request rejected");
            return Err(Error::Transport { status: Some(status.as_u16()), message });
        }

        let body: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| Error::Application(format!("malformed backend response: {e}")))?;
        if let Some(error) = body.error {
            return Err(Error::Application(error));
        }
        body.summary
            .ok_or_else(|| Error::Application("backend response had no summary".to_string()))
    }
}
