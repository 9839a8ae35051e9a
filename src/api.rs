use serde::{Deserialize, Serialize};

// -- Analyze endpoint types -------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AnalyzeUrlRequest {
    pub url: String,
}

/// Body shape shared by `/analyze_url` and `/analyze_pdf` responses.
///
/// A 2xx response is expected to carry `summary`; a body carrying `error`
/// instead (even under 2xx) is an application-level failure.
#[derive(Debug, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// -- Chat endpoint types ----------------------------------------------------

#[derive(Debug, Serialize)]
pub struct AskRequest {
    pub question: String,
}
