use crate::{config::FormConfig, error::FormError, submission::QuerySubmission};
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Successful answer: one markdown text per vision model.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct QueryResponse {
    pub llama: String,
    pub llava: String,
}

/// Body of a rejected request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The human-readable part of `detail`, if it carries anything.
    ///
    /// Strings are used as-is; structured details are rendered as compact JSON.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Something that can answer a query about an image.
pub trait QueryBackend {
    /// Sends one submission and waits for both model answers.
    fn query(
        &self,
        submission: &QuerySubmission,
    ) -> impl Future<Output = Result<QueryResponse, FormError>> + Send;
}

/// Posts submissions as `multipart/form-data` to the upload endpoint.
#[derive(Clone, Debug)]
pub struct HttpQueryBackend {
    client: reqwest::Client,
    url: String,
}

impl HttpQueryBackend {
    /// Creates a backend with a default `reqwest` client.
    ///
    /// # Arguments
    /// * `config` - Supplies the base URL and endpoint path to post to
    pub fn new(config: &FormConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Creates a backend that reuses an existing client, e.g. one with a proxy
    /// or custom TLS settings.
    pub fn with_client(client: reqwest::Client, config: &FormConfig) -> Self {
        Self {
            client,
            url: config.endpoint_url(),
        }
    }

    /// The full URL submissions are posted to.
    pub fn url(&self) -> &str {
        &self.url
    }
}

fn build_form(submission: &QuerySubmission) -> Result<Form, FormError> {
    let image = &submission.image;
    let part = Part::bytes(image.bytes().to_vec())
        .file_name(image.file_name().to_string())
        .mime_str(image.mime_type())?;

    Ok(Form::new()
        .part("image", part)
        .text("query", submission.query.clone()))
}

/// Turns a status and raw body into the outcome the form renders.
///
/// The body is decoded as JSON before the status is looked at, so a non-JSON
/// error page surfaces as a decode failure rather than the fallback message.
pub fn decode_response(
    status: reqwest::StatusCode,
    body: &[u8],
) -> Result<QueryResponse, FormError> {
    let value: serde_json::Value = serde_json::from_slice(body)?;

    if !status.is_success() {
        let error: ErrorBody = serde_json::from_value(value).unwrap_or_default();
        return Err(FormError::Server {
            status,
            detail: error.message(),
        });
    }

    Ok(serde_json::from_value(value)?)
}

impl QueryBackend for HttpQueryBackend {
    async fn query(&self, submission: &QuerySubmission) -> Result<QueryResponse, FormError> {
        let form = build_form(submission)?;

        log::debug!(
            "Posting {} ({} bytes) to {}",
            submission.image.file_name(),
            submission.image.bytes().len(),
            self.url
        );

        let response = self.client.post(&self.url).multipart(form).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        log::debug!("Received {} with {} bytes", status, body.len());

        decode_response(status, &body)
    }
}
