/// Where the form posts to and how its submit button looks.
#[derive(Clone, Debug)]
pub struct FormConfig {
    /// Scheme, host and port of the backend, without a trailing slash.
    pub base_url: String,
    /// Path of the upload route on the backend.
    pub endpoint: String,
    /// Text of the submit button while idle.
    pub submit_label: String,
    /// Text of the submit button while a request is in flight.
    pub busy_label: String,
    /// Class applied to the submit button while a request is in flight.
    pub busy_class: String,
}

impl FormConfig {
    /// Default settings pointed at another backend.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Joins base URL and endpoint with exactly one slash between them.
    pub fn endpoint_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            endpoint: "/upload_and_query".to_string(),
            submit_label: "Submit Query".to_string(),
            busy_label: "Processing...".to_string(),
            busy_class: "loading".to_string(),
        }
    }
}
