use crate::config::DelegateConfig;
use crate::error::{Error, Result};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument};

/// Line placed between the diff and the user instructions in a request body.
pub const SEPARATOR: &str = "\n=====COMMIT-SUMMARY-INSTRUCTIONS=====\n";

/// Builds the `text/plain` body sent to the delegate endpoint.
#[must_use]
pub fn request_body(diff: &str, instructions: Option<&str>) -> String {
    let instructions = instructions.unwrap_or_default();
    let mut body = String::with_capacity(diff.len() + SEPARATOR.len() + instructions.len());
    body.push_str(diff);
    body.push_str(SEPARATOR);
    body.push_str(instructions);
    body
}

/// Client for an external commit message generator.
pub struct DelegateClient {
    http: Client,
    endpoint: String,
}

impl DelegateClient {
    /// Creates a client for `config.endpoint` whose requests time out after
    /// `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(config: &DelegateConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Delegate(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: config.endpoint.clone(),
        })
    }

    /// Sends the diff and instructions and returns the response body as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Delegate`] on transport failures and non-success statuses
    #[instrument(skip(self, diff, instructions), fields(endpoint = %self.endpoint, diff_length = diff.len()))]
    pub async fn generate(&self, diff: &str, instructions: Option<&str>) -> Result<String> {
        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain")
            .body(request_body(diff, instructions))
            .send()
            .await
            .map_err(|e| Error::Delegate(format!("failed to call {}: {e}", self.endpoint)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unable to read response>".to_string());
            debug!(status = %status, "Delegate responded with failure");
            return Err(Error::Delegate(format!(
                "{} responded with {status}: {body}",
                self.endpoint
            )));
        }

        let message = response
            .text()
            .await
            .map_err(|e| Error::Delegate(format!("failed to read response body: {e}")))?;

        debug!(message_length = message.len(), "Delegate returned message");
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_layout() {
        let body = request_body("+++ b/a.rs\n+x\n", Some("be brief"));
        assert_eq!(
            body,
            "+++ b/a.rs\n+x\n\n=====COMMIT-SUMMARY-INSTRUCTIONS=====\nbe brief"
        );
    }

    #[test]
    fn test_request_body_without_instructions() {
        let body = request_body("diff", None);
        assert!(body.ends_with(SEPARATOR));
        assert!(body.starts_with("diff"));
    }
}
