//! Magic-link forwarding to the upstream identity provider
//!
//! The provider may report a failure inside a 2xx response body, so every
//! response goes through [`triage_response`] before it counts as a success.

use reqwest::{header, redirect, Client};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

use crate::config::ProviderConfig;
use crate::error::{AuthError, UpstreamError};

/// Body fields that mark a 2xx response as a failure when non-null
const ERROR_FIELDS: [&str; 3] = ["error", "msg", "code"];

#[derive(Debug, Serialize)]
struct OtpRequest<'a> {
    email: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_to: Option<&'a str>,
}

/// Sends passwordless-login requests to the identity provider
#[derive(Clone)]
pub struct MagicLinkForwarder {
    client: Client,
    config: ProviderConfig,
}

impl MagicLinkForwarder {
    /// Create a forwarder with the configured timeouts.
    ///
    /// Missing provider settings are not an error here; they fail each call
    /// instead.
    ///
    /// # Errors
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self, AuthError> {
        // 3xx is a provider failure; following it would resend the apikey header.
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .timeout(config.connect_timeout + config.read_timeout)
            .build()
            .map_err(|e| AuthError::Configuration(format!("provider HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Ask the provider to email a sign-in link.
    ///
    /// `redirect_to` is omitted from the request when absent or blank.
    ///
    /// # Errors
    /// - [`AuthError::Configuration`] if the base URL or API key is missing
    /// - [`AuthError::UpstreamProvider`] on transport failure, non-2xx
    ///   status, or an error reported in the response body
    #[instrument(skip_all)]
    pub async fn send_magic_link(
        &self,
        email: &str,
        redirect_to: Option<&str>,
    ) -> Result<(), AuthError> {
        let (base_url, api_key) = self.config.credentials()?;
        let url = self.config.otp_url()?;

        let body = OtpRequest {
            email,
            redirect_to: redirect_to.map(str::trim).filter(|r| !r.is_empty()),
        };

        debug!(
            url = %url,
            has_redirect = body.redirect_to.is_some(),
            "Forwarding magic link request"
        );

        let response = self
            .client
            .post(&url)
            .header("apikey", api_key)
            .bearer_auth(api_key)
            .header(header::ORIGIN, base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, timeout = e.is_timeout(), "Magic link request failed");
                UpstreamError::transport(format!("provider request failed: {e}"))
            })?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| {
            error!(error = %e, status, "Failed to read provider response");
            UpstreamError::transport(format!("provider response unreadable: {e}"))
        })?;

        triage_response(status, &text).map_err(|e| {
            error!(status, body = %text, "Provider rejected magic link request");
            e
        })?;

        info!(status, "Magic link forwarded");
        Ok(())
    }
}

impl std::fmt::Debug for MagicLinkForwarder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MagicLinkForwarder")
            .field("base_url", &self.config.base_url)
            .field("api_key_set", &self.config.api_key.is_some())
            .finish_non_exhaustive()
    }
}

/// Classify a provider response.
///
/// Non-2xx is always a failure. A 2xx is a failure only when its body is a
/// JSON object with a non-null `error`, `msg`, or `code`; anything that does
/// not parse as such counts as success.
pub fn triage_response(status: u16, body: &str) -> Result<(), UpstreamError> {
    if !(200..300).contains(&status) {
        return Err(UpstreamError::response(
            status,
            body,
            format!("provider returned status {status}"),
        ));
    }

    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return Ok(());
    };

    let reported = ERROR_FIELDS
        .iter()
        .find_map(|name| fields.get(*name).filter(|value| !value.is_null()));

    match reported {
        Some(value) => {
            let detail = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            Err(UpstreamError::response(
                status,
                body,
                format!("provider reported error: {detail}"),
            ))
        }
        None => Ok(()),
    }
}
