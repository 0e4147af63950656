use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::info;

use crate::client::AdsClient;
use crate::constants::REPORT_POLL_INTERVAL;
use crate::error::ClientError;
use crate::facebook::{FacebookApi, FacebookClient};
use crate::models::Platform;
use crate::tiktok::{TikTokApi, TikTokClient, TikTokParams};
use crate::transport::{HttpTransport, ReqwestTransport};

/// Builds platform clients. Every client gets its gateway at construction
/// time; gateways share the factory's transport.
pub struct ClientFactory {
    transport: Arc<dyn HttpTransport>,
    facebook_base_url: Option<String>,
    tiktok_base_url: Option<String>,
    poll_interval: Duration,
}

impl ClientFactory {
    pub fn new() -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new()
            .map_err(|e| ClientError::provider("Unable to build HTTP transport", e))?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    pub fn with_transport(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            facebook_base_url: None,
            tiktok_base_url: None,
            poll_interval: REPORT_POLL_INTERVAL,
        }
    }

    pub fn with_facebook_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.facebook_base_url = Some(base_url.into());
        self
    }

    pub fn with_tiktok_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.tiktok_base_url = Some(base_url.into());
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Transport shared by every client this factory builds.
    pub fn transport(&self) -> Arc<dyn HttpTransport> {
        self.transport.clone()
    }

    /// One-shot construction over the default `reqwest` transport.
    pub fn create(
        platform: Platform,
        access_token: &str,
        params: Option<&Value>,
    ) -> Result<Box<dyn AdsClient>, ClientError> {
        Self::new()?.build(platform, access_token, params)
    }

    /// TikTok `params` are checked here, before any request is made.
    pub fn build(
        &self,
        platform: Platform,
        access_token: &str,
        params: Option<&Value>,
    ) -> Result<Box<dyn AdsClient>, ClientError> {
        let client: Box<dyn AdsClient> = match platform {
            Platform::Facebook => {
                let mut api = FacebookApi::new(self.transport.clone(), access_token.to_string());
                if let Some(base_url) = &self.facebook_base_url {
                    api = api.with_base_url(base_url.as_str());
                }
                Box::new(FacebookClient::new(api).with_poll_interval(self.poll_interval))
            }
            Platform::TikTok => {
                let params = TikTokParams::from_value(params)?;
                let mut api = TikTokApi::new(self.transport.clone(), access_token.to_string(), params.sandbox);
                if let Some(base_url) = &self.tiktok_base_url {
                    api = api.with_base_url(base_url.as_str());
                }
                Box::new(TikTokClient::new(api, params))
            }
        };

        info!(platform = %platform, "Created platform client");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::transport::testing::ScriptedTransport;

    #[test]
    fn tiktok_without_secret_fails_before_any_request() {
        let transport = Arc::new(ScriptedTransport::new());
        let factory = ClientFactory::with_transport(transport.clone());

        let result = factory.build(Platform::TikTok, "token", Some(&json!({"app_id": "app"})));

        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn tiktok_with_non_boolean_sandbox_is_rejected() {
        let factory = ClientFactory::with_transport(Arc::new(ScriptedTransport::new()));

        let result = factory.build(
            Platform::TikTok,
            "token",
            Some(&json!({"app_id": "app", "secret": "s", "sandbox": 1})),
        );

        assert!(matches!(result, Err(ClientError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn facebook_client_ignores_params_and_uses_base_url_override() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"data": []}));
        let factory =
            ClientFactory::with_transport(transport.clone()).with_facebook_base_url("http://localhost:9000/v18.0");

        let client = factory.build(Platform::Facebook, "token", None).unwrap();
        let accounts = client.get_account_ids().await.unwrap();

        assert_eq!(client.platform(), Platform::Facebook);
        assert!(accounts.is_empty());
        assert_eq!(transport.requests()[0].url, "http://localhost:9000/v18.0/me/adaccounts");
    }
}
