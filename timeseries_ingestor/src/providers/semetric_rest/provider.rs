use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, Url};
use secrecy::{ExposeSecret, SecretString};
use shared_utils::env::get_env_var;
use snafu::{ResultExt, ensure};
use tracing::{debug, warn};

use crate::{
    decode::parse_envelope,
    models::dense::DensePayload,
    providers::{
        ApiSnafu, ClientBuildSnafu, DecodeSnafu, InvalidBaseUrlSnafu, MissingTokenSnafu,
        ProviderError, ProviderInitError, ReqwestSnafu, SeriesProvider, UnsuccessfulSnafu,
        semetric_rest::{
            params::{SemetricSettings, TOKEN_ENV_VAR, construct_params},
            response::ErrorBody,
        },
    },
};

pub struct SemetricProvider {
    client: Client,
    settings: SemetricSettings,
    token: SecretString,
    limiter: DefaultDirectRateLimiter,
}

impl SemetricProvider {
    /// Creates a new Semetric provider.
    ///
    /// Reads the API token from the `SEMETRIC_API_TOKEN` environment variable.
    pub fn new(settings: SemetricSettings) -> Result<Self, ProviderInitError> {
        let token = get_env_var(TOKEN_ENV_VAR).context(MissingTokenSnafu)?;
        Self::with_token(settings, SecretString::new(token.into()))
    }

    /// Creates a provider with an explicitly supplied token.
    pub fn with_token(
        settings: SemetricSettings,
        token: SecretString,
    ) -> Result<Self, ProviderInitError> {
        ensure!(
            Url::parse(&settings.base_url).is_ok(),
            InvalidBaseUrlSnafu {
                url: settings.base_url.clone(),
            }
        );

        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context(ClientBuildSnafu)?;
        let limiter = RateLimiter::direct(Quota::per_second(settings.requests_per_second));

        Ok(Self {
            client,
            settings,
            token,
            limiter,
        })
    }

    /// Full URL of `endpoint` for the configured artist.
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/artist/{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.artist_id,
            endpoint.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl SeriesProvider for SemetricProvider {
    async fn fetch_series(&self, endpoint: &str) -> Result<DensePayload, ProviderError> {
        self.limiter.until_ready().await;

        let url = self.endpoint_url(endpoint);
        debug!(%url, granularity = %self.settings.granularity, "fetching dense series");

        let query = construct_params(self.token.expose_secret(), self.settings.granularity);
        let response = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .context(ReqwestSnafu)?;

        let status = response.status();
        let body = response.bytes().await.context(ReqwestSnafu)?;

        if !status.is_success() {
            return ApiSnafu {
                status: status.as_u16(),
                message: ErrorBody::message_from(&body),
            }
            .fail();
        }

        let envelope = parse_envelope(&body).context(DecodeSnafu)?;
        let Some(payload) = envelope.into_payload() else {
            return UnsuccessfulSnafu {
                endpoint,
                message: ErrorBody::message_from(&body),
            }
            .fail();
        };

        let expected = self.settings.granularity.period_secs();
        if payload.period != expected {
            warn!(
                endpoint,
                period = payload.period,
                expected,
                "payload period differs from requested granularity"
            );
        }

        Ok(payload)
    }
}
