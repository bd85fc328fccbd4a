//! ipapi.co HTTP client.
//!
//! Fetches `GET {base}/{ip}/json/` and maps the JSON answer to an
//! [`IpLookupResult`].

use super::error::LookupError;
use crate::config::Config;
use crate::models::IpLookupResult;
use futures::future::{BoxFuture, FutureExt};
use serde::Deserialize;
use std::error::Error;

const USER_AGENT: &str = concat!("ip-geo-lookup/", env!("CARGO_PKG_VERSION"));

/// Future returned by a [`Locator`].
pub type LookupFuture = BoxFuture<'static, Result<IpLookupResult, LookupError>>;

/// Anything that can geolocate a validated address.
///
/// The returned future owns its data so it can be shared between callers.
pub trait Locator: Send + Sync {
    fn locate(&self, ip: &str) -> LookupFuture;
}

/// Fields of the ipapi.co answer that the lookup uses.
#[derive(Deserialize, Debug, Default)]
struct IpApiResponse {
    #[serde(default)]
    error: bool,
    reason: Option<String>,
    country_name: Option<String>,
    /// Two letter country code.
    country: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Clone)]
pub struct IpApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl IpApiClient {
    pub fn new(config: &Config) -> Result<IpApiClient, Box<dyn Error>> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| format!("Error building HTTP client: {e}"))?;
        Ok(IpApiClient {
            http,
            base_url: config.ipapi_base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn lookup_url(&self, ip: &str) -> String {
        format!("{}/{}/json/", self.base_url, ip)
    }

    /// Query the service for one address.
    pub async fn fetch_ip_location(&self, ip: &str) -> Result<IpLookupResult, LookupError> {
        let url = self.lookup_url(ip);
        log::info!("GET {url}");

        let response = self.http.get(&url).send().await.map_err(|e| {
            log::warn!("Request to {url} failed: {e}");
            LookupError::Network
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            log::warn!("Error reading body from {url}: {e}");
            LookupError::Network
        })?;
        log::debug!("{url} status={status} body.len()={}", body.len());

        interpret_response(status, &body)
    }
}

impl Locator for IpApiClient {
    fn locate(&self, ip: &str) -> LookupFuture {
        let client = self.clone();
        let ip = ip.to_string();
        async move { client.fetch_ip_location(&ip).await }.boxed()
    }
}

/// Map an HTTP status and body to a lookup result.
pub fn interpret_response(status: u16, body: &str) -> Result<IpLookupResult, LookupError> {
    if status == 429 {
        log::warn!("Rate limited by lookup service");
        return Err(LookupError::RateLimited);
    }
    if !(200..300).contains(&status) {
        log::warn!("Lookup service returned HTTP {status}");
        return Err(LookupError::Network);
    }

    let mut deserializer = serde_json::Deserializer::from_str(body);
    let parsed: IpApiResponse = serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| {
            log::error!("BODY START:\n\n{body}\n\nBODY END\n");
            LookupError::InvalidResponse(format!("path={} error={}", e.path(), e.inner()))
        })?;

    if parsed.error {
        let reason = parsed
            .reason
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "Invalid IP".to_string());
        log::warn!("Lookup service refused: {reason}");
        return Err(LookupError::Provider(reason));
    }

    let country = parsed
        .country_name
        .ok_or_else(|| LookupError::InvalidResponse("missing country_name".to_string()))?;
    let timezone = parsed
        .timezone
        .ok_or_else(|| LookupError::InvalidResponse("missing timezone".to_string()))?;
    let country_code = parsed.country.filter(|c| !c.is_empty());

    Ok(IpLookupResult {
        country,
        country_code,
        timezone,
    })
}
