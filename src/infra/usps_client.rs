use crate::app::ports::AddressLookup;
use crate::config::UspsConfig;
use crate::constants::{STATUS_ADDRESS_NOT_FOUND, STATUS_SUCCESS};
use crate::error::LookupError;
use crate::types::{AddressQuery, ZipByAddressResponse};
use async_trait::async_trait;
use tracing::debug;

/// USPS lookup client. Implements "zip by address" for the pipeline; the
/// Web Tools XML operations live in `usps_api`. The HTTP client is supplied
/// by the caller.
#[derive(Debug, Clone)]
pub struct UspsClient {
    pub(super) config: UspsConfig,
    pub(super) http: reqwest::Client,
}

impl UspsClient {
    pub fn new(config: UspsConfig, http: reqwest::Client) -> Self {
        Self { config, http }
    }
}

#[async_trait]
impl AddressLookup for UspsClient {
    async fn zip_by_address(&self, query: &AddressQuery) -> Result<ZipByAddressResponse, LookupError> {
        if !self.config.has_username() {
            return Err(LookupError::MissingUsername);
        }

        debug!("HTTP POST request to: {} address1={}", self.config.endpoint, query.address1);
        let resp = self
            .http
            .post(&self.config.endpoint)
            .form(&query.form_params())
            .send()
            .await?;
        let status = resp.status().as_u16();
        let bytes = resp.bytes().await?;
        debug!("HTTP response: status={}, size={} bytes", status, bytes.len());

        let result: ZipByAddressResponse = serde_json::from_slice(&bytes)?;
        check_status(result)
    }
}

fn check_status(result: ZipByAddressResponse) -> Result<ZipByAddressResponse, LookupError> {
    match result.result_status.as_str() {
        STATUS_SUCCESS => Ok(result),
        STATUS_ADDRESS_NOT_FOUND => Err(LookupError::AddressNotFound),
        other => Err(LookupError::UnexpectedStatus(other.to_string())),
    }
}
