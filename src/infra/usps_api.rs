//! USPS Web Tools XML API: address verification, zip code lookup and
//! city/state lookup.
//!
//! Each request is a GET to `<api_endpoint>?API=<name>&XML=<request>` where
//! the request document carries the username as its `USERID` attribute.
//! Failures come back as an `<Error>` element, either at the root (bad
//! credentials) or inside the returned address.

use super::UspsClient;
use crate::error::LookupError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Address sent to the verify and zip code lookup operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostalAddress {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip5: String,
    pub zip4: String,
}

/// Zip code sent to the city/state lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ZipCode {
    pub zip5: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ResponseError {
    pub number: String,
    pub source: String,
    pub description: String,
}

impl From<ResponseError> for LookupError {
    fn from(e: ResponseError) -> Self {
        LookupError::Api {
            number: e.number,
            description: e.description,
        }
    }
}

/// Address as returned by verify and zip code lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct ValidatedAddress {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip5: String,
    pub zip4: String,
    pub error: Option<ResponseError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddressValidateResponse {
    #[serde(rename = "Address")]
    pub address: ValidatedAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ZipCodeLookupResponse {
    #[serde(rename = "Address")]
    pub address: ValidatedAddress,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct CityStateResult {
    pub zip5: String,
    pub city: String,
    pub state: String,
    pub error: Option<ResponseError>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CityStateLookupResponse {
    #[serde(rename = "ZipCode")]
    pub zip_code: CityStateResult,
}

/// Request document: `<Root USERID="..."><Address>..</Address></Root>` or
/// the same with a `<ZipCode>` child.
#[derive(Serialize)]
struct XmlRequest<'a> {
    #[serde(rename = "@USERID")]
    user_id: &'a str,
    #[serde(rename = "Address", skip_serializing_if = "Option::is_none")]
    address: Option<&'a PostalAddress>,
    #[serde(rename = "ZipCode", skip_serializing_if = "Option::is_none")]
    zip_code: Option<&'a ZipCode>,
}

fn request_xml(root: &str, request: &XmlRequest<'_>) -> Result<String, LookupError> {
    Ok(quick_xml::se::to_string_with_root(root, request)?)
}

fn strip_declaration(body: &str) -> &str {
    let body = body.trim_start();
    match body.strip_prefix("<?xml") {
        Some(rest) => rest.split_once("?>").map_or(body, |(_, doc)| doc.trim_start()),
        None => body,
    }
}

/// Parses `body` as `T`, or as a root-level `<Error>` document.
fn parse_response<T>(body: &str) -> Result<T, LookupError>
where
    T: for<'de> Deserialize<'de>,
{
    let doc = strip_declaration(body);
    if doc.starts_with("<Error>") {
        let err: ResponseError = quick_xml::de::from_str(doc)?;
        return Err(err.into());
    }
    Ok(quick_xml::de::from_str(doc)?)
}

fn check_error(error: Option<ResponseError>) -> Result<(), LookupError> {
    match error {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

impl UspsClient {
    /// Standardizes an address (`API=Verify`).
    pub async fn address_verification(
        &self,
        address: &PostalAddress,
    ) -> Result<AddressValidateResponse, LookupError> {
        let body = self
            .api_get("Verify", "AddressValidateRequest", Some(address), None)
            .await?;
        let result: AddressValidateResponse = parse_response(&body)?;
        check_error(result.address.error.clone())?;
        Ok(result)
    }

    /// Finds the ZIP+4 for an address (`API=ZipCodeLookup`).
    pub async fn zip_code_lookup(&self, address: &PostalAddress) -> Result<ZipCodeLookupResponse, LookupError> {
        let body = self
            .api_get("ZipCodeLookup", "ZipCodeLookupRequest", Some(address), None)
            .await?;
        let result: ZipCodeLookupResponse = parse_response(&body)?;
        check_error(result.address.error.clone())?;
        Ok(result)
    }

    /// Finds the city and state for a five digit zip (`API=CityStateLookup`).
    pub async fn city_state_lookup(&self, zip: &ZipCode) -> Result<CityStateLookupResponse, LookupError> {
        let body = self
            .api_get("CityStateLookup", "CityStateLookupRequest", None, Some(zip))
            .await?;
        let result: CityStateLookupResponse = parse_response(&body)?;
        check_error(result.zip_code.error.clone())?;
        Ok(result)
    }

    async fn api_get(
        &self,
        api: &str,
        root: &str,
        address: Option<&PostalAddress>,
        zip_code: Option<&ZipCode>,
    ) -> Result<String, LookupError> {
        if !self.config.has_username() {
            return Err(LookupError::MissingUsername);
        }

        let xml = request_xml(
            root,
            &XmlRequest {
                user_id: &self.config.username,
                address,
                zip_code,
            },
        )?;
        debug!("HTTP GET request to: {} API={}", self.config.api_endpoint, api);
        let resp = self
            .http
            .get(&self.config.api_endpoint)
            .query(&[("API", api), ("XML", xml.as_str())])
            .send()
            .await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        debug!("HTTP response: status={}, size={} bytes", status, body.len());
        Ok(body)
    }
}
