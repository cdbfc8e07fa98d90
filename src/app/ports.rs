use crate::error::LookupError;
use crate::types::{AddressQuery, ZipByAddressResponse};
use async_trait::async_trait;

/// Postal lookup used by the pipeline workers.
///
/// Implementations return `Ok` only for a successful result status; a not-found
/// or any other status is reported as an error.
#[async_trait]
pub trait AddressLookup: Send + Sync {
    async fn zip_by_address(&self, query: &AddressQuery) -> Result<ZipByAddressResponse, LookupError>;
}
