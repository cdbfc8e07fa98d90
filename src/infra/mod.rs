pub mod usps_api;
pub mod usps_client;

pub use usps_api::{
    AddressValidateResponse, CityStateLookupResponse, CityStateResult, PostalAddress, ResponseError,
    ValidatedAddress, ZipCode, ZipCodeLookupResponse,
};
pub use usps_client::UspsClient;
