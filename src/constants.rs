//! Constants shared by the CLI, the USPS client and the pipeline.

// Environment variables read by the CLI
pub const USERNAME_ENV: &str = "USPS_USERNAME";
pub const PASSWORD_ENV: &str = "USPS_PASSWORD";
pub const ENDPOINT_ENV: &str = "USPS_ENDPOINT";
pub const PRODUCTION_ENV: &str = "USPS_PRODUCTION";

/// Public "zip by address" lookup used by tools.usps.com
pub const DEFAULT_ENDPOINT: &str = "https://tools.usps.com/tools/app/ziplookup/zipByAddress";

// Web Tools XML API (address verify, zip code lookup, city/state lookup)
pub const API_PRODUCTION_ENDPOINT: &str = "https://secure.shippingapis.com/ShippingAPI.dll";
pub const API_TEST_ENDPOINT: &str = "https://secure.shippingapis.com/ShippingAPITest.dll";

// `resultStatus` values returned by the lookup
pub const STATUS_SUCCESS: &str = "SUCCESS";
pub const STATUS_ADDRESS_NOT_FOUND: &str = "ADDRESS NOT FOUND";

/// Field delimiter for input records and output records
pub const DELIMITER: char = ',';

/// Input path that means "read standard input"
pub const STDIN_PATH: &str = "-";

/// Capacity of the channel between the line source and the workers.
/// Kept at one so the source never runs more than a line ahead.
pub const HANDOFF_CAPACITY: usize = 1;

/// Default tracing filter when RUST_LOG is unset. stderr also carries the
/// per-line diagnostics, so only warnings and errors are logged by default.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// User agent sent with lookup requests
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";
