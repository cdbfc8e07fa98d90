use crate::constants::{
    API_PRODUCTION_ENDPOINT, API_TEST_ENDPOINT, DEFAULT_ENDPOINT, ENDPOINT_ENV, PASSWORD_ENV,
    PRODUCTION_ENV, USERNAME_ENV,
};
use std::env;

/// Settings for one pipeline run
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Dump each normalized address to the diagnostic stream
    pub verbose: bool,
    /// Leading rows to discard (header lines)
    pub skip_rows: usize,
    /// Offset of the street field within each record
    pub start_column: usize,
    /// Number of workers, at least one
    pub concurrency: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            skip_rows: 1,
            start_column: 0,
            concurrency: 1,
        }
    }
}

/// Credentials and endpoints for the USPS lookups
#[derive(Debug, Clone)]
pub struct UspsConfig {
    pub username: String,
    pub password: String,
    /// "zip by address" JSON endpoint
    pub endpoint: String,
    /// XML API endpoint; the test server unless production is selected
    pub api_endpoint: String,
}

impl UspsConfig {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_endpoint: API_TEST_ENDPOINT.to_string(),
        }
    }

    /// Switches the XML API between the production and test servers.
    pub fn with_production(self, production: bool) -> Self {
        let endpoint = if production {
            API_PRODUCTION_ENDPOINT
        } else {
            API_TEST_ENDPOINT
        };
        self.with_api_endpoint(endpoint)
    }

    pub fn with_api_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.api_endpoint = endpoint.into();
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Reads credentials from the environment. Unset variables become empty
    /// strings; the client reports a missing username on every lookup.
    pub fn from_env() -> Self {
        let config = Self::new(
            env::var(USERNAME_ENV).unwrap_or_default(),
            env::var(PASSWORD_ENV).unwrap_or_default(),
        );
        let config = config.with_production(env::var(PRODUCTION_ENV).map_or(false, |v| is_truthy(&v)));
        match env::var(ENDPOINT_ENV) {
            Ok(endpoint) if !endpoint.trim().is_empty() => config.with_endpoint(endpoint.trim()),
            _ => config,
        }
    }

    pub fn has_username(&self) -> bool {
        !self.username.is_empty()
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}
