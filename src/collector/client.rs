// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use std::time::Duration;

use reqwest::blocking;
use tracing::{debug, info};

use super::{Advertisement, discovery_constraint};
use crate::config::Endpoint;
use crate::error::{Error, Result};

/// Timeout for establishing the collector connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the full query round trip
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking HTTP client for the collector's advertisement query API.
///
/// One call, one batch: the query either returns every matching
/// advertisement or fails as a whole. No retry, no partial results.
pub struct Client {
    endpoint: Endpoint,
    http: blocking::Client,
}

impl Client {
    pub fn new(endpoint: Endpoint) -> Self {
        let http = blocking::Client::builder()
            .user_agent(concat!("gridq/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self { endpoint, http }
    }

    /// Fetch all advertisements matching `constraint`.
    pub fn fetch(&self, constraint: &str) -> Result<Vec<Advertisement>> {
        let url = format!("{}/ads", self.endpoint.url());
        debug!(%constraint, %url, "querying collector");

        let response = self
            .http
            .get(&url)
            .query(&[("constraint", constraint)])
            .send()
            .map_err(|source| Error::Fetch {
                endpoint: self.endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchStatus {
                endpoint: self.endpoint.to_string(),
                status,
            });
        }

        let ads: Vec<Advertisement> = response.json().map_err(|source| Error::Decode { source })?;
        info!(count = ads.len(), "received advertisements");
        Ok(ads)
    }

    /// Fetch the advertisements carrying everything the extractor needs.
    pub fn fetch_sites(&self) -> Result<Vec<Advertisement>> {
        self.fetch(&discovery_constraint())
    }
}
