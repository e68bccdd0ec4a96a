// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

use thiserror::Error;

/// Errors surfaced by the query/extract/render pipeline.
///
/// Indeterminate requirement-expression results are deliberately not
/// represented here: they fold into "no match" during filtering.
#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to contact collector at {endpoint}: {source}")]
    Fetch {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("collector at {endpoint} returned HTTP {status}")]
    FetchStatus {
        endpoint: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed collector response: {source}")]
    Decode {
        #[source]
        source: reqwest::Error,
    },

    #[error("advertisement is missing required field {field:?}")]
    MissingField { field: &'static str },

    #[error("invalid pool address {address:?} (expected HOST[:PORT])")]
    BadAddress { address: String },
}

pub type Result<T> = std::result::Result<T, Error>;
