// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Advertisement source: the collector registry.
//!
//! Compute sites publish advertisements describing their endpoint and a
//! catalog of schedulable resources. This module fetches one atomic
//! batch of advertisements matching a constraint; everything downstream
//! (extraction, filtering, rendering) is local.

mod client;

pub use client::Client;

use serde_json::{Map, Value};

/// One advertisement record as published to the collector.
pub type Advertisement = Map<String, Value>;

/// Advertisement-level routing fields copied into every extracted
/// resource. These always come from the advertisement, never from a
/// same-named catalog entry field.
pub const AD_ATTRS: [&str; 4] = [
    "AffiliationGroup",
    "ResourceGroup",
    "BatchSystems",
    "GridEndpoint",
];

/// Field holding the nested resource catalog.
pub const CATALOG_ATTR: &str = "ResourceCatalog";

/// Constraint requiring every field the extractor depends on, so
/// malformed advertisements are dropped at the registry rather than
/// shipped here.
pub fn discovery_constraint() -> String {
    AD_ATTRS
        .iter()
        .chain(std::iter::once(&CATALOG_ATTR))
        .map(|attr| format!("defined({attr})"))
        .collect::<Vec<_>>()
        .join(" && ")
}
