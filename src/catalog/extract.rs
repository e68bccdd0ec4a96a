// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Resource extraction from advertisement batches.
//!
//! Each advertisement carries an ordered catalog of resource entries;
//! extraction flattens every entry into one [`Resource`] that merges
//! the advertisement's routing fields with the entry's own fields.
//! The iterator is lazy: nothing beyond the current advertisement is
//! held in memory, and consumers may stop early.

use serde_json::{Map, Value};
use tracing::trace;

use crate::collector::{AD_ATTRS, Advertisement, CATALOG_ATTR};
use crate::error::{Error, Result};

use super::Resource;

/// Lazily extract one `Resource` per catalog entry, preserving the
/// encounter order of advertisements and, within each, of entries.
///
/// A malformed advertisement (missing catalog or routing field) yields
/// a single `Err` item naming the field; the registry constraint makes
/// this a defensive invariant check rather than an expected path.
pub fn resources<I>(ads: I) -> Extract<I::IntoIter>
where
    I: IntoIterator<Item = Advertisement>,
{
    Extract {
        ads: ads.into_iter(),
        current: None,
    }
}

pub struct Extract<I> {
    ads: I,
    current: Option<CurrentAd>,
}

/// Extraction state for the advertisement currently being walked.
struct CurrentAd {
    shared: Map<String, Value>,
    entries: std::vec::IntoIter<Value>,
}

impl<I> Iterator for Extract<I>
where
    I: Iterator<Item = Advertisement>,
{
    type Item = Result<Resource>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(current) = &mut self.current {
                for entry in current.entries.by_ref() {
                    match entry {
                        Value::Object(entry) => {
                            return Some(Ok(build_resource(&current.shared, entry)));
                        }
                        other => {
                            // Catalogs occasionally carry stray scalars;
                            // they describe nothing schedulable.
                            trace!(?other, "skipping non-record catalog entry");
                        }
                    }
                }
                self.current = None;
            }

            match self.ads.next() {
                Some(ad) => match begin_ad(ad) {
                    Ok(current) => self.current = Some(current),
                    Err(e) => return Some(Err(e)),
                },
                None => return None,
            }
        }
    }
}

/// Pull the shared routing fields and the catalog out of one
/// advertisement, checking the invariants the registry constraint is
/// supposed to guarantee.
fn begin_ad(mut ad: Advertisement) -> Result<CurrentAd> {
    let mut shared = Map::new();
    for attr in AD_ATTRS {
        let value = ad
            .get(attr)
            .cloned()
            .ok_or(Error::MissingField { field: attr })?;
        // The endpoint field is an expression on the wire; everything
        // downstream wants the evaluated string form.
        let value = if attr == "GridEndpoint" {
            coerce_string(value)
        } else {
            value
        };
        shared.insert(attr.to_string(), value);
    }

    let entries = match ad.remove(CATALOG_ATTR) {
        Some(Value::Array(entries)) => entries,
        _ => return Err(Error::MissingField { field: CATALOG_ATTR }),
    };

    Ok(CurrentAd {
        shared,
        entries: entries.into_iter(),
    })
}

/// Merge one catalog entry with its advertisement's routing fields.
/// Entry fields win on name collision, except for the routing fields
/// themselves.
fn build_resource(shared: &Map<String, Value>, entry: Map<String, Value>) -> Resource {
    let mut record = shared.clone();
    for (key, value) in entry.clone() {
        if AD_ATTRS.contains(&key.as_str()) {
            continue;
        }
        record.insert(key, normalize_value(value));
    }
    Resource::new(record, entry)
}

/// Copy a field value, forcing mapping-shaped data back into mappings.
///
/// Some catalog encodings mis-represent nested sub-records as sequences
/// of `[key, value]` pairs; those coerce to mappings here, recursively.
/// Anything else copies through unchanged.
fn normalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(k, v)| (k, normalize_value(v)))
                .collect(),
        ),
        Value::Array(items) if is_pair_sequence(&items) => Value::Object(
            items
                .into_iter()
                .filter_map(|pair| match pair {
                    Value::Array(mut kv) => {
                        let value = kv.pop()?;
                        match kv.pop()? {
                            Value::String(key) => Some((key, normalize_value(value))),
                            _ => None,
                        }
                    }
                    _ => None,
                })
                .collect(),
        ),
        other => other,
    }
}

/// A non-empty sequence whose every element is a `[string, value]`
/// pair, i.e. a sub-record that lost its shape in transit.
fn is_pair_sequence(items: &[Value]) -> bool {
    !items.is_empty()
        && items.iter().all(|item| {
            matches!(item, Value::Array(pair) if pair.len() == 2 && pair[0].is_string())
        })
}

fn coerce_string(value: Value) -> Value {
    match value {
        Value::String(_) => value,
        other => Value::String(other.to_string()),
    }
}
