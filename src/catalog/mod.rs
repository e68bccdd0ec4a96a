// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Normalized resource catalog model.
//!
//! Advertisements nest an ordered catalog of resource entries; this
//! module flattens each entry into a queryable [`Resource`] and builds
//! the per-invocation [`Request`] record matched against requirement
//! expressions.

mod extract;
mod request;
mod resource;

pub use extract::resources;
pub use request::Request;
pub use resource::Resource;
