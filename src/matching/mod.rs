// Copyright (c) 2025 Nikolay Denev <ndenev@gmail.com>
// SPDX-License-Identifier: BSD-3-Clause

//! Predicate library and filter pipeline.
//!
//! Each predicate is one matching rule over a [`Resource`]; the
//! pipeline applies the enabled set in order and drops a resource on
//! the first failure. Which predicates are enabled follows from which
//! options were given: capacity checks always run, the requirement,
//! affiliation, and wall-time checks only when requested.

use serde_json::{Map, Value};
use tracing::debug;

use crate::catalog::{Request, Resource};
use crate::error::Result;
use crate::expr::{self, Scope};

/// One matching rule over a resource.
pub type Predicate = Box<dyn Fn(&Resource) -> bool>;

/// Build the predicate list for this invocation.
pub fn enabled_predicates(
    request: &Request,
    walltime: i64,
    match_requirements: bool,
) -> Vec<Predicate> {
    let mut predicates: Vec<Predicate> = Vec::new();

    let cpus = request.cpus;
    predicates.push(Box::new(move |r| cpus <= r.cpus()));
    let memory = request.memory;
    predicates.push(Box::new(move |r| memory <= r.memory()));

    if match_requirements {
        let attrs = request.attributes();
        predicates.push(Box::new(move |r| requirements_satisfied(r, &attrs)));
    }
    if let Some(vo) = request.vo.clone() {
        predicates.push(Box::new(move |r| admits_vo(r, &vo)));
    }
    if walltime > 0 {
        predicates.push(Box::new(move |r| within_wall_time(r, walltime)));
    }

    predicates
}

/// Lazily filter extracted resources, short-circuiting per item on the
/// first failing predicate. Extraction errors pass through untouched
/// for the consumer to surface.
pub fn filter<I>(resources: I, predicates: Vec<Predicate>) -> impl Iterator<Item = Result<Resource>>
where
    I: Iterator<Item = Result<Resource>>,
{
    resources.filter(move |item| match item {
        Ok(resource) => predicates.iter().all(|p| p(resource)),
        Err(_) => true,
    })
}

/// Requirement-expression match: the entry's `Requirements` expression
/// evaluated with the entry as local scope and the request as target.
/// No expression means no constraint; an unparseable or indeterminate
/// one means no match, never an error.
fn requirements_satisfied(resource: &Resource, attrs: &Map<String, Value>) -> bool {
    let Some(requirements) = resource.requirements() else {
        return true;
    };
    match expr::parse(requirements) {
        Ok(parsed) => parsed.eval(&Scope::new(resource.entry(), attrs)).is_true(),
        Err(e) => {
            debug!(
                resource = resource.name(),
                requirements,
                error = %e,
                "unparseable Requirements, treating as non-match"
            );
            false
        }
    }
}

/// Affiliation allow-list: absent or empty `AllowedVOs` is unrestricted.
fn admits_vo(resource: &Resource, vo: &str) -> bool {
    let allowed = resource.allowed_vos();
    allowed.is_empty() || allowed.iter().any(|tag| *tag == vo)
}

/// Wall-time ceiling: absent or zero `MaxWallTime` is unbounded.
fn within_wall_time(resource: &Resource, requested: i64) -> bool {
    match resource.max_wall_time() {
        None | Some(0) => true,
        Some(limit) => requested <= limit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::collector::Advertisement;
    use serde_json::json;

    fn site_ad(entries: Value) -> Advertisement {
        let Value::Object(map) = json!({
            "AffiliationGroup": "alpha",
            "ResourceGroup": "alpha-rg",
            "BatchSystems": ["slurm"],
            "GridEndpoint": "ce.alpha.example.net",
            "ResourceCatalog": entries,
        }) else {
            unreachable!()
        };
        map
    }

    fn extract_one(entry: Value) -> Resource {
        catalog::resources(vec![site_ad(json!([entry]))])
            .next()
            .unwrap()
            .unwrap()
    }

    fn matched_names(entries: Value, request: &Request, walltime: i64, reqs: bool) -> Vec<String> {
        let predicates = enabled_predicates(request, walltime, reqs);
        filter(catalog::resources(vec![site_ad(entries)]), predicates)
            .map(|r| r.unwrap().name().to_string())
            .collect()
    }

    fn site1() -> Value {
        json!({
            "Name": "site1",
            "CPUs": 4,
            "Memory": 8192,
            "MaxWallTime": 1440,
            "AllowedVOs": ["osg"],
        })
    }

    #[test]
    fn test_capacity_predicates_are_monotonic() {
        let resource = extract_one(site1());
        for cpus in 0..=4 {
            let predicates = enabled_predicates(&Request::new(cpus, 1, None), 0, false);
            assert!(predicates.iter().all(|p| p(&resource)), "cpus={cpus}");
        }
        let too_many = enabled_predicates(&Request::new(5, 1, None), 0, false);
        assert!(!too_many.iter().all(|p| p(&resource)));
    }

    #[test]
    fn test_memory_insufficiency_excludes() {
        let names = matched_names(json!([site1()]), &Request::new(1, 16384, None), 0, false);
        assert!(names.is_empty());
    }

    #[test]
    fn test_unbounded_wall_time_passes_any_request() {
        for entry in [json!({"Name": "s", "CPUs": 1, "Memory": 1}),
            json!({"Name": "s", "CPUs": 1, "Memory": 1, "MaxWallTime": 0})]
        {
            let resource = extract_one(entry);
            assert!(within_wall_time(&resource, 0));
            assert!(within_wall_time(&resource, i64::MAX));
        }
    }

    #[test]
    fn test_wall_time_ceiling() {
        let resource = extract_one(site1());
        assert!(within_wall_time(&resource, 1000));
        assert!(within_wall_time(&resource, 1440));
        assert!(!within_wall_time(&resource, 2000));
    }

    #[test]
    fn test_affiliation_allow_list() {
        let unrestricted = extract_one(json!({"Name": "s", "CPUs": 1, "Memory": 1}));
        assert!(admits_vo(&unrestricted, "anything"));

        let empty = extract_one(json!({"Name": "s", "CPUs": 1, "Memory": 1, "AllowedVOs": []}));
        assert!(admits_vo(&empty, "anything"));

        let restricted =
            extract_one(json!({"Name": "s", "CPUs": 1, "Memory": 1, "AllowedVOs": ["osg", "fermi"]}));
        assert!(admits_vo(&restricted, "osg"));
        assert!(admits_vo(&restricted, "fermi"));
        assert!(!admits_vo(&restricted, "atlas"));
    }

    #[test]
    fn test_requirements_absent_matches() {
        let resource = extract_one(json!({"Name": "s", "CPUs": 1, "Memory": 1}));
        assert!(requirements_satisfied(&resource, &Request::new(1, 1, None).attributes()));
    }

    #[test]
    fn test_requirements_expression_match() {
        let entry = json!({
            "Name": "s",
            "CPUs": 8,
            "Memory": 16384,
            "Requirements": "RequestCPUs <= CPUs && RequestMemory <= Memory",
        });
        let resource = extract_one(entry);
        assert!(requirements_satisfied(&resource, &Request::new(2, 4096, None).attributes()));
        assert!(!requirements_satisfied(&resource, &Request::new(16, 4096, None).attributes()));
    }

    #[test]
    fn test_requirements_missing_vo_is_non_match_not_error() {
        let entry = json!({
            "Name": "s",
            "CPUs": 8,
            "Memory": 16384,
            "Requirements": "TARGET.VO == \"osg\"",
        });
        let resource = extract_one(entry);
        // No VO in the request: the clause is indeterminate, so no match.
        assert!(!requirements_satisfied(&resource, &Request::new(1, 1, None).attributes()));
        assert!(requirements_satisfied(
            &resource,
            &Request::new(1, 1, Some("osg".to_string())).attributes()
        ));
    }

    #[test]
    fn test_requirements_parse_failure_is_non_match() {
        let entry = json!({"Name": "s", "CPUs": 1, "Memory": 1, "Requirements": "CPUs >"});
        let resource = extract_one(entry);
        assert!(!requirements_satisfied(&resource, &Request::new(1, 1, None).attributes()));
    }

    #[test]
    fn test_disabled_predicates_do_not_run() {
        // Restrictive AllowedVOs and MaxWallTime are ignored while the
        // corresponding options are inactive.
        let names = matched_names(json!([site1()]), &Request::new(2, 4096, None), 0, false);
        assert_eq!(names, vec!["site1"]);
    }

    #[test]
    fn test_end_to_end_matching() {
        // The canonical scenario: site1 with 4 CPUs, 8192 MB, 1440 min,
        // AllowedVOs ["osg"].
        let request = |vo: &str| Request::new(2, 4096, Some(vo.to_string()));

        assert_eq!(matched_names(json!([site1()]), &request("osg"), 0, false), vec!["site1"]);
        assert!(matched_names(json!([site1()]), &request("atlas"), 0, false).is_empty());
        assert!(matched_names(json!([site1()]), &request("osg"), 2000, false).is_empty());
        assert_eq!(
            matched_names(json!([site1()]), &request("osg"), 1000, false),
            vec!["site1"]
        );
    }

    #[test]
    fn test_filter_passes_errors_through() {
        let mut bad = site_ad(json!([]));
        bad.remove("ResourceCatalog");
        let ads = vec![site_ad(json!([site1()])), bad];

        let predicates = enabled_predicates(&Request::new(1, 1, None), 0, false);
        let items: Vec<_> = filter(catalog::resources(ads), predicates).collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(items[1].is_err());
    }
}
